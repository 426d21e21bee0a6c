//! Connection pool creation.
//!
//! Turns one finalized [`DataSourceConfig`] into a live `MySqlPool`.
//! Recognized pool-level properties configure the pool; anything else is
//! logged at debug level and ignored, since the driver exposes no arbitrary
//! property channel.

use crate::builder::DataSourceConfig;
use crate::error::{Error, Result};
use sqlx::mysql::{MySqlConnectOptions, MySqlPoolOptions};
use sqlx::MySqlPool;
use std::time::Duration;
use tracing::debug;

// Pool configuration defaults
pub const DEFAULT_MAX_CONNECTIONS: u32 = 10;
pub const DEFAULT_MIN_CONNECTIONS: u32 = 1;
pub const DEFAULT_ACQUIRE_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_IDLE_TIMEOUT_SECS: u64 = 600;
pub const DEFAULT_CHARSET: &str = "utf8mb4";

/// Property keys recognized when configuring the pool.
const POOL_PROPERTY_KEYS: &[&str] = &[
    "max_connections",
    "min_connections",
    "acquire_timeout_secs",
    "idle_timeout_secs",
    "test_before_acquire",
    "charset",
];

/// Create one pool for a finalized data-source configuration.
///
/// Establishes the first connection eagerly so misconfiguration surfaces at
/// build time rather than on first use.
pub async fn create_pool(id: &str, config: &DataSourceConfig) -> Result<MySqlPool> {
    build_pool_options(id, config)
        .connect_with(build_connect_options(id, config))
        .await
        .map_err(|e| Error::pool_creation(id, e))
}

fn build_connect_options(id: &str, config: &DataSourceConfig) -> MySqlConnectOptions {
    let mut options = MySqlConnectOptions::new()
        .port(config.effective_port())
        .charset(
            config
                .property_str("charset")
                .unwrap_or(DEFAULT_CHARSET),
        );
    if let Some(host) = &config.server_name {
        options = options.host(host);
    }
    if let Some(database) = &config.database_name {
        options = options.database(database);
    }
    if let Some(user) = &config.user {
        options = options.username(user);
    }
    if let Some(password) = &config.password {
        options = options.password(password);
    }
    if let Some(class_name) = &config.data_source_class_name {
        // Driver selection is fixed by the pool type; recorded for parity only.
        debug!(data_source_id = %id, class_name = %class_name, "Ignoring data source class name");
    }
    options
}

fn build_pool_options(id: &str, config: &DataSourceConfig) -> MySqlPoolOptions {
    for key in config.properties.keys() {
        if !POOL_PROPERTY_KEYS.contains(&key.as_str()) {
            debug!(data_source_id = %id, property = %key, "Ignoring unrecognized pool property");
        }
    }

    MySqlPoolOptions::new()
        .max_connections(
            config
                .property_u64("max_connections")
                .map(|v| v as u32)
                .unwrap_or(DEFAULT_MAX_CONNECTIONS),
        )
        .min_connections(
            config
                .property_u64("min_connections")
                .map(|v| v as u32)
                .unwrap_or(DEFAULT_MIN_CONNECTIONS),
        )
        .acquire_timeout(Duration::from_secs(
            config
                .property_u64("acquire_timeout_secs")
                .unwrap_or(DEFAULT_ACQUIRE_TIMEOUT_SECS),
        ))
        .idle_timeout(Duration::from_secs(
            config
                .property_u64("idle_timeout_secs")
                .unwrap_or(DEFAULT_IDLE_TIMEOUT_SECS),
        ))
        .test_before_acquire(config.property_bool("test_before_acquire").unwrap_or(true))
}
