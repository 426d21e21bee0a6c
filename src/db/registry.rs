//! Connection access facade.
//!
//! The [`Registry`] owns one pool per data-source id for the lifetime of the
//! process. It is immutable after construction: no further schema or pool
//! mutation, so concurrent callers need no locking beyond what the pools
//! already guarantee for checkout.

use crate::builder::RegistryBuilder;
use crate::error::{Error, Result};
use sqlx::mysql::MySql;
use sqlx::pool::PoolConnection;
use sqlx::MySqlPool;
use std::collections::HashMap;

/// Named registry of pooled connections, produced by [`RegistryBuilder`].
#[derive(Debug)]
pub struct Registry {
    pools: HashMap<String, MySqlPool>,
    unhandled: Vec<String>,
}

impl Registry {
    pub(crate) fn new(pools: HashMap<String, MySqlPool>, unhandled: Vec<String>) -> Self {
        Self { pools, unhandled }
    }

    /// Start building a registry.
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::new()
    }

    /// Check out a connection from the named pool. The caller owns the
    /// checked-out connection until it is dropped back into the pool.
    pub async fn connection(&self, data_source_id: &str) -> Result<PoolConnection<MySql>> {
        let pool = self.pool(data_source_id)?;
        pool.acquire()
            .await
            .map_err(|e| Error::acquire(data_source_id, e))
    }

    /// Check out a connection from an arbitrary pool. Iteration order is not
    /// guaranteed stable across calls or processes.
    pub async fn connection_any(&self) -> Result<PoolConnection<MySql>> {
        let (id, pool) = self.pools.iter().next().ok_or(Error::NoDataSources)?;
        pool.acquire().await.map_err(|e| Error::acquire(id, e))
    }

    /// The pool backing one data source.
    pub fn pool(&self, data_source_id: &str) -> Result<&MySqlPool> {
        self.pools
            .get(data_source_id)
            .ok_or_else(|| Error::data_source_not_found(data_source_id))
    }

    /// Registered data-source ids, in no particular order.
    pub fn data_source_ids(&self) -> impl Iterator<Item = &str> {
        self.pools.keys().map(String::as_str)
    }

    /// Whether a data source is registered under `data_source_id`.
    pub fn contains(&self, data_source_id: &str) -> bool {
        self.pools.contains_key(data_source_id)
    }

    /// Number of registered data sources.
    pub fn len(&self) -> usize {
        self.pools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pools.is_empty()
    }

    /// Fully-qualified type names of registered schemas that matched no data
    /// source during synchronization.
    pub fn unhandled_schemas(&self) -> &[String] {
        &self.unhandled
    }
}
