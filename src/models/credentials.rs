//! Credential record for one data source.

use serde::Deserialize;

/// Default MySQL port applied when credentials omit the port (or set it to 0).
pub const DEFAULT_PORT: u16 = 3306;

/// Connection parameters for one data source, keyed by `id`.
///
/// Immutable once handed to the builder. Also deserializable from a generic
/// JSON document; `database_name` accepts the `databaseName` spelling too.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseCredentials {
    pub id: String,
    pub host: String,
    /// Contains sensitive data - never log
    pub user: String,
    /// Contains sensitive data - never log
    pub password: String,
    #[serde(alias = "databaseName")]
    pub database_name: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_port() -> u16 {
    DEFAULT_PORT
}

impl DatabaseCredentials {
    /// Create a credential record with the default port.
    pub fn new(
        id: impl Into<String>,
        host: impl Into<String>,
        database_name: impl Into<String>,
        user: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            host: host.into(),
            user: user.into(),
            password: password.into(),
            database_name: database_name.into(),
            port: DEFAULT_PORT,
        }
    }

    /// Set an explicit port.
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Effective port: 0 is treated as unset and falls back to the default.
    pub fn effective_port(&self) -> u16 {
        if self.port == 0 { DEFAULT_PORT } else { self.port }
    }
}
