//! Error types for tabsync.
//!
//! All error types are defined with `thiserror`. Builder input problems are
//! reported synchronously at the call that supplied them; pool creation and
//! DDL execution failures abort construction and are never retried.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    /// Malformed credential input: missing/empty id, non-object array
    /// element, or a structured document without an `id` field.
    #[error("Invalid argument: {message}")]
    InvalidArgument { message: String },

    /// `connection(id)` referenced an unregistered data-source id.
    #[error("Data source with ID '{id}' does not exist")]
    DataSourceNotFound { id: String },

    /// `connection_any()` was called on an empty registry.
    #[error("No data sources available")]
    NoDataSources,

    /// The underlying pool could not be established for a data source.
    #[error("Failed to create connection pool for data source '{id}': {source}")]
    PoolCreationFailure {
        id: String,
        #[source]
        source: sqlx::Error,
    },

    /// A generated DDL statement failed to apply. Carries the offending
    /// statement text so misconfigured schemas are diagnosable.
    #[error("Failed to execute statement: {statement}")]
    ExecutionFailure {
        statement: String,
        #[source]
        source: sqlx::Error,
    },

    /// A connection could not be checked out from an established pool.
    #[error("Failed to acquire connection from data source '{id}': {source}")]
    Acquire {
        id: String,
        #[source]
        source: sqlx::Error,
    },
}

impl Error {
    /// Create an invalid argument error.
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            message: message.into(),
        }
    }

    /// Create a data source not found error.
    pub fn data_source_not_found(id: impl Into<String>) -> Self {
        Self::DataSourceNotFound { id: id.into() }
    }

    /// Create a pool creation error.
    pub fn pool_creation(id: impl Into<String>, source: sqlx::Error) -> Self {
        Self::PoolCreationFailure {
            id: id.into(),
            source,
        }
    }

    /// Create an execution error carrying the offending statement.
    pub fn execution(statement: impl Into<String>, source: sqlx::Error) -> Self {
        Self::ExecutionFailure {
            statement: statement.into(),
            source,
        }
    }

    /// Create an acquire error.
    pub fn acquire(id: impl Into<String>, source: sqlx::Error) -> Self {
        Self::Acquire {
            id: id.into(),
            source,
        }
    }
}

/// Result type alias for tabsync operations.
pub type Result<T> = std::result::Result<T, Error>;
