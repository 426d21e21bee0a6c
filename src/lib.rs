//! tabsync
//!
//! A named registry of pooled MySQL connections built from per-identifier
//! credentials, with declarative table synchronization: every registered
//! [`TableSchema`] is turned into a `CREATE TABLE IF NOT EXISTS` statement
//! and applied against its data source once, at construction.
//!
//! ```no_run
//! use tabsync::{DatabaseCredentials, FieldSchema, FieldType, Registry, TableSchema};
//!
//! # async fn demo() -> tabsync::Result<()> {
//! let registry = Registry::builder()
//!     .credentials(DatabaseCredentials::new("main", "db1", "shop", "user", "pass"))?
//!     .register_schema(
//!         TableSchema::new("shop::models::User", "main")
//!             .snake_case()
//!             .field(FieldSchema::new("userId", FieldType::of::<i32>()).primary_key().auto_increment())
//!             .field(FieldSchema::new("email", FieldType::of::<String>()).length(120).unique()),
//!     )
//!     .build()
//!     .await?;
//!
//! let mut conn = registry.connection("main").await?;
//! # Ok(())
//! # }
//! ```

pub mod builder;
pub mod db;
pub mod error;
pub mod models;

pub use builder::{DataSourceConfig, RegistryBuilder};
pub use db::{Registry, create_table_statement};
pub use error::{Error, Result};
pub use models::{DatabaseCredentials, FieldSchema, FieldType, SqlRepr, TableSchema};
