//! Data models for tabsync.
//!
//! This module re-exports the credential record and the schema descriptor
//! model used throughout the crate.

pub mod credentials;
pub mod schema;

// Re-export commonly used types
pub use credentials::{DEFAULT_PORT, DatabaseCredentials};
pub use schema::{DEFAULT_TEXT_LENGTH, FieldSchema, FieldType, SqlRepr, TableSchema};
