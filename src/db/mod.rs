//! Database layer.
//!
//! This module provides:
//! - Connection pool creation per data source
//! - The connection access facade ([`Registry`])
//! - Table synchronization (DDL generation and execution)

pub mod pool;
pub mod registry;
pub mod synchronizer;

pub use registry::Registry;
pub use synchronizer::create_table_statement;
