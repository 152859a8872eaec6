//! PostgreSQL persistence module.
//!
//! Provides connection pooling for the company record store.

pub mod pool;

pub use pool::{mask_database_url, PostgresPool, PostgresPoolError};
