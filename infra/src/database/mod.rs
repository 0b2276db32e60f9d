//! Database module - PostgreSQL implementations using SQLx
//!
//! This module provides database access layer implementations including:
//! - Connection pool management and migrations
//! - Token store and subject resolver implementations
//! - Transaction-backed unit of work

pub mod connection;
pub mod postgres;


// Re-export commonly used types
pub use connection::DatabasePool;
pub use postgres::{PgSubjectResolver, PgTokenStore, PgTx, PgUnitOfWork};
