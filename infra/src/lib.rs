//! # Infrastructure Layer
//!
//! Concrete persistence for the TokenKeep token engine.
//!
//! ## Architecture
//!
//! The infrastructure layer contains:
//! - **Database**: PostgreSQL pool, migrations and the `jwt_tokens` token store
//! - **Subjects**: lookup of `id`, `is_active` and `is_admin` in the host's `users` table
//! - **Unit of work**: one SQL transaction per request, committed by the host

/// Database module - PostgreSQL implementations using SQLx
pub mod database;

pub use database::{DatabasePool, PgSubjectResolver, PgTokenStore, PgTx, PgUnitOfWork};

/// Infrastructure-specific error types
#[derive(Debug, thiserror::Error)]
pub enum InfrastructureError {
    /// Database connection error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Migration failure
    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}
