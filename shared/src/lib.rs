//! Shared configuration and common types for the TokenKeep workspace
//!
//! This crate provides functionality used across all server modules:
//! - Configuration types (token signing, transport, database, server)
//! - Error response structures and error codes

pub mod config;
pub mod errors;

// Re-export commonly used items at crate root
pub use config::{
    AppConfig, ConfigError, DatabaseConfig, JwtConfig, ServerConfig, TransportConfig,
};
pub use errors::{error_codes, ErrorResponse};
