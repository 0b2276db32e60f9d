//! # TokenKeep Core
//!
//! Token lifecycle engine for stateful JWT sessions.
//! This crate contains the domain entities, the claim codec, the token store
//! and subject resolver contracts, the lifecycle service (create, verify,
//! blacklist, rotate) and the access gate built on top of it.

pub mod domain;
pub mod errors;
pub mod repositories;
pub mod services;

// Re-export commonly used types for convenience
pub use domain::*;
pub use errors::*;
pub use repositories::*;
pub use services::*;
