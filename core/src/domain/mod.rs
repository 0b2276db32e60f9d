//! Domain layer containing token and subject entities.

pub mod entities;

// Re-export commonly used domain types
pub use entities::*;
