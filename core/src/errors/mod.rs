//! Domain-specific error types and error handling.

mod types;

#[cfg(test)]
mod tests;

pub use types::{AuthError, TokenError};

use thiserror::Error;

/// Core domain errors
#[derive(Error, Debug)]
pub enum DomainError {
    #[error(transparent)]
    Token(#[from] TokenError),

    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error("Token encoding failed: {message}")]
    Encoding { message: String },

    #[error("Token store error: {message}")]
    Store { message: String },

    #[error("Configuration error: {message}")]
    Configuration { message: String },
}

impl DomainError {
    /// Build a store error from any displayable cause
    pub fn store(cause: impl std::fmt::Display) -> Self {
        DomainError::Store {
            message: cause.to_string(),
        }
    }

    /// Stable machine-readable code for logs
    pub fn error_code(&self) -> &'static str {
        match self {
            DomainError::Token(e) => e.code(),
            DomainError::Auth(e) => e.code(),
            DomainError::Encoding { .. } => "ENCODING_ERROR",
            DomainError::Store { .. } => "STORE_ERROR",
            DomainError::Configuration { .. } => "CONFIGURATION_ERROR",
        }
    }

    /// The verification failure kind, if this is one
    pub fn token_error(&self) -> Option<TokenError> {
        match self {
            DomainError::Token(e) => Some(*e),
            _ => None,
        }
    }
}

pub type DomainResult<T> = Result<T, DomainError>;
