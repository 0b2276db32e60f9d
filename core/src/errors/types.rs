//! Token verification and access control error types
//!
//! `TokenError` is the internal taxonomy used for logging and tests. It must
//! never reach an untrusted caller verbatim: the access gate collapses every
//! variant into `AuthError::Unauthorized`.

use thiserror::Error;

/// Reasons a token is rejected or cannot be found
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenError {
    #[error("Malformed token")]
    MalformedToken,

    #[error("Token signature verification failed")]
    BadSignature,

    #[error("Token expired")]
    Expired,

    #[error("Wrong token type")]
    WrongTokenType,

    #[error("Token exceeds maximum length")]
    TokenTooLarge,

    #[error("Token not found")]
    TokenNotFound,

    #[error("Token revoked")]
    TokenRevoked,

    #[error("Subject not found")]
    SubjectNotFound,

    #[error("Subject is inactive")]
    SubjectInactive,
}

impl TokenError {
    /// Stable machine-readable code for logs
    pub fn code(&self) -> &'static str {
        match self {
            TokenError::MalformedToken => "MALFORMED_TOKEN",
            TokenError::BadSignature => "BAD_SIGNATURE",
            TokenError::Expired => "TOKEN_EXPIRED",
            TokenError::WrongTokenType => "WRONG_TOKEN_TYPE",
            TokenError::TokenTooLarge => "TOKEN_TOO_LARGE",
            TokenError::TokenNotFound => "TOKEN_NOT_FOUND",
            TokenError::TokenRevoked => "TOKEN_REVOKED",
            TokenError::SubjectNotFound => "SUBJECT_NOT_FOUND",
            TokenError::SubjectInactive => "SUBJECT_INACTIVE",
        }
    }
}

/// Outward-facing access control failures
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthError {
    #[error("Authentication required")]
    Unauthorized,

    #[error("Insufficient permissions")]
    Forbidden,
}

impl AuthError {
    /// Stable machine-readable code for logs
    pub fn code(&self) -> &'static str {
        match self {
            AuthError::Unauthorized => "UNAUTHORIZED",
            AuthError::Forbidden => "FORBIDDEN",
        }
    }
}
