//! Unit tests for domain error codes and conversions

use crate::errors::{AuthError, DomainError, TokenError};

#[test]
fn test_token_error_converts_into_domain_error() {
    let err: DomainError = TokenError::Expired.into();

    assert_eq!(err.error_code(), "TOKEN_EXPIRED");
    assert_eq!(err.token_error(), Some(TokenError::Expired));
    assert_eq!(err.to_string(), "Token expired");
}

#[test]
fn test_auth_error_codes() {
    let unauthorized: DomainError = AuthError::Unauthorized.into();
    let forbidden: DomainError = AuthError::Forbidden.into();

    assert_eq!(unauthorized.error_code(), "UNAUTHORIZED");
    assert_eq!(forbidden.error_code(), "FORBIDDEN");
    assert_eq!(unauthorized.token_error(), None);
}

#[test]
fn test_store_error_from_cause() {
    let err = DomainError::store("connection refused");

    assert_eq!(err.error_code(), "STORE_ERROR");
    assert_eq!(err.to_string(), "Token store error: connection refused");
}

#[test]
fn test_every_token_error_has_distinct_code() {
    let all = [
        TokenError::MalformedToken,
        TokenError::BadSignature,
        TokenError::Expired,
        TokenError::WrongTokenType,
        TokenError::TokenTooLarge,
        TokenError::TokenNotFound,
        TokenError::TokenRevoked,
        TokenError::SubjectNotFound,
        TokenError::SubjectInactive,
    ];

    let mut codes: Vec<_> = all.iter().map(|e| e.code()).collect();
    codes.sort_unstable();
    codes.dedup();
    assert_eq!(codes.len(), all.len());
}
