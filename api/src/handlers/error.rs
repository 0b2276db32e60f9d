//! Mapping of domain errors onto HTTP responses
//!
//! Every body uses `tk_shared::ErrorResponse`. Token rejection reasons are
//! logged by the engine and never echoed to the client.

use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use thiserror::Error;

use tk_core::errors::{AuthError, DomainError};
use tk_shared::{error_codes, ErrorResponse};

/// Error returned by handlers and extractors
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Authentication required")]
    Unauthorized,

    #[error("Insufficient permissions")]
    Forbidden,

    #[error("Invalid request: {0}")]
    Validation(String),

    #[error("Service temporarily unavailable")]
    ServiceUnavailable,

    #[error("An internal error occurred")]
    Internal,
}

impl ApiError {
    pub fn code(&self) -> &'static str {
        match self {
            ApiError::Unauthorized => error_codes::UNAUTHORIZED,
            ApiError::Forbidden => error_codes::FORBIDDEN,
            ApiError::Validation(_) => error_codes::VALIDATION_ERROR,
            ApiError::ServiceUnavailable => error_codes::SERVICE_UNAVAILABLE,
            ApiError::Internal => error_codes::INTERNAL_ERROR,
        }
    }
}

impl From<DomainError> for ApiError {
    fn from(error: DomainError) -> Self {
        match &error {
            DomainError::Token(_) | DomainError::Auth(AuthError::Unauthorized) => {
                ApiError::Unauthorized
            }
            DomainError::Auth(AuthError::Forbidden) => ApiError::Forbidden,
            DomainError::Store { .. } => {
                log::error!("Token store failure: {}", error);
                ApiError::ServiceUnavailable
            }
            DomainError::Encoding { .. } | DomainError::Configuration { .. } => {
                log::error!("Token engine failure: {}", error);
                ApiError::Internal
            }
        }
    }
}

impl From<validator::ValidationErrors> for ApiError {
    fn from(errors: validator::ValidationErrors) -> Self {
        ApiError::Validation(errors.to_string())
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Unauthorized => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden => StatusCode::FORBIDDEN,
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::ServiceUnavailable => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(ErrorResponse::new(self.code(), self.to_string()))
    }
}
