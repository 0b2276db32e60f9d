use actix_web::{web, HttpRequest, HttpResponse};
use serde_json::json;
use validator::Validate;

use crate::dto::RefreshRequest;
use crate::handlers::error::ApiError;
use crate::sessions::AuthSessions;
use crate::transport::{deliver_tokens, extract_refresh_token, TransportMode};

/// Handler for POST /auth/refresh
///
/// Exchanges a refresh token for a new access and refresh token. The
/// presented refresh token is revoked once the exchange commits.
///
/// # Request
///
/// Cookie mode reads the refresh cookie. Bearer mode reads the body below,
/// falling back to `Authorization: Bearer <refresh_token>`.
///
/// ```json
/// {
///     "refresh_token": "eyJ..."
/// }
/// ```
///
/// # Response
///
/// ## Success (200 OK)
/// ```json
/// {
///     "message": "Token refreshed",
///     "subject_id": "0b6c...",
///     "tokens": {
///         "access_token": "eyJ...",
///         "refresh_token": "eyJ...",
///         "token_type": "bearer",
///         "expires_in": 1800
///     }
/// }
/// ```
/// `tokens` is present in bearer mode only; cookie mode sets both cookies.
///
/// ## Errors
/// - 400 Bad Request: Body refresh token empty
/// - 401 Unauthorized: Missing, oversize, invalid, expired or revoked refresh token
/// - 503 Service Unavailable: Token store unreachable
pub async fn refresh(
    req: HttpRequest,
    sessions: web::Data<dyn AuthSessions>,
    body: Option<web::Json<RefreshRequest>>,
) -> Result<HttpResponse, ApiError> {
    let transport = sessions.transport();

    let refresh_token = match (TransportMode::from_config(transport), body) {
        (TransportMode::Bearer, Some(body)) => {
            body.validate()?;
            Some(body.into_inner().refresh_token)
        }
        _ => extract_refresh_token(&req, transport),
    };
    let refresh_token = refresh_token.ok_or(ApiError::Unauthorized)?;

    let (subject, pair) = sessions.refresh(&refresh_token).await?;

    log::info!("Refreshed tokens for subject {}", subject.id);
    Ok(deliver_tokens(
        transport,
        &pair,
        json!({
            "message": "Token refreshed",
            "subject_id": subject.id,
        }),
    ))
}
