use actix_web::{web, HttpRequest, HttpResponse};
use serde_json::json;
use validator::Validate;

use crate::dto::LogoutRequest;
use crate::handlers::error::ApiError;
use crate::sessions::AuthSessions;
use crate::transport::{clear_tokens, extract_refresh_token, TransportMode};

/// Handler for POST /auth/logout
///
/// Revokes the presented refresh token together with every live access token
/// of the same subject. Tokens belonging to other subjects are untouched.
///
/// # Request
///
/// Same token sources as `/auth/refresh`.
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
///     "message": "Successfully logged out"
/// }
/// ```
/// Cookie mode also expires both token cookies.
///
/// ## Errors
/// - 400 Bad Request: Body refresh token empty
/// - 401 Unauthorized: Missing, oversize, invalid, expired or revoked refresh token
/// - 503 Service Unavailable: Token store unreachable
pub async fn logout(
    req: HttpRequest,
    sessions: web::Data<dyn AuthSessions>,
    body: Option<web::Json<LogoutRequest>>,
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

    let subject = sessions.logout(&refresh_token).await?;

    log::info!("Subject {} logged out", subject.id);
    Ok(clear_tokens(
        transport,
        json!({ "message": "Successfully logged out" }),
    ))
}
