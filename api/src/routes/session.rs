//! Protected routes exercising the access extractors

use actix_web::HttpResponse;
use serde_json::json;

use crate::dto::SubjectResponse;
use crate::middleware::{AdminSubject, CurrentSubject};

/// Handler for GET /api/v1/me
///
/// Returns the subject behind the presented access token.
///
/// ## Errors
/// - 401 Unauthorized: Missing or rejected access token
/// - 503 Service Unavailable: Token store unreachable
pub async fn me(subject: CurrentSubject) -> HttpResponse {
    HttpResponse::Ok().json(SubjectResponse::from(subject.0))
}

/// Handler for GET /api/v1/admin/status
///
/// ## Errors
/// - 401 Unauthorized: Missing or rejected access token
/// - 403 Forbidden: Subject is not an admin
pub async fn admin_status(admin: AdminSubject) -> HttpResponse {
    HttpResponse::Ok().json(json!({
        "status": "ok",
        "admin_id": admin.id,
    }))
}
