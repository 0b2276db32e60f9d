//! Application wiring
//!
//! `configure` registers every route and is shared by the binary and the
//! integration tests. The session handle is registered separately as
//! `web::Data<dyn AuthSessions>` so any store can back it.

use actix_web::{web, HttpResponse};
use std::sync::Arc;

use tk_core::repositories::{SubjectResolver, TokenStore, UnitOfWorkProvider};

use crate::handlers::error::ApiError;
use crate::routes::{auth, session};
use crate::sessions::{AuthSessions, TokenSessions};

/// Wrap a concrete session implementation as shareable app data
pub fn session_data<P, S, R>(sessions: TokenSessions<P, S, R>) -> web::Data<dyn AuthSessions>
where
    P: UnitOfWorkProvider<Tx = S::Tx> + 'static,
    S: TokenStore + 'static,
    R: SubjectResolver<S::Tx> + 'static,
{
    let sessions: Arc<dyn AuthSessions> = Arc::new(sessions);
    web::Data::from(sessions)
}

/// Register all routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(
        web::JsonConfig::default()
            .error_handler(|err, _req| ApiError::Validation(err.to_string()).into()),
    )
    .route("/health", web::get().to(health_check))
    .service(
        web::scope("/auth")
            .route("/refresh", web::post().to(auth::refresh))
            .route("/logout", web::post().to(auth::logout)),
    )
    .service(
        web::scope("/api/v1")
            .route("/me", web::get().to(session::me))
            .route("/admin/status", web::get().to(session::admin_status)),
    )
    .default_service(web::route().to(not_found));
}

/// Health check endpoint handler
async fn health_check() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({
        "status": "healthy",
        "service": "tokenkeep-api",
        "version": env!("CARGO_PKG_VERSION"),
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}

/// Default 404 handler
async fn not_found() -> HttpResponse {
    HttpResponse::NotFound().json(serde_json::json!({
        "error": "not_found",
        "message": "The requested resource was not found"
    }))
}
