//! Token transport between client and server
//!
//! Cookie mode carries both tokens in HttpOnly cookies. Bearer mode reads the
//! `Authorization: Bearer <token>` header and returns issued tokens in the
//! JSON body.

use actix_web::cookie::{time::Duration, Cookie, SameSite};
use actix_web::http::header::AUTHORIZATION;
use actix_web::{HttpRequest, HttpResponse};
use serde_json::{json, Value};

use tk_core::domain::TokenPair;
use tk_shared::TransportConfig;

/// Which channel carries tokens
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportMode {
    Cookie,
    Bearer,
}

impl TransportMode {
    pub fn from_config(config: &TransportConfig) -> Self {
        if config.use_cookie_auth {
            TransportMode::Cookie
        } else {
            TransportMode::Bearer
        }
    }
}

/// Extracts the token from an `Authorization: Bearer` header
pub fn extract_bearer_token(req: &HttpRequest) -> Option<String> {
    req.headers()
        .get(AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(str::to_string)
}

fn cookie_token(req: &HttpRequest, name: &str) -> Option<String> {
    req.cookie(name)
        .map(|cookie| cookie.value().to_string())
        .filter(|value| !value.is_empty())
}

/// Access token presented with a request, if any
pub fn extract_access_token(req: &HttpRequest, config: &TransportConfig) -> Option<String> {
    match TransportMode::from_config(config) {
        TransportMode::Cookie => cookie_token(req, &config.cookie_access_name),
        TransportMode::Bearer => extract_bearer_token(req),
    }
}

/// Refresh token presented outside the request body
pub fn extract_refresh_token(req: &HttpRequest, config: &TransportConfig) -> Option<String> {
    match TransportMode::from_config(config) {
        TransportMode::Cookie => cookie_token(req, &config.cookie_refresh_name),
        TransportMode::Bearer => extract_bearer_token(req),
    }
}

/// 200 response delivering a freshly issued pair
///
/// Cookie mode sets both cookies and leaves `body` as is. Bearer mode adds a
/// `tokens` object to `body`.
pub fn deliver_tokens(config: &TransportConfig, pair: &TokenPair, mut body: Value) -> HttpResponse {
    match TransportMode::from_config(config) {
        TransportMode::Cookie => HttpResponse::Ok()
            .cookie(token_cookie(
                config,
                &config.cookie_access_name,
                pair.access_token(),
                Duration::seconds(pair.access_expires_in()),
            ))
            .cookie(token_cookie(
                config,
                &config.cookie_refresh_name,
                pair.refresh_token(),
                Duration::seconds(pair.refresh_expires_in()),
            ))
            .json(body),
        TransportMode::Bearer => {
            if let Value::Object(fields) = &mut body {
                fields.insert(
                    "tokens".to_string(),
                    json!({
                        "access_token": pair.access_token(),
                        "refresh_token": pair.refresh_token(),
                        "token_type": "bearer",
                        "expires_in": pair.access_expires_in(),
                    }),
                );
            }
            HttpResponse::Ok().json(body)
        }
    }
}

/// 200 response that expires both token cookies in cookie mode
pub fn clear_tokens(config: &TransportConfig, body: Value) -> HttpResponse {
    match TransportMode::from_config(config) {
        TransportMode::Cookie => HttpResponse::Ok()
            .cookie(token_cookie(config, &config.cookie_access_name, "", Duration::ZERO))
            .cookie(token_cookie(config, &config.cookie_refresh_name, "", Duration::ZERO))
            .json(body),
        TransportMode::Bearer => HttpResponse::Ok().json(body),
    }
}

fn token_cookie(
    config: &TransportConfig,
    name: &str,
    value: &str,
    max_age: Duration,
) -> Cookie<'static> {
    let mut cookie = Cookie::new(name.to_string(), value.to_string());
    cookie.set_path("/");
    cookie.set_http_only(config.cookie_http_only);
    cookie.set_secure(config.cookie_secure);
    cookie.set_same_site(same_site(&config.cookie_same_site));
    cookie.set_max_age(max_age);
    if let Some(domain) = &config.cookie_domain {
        cookie.set_domain(domain.clone());
    }
    cookie
}

fn same_site(value: &str) -> SameSite {
    match value.to_ascii_lowercase().as_str() {
        "strict" => SameSite::Strict,
        "none" => SameSite::None,
        _ => SameSite::Lax,
    }
}
