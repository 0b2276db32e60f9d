//! POST /auth/refresh in both transport modes

mod common;

use actix_web::{cookie::Cookie, cookie::time, http::header, http::StatusCode, test, App};
use serde_json::{json, Value};

use tk_api::configure;

use common::{bearer_context, cookie_context};

#[actix_web::test]
async fn test_bearer_refresh_returns_new_pair_in_body() {
    let ctx = bearer_context();
    let subject = ctx.active_subject().await;
    let pair = ctx.issue(&subject).await;

    let app = test::init_service(App::new().app_data(ctx.sessions.clone()).configure(configure)).await;

    let req = test::TestRequest::post()
        .uri("/auth/refresh")
        .set_json(json!({ "refresh_token": pair.refresh_token() }))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(resp.response().cookies().count(), 0);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["subject_id"], subject.id.to_string());
    assert_eq!(body["tokens"]["token_type"], "bearer");
    assert_eq!(body["tokens"]["expires_in"], 1800);

    let new_access = body["tokens"]["access_token"].as_str().unwrap().to_string();
    let new_refresh = body["tokens"]["refresh_token"].as_str().unwrap().to_string();
    assert_ne!(new_refresh, pair.refresh_token());

    // New access token works
    let req = test::TestRequest::get()
        .uri("/api/v1/me")
        .insert_header((header::AUTHORIZATION, format!("Bearer {}", new_access)))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    // Old refresh token is spent
    let req = test::TestRequest::post()
        .uri("/auth/refresh")
        .set_json(json!({ "refresh_token": pair.refresh_token() }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    // New refresh token rotates again
    let req = test::TestRequest::post()
        .uri("/auth/refresh")
        .set_json(json!({ "refresh_token": new_refresh }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
}

#[actix_web::test]
async fn test_bearer_refresh_falls_back_to_authorization_header() {
    let ctx = bearer_context();
    let subject = ctx.active_subject().await;
    let pair = ctx.issue(&subject).await;

    let app = test::init_service(App::new().app_data(ctx.sessions.clone()).configure(configure)).await;

    let req = test::TestRequest::post()
        .uri("/auth/refresh")
        .insert_header((header::AUTHORIZATION, format!("Bearer {}", pair.refresh_token())))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
}

#[actix_web::test]
async fn test_bearer_refresh_validates_body() {
    let ctx = bearer_context();
    let app = test::init_service(App::new().app_data(ctx.sessions.clone()).configure(configure)).await;

    let req = test::TestRequest::post()
        .uri("/auth/refresh")
        .set_json(json!({ "refresh_token": "" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "VALIDATION_ERROR");
}

#[actix_web::test]
async fn test_oversize_refresh_token_is_unauthorized() {
    let ctx = bearer_context();
    let app = test::init_service(App::new().app_data(ctx.sessions.clone()).configure(configure)).await;

    let req = test::TestRequest::post()
        .uri("/auth/refresh")
        .set_json(json!({ "refresh_token": "a".repeat(2049) }))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "UNAUTHORIZED");
    assert_eq!(ctx.store.lookup_count(), 0);
}

#[actix_web::test]
async fn test_refresh_rejects_access_token_and_missing_token() {
    let ctx = bearer_context();
    let subject = ctx.active_subject().await;
    let pair = ctx.issue(&subject).await;

    let app = test::init_service(App::new().app_data(ctx.sessions.clone()).configure(configure)).await;

    let req = test::TestRequest::post()
        .uri("/auth/refresh")
        .set_json(json!({ "refresh_token": pair.access_token() }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    let req = test::TestRequest::post().uri("/auth/refresh").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn test_failed_refresh_keeps_old_token_valid() {
    let ctx = bearer_context();
    let subject = ctx.active_subject().await;
    let pair = ctx.issue(&subject).await;
    let records_before = ctx.store.len().await;

    let app = test::init_service(App::new().app_data(ctx.sessions.clone()).configure(configure)).await;

    ctx.store.set_unavailable(true);
    let req = test::TestRequest::post()
        .uri("/auth/refresh")
        .set_json(json!({ "refresh_token": pair.refresh_token() }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::SERVICE_UNAVAILABLE);

    ctx.store.set_unavailable(false);
    assert_eq!(ctx.store.len().await, records_before);
    let record = ctx.store.committed(pair.refresh_token()).await.unwrap();
    assert!(!record.is_blacklisted);

    let req = test::TestRequest::post()
        .uri("/auth/refresh")
        .set_json(json!({ "refresh_token": pair.refresh_token() }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
}

#[actix_web::test]
async fn test_cookie_refresh_sets_cookies() {
    let ctx = cookie_context();
    let subject = ctx.active_subject().await;
    let pair = ctx.issue(&subject).await;

    let app = test::init_service(App::new().app_data(ctx.sessions.clone()).configure(configure)).await;

    let req = test::TestRequest::post()
        .uri("/auth/refresh")
        .cookie(Cookie::new("refresh_token", pair.refresh_token()))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let cookies: Vec<Cookie<'static>> = resp
        .response()
        .cookies()
        .map(|cookie| cookie.into_owned())
        .collect();
    let access = cookies.iter().find(|c| c.name() == "access_token").unwrap();
    let refresh = cookies.iter().find(|c| c.name() == "refresh_token").unwrap();

    assert_eq!(access.http_only(), Some(true));
    assert_eq!(access.path(), Some("/"));
    assert_eq!(access.max_age(), Some(time::Duration::seconds(1800)));
    assert_eq!(refresh.max_age(), Some(time::Duration::seconds(86400)));
    assert_ne!(refresh.value(), pair.refresh_token());

    let body: Value = test::read_body_json(resp).await;
    assert!(body.get("tokens").is_none());
    assert_eq!(body["subject_id"], subject.id.to_string());

    // Old cookie is now revoked
    let req = test::TestRequest::post()
        .uri("/auth/refresh")
        .cookie(Cookie::new("refresh_token", pair.refresh_token()))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn test_cookie_mode_ignores_body_token() {
    let ctx = cookie_context();
    let subject = ctx.active_subject().await;
    let pair = ctx.issue(&subject).await;

    let app = test::init_service(App::new().app_data(ctx.sessions.clone()).configure(configure)).await;

    let req = test::TestRequest::post()
        .uri("/auth/refresh")
        .set_json(json!({ "refresh_token": pair.refresh_token() }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}
