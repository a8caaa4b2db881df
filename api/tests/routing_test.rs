//! Routing, bearer gate and fallback behavior of the assembled app

mod common;

use actix_web::{http::StatusCode, test, web, App, HttpResponse};
use serde_json::{json, Value};

use bl_api::create_app;
use bl_api::extractors::AccessToken;
use bl_api::middleware::BearerGate;

use common::{bearer, cors, Harness, MAX_PAYLOAD};

async fn echo_token(token: AccessToken) -> HttpResponse {
    HttpResponse::Ok().body(token.as_str().to_string())
}

#[actix_web::test]
async fn test_gate_rejects_malformed_headers() {
    let app = test::init_service(
        App::new().route("/protected", web::get().to(echo_token).wrap(BearerGate::new())),
    )
    .await;

    let cases = [
        (None, "Authentication required", "Authorization header is missing"),
        (
            Some("Token abc"),
            "Invalid authentication format",
            "Authorization header format must be Bearer <token>",
        ),
        (Some("Bearer "), "Invalid authentication", "Empty token provided"),
        (
            Some("Bearer a b"),
            "Invalid authentication format",
            "Authorization header format must be Bearer <token>",
        ),
    ];

    for (header, message, error) in cases {
        let mut req = test::TestRequest::get().uri("/protected");
        if let Some(value) = header {
            req = req.insert_header(("Authorization", value));
        }
        let resp = test::call_service(&app, req.to_request()).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED, "header {:?}", header);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["status"], false);
        assert_eq!(body["message"], message);
        assert_eq!(body["error"], error);
    }
}

#[actix_web::test]
async fn test_gate_exposes_token_to_handler() {
    let app = test::init_service(
        App::new().route("/protected", web::get().to(echo_token).wrap(BearerGate::new())),
    )
    .await;

    let req = test::TestRequest::get()
        .uri("/protected")
        .insert_header(("Authorization", "Bearer xyz"))
        .to_request();
    let body = test::call_and_read_body(&app, req).await;
    assert_eq!(body, "xyz");
}

#[actix_web::test]
async fn test_authority_sees_bearer_token() {
    let harness = Harness::new();
    let app = test::init_service(create_app(harness.state.clone(), cors(), MAX_PAYLOAD)).await;

    let req = test::TestRequest::post()
        .uri("/api/mail/send-2fa")
        .insert_header(("Authorization", "Bearer xyz"))
        .set_json(json!({ "identifier": "owner@example.com" }))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);

    let seen = harness.authority.seen_tokens.lock().unwrap().clone();
    assert_eq!(seen, vec!["xyz".to_string()]);
}

#[actix_web::test]
async fn test_protected_route_without_header_is_unauthorized() {
    let harness = Harness::new();
    let app = test::init_service(create_app(harness.state.clone(), cors(), MAX_PAYLOAD)).await;

    let req = test::TestRequest::put()
        .uri("/api/user/reset-password")
        .set_json(json!({ "email": "a@b.io", "code": "1", "new_password": "p" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    assert!(harness.authority.seen_tokens.lock().unwrap().is_empty());
}

#[actix_web::test]
async fn test_wrong_method_is_method_not_allowed() {
    let harness = Harness::new();
    let app = test::init_service(create_app(harness.state.clone(), cors(), MAX_PAYLOAD)).await;

    let req = test::TestRequest::get().uri("/api/verify/mail").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::METHOD_NOT_ALLOWED);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["status"], false);

    // Method is checked before the bearer gate
    let req = test::TestRequest::post()
        .uri("/api/user/reset-password")
        .to_request();
    assert_eq!(
        test::call_service(&app, req).await.status(),
        StatusCode::METHOD_NOT_ALLOWED
    );

    let req = test::TestRequest::get()
        .uri("/api/mail/send-2fa")
        .insert_header(bearer())
        .to_request();
    assert_eq!(
        test::call_service(&app, req).await.status(),
        StatusCode::METHOD_NOT_ALLOWED
    );
}

#[actix_web::test]
async fn test_unknown_path_is_json_not_found() {
    let harness = Harness::new();
    let app = test::init_service(create_app(harness.state.clone(), cors(), MAX_PAYLOAD)).await;

    let req = test::TestRequest::get().uri("/api/does-not-exist").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["message"], "Resource not found");
}

#[actix_web::test]
async fn test_malformed_json_is_invalid_request_format() {
    let harness = Harness::new();
    let app = test::init_service(create_app(harness.state.clone(), cors(), MAX_PAYLOAD)).await;

    let req = test::TestRequest::post()
        .uri("/api/mail/send-verification")
        .insert_header(("Content-Type", "application/json"))
        .set_payload(r#"{"email": "#)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["message"], "Invalid request format");
}

#[actix_web::test]
async fn test_health_check() {
    let harness = Harness::new();
    let app = test::init_service(create_app(harness.state.clone(), cors(), MAX_PAYLOAD)).await;

    let req = test::TestRequest::get().uri("/health").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["status"], "healthy");
    assert!(body["timestamp"].is_string());
}
