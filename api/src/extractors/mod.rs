//! Typed request extractors
//!
//! - [`AccessToken`]: bearer token placed in request extensions by the gate
//! - [`ValidVerification`]: a decoded and validated verification submission

use actix_web::{dev::Payload, web, FromRequest, HttpMessage, HttpRequest};
use futures_util::future::LocalBoxFuture;
use std::fmt;
use std::future::{ready, Ready};

use bl_core::domain::entities::VerificationRequest;
use bl_core::services::verification::{validate_request, ValidatedRequest};

use crate::handlers::error::{json_error_handler, ApiError};

/// Opaque bearer token of the caller
#[derive(Clone, PartialEq, Eq)]
pub struct AccessToken(String);

impl AccessToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AccessToken(***)")
    }
}

impl FromRequest for AccessToken {
    type Error = ApiError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        let result = req.extensions().get::<AccessToken>().cloned().ok_or_else(|| {
            ApiError::unauthorized("Authentication required", "Authorization header is missing")
        });
        ready(result)
    }
}

/// Verification submission that passed shape validation.
///
/// Undecodable JSON is a 400 "Invalid request format"; a decodable body that
/// breaks the field rules is a 400 "Validation failed" listing every error.
#[derive(Debug, Clone)]
pub struct ValidVerification(pub ValidatedRequest);

impl ValidVerification {
    pub fn into_inner(self) -> ValidatedRequest {
        self.0
    }
}

impl FromRequest for ValidVerification {
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let body = web::Json::<VerificationRequest>::from_request(req, payload);

        Box::pin(async move {
            let request = body.await?.into_inner();
            match validate_request(request) {
                Ok(validated) => Ok(ValidVerification(validated)),
                Err(result) => {
                    tracing::debug!(errors = ?result.messages(), "Verification submission failed validation");
                    Err(ApiError::from(result).into())
                }
            }
        })
    }
}

/// JSON extractor configuration shared by every endpoint
pub fn json_config(limit: usize) -> web::JsonConfig {
    web::JsonConfig::default()
        .limit(limit)
        .error_handler(json_error_handler)
}

/// Query string extractor configuration; undecodable queries are 400s as well
pub fn query_config() -> web::QueryConfig {
    web::QueryConfig::default().error_handler(|err, _req| {
        tracing::debug!(error = %err, "Query string could not be decoded");
        ApiError::malformed(err.to_string()).into()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{http::StatusCode, test, App, HttpResponse};
    use bl_core::domain::entities::VerificationType;

    async fn echo(submission: ValidVerification) -> HttpResponse {
        let request = submission.into_inner();
        HttpResponse::Ok().json(serde_json::json!({
            "type": request.verification_type().as_str(),
            "identifier": request.identifier(),
        }))
    }

    async fn whoami(token: AccessToken) -> HttpResponse {
        HttpResponse::Ok().body(token.as_str().to_string())
    }

    #[actix_web::test]
    async fn test_valid_submission_is_normalized() {
        let app = test::init_service(
            App::new()
                .app_data(json_config(4096))
                .route("/verify", web::post().to(echo)),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/verify")
            .set_json(serde_json::json!({
                "verification_type": "2fa_email",
                "identifier": " Jane@Example.com ",
                "code": "123456",
            }))
            .to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["type"], VerificationType::TwoFactorEmail.as_str());
        assert_eq!(body["identifier"], "jane@example.com");
    }

    #[actix_web::test]
    async fn test_malformed_json_is_invalid_request_format() {
        let app = test::init_service(
            App::new()
                .app_data(json_config(4096))
                .route("/verify", web::post().to(echo)),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/verify")
            .insert_header(("Content-Type", "application/json"))
            .set_payload("{not json")
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["status"], false);
        assert_eq!(body["message"], "Invalid request format");
    }

    #[actix_web::test]
    async fn test_missing_token_extension_is_unauthorized() {
        let app = test::init_service(App::new().route("/me", web::get().to(whoami))).await;
        let req = test::TestRequest::get().uri("/me").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    }

    #[::core::prelude::v1::test]
    fn test_access_token_debug_is_redacted() {
        assert_eq!(format!("{:?}", AccessToken::new("secret")), "AccessToken(***)");
    }
}
