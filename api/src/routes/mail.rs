//! Issuance endpoints
//!
//! Each handler issues a fresh attempt, replacing any outstanding one for the
//! same identifier and type, and reports how long the credentials stay valid.

use actix_web::{web, HttpResponse};

use bl_core::domain::entities::VerificationType;
use bl_core::services::verification::{IssueOutcome, IssueRequest};
use bl_shared::masking::mask_identifier;
use bl_shared::VerificationResponse;

use crate::dto::{PasswordResetQuery, SendTwoFactorRequest, SendVerificationRequest, TwoFactorChannel};
use crate::extractors::AccessToken;
use crate::handlers::error::ApiError;
use crate::state::AppState;

/// Handler for POST /api/mail/send-verification
///
/// # Request Body
///
/// ```json
/// {
///     "email": "user@example.com",
///     "username": "Jane"
/// }
/// ```
///
/// # Response
///
/// `200 {"success": true, "message": "Verification email sent", "expires_in_sec": 1800}`
pub async fn send_verification(
    state: web::Data<AppState>,
    body: web::Json<SendVerificationRequest>,
) -> Result<HttpResponse, ApiError> {
    let body = body.into_inner();
    body.check()?;

    let request = IssueRequest::new(VerificationType::EmailVerification, body.email)
        .with_username(body.username)
        .with_deadline(state.deadline());
    let outcome = issue(&state, request).await?;

    Ok(HttpResponse::Ok().json(
        VerificationResponse::success("Verification email sent").with_expiry(outcome.expires_in_sec),
    ))
}

/// Handler for GET /api/mail/get-password-reset-code?email=
///
/// Requires a bearer token accepted by the access authority.
pub async fn get_password_reset_code(
    state: web::Data<AppState>,
    token: AccessToken,
    query: web::Query<PasswordResetQuery>,
) -> Result<HttpResponse, ApiError> {
    let grant = state.authorize(token.as_str()).await?;
    let query = query.into_inner();
    query.check()?;

    tracing::debug!(subject = %grant.subject_id, "Password reset code requested");
    let request = IssueRequest::new(VerificationType::PasswordReset, query.email)
        .with_deadline(state.deadline());
    let outcome = issue(&state, request).await?;

    Ok(HttpResponse::Ok().json(
        VerificationResponse::success("Password reset code sent").with_expiry(outcome.expires_in_sec),
    ))
}

/// Handler for POST /api/mail/send-2fa
///
/// Sends a two-factor code by mail or SMS depending on `channel`.
pub async fn send_two_factor(
    state: web::Data<AppState>,
    token: AccessToken,
    body: web::Json<SendTwoFactorRequest>,
) -> Result<HttpResponse, ApiError> {
    state.authorize(token.as_str()).await?;
    let body = body.into_inner();
    body.check()?;

    let verification_type = match body.channel {
        TwoFactorChannel::Email => VerificationType::TwoFactorEmail,
        TwoFactorChannel::Phone => VerificationType::TwoFactorPhone,
    };
    let request =
        IssueRequest::new(verification_type, body.identifier).with_deadline(state.deadline());
    let outcome = issue(&state, request).await?;

    Ok(HttpResponse::Ok().json(
        VerificationResponse::success("Verification code sent").with_expiry(outcome.expires_in_sec),
    ))
}

async fn issue(state: &AppState, request: IssueRequest) -> Result<IssueOutcome, ApiError> {
    let masked = mask_identifier(&request.identifier);
    let outcome = state.verification.issue(request).await?;
    tracing::info!(
        identifier = %masked,
        verification_type = %outcome.verification_type,
        attempt_id = %outcome.attempt_id,
        expires_in_sec = outcome.expires_in_sec,
        "Verification credentials sent"
    );
    Ok(outcome)
}
