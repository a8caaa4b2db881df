//! Submission endpoints
//!
//! Neither route requires a bearer token: possession of the mailed secret is
//! the proof.

use actix_web::{web, HttpResponse};

use bl_core::domain::entities::VerificationType;
use bl_core::errors::DomainError;
use bl_core::services::verification::{SubmitOutcome, ValidatedRequest};
use bl_shared::masking::mask_identifier;
use bl_shared::VerificationResponse;

use crate::extractors::ValidVerification;
use crate::handlers::error::ApiError;
use crate::state::AppState;

/// Handler for POST /api/verify/mail
///
/// Accepts every verification type except `password_reset`, which has its
/// own route.
///
/// # Request Body
///
/// ```json
/// {
///     "verification_type": "email_verification",
///     "identifier": "user@example.com",
///     "token": "..."
/// }
/// ```
///
/// # Response
///
/// `200 {"success": true, "message": "Verification successful"}`
pub async fn verify_mail(
    state: web::Data<AppState>,
    submission: ValidVerification,
) -> Result<HttpResponse, ApiError> {
    let request = submission.into_inner();
    if request.verification_type() == VerificationType::PasswordReset {
        return Err(unsupported(request.verification_type()));
    }

    submit(&state, &request).await?;
    Ok(HttpResponse::Ok().json(VerificationResponse::success("Verification successful")))
}

/// Handler for POST /api/verify/password-reset
///
/// Same body as `/verify/mail`; the type must be `password_reset` and both
/// the mailed code and token are required.
pub async fn verify_password_reset(
    state: web::Data<AppState>,
    submission: ValidVerification,
) -> Result<HttpResponse, ApiError> {
    let request = submission.into_inner();
    if request.verification_type() != VerificationType::PasswordReset {
        return Err(unsupported(request.verification_type()));
    }

    submit(&state, &request).await?;
    Ok(HttpResponse::Ok().json(VerificationResponse::success("Password reset code verified")))
}

async fn submit(state: &AppState, request: &ValidatedRequest) -> Result<SubmitOutcome, ApiError> {
    let outcome = state.verification.submit(request, state.deadline()).await?;
    tracing::info!(
        identifier = %mask_identifier(request.identifier()),
        verification_type = %request.verification_type(),
        outcome = ?outcome,
        "Verification submission accepted"
    );
    Ok(outcome)
}

fn unsupported(verification_type: VerificationType) -> ApiError {
    DomainError::UnsupportedVerificationType {
        verification_type: verification_type.as_str().to_string(),
    }
    .into()
}
