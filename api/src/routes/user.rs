use actix_web::{web, HttpResponse};

use bl_shared::masking::mask_email;
use bl_shared::GenericResponse;

use crate::dto::ResetPasswordRequest;
use crate::extractors::AccessToken;
use crate::handlers::error::ApiError;
use crate::state::AppState;

/// Handler for PUT /api/user/reset-password
///
/// Redeems a verified password reset attempt and asks the access authority
/// to apply the new password. The attempt is consumed only when the
/// authority accepts the change.
///
/// # Response
///
/// `200 {"status": true, "message": "Password has been reset successfully"}`
pub async fn reset_password(
    state: web::Data<AppState>,
    token: AccessToken,
    body: web::Json<ResetPasswordRequest>,
) -> Result<HttpResponse, ApiError> {
    state.authorize(token.as_str()).await?;
    let body = body.into_inner();
    body.check()?;

    let email = body.email.trim().to_lowercase();
    let authority = state.authority.clone();
    let new_password = body.new_password;
    let target = email.clone();

    state
        .verification
        .redeem_password_reset(&email, &body.code, state.deadline(), move || async move {
            authority
                .apply_password_reset(token.as_str(), &target, &new_password)
                .await
        })
        .await?;

    tracing::info!(email = %mask_email(&email), "Password reset applied");
    Ok(HttpResponse::Ok().json(GenericResponse::ok("Password has been reset successfully")))
}
