//! Route handlers and their wiring
//!
//! - `verify` - submissions of mailed or texted secrets
//! - `mail` - issuance of verification, password reset and two-factor credentials
//! - `user` - password reset redemption
//! - `health` - liveness probe

pub mod health;
pub mod mail;
pub mod user;
pub mod verify;

use actix_web::web;

use crate::handlers::error::method_not_allowed;
use crate::middleware::BearerGate;

/// Mount every endpoint. `/health` sits at the root, the rest under `/api`.
///
/// The bearer gate wraps individual routes rather than resources so that a
/// wrong method on a known path answers 405 before authentication runs.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/health")
            .route(web::get().to(health::health_check))
            .default_service(web::to(method_not_allowed)),
    )
    .service(
        web::scope("/api")
            .service(
                web::resource("/verify/mail")
                    .route(web::post().to(verify::verify_mail))
                    .default_service(web::to(method_not_allowed)),
            )
            .service(
                web::resource("/verify/password-reset")
                    .route(web::post().to(verify::verify_password_reset))
                    .default_service(web::to(method_not_allowed)),
            )
            .service(
                web::resource("/mail/send-verification")
                    .route(web::post().to(mail::send_verification))
                    .default_service(web::to(method_not_allowed)),
            )
            .service(
                web::resource("/mail/get-password-reset-code")
                    .route(
                        web::get()
                            .to(mail::get_password_reset_code)
                            .wrap(BearerGate::new()),
                    )
                    .default_service(web::to(method_not_allowed)),
            )
            .service(
                web::resource("/mail/send-2fa")
                    .route(web::post().to(mail::send_two_factor).wrap(BearerGate::new()))
                    .default_service(web::to(method_not_allowed)),
            )
            .service(
                web::resource("/user/reset-password")
                    .route(web::put().to(user::reset_password).wrap(BearerGate::new()))
                    .default_service(web::to(method_not_allowed)),
            ),
    );
}
