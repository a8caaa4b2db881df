//! Mapping of domain failures onto HTTP responses
//!
//! Every error body has the shape `{status: false, message, error, details?}`.
//! Server-side failures are logged in full and rendered opaque.

use actix_web::{
    error::JsonPayloadError, http::StatusCode, HttpRequest, HttpResponse, ResponseError,
};

use bl_core::errors::DomainError;
use bl_shared::{GenericResponse, ValidationResult};

const INVALID_OR_EXPIRED: &str = "Verification code is invalid or has expired";
const INTERNAL_SERVER_ERROR: &str = "Internal server error";

/// Error returned by handlers, extractors and the bearer gate
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    /// Rejected by the bearer gate before reaching a handler
    #[error("{message}: {error}")]
    Unauthorized {
        message: &'static str,
        error: &'static str,
    },
}

impl From<ValidationResult> for ApiError {
    fn from(result: ValidationResult) -> Self {
        ApiError::Domain(DomainError::ValidationFailed(result))
    }
}

impl From<bl_shared::ValidationError> for ApiError {
    fn from(error: bl_shared::ValidationError) -> Self {
        ValidationResult::from(error).into()
    }
}

impl ApiError {
    pub fn unauthorized(message: &'static str, error: &'static str) -> Self {
        ApiError::Unauthorized { message, error }
    }

    pub fn malformed(message: impl Into<String>) -> Self {
        ApiError::Domain(DomainError::MalformedRequest {
            message: message.into(),
        })
    }

    /// Response body for this error
    pub fn body(&self) -> GenericResponse {
        let error = match self {
            ApiError::Unauthorized { message, error } => {
                return GenericResponse::failure(*message, *error)
            }
            ApiError::Domain(error) => error,
        };

        match error {
            DomainError::MalformedRequest { message } => {
                GenericResponse::failure("Invalid request format", message.clone())
            }
            DomainError::ValidationFailed(result) => result.to_response(),
            DomainError::UnsupportedVerificationType { verification_type } => {
                GenericResponse::failure(
                    "Invalid verification type",
                    format!("Unsupported verification type: {}", verification_type),
                )
            }
            DomainError::Unauthenticated { reason } => {
                GenericResponse::failure("Invalid authentication", reason.clone())
            }
            DomainError::AttemptUnavailable => {
                GenericResponse::failure(INVALID_OR_EXPIRED, "Verification failed")
            }
            DomainError::InvalidCredential { remaining_attempts } => {
                GenericResponse::failure(INVALID_OR_EXPIRED, "Verification failed")
                    .with_detail("remaining_attempts", remaining_attempts)
            }
            DomainError::Exhausted => GenericResponse::failure(
                "Maximum verification attempts exceeded. Please request a new code",
                "Too many attempts",
            ),
            DomainError::DeadlineExceeded => {
                GenericResponse::failure("Request deadline exceeded", "Service unavailable")
            }
            DomainError::Generation(_) => GenericResponse::failure(
                "Failed to generate verification credentials",
                INTERNAL_SERVER_ERROR,
            ),
            DomainError::Delivery(_) => {
                GenericResponse::failure("Failed to send email", INTERNAL_SERVER_ERROR)
            }
            DomainError::Store(_) | DomainError::Internal { .. } => {
                GenericResponse::failure(INTERNAL_SERVER_ERROR, INTERNAL_SERVER_ERROR)
            }
        }
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        let error = match self {
            ApiError::Unauthorized { .. } => return StatusCode::UNAUTHORIZED,
            ApiError::Domain(error) => error,
        };

        match error {
            DomainError::MalformedRequest { .. }
            | DomainError::ValidationFailed(_)
            | DomainError::UnsupportedVerificationType { .. }
            | DomainError::AttemptUnavailable
            | DomainError::InvalidCredential { .. } => StatusCode::BAD_REQUEST,
            DomainError::Unauthenticated { .. } => StatusCode::UNAUTHORIZED,
            DomainError::Exhausted => StatusCode::TOO_MANY_REQUESTS,
            DomainError::DeadlineExceeded => StatusCode::SERVICE_UNAVAILABLE,
            DomainError::Generation(_)
            | DomainError::Delivery(_)
            | DomainError::Store(_)
            | DomainError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(status = status.as_u16(), error = %self, "Request failed");
        } else {
            tracing::debug!(status = status.as_u16(), error = %self, "Request rejected");
        }
        HttpResponse::build(status).json(self.body())
    }
}

/// `JsonConfig` error handler: undecodable bodies become 400 "Invalid request format"
pub fn json_error_handler(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    tracing::debug!(error = %err, "Request body could not be decoded");
    ApiError::malformed(err.to_string()).into()
}

/// Handler for requests matching no route
pub async fn not_found() -> HttpResponse {
    HttpResponse::NotFound().json(GenericResponse::failure(
        "Resource not found",
        "The requested resource was not found",
    ))
}

/// Default service of every resource: the path exists but not for this method
pub async fn method_not_allowed() -> HttpResponse {
    HttpResponse::MethodNotAllowed().json(GenericResponse::failure(
        "Method not allowed",
        "The requested method is not supported for this resource",
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use bl_core::errors::{DeliveryError, StoreError};
    use bl_shared::validation::ValidationErrorKind;

    #[test]
    fn test_status_mapping() {
        let cases = vec![
            (
                DomainError::MalformedRequest {
                    message: "expected value at line 1".into(),
                },
                StatusCode::BAD_REQUEST,
            ),
            (DomainError::AttemptUnavailable, StatusCode::BAD_REQUEST),
            (
                DomainError::InvalidCredential {
                    remaining_attempts: 2,
                },
                StatusCode::BAD_REQUEST,
            ),
            (DomainError::Exhausted, StatusCode::TOO_MANY_REQUESTS),
            (DomainError::DeadlineExceeded, StatusCode::SERVICE_UNAVAILABLE),
            (
                DomainError::unauthenticated("Access token is not valid"),
                StatusCode::UNAUTHORIZED,
            ),
            (
                DomainError::Store(StoreError::Unavailable("down".into())),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (error, status) in cases {
            assert_eq!(ApiError::from(error).status_code(), status);
        }
    }

    #[test]
    fn test_server_errors_are_opaque() {
        let error = ApiError::from(DomainError::Delivery(DeliveryError::Mail(
            "smtp.internal refused credentials for user admin".into(),
        )));
        let body = error.body();
        assert_eq!(body.message, "Failed to send email");
        assert_eq!(body.error.as_deref(), Some(INTERNAL_SERVER_ERROR));
    }

    #[test]
    fn test_invalid_credential_carries_remaining_attempts() {
        let body = ApiError::from(DomainError::InvalidCredential {
            remaining_attempts: 3,
        })
        .body();
        assert!(!body.status);
        assert_eq!(body.message, INVALID_OR_EXPIRED);
        assert_eq!(body.details.unwrap()["remaining_attempts"], 3);
    }

    #[test]
    fn test_validation_body() {
        let mut result = ValidationResult::new();
        result.add_error("identifier", ValidationErrorKind::Required, "identifier is required");
        let error = ApiError::from(result);

        assert_eq!(error.status_code(), StatusCode::BAD_REQUEST);
        let body = error.body();
        assert_eq!(body.message, "Validation failed");
        assert_eq!(body.error.as_deref(), Some("identifier is required"));
        assert!(body.details.unwrap().contains_key("errorsMap"));
    }
}
