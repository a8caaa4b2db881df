use bl_shared::validation::{validate_email, ValidationResult};

use super::{DeliveryError, DomainError, GenerationError, StoreError};

#[test]
fn test_collaborator_errors_bridge_into_domain_error() {
    let err: DomainError = GenerationError::InvalidLength.into();
    assert!(matches!(err, DomainError::Generation(GenerationError::InvalidLength)));

    let err: DomainError = DeliveryError::Mail("smtp down".into()).into();
    assert!(err.is_server_error());
    assert_eq!(err.to_string(), "mail delivery failed: smtp down");

    let err: DomainError = StoreError::Unavailable("refused".into()).into();
    assert!(matches!(err, DomainError::Store(_)));
}

#[test]
fn test_validation_result_converts() {
    let result: ValidationResult = validate_email("nope").unwrap_err().into();
    let err: DomainError = result.into();
    match err {
        DomainError::ValidationFailed(result) => assert_eq!(result.errors().len(), 1),
        other => panic!("expected validation failure, got {:?}", other),
    }
}

#[test]
fn test_client_errors_are_not_server_errors() {
    assert!(!DomainError::AttemptUnavailable.is_server_error());
    assert!(!DomainError::Exhausted.is_server_error());
    assert!(!DomainError::InvalidCredential { remaining_attempts: 2 }.is_server_error());
    assert!(!DomainError::unauthenticated("token rejected").is_server_error());
    assert!(DomainError::DeadlineExceeded.is_server_error());
}
