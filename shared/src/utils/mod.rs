//! Common utility functions

pub mod masking;
pub mod phone;
pub mod validation;

pub use masking::{mask_email, mask_identifier};
pub use phone::{is_valid_phone, mask_phone_number, normalize_phone_number};
pub use validation::{
    is_valid_email, validate_email, validate_required, ValidationError, ValidationErrorKind,
    ValidationResult, EMAIL_PATTERN,
};
