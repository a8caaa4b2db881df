//! Shared utilities and common types for the verification service
//!
//! This crate provides common functionality used across all server modules:
//! - Configuration types loaded from the environment
//! - Generic response structures
//! - Field validation results, the email grammar and identifier masking

pub mod config;
pub mod types;
pub mod utils;

// Re-export commonly used items at crate root
pub use config::{
    ApiConfig, AppConfig, AuthorityConfig, ConfigError, Environment, LogFormat, LoggingConfig,
    MailConfig, SecurityConfig, ServerConfig, StoreBackend, StoreConfig, TemplateConfig,
};
pub use types::{GenericResponse, VerificationResponse};
pub use utils::{masking, phone, validation};
pub use utils::{ValidationError, ValidationErrorKind, ValidationResult};
