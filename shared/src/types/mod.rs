//! Type definitions shared by the HTTP layer and the domain services
//!
//! - `response` - Generic response bodies rendered by every endpoint

pub mod response;

pub use response::{GenericResponse, VerificationResponse};
