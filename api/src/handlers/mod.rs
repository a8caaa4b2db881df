//! Shared handler plumbing: error rendering and fallback responses

pub mod error;

pub use error::{method_not_allowed, not_found, ApiError};
