//! API response types and wrappers

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Generic response body shared by every endpoint's error path.
///
/// `details` carries structured extras such as aggregated validation errors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenericResponse {
    pub status: bool,

    pub message: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<BTreeMap<String, serde_json::Value>>,
}

impl GenericResponse {
    /// Create a successful response
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            status: true,
            message: message.into(),
            error: None,
            details: None,
        }
    }

    /// Create a failed response with a short error description
    pub fn failure(message: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            status: false,
            message: message.into(),
            error: Some(error.into()),
            details: None,
        }
    }

    /// Add a detail field to the response
    pub fn with_detail(mut self, key: impl Into<String>, value: impl Serialize) -> Self {
        if let Ok(json_value) = serde_json::to_value(value) {
            self.details
                .get_or_insert_with(BTreeMap::new)
                .insert(key.into(), json_value);
        }
        self
    }
}

/// Success body for verification and issuance endpoints
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerificationResponse {
    pub success: bool,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub message: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_in_sec: Option<i64>,
}

impl VerificationResponse {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
            error: None,
            expires_in_sec: None,
        }
    }

    pub fn with_expiry(mut self, expires_in_sec: i64) -> Self {
        self.expires_in_sec = Some(expires_in_sec);
        self
    }
}
