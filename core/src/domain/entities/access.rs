//! Result of asking the access authority about a bearer token.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessGrant {
    /// Subject the token was issued to, empty when the token is not valid
    #[serde(default)]
    pub subject_id: String,
    pub valid: bool,
}

impl AccessGrant {
    pub fn granted(subject_id: impl Into<String>) -> Self {
        Self {
            subject_id: subject_id.into(),
            valid: true,
        }
    }

    pub fn denied() -> Self {
        Self {
            subject_id: String::new(),
            valid: false,
        }
    }
}
