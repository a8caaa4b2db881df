//! HTTP client for the external access token authority

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Serialize;
use tracing::{debug, error, warn};

use bl_core::domain::entities::AccessGrant;
use bl_core::errors::{DomainError, DomainResult};
use bl_core::services::verification::AccessAuthority;
use bl_shared::config::AuthorityConfig;
use bl_shared::masking::mask_email;

use crate::InfrastructureError;

const VALIDATE_PATH: &str = "/api/token/validate";
const PASSWORD_PATH: &str = "/api/user/password";

#[derive(Serialize)]
struct PasswordUpdate<'a> {
    email: &'a str,
    new_password: &'a str,
}

/// Authority reached over HTTP with the caller's bearer token.
///
/// - `GET {base}/api/token/validate` answers an [`AccessGrant`]
/// - `PUT {base}/api/user/password` applies a new password
///
/// 401 and 403 from the authority mean the token was refused; any other
/// non-success status or transport failure is an internal error.
#[derive(Clone)]
pub struct HttpAccessAuthority {
    client: Client,
    base_url: String,
}

impl HttpAccessAuthority {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, InfrastructureError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn from_config(config: &AuthorityConfig) -> Result<Self, InfrastructureError> {
        let url = config
            .url
            .as_deref()
            .ok_or_else(|| InfrastructureError::Config("AUTHORITY_URL is not set".to_string()))?;
        Self::new(url, Duration::from_secs(config.timeout_secs))
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

fn transport_error(operation: &str, err: reqwest::Error) -> DomainError {
    error!(operation, error = %err, "Access authority request failed");
    DomainError::internal(format!("access authority unreachable during {}", operation))
}

fn is_refusal(status: StatusCode) -> bool {
    status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN
}

#[async_trait]
impl AccessAuthority for HttpAccessAuthority {
    async fn validate_access_token(&self, token: &str) -> DomainResult<AccessGrant> {
        let response = self
            .client
            .get(self.url(VALIDATE_PATH))
            .bearer_auth(token)
            .send()
            .await
            .map_err(|e| transport_error("token validation", e))?;

        let status = response.status();
        if is_refusal(status) {
            debug!(status = status.as_u16(), "Access token refused by authority");
            return Ok(AccessGrant::denied());
        }
        if !status.is_success() {
            error!(status = status.as_u16(), "Unexpected status from access authority");
            return Err(DomainError::internal(format!(
                "access authority answered {}",
                status
            )));
        }

        response
            .json::<AccessGrant>()
            .await
            .map_err(|e| transport_error("token validation", e))
    }

    async fn apply_password_reset(
        &self,
        token: &str,
        email: &str,
        new_password: &str,
    ) -> DomainResult<()> {
        let response = self
            .client
            .put(self.url(PASSWORD_PATH))
            .bearer_auth(token)
            .json(&PasswordUpdate {
                email,
                new_password,
            })
            .send()
            .await
            .map_err(|e| transport_error("password update", e))?;

        let status = response.status();
        if status.is_success() {
            debug!(email = %mask_email(email), "Password update accepted by authority");
            return Ok(());
        }
        if is_refusal(status) {
            warn!(
                email = %mask_email(email),
                status = status.as_u16(),
                "Password update refused by authority"
            );
            return Err(DomainError::unauthenticated("Access token was rejected"));
        }

        error!(status = status.as_u16(), "Unexpected status from access authority");
        Err(DomainError::internal(format!(
            "access authority answered {}",
            status
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_trailing_slash_is_trimmed() {
        let authority =
            HttpAccessAuthority::new("http://auth.internal/", Duration::from_secs(1)).unwrap();
        assert_eq!(authority.url(VALIDATE_PATH), "http://auth.internal/api/token/validate");
    }

    #[test]
    fn test_from_config_requires_url() {
        let result = HttpAccessAuthority::from_config(&AuthorityConfig::default());
        assert!(matches!(result, Err(InfrastructureError::Config(_))));

        let config = AuthorityConfig {
            url: Some("http://auth.internal".to_string()),
            timeout_secs: 2,
        };
        assert_eq!(
            HttpAccessAuthority::from_config(&config).unwrap().base_url(),
            "http://auth.internal"
        );
    }
}
