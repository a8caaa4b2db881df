//! Development stand-in for the access token authority

use async_trait::async_trait;
use tracing::warn;

use bl_core::domain::entities::AccessGrant;
use bl_core::errors::DomainResult;
use bl_core::services::verification::AccessAuthority;
use bl_shared::masking::mask_email;

/// Subject reported for every accepted token
pub const DEV_SUBJECT: &str = "dev-user";

/// Accepts any non-empty bearer token and acknowledges password updates
/// without applying them. Never use outside local development.
#[derive(Debug, Clone, Default)]
pub struct DevAccessAuthority;

impl DevAccessAuthority {
    pub fn new() -> Self {
        warn!("Using development access authority: bearer tokens are not validated");
        Self
    }
}

#[async_trait]
impl AccessAuthority for DevAccessAuthority {
    async fn validate_access_token(&self, token: &str) -> DomainResult<AccessGrant> {
        if token.trim().is_empty() {
            return Ok(AccessGrant::denied());
        }
        Ok(AccessGrant::granted(DEV_SUBJECT))
    }

    async fn apply_password_reset(
        &self,
        _token: &str,
        email: &str,
        _new_password: &str,
    ) -> DomainResult<()> {
        warn!(
            email = %mask_email(email),
            "Development authority acknowledged a password update without applying it"
        );
        Ok(())
    }
}
