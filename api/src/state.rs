//! Application state shared by every worker
//!
//! Built once in `main` from [`AppConfig`] and handed to the app factory as
//! `web::Data<AppState>`.

use std::sync::Arc;
use std::time::Duration;

use tokio::time::Instant;

use bl_core::domain::entities::AccessGrant;
use bl_core::errors::{DomainError, DomainResult};
use bl_core::services::verification::{
    AccessAuthority, MailDispatcher, SmsDispatcher, VerificationService,
    VerificationServiceConfig, VerificationStore,
};
use bl_infra::{
    DevAccessAuthority, HttpAccessAuthority, InfrastructureError, LogMailDispatcher,
    LogSmsDispatcher, MemoryVerificationStore,
};
use bl_shared::config::{AppConfig, StoreBackend};

/// Verification service over type-erased collaborators
pub type DynVerificationService =
    VerificationService<dyn VerificationStore, dyn MailDispatcher, dyn SmsDispatcher>;

pub struct AppState {
    pub verification: Arc<DynVerificationService>,
    pub authority: Arc<dyn AccessAuthority>,
    /// Budget for one request, measured from handler entry
    pub request_timeout: Duration,
}

impl AppState {
    pub fn new(
        verification: Arc<DynVerificationService>,
        authority: Arc<dyn AccessAuthority>,
        request_timeout: Duration,
    ) -> Self {
        Self {
            verification,
            authority,
            request_timeout,
        }
    }

    /// Wire the collaborators selected by `config`
    pub async fn from_config(config: &AppConfig) -> Result<Self, InfrastructureError> {
        let store = build_store(config).await?;
        let mail: Arc<dyn MailDispatcher> =
            Arc::new(LogMailDispatcher::new(config.templates.clone()));
        let sms: Arc<dyn SmsDispatcher> = Arc::new(LogSmsDispatcher::new());

        let authority: Arc<dyn AccessAuthority> = if config.authority.is_configured() {
            let authority = HttpAccessAuthority::from_config(&config.authority)?;
            tracing::info!(url = %authority.base_url(), "Using HTTP access authority");
            Arc::new(authority)
        } else {
            if config.environment.is_production() {
                tracing::warn!("AUTHORITY_URL is not set in production");
            }
            Arc::new(DevAccessAuthority::new())
        };

        let service_config = VerificationServiceConfig::from_settings(
            &config.security,
            config.api.clone(),
            config.mail.from_address.clone(),
        );
        let verification = Arc::new(VerificationService::new(store, mail, sms, service_config));

        Ok(Self::new(
            verification,
            authority,
            config.server.request_timeout(),
        ))
    }

    /// Deadline for the request being handled now
    pub fn deadline(&self) -> Option<Instant> {
        Instant::now().checked_add(self.request_timeout)
    }

    /// Ask the authority whether `token` grants access
    pub async fn authorize(&self, token: &str) -> DomainResult<AccessGrant> {
        let grant = self.authority.validate_access_token(token).await?;
        if !grant.valid {
            return Err(DomainError::unauthenticated("Access token is not valid"));
        }
        Ok(grant)
    }
}

async fn build_store(config: &AppConfig) -> Result<Arc<dyn VerificationStore>, InfrastructureError> {
    match config.store.backend {
        StoreBackend::Memory => {
            tracing::info!("Using in-memory verification store");
            Ok(Arc::new(MemoryVerificationStore::new()))
        }
        #[cfg(feature = "redis-store")]
        StoreBackend::Redis => {
            let store = bl_infra::RedisVerificationStore::connect(
                &config.store.redis_url,
                config.store.key_prefix.clone(),
            )
            .await?;
            tracing::info!(prefix = %config.store.key_prefix, "Using Redis verification store");
            Ok(Arc::new(store))
        }
        #[cfg(not(feature = "redis-store"))]
        StoreBackend::Redis => Err(InfrastructureError::Config(
            "VERIFICATION_STORE=redis requires the redis-store feature".to_string(),
        )),
    }
}
