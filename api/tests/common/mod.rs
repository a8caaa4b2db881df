//! Shared harness for HTTP integration tests
//!
//! Runs the real app over an in-memory store with recording collaborators.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use actix_web::web;
use async_trait::async_trait;

use bl_api::{AppState, DynVerificationService};
use bl_core::domain::entities::{AccessGrant, Mail};
use bl_core::errors::{DeliveryError, DomainError, DomainResult};
use bl_core::services::verification::{
    AccessAuthority, MailDispatcher, SmsDispatcher, VerificationService,
    VerificationServiceConfig, VerificationStore,
};
use bl_infra::MemoryVerificationStore;
use bl_shared::phone::is_valid_phone;

pub const VALID_TOKEN: &str = "valid-token";
pub const DENIED_TOKEN: &str = "revoked-token";
pub const MAX_PAYLOAD: usize = 16 * 1024;

/// Keeps the last mail per recipient
#[derive(Default)]
pub struct Outbox {
    mails: Mutex<HashMap<String, Mail>>,
    fail: bool,
}

impl Outbox {
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Default::default()
        }
    }

    pub fn latest(&self, to: &str) -> Option<Mail> {
        self.mails.lock().unwrap().get(to).cloned()
    }

    pub fn code_for(&self, to: &str) -> String {
        self.latest(to).and_then(|m| m.data.code).expect("code was mailed")
    }

    pub fn token_for(&self, to: &str) -> String {
        self.latest(to).and_then(|m| m.data.token).expect("token was mailed")
    }
}

#[async_trait]
impl MailDispatcher for Outbox {
    async fn send(&self, mail: Mail) -> Result<(), DeliveryError> {
        if self.fail {
            return Err(DeliveryError::Mail("connection refused by smtp.internal".into()));
        }
        let mut mails = self.mails.lock().unwrap();
        for to in &mail.to {
            mails.insert(to.clone(), mail.clone());
        }
        Ok(())
    }
}

/// Keeps the last code per phone number
#[derive(Default)]
pub struct TextLog {
    codes: Mutex<HashMap<String, String>>,
}

impl TextLog {
    pub fn code_for(&self, phone: &str) -> Option<String> {
        self.codes.lock().unwrap().get(phone).cloned()
    }
}

#[async_trait]
impl SmsDispatcher for TextLog {
    async fn send_code(&self, phone: &str, code: &str, _: i64) -> Result<(), DeliveryError> {
        self.codes.lock().unwrap().insert(phone.to_string(), code.to_string());
        Ok(())
    }

    fn is_valid_phone_number(&self, phone: &str) -> bool {
        is_valid_phone(phone)
    }
}

/// Accepts [`VALID_TOKEN`] and records every call
#[derive(Default)]
pub struct StubAuthority {
    pub seen_tokens: Mutex<Vec<String>>,
    pub password_updates: Mutex<Vec<(String, String)>>,
}

#[async_trait]
impl AccessAuthority for StubAuthority {
    async fn validate_access_token(&self, token: &str) -> DomainResult<AccessGrant> {
        self.seen_tokens.lock().unwrap().push(token.to_string());
        match token {
            VALID_TOKEN => Ok(AccessGrant::granted("user-42")),
            "xyz" => Ok(AccessGrant::granted("user-xyz")),
            _ => Ok(AccessGrant::denied()),
        }
    }

    async fn apply_password_reset(
        &self,
        token: &str,
        email: &str,
        new_password: &str,
    ) -> DomainResult<()> {
        if token != VALID_TOKEN {
            return Err(DomainError::unauthenticated("Access token was rejected"));
        }
        self.password_updates
            .lock()
            .unwrap()
            .push((email.to_string(), new_password.to_string()));
        Ok(())
    }
}

pub struct Harness {
    pub state: web::Data<AppState>,
    pub store: Arc<MemoryVerificationStore>,
    pub outbox: Arc<Outbox>,
    pub texts: Arc<TextLog>,
    pub authority: Arc<StubAuthority>,
}

impl Harness {
    pub fn new() -> Self {
        Self::build(VerificationServiceConfig::default(), Outbox::default())
    }

    pub fn with_config(config: VerificationServiceConfig) -> Self {
        Self::build(config, Outbox::default())
    }

    pub fn with_failing_mail() -> Self {
        Self::build(VerificationServiceConfig::default(), Outbox::failing())
    }

    fn build(config: VerificationServiceConfig, outbox: Outbox) -> Self {
        let store = Arc::new(MemoryVerificationStore::new());
        let outbox = Arc::new(outbox);
        let texts = Arc::new(TextLog::default());
        let authority = Arc::new(StubAuthority::default());

        let shared_store: Arc<dyn VerificationStore> = store.clone();
        let mail: Arc<dyn MailDispatcher> = outbox.clone();
        let sms: Arc<dyn SmsDispatcher> = texts.clone();
        let verification: Arc<DynVerificationService> =
            Arc::new(VerificationService::new(shared_store, mail, sms, config));
        let state = AppState::new(verification, authority.clone(), Duration::from_secs(5));

        Self {
            state: web::Data::new(state),
            store,
            outbox,
            texts,
            authority,
        }
    }
}

/// Bearer header for [`VALID_TOKEN`]
pub fn bearer() -> (&'static str, String) {
    ("Authorization", format!("Bearer {}", VALID_TOKEN))
}

/// CORS layer used by the binary in development
pub fn cors() -> actix_cors::Cors {
    bl_api::middleware::create_cors(
        &bl_shared::config::ServerConfig::default(),
        bl_shared::config::Environment::Development,
    )
}
