//! Mock implementations for testing verification service

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use crate::domain::entities::{Mail, VerificationData, VerificationKey};
use crate::errors::{DeliveryError, StoreError};
use crate::services::verification::traits::{MailDispatcher, SmsDispatcher, VerificationStore};

// Mock attempt store counting successful mutations
#[derive(Default)]
pub struct MockStore {
    pub attempts: Arc<Mutex<HashMap<VerificationKey, VerificationData>>>,
    pub mutations: AtomicUsize,
    pub should_fail: bool,
}

impl MockStore {
    pub fn new(should_fail: bool) -> Self {
        Self {
            should_fail,
            ..Default::default()
        }
    }

    pub fn stored(&self, key: &VerificationKey) -> Option<VerificationData> {
        self.attempts.lock().unwrap().get(key).cloned()
    }

    /// Overwrite the stored attempt without counting a mutation
    pub fn tamper(&self, key: &VerificationKey, edit: impl FnOnce(&mut VerificationData)) {
        if let Some(attempt) = self.attempts.lock().unwrap().get_mut(key) {
            edit(attempt);
        }
    }

    pub fn mutation_count(&self) -> usize {
        self.mutations.load(Ordering::SeqCst)
    }

    fn check(&self) -> Result<(), StoreError> {
        if self.should_fail {
            return Err(StoreError::Unavailable("Store service error".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl VerificationStore for MockStore {
    async fn put(&self, data: VerificationData) -> Result<(), StoreError> {
        self.check()?;
        self.attempts.lock().unwrap().insert(data.key(), data);
        self.mutations.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn get(&self, key: &VerificationKey) -> Result<Option<VerificationData>, StoreError> {
        self.check()?;
        Ok(self.stored(key))
    }

    async fn compare_and_swap(
        &self,
        expected: &VerificationData,
        new: VerificationData,
    ) -> Result<bool, StoreError> {
        self.check()?;
        let mut attempts = self.attempts.lock().unwrap();
        match attempts.get_mut(&expected.key()) {
            Some(current) if current.same_revision(expected) => {
                *current = new;
                self.mutations.fetch_add(1, Ordering::SeqCst);
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn remove(&self, key: &VerificationKey) -> Result<(), StoreError> {
        self.check()?;
        self.attempts.lock().unwrap().remove(key);
        self.mutations.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

// Mock mail dispatcher for testing
#[derive(Default)]
pub struct MockMailDispatcher {
    pub sent: Arc<Mutex<Vec<Mail>>>,
    pub should_fail: bool,
}

impl MockMailDispatcher {
    pub fn new(should_fail: bool) -> Self {
        Self {
            should_fail,
            ..Default::default()
        }
    }

    pub fn last_sent(&self) -> Option<Mail> {
        self.sent.lock().unwrap().last().cloned()
    }

    pub fn sent_count(&self) -> usize {
        self.sent.lock().unwrap().len()
    }
}

#[async_trait]
impl MailDispatcher for MockMailDispatcher {
    async fn send(&self, mail: Mail) -> Result<(), DeliveryError> {
        if self.should_fail {
            return Err(DeliveryError::Mail("SMTP service error".to_string()));
        }
        self.sent.lock().unwrap().push(mail);
        Ok(())
    }
}

// Mock SMS dispatcher for testing
#[derive(Default)]
pub struct MockSmsDispatcher {
    pub sent_messages: Arc<Mutex<HashMap<String, String>>>,
    pub should_fail: bool,
}

impl MockSmsDispatcher {
    pub fn new(should_fail: bool) -> Self {
        Self {
            should_fail,
            ..Default::default()
        }
    }

    pub fn get_sent_code(&self, phone: &str) -> Option<String> {
        self.sent_messages.lock().unwrap().get(phone).cloned()
    }
}

#[async_trait]
impl SmsDispatcher for MockSmsDispatcher {
    async fn send_code(
        &self,
        phone: &str,
        code: &str,
        _expires_in_minutes: i64,
    ) -> Result<(), DeliveryError> {
        if self.should_fail {
            return Err(DeliveryError::Sms("SMS service error".to_string()));
        }
        self.sent_messages
            .lock()
            .unwrap()
            .insert(phone.to_string(), code.to_string());
        Ok(())
    }

    fn is_valid_phone_number(&self, phone: &str) -> bool {
        phone.starts_with('+') && phone.len() >= 10
    }
}
