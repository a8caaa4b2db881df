//! Logging SMS dispatcher
//!
//! Logs code deliveries instead of sending them. Phone numbers are masked and
//! the code itself is never written out.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use tracing::{info, warn};

use bl_core::errors::DeliveryError;
use bl_core::services::verification::SmsDispatcher;
use bl_shared::phone::{is_valid_phone, mask_phone_number};

#[derive(Clone, Default)]
pub struct LogSmsDispatcher {
    /// Counter for tracking number of messages sent
    message_count: Arc<AtomicU64>,
    simulate_failure: bool,
}

impl LogSmsDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail every send, for exercising delivery failure paths
    pub fn failing() -> Self {
        Self {
            simulate_failure: true,
            ..Self::default()
        }
    }

    pub fn message_count(&self) -> u64 {
        self.message_count.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SmsDispatcher for LogSmsDispatcher {
    async fn send_code(
        &self,
        phone: &str,
        code: &str,
        expires_in_minutes: i64,
    ) -> Result<(), DeliveryError> {
        let masked_phone = mask_phone_number(phone);

        if !self.is_valid_phone_number(phone) {
            return Err(DeliveryError::InvalidRecipient(masked_phone));
        }

        if self.simulate_failure {
            warn!(
                target: "sms_service",
                phone = %masked_phone,
                "Simulated SMS delivery failure"
            );
            return Err(DeliveryError::Sms("simulated delivery failure".to_string()));
        }

        let count = self.message_count.fetch_add(1, Ordering::SeqCst) + 1;

        info!(
            target: "sms_service",
            provider = "log",
            phone = %masked_phone,
            code_length = code.len(),
            expires_in_minutes,
            count,
            "Verification code SMS dispatched"
        );

        Ok(())
    }

    fn is_valid_phone_number(&self, phone: &str) -> bool {
        is_valid_phone(phone)
    }
}
