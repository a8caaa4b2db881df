//! Secure token and numeric code generation

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use rand::rngs::OsRng;
use rand::{CryptoRng, RngCore};

use crate::errors::GenerationError;

/// Bytes at or above this value are redrawn so `byte % 10` stays uniform
const DIGIT_REJECTION_BOUND: u8 = 250;

/// Generator of URL-safe tokens and fixed-length numeric codes.
///
/// Every call clones the random source, so `R` should be a handle to an
/// external CSPRNG such as [`OsRng`] rather than a seeded in-memory generator.
#[derive(Debug, Clone)]
pub struct SecureGenerator<R = OsRng> {
    rng: R,
}

impl SecureGenerator<OsRng> {
    pub fn new() -> Self {
        Self { rng: OsRng }
    }
}

impl Default for SecureGenerator<OsRng> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: RngCore + CryptoRng + Clone> SecureGenerator<R> {
    /// Use a custom random source
    pub fn with_rng(rng: R) -> Self {
        Self { rng }
    }

    /// Draw `length_bytes` random bytes and encode them as unpadded URL-safe base64
    ///
    /// # Errors
    ///
    /// * `InvalidLength` - `length_bytes` is zero
    /// * `RandomSourceUnavailable` - the random source failed
    pub fn generate_token(&self, length_bytes: usize) -> Result<String, GenerationError> {
        if length_bytes == 0 {
            return Err(GenerationError::InvalidLength);
        }

        let mut bytes = vec![0u8; length_bytes];
        self.fill(&mut bytes)?;
        Ok(URL_SAFE_NO_PAD.encode(&bytes))
    }

    /// Generate exactly `length` uniformly distributed decimal digits
    pub fn generate_numeric_code(&self, length: usize) -> Result<String, GenerationError> {
        if length == 0 {
            return Err(GenerationError::InvalidLength);
        }

        let mut code = String::with_capacity(length);
        let mut buffer = vec![0u8; length.max(8)];
        while code.len() < length {
            self.fill(&mut buffer)?;
            for byte in buffer.iter().copied() {
                if byte >= DIGIT_REJECTION_BOUND {
                    continue;
                }
                code.push(char::from(b'0' + byte % 10));
                if code.len() == length {
                    break;
                }
            }
        }
        Ok(code)
    }

    fn fill(&self, buffer: &mut [u8]) -> Result<(), GenerationError> {
        let mut rng = self.rng.clone();
        rng.try_fill_bytes(buffer).map_err(|e| {
            tracing::error!(
                error = %e,
                event = "random_source_failure",
                "Failed to draw bytes from the random source"
            );
            GenerationError::RandomSourceUnavailable(e.to_string())
        })
    }
}
