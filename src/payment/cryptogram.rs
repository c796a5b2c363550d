//! Application cryptogram generation
//!
//! The terminal expects an 8-byte application cryptogram (tag 9F26) in
//! record 2. Real deployments derive it from card keys and transaction
//! data inside a secure element; that machinery lives behind
//! [`CryptogramProvider`] so it can be supplied by the integrator.

use std::time::{SystemTime, UNIX_EPOCH};

/// Produces the 8-byte application cryptogram for a transaction
pub trait CryptogramProvider: Send {
    /// Generate the cryptogram bytes for the current transaction
    fn generate(&mut self) -> [u8; 8];
}

/// Placeholder provider deriving bytes from the system clock
///
/// NOT cryptographic. It exists so the protocol exchange is complete
/// end to end; any production use must replace it with a provider
/// backed by real key material.
#[derive(Debug, Default)]
pub struct ClockCryptogram;

impl CryptogramProvider for ClockCryptogram {
    fn generate(&mut self) -> [u8; 8] {
        let millis = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0);

        let mut out = [0u8; 8];
        for (i, byte) in out.iter_mut().enumerate() {
            *byte = (millis >> (i * 8)) as u8;
        }
        out
    }
}

/// Fixed-output provider for tests
#[cfg(test)]
pub struct FixedCryptogram(pub [u8; 8]);

#[cfg(test)]
impl CryptogramProvider for FixedCryptogram {
    fn generate(&mut self) -> [u8; 8] {
        self.0
    }
}
