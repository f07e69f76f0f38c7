//! Idempotency key derivation for booking attempts.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;

use crate::domain::foundation::{EventId, UserIdentity, ValidationError};

/// Caller-stable token identifying one logical booking attempt.
///
/// Derived deterministically from the caller identity, the event, and a
/// client-supplied request nonce - never from wall-clock time - so a retry
/// of the same logical request (double-click, network retry, crash recovery)
/// produces the same key. The key is forwarded to the payment provider,
/// whose own idempotent replay guarantees at most one charge per key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IdempotencyKey(String);

impl IdempotencyKey {
    /// Derives the key for a logical booking attempt.
    ///
    /// The nonce must be non-empty; it is what distinguishes two genuine,
    /// separate purchases by the same caller for the same event.
    pub fn derive(
        user: &UserIdentity,
        event_id: &EventId,
        request_nonce: &str,
    ) -> Result<Self, ValidationError> {
        if request_nonce.trim().is_empty() {
            return Err(ValidationError::empty_field("request_nonce"));
        }

        let mut hasher = Sha256::new();
        hasher.update(user.as_str().as_bytes());
        hasher.update(b"\x1f");
        hasher.update(event_id.to_string().as_bytes());
        hasher.update(b"\x1f");
        hasher.update(request_nonce.as_bytes());
        let digest = hasher.finalize();

        Ok(Self(format!("bk_{}", hex_encode(&digest))))
    }

    /// Rehydrates a key from its stored representation.
    pub fn from_stored(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    /// Returns the key as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for IdempotencyKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

fn hex_encode(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{:02x}", b)).collect()
}
