//! Mock payment gateway for testing.
//!
//! Provides a configurable mock implementation of `PaymentGateway` for
//! unit and integration tests. Supports:
//! - Provider-side idempotent replay (same key, same charge)
//! - One-shot error injection
//! - Call tracking

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::domain::foundation::ChargeId;
use crate::ports::{
    ChargeRequest, ChargeStatus, GatewayError, PaymentGateway, PaymentOutcome,
};

/// Mock payment gateway.
///
/// Models the provider's idempotency contract: charging twice with the
/// same key returns the original outcome without minting a new charge.
///
/// # Example
///
/// ```ignore
/// let mock = MockPaymentGateway::new();
/// mock.fail_next_with(GatewayError::declined("Test decline"));
///
/// let result = mock.charge(request).await;
/// assert_eq!(mock.call_count(), 1);
/// assert_eq!(mock.minted_charges(), 0);
/// ```
#[derive(Default, Clone)]
pub struct MockPaymentGateway {
    inner: Arc<Mutex<MockState>>,
}

#[derive(Default)]
struct MockState {
    /// Outcomes replayed by idempotency key (the provider's dedupe store).
    outcomes_by_key: HashMap<String, PaymentOutcome>,

    /// Error to return on the next call.
    next_error: Option<GatewayError>,

    /// Report the next minted charge as `Failed`.
    fail_next_outcome: bool,

    /// Every charge request received, in order.
    calls: Vec<ChargeRequest>,

    /// Charges actually created (replays excluded).
    minted: u32,
}

impl MockPaymentGateway {
    /// Create a new mock gateway.
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail the next call with the given error. One-shot.
    pub fn fail_next_with(&self, error: GatewayError) {
        self.inner.lock().unwrap().next_error = Some(error);
    }

    /// Report the next minted charge with a `Failed` status. One-shot.
    pub fn fail_next_outcome(&self) {
        self.inner.lock().unwrap().fail_next_outcome = true;
    }

    /// Number of `charge` calls received.
    pub fn call_count(&self) -> usize {
        self.inner.lock().unwrap().calls.len()
    }

    /// Number of distinct charges created (idempotent replays excluded).
    pub fn minted_charges(&self) -> u32 {
        self.inner.lock().unwrap().minted
    }

    /// All charge requests received, in order.
    pub fn calls(&self) -> Vec<ChargeRequest> {
        self.inner.lock().unwrap().calls.clone()
    }

    /// The most recent charge request, if any.
    pub fn last_request(&self) -> Option<ChargeRequest> {
        self.inner.lock().unwrap().calls.last().cloned()
    }
}

#[async_trait]
impl PaymentGateway for MockPaymentGateway {
    async fn charge(&self, request: ChargeRequest) -> Result<PaymentOutcome, GatewayError> {
        let mut state = self.inner.lock().unwrap();
        state.calls.push(request.clone());

        if let Some(error) = state.next_error.take() {
            return Err(error);
        }

        // Idempotent replay: a repeated key returns the original outcome.
        let key = request.idempotency_key.as_str().to_string();
        if let Some(outcome) = state.outcomes_by_key.get(&key) {
            return Ok(outcome.clone());
        }

        state.minted += 1;
        let status = if std::mem::take(&mut state.fail_next_outcome) {
            ChargeStatus::Failed
        } else {
            ChargeStatus::Succeeded
        };

        let outcome = PaymentOutcome {
            charge_id: ChargeId::new(format!("ch_mock_{}", state.minted))
                .expect("mock charge id is non-empty"),
            amount_minor: request.amount_minor,
            currency: request.currency.clone(),
            status,
            receipt_ref: Some(format!("https://receipts.test/ch_mock_{}", state.minted)),
        };

        state.outcomes_by_key.insert(key, outcome.clone());
        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::booking::IdempotencyKey;
    use crate::domain::foundation::{EventId, UserIdentity};

    fn request(nonce: &str) -> ChargeRequest {
        let user = UserIdentity::new("guest@example.com").unwrap();
        let key = IdempotencyKey::derive(&user, &EventId::from_uuid(uuid::Uuid::nil()), nonce)
            .unwrap();
        ChargeRequest::new(2500, "usd", "tok_visa", key).unwrap()
    }

    #[tokio::test]
    async fn same_key_replays_same_charge() {
        let mock = MockPaymentGateway::new();
        let first = mock.charge(request("a")).await.unwrap();
        let second = mock.charge(request("a")).await.unwrap();

        assert_eq!(first.charge_id, second.charge_id);
        assert_eq!(mock.call_count(), 2);
        assert_eq!(mock.minted_charges(), 1);
    }

    #[tokio::test]
    async fn different_keys_mint_different_charges() {
        let mock = MockPaymentGateway::new();
        let first = mock.charge(request("a")).await.unwrap();
        let second = mock.charge(request("b")).await.unwrap();

        assert_ne!(first.charge_id, second.charge_id);
        assert_eq!(mock.minted_charges(), 2);
    }

    #[tokio::test]
    async fn injected_error_is_one_shot() {
        let mock = MockPaymentGateway::new();
        mock.fail_next_with(GatewayError::timeout("slow"));

        assert!(mock.charge(request("a")).await.is_err());
        assert!(mock.charge(request("a")).await.is_ok());
    }
}
