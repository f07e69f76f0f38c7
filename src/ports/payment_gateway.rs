//! Payment gateway port for external card processing.
//!
//! Defines the contract for the payment processor integration (e.g. Stripe).
//!
//! # Design
//!
//! - **Gateway agnostic**: the interface works with any card processor
//! - **Key propagation**: the idempotency key is forwarded to the provider,
//!   which performs the actual deduplication; the adapter adds no dedupe
//!   logic of its own
//! - **Unknown outcomes stay unknown**: a timeout is reported as a
//!   retryable unavailability, never assumed to be a decline or a success

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::booking::IdempotencyKey;
use crate::domain::foundation::ChargeId;

/// Port for the external payment processor.
///
/// Implementations must forward the request's idempotency key so that
/// submitting the same logical attempt twice cannot create two charges.
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    /// Charge a payment method.
    ///
    /// The call carries a bounded timeout; on timeout the outcome is a
    /// retryable `GatewayError`, resolved by retrying with the same key.
    async fn charge(&self, request: ChargeRequest) -> Result<PaymentOutcome, GatewayError>;
}

/// A single charge attempt. Constructed fresh per attempt; the amount is
/// always computed server-side from the event price.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChargeRequest {
    /// Amount in minor currency units. Always positive.
    pub amount_minor: i64,

    /// ISO 4217 currency code, lowercase.
    pub currency: String,

    /// Opaque payment method reference supplied by the client
    /// (e.g. a tokenized card).
    pub payment_method_ref: String,

    /// Idempotency key for this logical attempt.
    pub idempotency_key: IdempotencyKey,

    /// Human-readable charge description for the receipt.
    pub description: Option<String>,
}

impl ChargeRequest {
    /// Builds a validated charge request.
    ///
    /// # Errors
    ///
    /// Returns an `InvalidRequest` gateway error for a non-positive amount,
    /// a malformed currency code, or an empty payment method reference.
    pub fn new(
        amount_minor: i64,
        currency: impl Into<String>,
        payment_method_ref: impl Into<String>,
        idempotency_key: IdempotencyKey,
    ) -> Result<Self, GatewayError> {
        let currency = currency.into();
        let payment_method_ref = payment_method_ref.into();

        if amount_minor <= 0 {
            return Err(GatewayError::invalid_request(format!(
                "amount must be positive, got {}",
                amount_minor
            )));
        }
        if currency.len() != 3 || !currency.chars().all(|c| c.is_ascii_lowercase()) {
            return Err(GatewayError::invalid_request(format!(
                "currency must be a lowercase ISO code, got '{}'",
                currency
            )));
        }
        if payment_method_ref.trim().is_empty() {
            return Err(GatewayError::invalid_request(
                "payment method reference is empty",
            ));
        }

        Ok(Self {
            amount_minor,
            currency,
            payment_method_ref,
            idempotency_key,
            description: None,
        })
    }

    /// Attach a receipt description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// Immutable result of a charge call, as reported by the provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentOutcome {
    /// Provider-assigned unique charge identifier.
    pub charge_id: ChargeId,

    /// Amount actually charged, in minor units.
    pub amount_minor: i64,

    /// Currency of the charge.
    pub currency: String,

    /// Whether the charge succeeded.
    pub status: ChargeStatus,

    /// Receipt URL or reference, if the provider issued one.
    pub receipt_ref: Option<String>,
}

/// Terminal charge status from the provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChargeStatus {
    /// Funds captured.
    Succeeded,

    /// Provider reported a terminal failure for this attempt.
    Failed,
}

/// Errors from payment gateway operations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GatewayError {
    /// Error code for categorization.
    pub code: GatewayErrorCode,

    /// Human-readable message.
    pub message: String,

    /// Provider's error code (if available).
    pub provider_code: Option<String>,

    /// Whether the operation can be retried with the same key.
    pub retryable: bool,
}

impl GatewayError {
    /// Create a new gateway error.
    pub fn new(code: GatewayErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            provider_code: None,
            retryable: code.is_retryable(),
        }
    }

    /// Attach the provider's own error code.
    pub fn with_provider_code(mut self, code: impl Into<String>) -> Self {
        self.provider_code = Some(code.into());
        self
    }

    /// Create a network error (retryable).
    pub fn network(message: impl Into<String>) -> Self {
        Self::new(GatewayErrorCode::NetworkError, message)
    }

    /// Create a timeout error (unknown outcome, retryable).
    pub fn timeout(message: impl Into<String>) -> Self {
        Self::new(GatewayErrorCode::Timeout, message)
    }

    /// Create a provider outage error (retryable).
    pub fn provider_unavailable(message: impl Into<String>) -> Self {
        Self::new(GatewayErrorCode::ProviderUnavailable, message)
    }

    /// Create a card declined error (terminal for this attempt).
    pub fn declined(message: impl Into<String>) -> Self {
        Self::new(GatewayErrorCode::CardDeclined, message)
    }

    /// Create an invalid request error (programmer error, fatal).
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::new(GatewayErrorCode::InvalidRequest, message)
    }

    /// Create an authentication error (misconfigured API key).
    pub fn authentication(message: impl Into<String>) -> Self {
        Self::new(GatewayErrorCode::AuthenticationError, message)
    }

    /// True if this is a terminal decline of the payment method.
    pub fn is_decline(&self) -> bool {
        self.code.is_decline()
    }

    /// True if this reflects malformed request input.
    pub fn is_invalid_request(&self) -> bool {
        self.code == GatewayErrorCode::InvalidRequest
    }
}

impl std::fmt::Display for GatewayError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.code, self.message)
    }
}

impl std::error::Error for GatewayError {}

/// Gateway error codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GatewayErrorCode {
    /// Network connectivity issue.
    NetworkError,

    /// Call timed out; the charge outcome is unknown.
    Timeout,

    /// Provider returned a server error or is down.
    ProviderUnavailable,

    /// Rate limit exceeded.
    RateLimitExceeded,

    /// Card was declined.
    CardDeclined,

    /// Insufficient funds.
    InsufficientFunds,

    /// Card expired.
    CardExpired,

    /// Invalid card details.
    InvalidCard,

    /// Malformed request (amount/currency/method).
    InvalidRequest,

    /// API authentication failed.
    AuthenticationError,

    /// Unknown error.
    Unknown,
}

impl GatewayErrorCode {
    /// Check if this error type is safely retryable with the same key.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            GatewayErrorCode::NetworkError
                | GatewayErrorCode::Timeout
                | GatewayErrorCode::ProviderUnavailable
                | GatewayErrorCode::RateLimitExceeded
        )
    }

    /// Check if this is a terminal decline of the payment method.
    pub fn is_decline(&self) -> bool {
        matches!(
            self,
            GatewayErrorCode::CardDeclined
                | GatewayErrorCode::InsufficientFunds
                | GatewayErrorCode::CardExpired
                | GatewayErrorCode::InvalidCard
        )
    }
}

impl std::fmt::Display for GatewayErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            GatewayErrorCode::NetworkError => "network_error",
            GatewayErrorCode::Timeout => "timeout",
            GatewayErrorCode::ProviderUnavailable => "provider_unavailable",
            GatewayErrorCode::RateLimitExceeded => "rate_limit_exceeded",
            GatewayErrorCode::CardDeclined => "card_declined",
            GatewayErrorCode::InsufficientFunds => "insufficient_funds",
            GatewayErrorCode::CardExpired => "card_expired",
            GatewayErrorCode::InvalidCard => "invalid_card",
            GatewayErrorCode::InvalidRequest => "invalid_request",
            GatewayErrorCode::AuthenticationError => "authentication_error",
            GatewayErrorCode::Unknown => "unknown",
        };
        write!(f, "{}", s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::{EventId, UserIdentity};

    fn key() -> IdempotencyKey {
        let user = UserIdentity::new("guest@example.com").unwrap();
        IdempotencyKey::derive(&user, &EventId::new(), "nonce").unwrap()
    }

    // Trait object safety test
    #[test]
    fn payment_gateway_is_object_safe() {
        fn _accepts_dyn(_gateway: &dyn PaymentGateway) {}
    }

    #[test]
    fn charge_request_rejects_bad_input() {
        assert!(ChargeRequest::new(0, "usd", "tok_visa", key()).is_err());
        assert!(ChargeRequest::new(-500, "usd", "tok_visa", key()).is_err());
        assert!(ChargeRequest::new(500, "USD", "tok_visa", key()).is_err());
        assert!(ChargeRequest::new(500, "dollars", "tok_visa", key()).is_err());
        assert!(ChargeRequest::new(500, "usd", "  ", key()).is_err());
    }

    #[test]
    fn charge_request_accepts_valid_input() {
        let request = ChargeRequest::new(2500, "usd", "tok_visa", key())
            .unwrap()
            .with_description("2 tickets");
        assert_eq!(request.amount_minor, 2500);
        assert_eq!(request.description.as_deref(), Some("2 tickets"));
    }

    #[test]
    fn retryable_codes() {
        assert!(GatewayErrorCode::NetworkError.is_retryable());
        assert!(GatewayErrorCode::Timeout.is_retryable());
        assert!(GatewayErrorCode::ProviderUnavailable.is_retryable());

        assert!(!GatewayErrorCode::CardDeclined.is_retryable());
        assert!(!GatewayErrorCode::InvalidRequest.is_retryable());
    }

    #[test]
    fn decline_codes() {
        assert!(GatewayError::declined("nope").is_decline());
        assert!(GatewayError::new(GatewayErrorCode::InsufficientFunds, "nsf").is_decline());
        assert!(!GatewayError::timeout("slow").is_decline());
    }

    #[test]
    fn gateway_error_display() {
        let err = GatewayError::declined("Your card was declined");
        assert!(err.to_string().contains("card_declined"));
        assert!(err.to_string().contains("Your card was declined"));
    }
}
