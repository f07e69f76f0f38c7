//! Stripe payment gateway adapter.
//!
//! Implements the `PaymentGateway` trait over the Stripe charges API.
//!
//! # Idempotency
//!
//! The attempt's idempotency key is forwarded as the `Idempotency-Key`
//! request header; Stripe replays the original charge for a repeated key
//! instead of creating a second one. The adapter adds no dedupe logic of
//! its own.
//!
//! # Timeouts
//!
//! Every charge call carries a bounded timeout. A timed-out call is
//! reported as a retryable unavailability - the outcome is unknown and
//! must never be assumed to be a decline or a success.

use std::time::Duration;

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};

use crate::domain::foundation::ChargeId;
use crate::ports::{
    ChargeRequest, ChargeStatus, GatewayError, GatewayErrorCode, PaymentGateway, PaymentOutcome,
};

use super::api_types::{StripeCharge, StripeErrorBody, StripeErrorResponse};

/// Default bound on a single charge call.
const DEFAULT_CHARGE_TIMEOUT: Duration = Duration::from_secs(30);

/// Stripe API configuration.
#[derive(Clone)]
pub struct StripeGatewayConfig {
    /// Stripe secret API key (sk_live_... or sk_test_...).
    api_key: SecretString,

    /// Base URL for the Stripe API (default: https://api.stripe.com).
    api_base_url: String,

    /// Bound on a single charge call.
    charge_timeout: Duration,
}

impl StripeGatewayConfig {
    /// Create a new Stripe configuration.
    pub fn new(api_key: SecretString) -> Self {
        Self {
            api_key,
            api_base_url: "https://api.stripe.com".to_string(),
            charge_timeout: DEFAULT_CHARGE_TIMEOUT,
        }
    }

    /// Set a custom API base URL (for testing).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = url.into();
        self
    }

    /// Set the charge call timeout.
    pub fn with_charge_timeout(mut self, timeout: Duration) -> Self {
        self.charge_timeout = timeout;
        self
    }
}

/// Stripe payment gateway adapter.
pub struct StripeChargeGateway {
    config: StripeGatewayConfig,
    http_client: reqwest::Client,
}

impl StripeChargeGateway {
    /// Create a new gateway adapter with the given configuration.
    pub fn new(config: StripeGatewayConfig) -> Self {
        Self {
            config,
            http_client: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl PaymentGateway for StripeChargeGateway {
    async fn charge(&self, request: ChargeRequest) -> Result<PaymentOutcome, GatewayError> {
        let url = format!("{}/v1/charges", self.config.api_base_url);

        let mut params = vec![
            ("amount", request.amount_minor.to_string()),
            ("currency", request.currency.clone()),
            ("source", request.payment_method_ref.clone()),
        ];
        if let Some(description) = &request.description {
            params.push(("description", description.clone()));
        }

        let response = self
            .http_client
            .post(&url)
            .basic_auth(self.config.api_key.expose_secret(), Option::<&str>::None)
            .header("Idempotency-Key", request.idempotency_key.as_str())
            .timeout(self.config.charge_timeout)
            .form(&params)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    tracing::warn!(error = %e, "Stripe charge timed out - outcome unknown");
                    GatewayError::timeout(e.to_string())
                } else {
                    GatewayError::network(e.to_string())
                }
            })?;

        let status = response.status();

        if status.is_success() {
            let charge: StripeCharge = response.json().await.map_err(|e| {
                // The charge may have landed; a same-key retry replays it.
                GatewayError::provider_unavailable(format!(
                    "Failed to parse Stripe response: {}",
                    e
                ))
            })?;
            return outcome_from_charge(charge);
        }

        let error_body = response
            .json::<StripeErrorResponse>()
            .await
            .ok()
            .map(|r| r.error);

        Err(map_failure(status, error_body))
    }
}

/// Convert a parsed charge object into a domain outcome.
fn outcome_from_charge(charge: StripeCharge) -> Result<PaymentOutcome, GatewayError> {
    let status = match charge.status.as_str() {
        "succeeded" => ChargeStatus::Succeeded,
        _ => ChargeStatus::Failed,
    };

    let charge_id = ChargeId::new(charge.id)
        .map_err(|e| GatewayError::provider_unavailable(format!("Bad charge id: {}", e)))?;

    Ok(PaymentOutcome {
        charge_id,
        amount_minor: charge.amount,
        currency: charge.currency,
        status,
        receipt_ref: charge.receipt_url,
    })
}

/// Map a non-2xx response to a gateway error.
fn map_failure(status: reqwest::StatusCode, body: Option<StripeErrorBody>) -> GatewayError {
    match status.as_u16() {
        402 => map_card_error(body),
        400 => {
            let message = error_message(&body, "Stripe rejected the request");
            tracing::error!(
                %status,
                error_type = body.as_ref().map(|b| b.error_type.as_str()),
                message,
                "Stripe rejected charge request"
            );
            with_code(GatewayError::invalid_request(message), body)
        }
        401 | 403 => GatewayError::authentication(error_message(&body, "Stripe rejected API key")),
        429 => GatewayError::new(
            GatewayErrorCode::RateLimitExceeded,
            error_message(&body, "Stripe rate limit exceeded"),
        ),
        s if (500..600).contains(&s) => {
            tracing::error!(%status, "Stripe API unavailable");
            GatewayError::provider_unavailable(error_message(&body, "Stripe server error"))
        }
        _ => GatewayError::new(
            GatewayErrorCode::Unknown,
            format!("Unexpected Stripe status {}", status),
        ),
    }
}

/// Map a 402 card error to its decline category.
fn map_card_error(body: Option<StripeErrorBody>) -> GatewayError {
    let message = error_message(&body, "Card was declined");
    let code = body
        .as_ref()
        .and_then(|b| b.decline_code.as_deref().or(b.code.as_deref()));

    let gateway_code = match code {
        Some("insufficient_funds") => GatewayErrorCode::InsufficientFunds,
        Some("expired_card") => GatewayErrorCode::CardExpired,
        Some("incorrect_number") | Some("invalid_number") | Some("incorrect_cvc")
        | Some("invalid_cvc") => GatewayErrorCode::InvalidCard,
        _ => GatewayErrorCode::CardDeclined,
    };

    tracing::warn!(
        code = ?code,
        error_type = body.as_ref().map(|b| b.error_type.as_str()),
        "Stripe declined charge"
    );
    with_code(GatewayError::new(gateway_code, message), body)
}

fn error_message(body: &Option<StripeErrorBody>, fallback: &str) -> String {
    body.as_ref()
        .and_then(|b| b.message.clone())
        .unwrap_or_else(|| fallback.to_string())
}

fn with_code(err: GatewayError, body: Option<StripeErrorBody>) -> GatewayError {
    match body.and_then(|b| b.decline_code.or(b.code)) {
        Some(code) => err.with_provider_code(code),
        None => err,
    }
}
