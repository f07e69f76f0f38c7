//! Stripe API wire types.
//!
//! Only the fields the gateway adapter reads; Stripe sends far more.

use serde::Deserialize;

/// A charge object from `POST /v1/charges`.
#[derive(Debug, Clone, Deserialize)]
pub struct StripeCharge {
    pub id: String,
    pub amount: i64,
    pub currency: String,
    /// "succeeded", "pending", or "failed".
    pub status: String,
    pub receipt_url: Option<String>,
}

/// Error envelope returned with non-2xx responses.
#[derive(Debug, Clone, Deserialize)]
pub struct StripeErrorResponse {
    pub error: StripeErrorBody,
}

/// Error detail within the envelope.
#[derive(Debug, Clone, Deserialize)]
pub struct StripeErrorBody {
    /// "card_error", "invalid_request_error", "api_error", ...
    #[serde(rename = "type")]
    pub error_type: String,
    pub code: Option<String>,
    pub decline_code: Option<String>,
    pub message: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_charge_response() {
        let json = r#"{
            "id": "ch_3OaQbX2eZvKYlo2C",
            "object": "charge",
            "amount": 4500,
            "currency": "usd",
            "status": "succeeded",
            "receipt_url": "https://pay.stripe.com/receipts/abc",
            "livemode": false
        }"#;

        let charge: StripeCharge = serde_json::from_str(json).unwrap();
        assert_eq!(charge.id, "ch_3OaQbX2eZvKYlo2C");
        assert_eq!(charge.amount, 4500);
        assert_eq!(charge.status, "succeeded");
        assert!(charge.receipt_url.is_some());
    }

    #[test]
    fn parses_card_error_response() {
        let json = r#"{
            "error": {
                "type": "card_error",
                "code": "card_declined",
                "decline_code": "insufficient_funds",
                "message": "Your card has insufficient funds.",
                "charge": "ch_3OaQbX2eZvKYlo2D"
            }
        }"#;

        let response: StripeErrorResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.error.error_type, "card_error");
        assert_eq!(response.error.decline_code.as_deref(), Some("insufficient_funds"));
    }
}
