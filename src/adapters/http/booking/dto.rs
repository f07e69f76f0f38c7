//! HTTP DTOs (Data Transfer Objects) for booking endpoints.
//!
//! These types define the JSON request/response structure for the booking
//! API. They serve as the boundary between HTTP and the application layer.

use serde::{Deserialize, Serialize};

use crate::application::handlers::booking::{BookEventResult, EventBookings};
use crate::domain::booking::{Booking, BookingStatus};

// ════════════════════════════════════════════════════════════════════════════════
// Request DTOs
// ════════════════════════════════════════════════════════════════════════════════

/// Request to book tickets for an event.
#[derive(Debug, Clone, Deserialize)]
pub struct BookEventRequest {
    /// Number of tickets. Must be positive.
    pub ticket_count: u32,
    /// Tokenized payment method reference.
    pub payment_method_ref: String,
    /// Client-generated nonce identifying this logical attempt. Retries
    /// must reuse the same nonce to avoid a double charge.
    pub request_nonce: String,
}

/// Request to void a booking.
#[derive(Debug, Clone, Deserialize)]
pub struct VoidBookingRequest {
    /// Reason recorded on the booking.
    pub reason: String,
    /// Mark the booking refunded instead of voided.
    #[serde(default)]
    pub refund: bool,
}

// ════════════════════════════════════════════════════════════════════════════════
// Response DTOs
// ════════════════════════════════════════════════════════════════════════════════

/// A booking as exposed over the API.
#[derive(Debug, Clone, Serialize)]
pub struct BookingResponse {
    /// Booking ID.
    pub id: String,
    /// Event the booking belongs to.
    pub event_id: String,
    /// Owner's email.
    pub user: String,
    /// Tickets held by this booking.
    pub ticket_count: u32,
    /// Gateway-assigned charge identifier.
    pub charge_id: String,
    /// Amount charged, in minor currency units.
    pub amount_minor: i64,
    /// Charge currency.
    pub currency: String,
    /// Current status.
    pub status: BookingStatus,
    /// Receipt URL, if the provider issued one.
    pub receipt_ref: Option<String>,
    /// When the booking was created (ISO 8601).
    pub created_at: String,
}

impl From<Booking> for BookingResponse {
    fn from(booking: Booking) -> Self {
        Self {
            id: booking.id.to_string(),
            event_id: booking.event_id.to_string(),
            user: booking.user.to_string(),
            ticket_count: booking.ticket_count,
            charge_id: booking.charge_id.to_string(),
            amount_minor: booking.amount_minor,
            currency: booking.currency,
            status: booking.status,
            receipt_ref: booking.receipt_ref,
            created_at: booking.created_at.as_datetime().to_rfc3339(),
        }
    }
}

/// Response for a booking attempt.
#[derive(Debug, Clone, Serialize)]
pub struct BookEventResponse {
    /// The confirmed booking.
    pub booking: BookingResponse,
    /// True if this attempt was answered from a previously-completed one.
    pub replayed: bool,
}

impl From<BookEventResult> for BookEventResponse {
    fn from(result: BookEventResult) -> Self {
        Self {
            booking: BookingResponse::from(result.booking),
            replayed: result.replayed,
        }
    }
}

/// Response for a list of bookings.
#[derive(Debug, Clone, Serialize)]
pub struct BookingListResponse {
    pub bookings: Vec<BookingResponse>,
}

impl From<Vec<Booking>> for BookingListResponse {
    fn from(bookings: Vec<Booking>) -> Self {
        Self {
            bookings: bookings.into_iter().map(BookingResponse::from).collect(),
        }
    }
}

/// Response for an event's bookings with seat usage.
#[derive(Debug, Clone, Serialize)]
pub struct EventBookingsResponse {
    pub bookings: Vec<BookingResponse>,
    /// Total tickets currently holding capacity.
    pub confirmed_tickets: u32,
}

impl From<EventBookings> for EventBookingsResponse {
    fn from(result: EventBookings) -> Self {
        Self {
            bookings: result
                .bookings
                .into_iter()
                .map(BookingResponse::from)
                .collect(),
            confirmed_tickets: result.confirmed_tickets,
        }
    }
}

/// Standard error response body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Machine-readable error code.
    pub code: String,
    /// Human-readable message.
    pub message: String,
    /// Set when the caller may retry the identical request.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub retryable: Option<bool>,
    /// Charge id attached when money moved but the booking did not land.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub charge_id: Option<String>,
}

impl ErrorResponse {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            retryable: None,
            charge_id: None,
        }
    }

    pub fn retryable(mut self) -> Self {
        self.retryable = Some(true);
        self
    }

    pub fn with_charge_id(mut self, charge_id: impl Into<String>) -> Self {
        self.charge_id = Some(charge_id.into());
        self
    }
}

/// Health check response.
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::booking::IdempotencyKey;
    use crate::domain::foundation::{BookingId, ChargeId, EventId, UserIdentity};

    fn booking() -> Booking {
        let user = UserIdentity::new("guest@example.com").unwrap();
        let event_id = EventId::new();
        let key = IdempotencyKey::derive(&user, &event_id, "n1").unwrap();
        Booking::confirmed(
            BookingId::new(),
            event_id,
            user,
            2,
            ChargeId::new("ch_1").unwrap(),
            key,
            9000,
            "usd",
            Some("https://pay.example.com/receipts/1".to_string()),
        )
    }

    #[test]
    fn booking_response_serializes_expected_fields() {
        let json = serde_json::to_value(BookingResponse::from(booking())).unwrap();
        assert_eq!(json["ticket_count"], 2);
        assert_eq!(json["amount_minor"], 9000);
        assert_eq!(json["status"], "confirmed");
        assert_eq!(json["charge_id"], "ch_1");
    }

    #[test]
    fn void_request_refund_defaults_to_false() {
        let req: VoidBookingRequest =
            serde_json::from_value(serde_json::json!({ "reason": "dup" })).unwrap();
        assert!(!req.refund);
    }

    #[test]
    fn error_response_omits_absent_optionals() {
        let json = serde_json::to_value(ErrorResponse::new("EVENT_NOT_FOUND", "nope")).unwrap();
        assert!(json.get("retryable").is_none());
        assert!(json.get("charge_id").is_none());
    }

    #[test]
    fn error_response_carries_charge_id_when_set() {
        let err = ErrorResponse::new("BOOKING_PERSIST_FAILED", "store down")
            .with_charge_id("ch_1");
        let json = serde_json::to_value(err).unwrap();
        assert_eq!(json["charge_id"], "ch_1");
    }
}
