//! Booking aggregate entity.
//!
//! # Design Decisions
//!
//! - **Pay-then-book**: a Booking is constructed only from a succeeded
//!   `PaymentOutcome`; there is no pending/pre-payment state.
//! - **Money in minor units**: all amounts are i64 cents, never floats.
//! - **One per charge**: the ledger enforces a unique constraint on
//!   `charge_id`; the aggregate stores the gateway-assigned id verbatim.
//! - **Audit-preserving cancellation**: `void`/`refund` are status
//!   transitions with a recorded reason, never deletion.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{
    BookingId, ChargeId, EventId, StateMachine, Timestamp, UserIdentity,
};

use super::{BookingError, BookingStatus, IdempotencyKey};

/// Booking ledger record - one paid ticket purchase.
///
/// # Invariants
///
/// - `charge_id` is unique across all bookings (ledger-enforced)
/// - `idempotency_key` is unique across all bookings (ledger-enforced)
/// - `amount_minor` equals the event price times `ticket_count` at the
///   moment of purchase, as charged - never a client-supplied total
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Booking {
    /// Unique identifier for this booking.
    pub id: BookingId,

    /// Event the tickets are for.
    pub event_id: EventId,

    /// Identity of the purchaser, as resolved by the identity context.
    pub user: UserIdentity,

    /// Number of tickets purchased.
    pub ticket_count: u32,

    /// Gateway-assigned charge identifier (the idempotency anchor).
    pub charge_id: ChargeId,

    /// Key of the logical attempt that produced this booking.
    pub idempotency_key: IdempotencyKey,

    /// Amount charged, in minor currency units.
    pub amount_minor: i64,

    /// ISO currency code of the charge.
    pub currency: String,

    /// Lifecycle status.
    pub status: BookingStatus,

    /// Receipt reference returned by the gateway, if any.
    pub receipt_ref: Option<String>,

    /// Reason recorded when the booking was voided or refunded.
    pub void_reason: Option<String>,

    /// When the booking was persisted.
    pub created_at: Timestamp,

    /// When the booking was last updated.
    pub updated_at: Timestamp,
}

impl Booking {
    /// Creates a confirmed booking from a succeeded charge.
    #[allow(clippy::too_many_arguments)]
    pub fn confirmed(
        id: BookingId,
        event_id: EventId,
        user: UserIdentity,
        ticket_count: u32,
        charge_id: ChargeId,
        idempotency_key: IdempotencyKey,
        amount_minor: i64,
        currency: impl Into<String>,
        receipt_ref: Option<String>,
    ) -> Self {
        let now = Timestamp::now();
        Self {
            id,
            event_id,
            user,
            ticket_count,
            charge_id,
            idempotency_key,
            amount_minor,
            currency: currency.into(),
            status: BookingStatus::Confirmed,
            receipt_ref,
            void_reason: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Voids this booking without money movement.
    ///
    /// # Errors
    ///
    /// Returns `InvalidTransition` if the booking is not `Confirmed`.
    pub fn void(&mut self, reason: impl Into<String>) -> Result<(), BookingError> {
        self.transition(BookingStatus::Voided, reason)
    }

    /// Marks this booking refunded.
    ///
    /// # Errors
    ///
    /// Returns `InvalidTransition` if the booking is not `Confirmed`.
    pub fn refund(&mut self, reason: impl Into<String>) -> Result<(), BookingError> {
        self.transition(BookingStatus::Refunded, reason)
    }

    fn transition(
        &mut self,
        target: BookingStatus,
        reason: impl Into<String>,
    ) -> Result<(), BookingError> {
        self.status = self.status.transition_to(target).map_err(|_| {
            BookingError::invalid_transition(
                format!("{:?}", self.status).to_lowercase(),
                format!("{:?}", target).to_lowercase(),
            )
        })?;
        self.void_reason = Some(reason.into());
        self.updated_at = Timestamp::now();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn confirmed_booking() -> Booking {
        let user = UserIdentity::new("guest@example.com").unwrap();
        let event_id = EventId::new();
        let key = IdempotencyKey::derive(&user, &event_id, "nonce").unwrap();
        Booking::confirmed(
            BookingId::new(),
            event_id,
            user,
            2,
            ChargeId::new("ch_test_1").unwrap(),
            key,
            5000,
            "usd",
            Some("https://receipts.example.com/1".to_string()),
        )
    }

    #[test]
    fn confirmed_booking_starts_confirmed() {
        let booking = confirmed_booking();
        assert_eq!(booking.status, BookingStatus::Confirmed);
        assert!(booking.void_reason.is_none());
    }

    #[test]
    fn void_records_reason_and_status() {
        let mut booking = confirmed_booking();
        booking.void("customer cancelled").unwrap();
        assert_eq!(booking.status, BookingStatus::Voided);
        assert_eq!(booking.void_reason.as_deref(), Some("customer cancelled"));
    }

    #[test]
    fn refund_transitions_to_refunded() {
        let mut booking = confirmed_booking();
        booking.refund("event cancelled").unwrap();
        assert_eq!(booking.status, BookingStatus::Refunded);
    }

    #[test]
    fn voiding_twice_is_rejected() {
        let mut booking = confirmed_booking();
        booking.void("first").unwrap();
        let err = booking.void("second").unwrap_err();
        assert!(matches!(err, BookingError::InvalidTransition { .. }));
        // First reason survives the failed second attempt.
        assert_eq!(booking.void_reason.as_deref(), Some("first"));
    }

    #[test]
    fn refund_after_void_is_rejected() {
        let mut booking = confirmed_booking();
        booking.void("cancelled").unwrap();
        assert!(booking.refund("too late").is_err());
    }
}
