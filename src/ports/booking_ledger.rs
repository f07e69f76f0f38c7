//! Booking ledger port - the persisted store of booking records.
//!
//! The ledger owns the invariant "at most one booking per chargeId". Two
//! concurrent attempts racing into the persist step are resolved by the
//! store's uniqueness constraint, not by application-level locking:
//! `record_booking` reports the conflict and hands back the record that
//! won, so the caller can treat the duplicate write as a success.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::booking::{Booking, IdempotencyKey};
use crate::domain::foundation::{BookingId, ChargeId, EventId, UserIdentity};

/// Port for the booking ledger.
///
/// # Contract
///
/// Implementations must:
/// - Enforce uniqueness on `charge_id` and `idempotency_key`
/// - Return `DuplicateChargeId` with the existing record on a conflicting
///   `record_booking`, never create a second row
/// - Order `find_by_user` / `find_by_event` by `created_at` descending
/// - Never hard-delete records
#[async_trait]
pub trait BookingLedger: Send + Sync {
    /// Persists a new confirmed booking.
    ///
    /// Returns the stored record. Fails with `DuplicateChargeId` if a
    /// booking already exists for the same charge; the existing record is
    /// attached so a retried attempt can be answered without re-charging.
    async fn record_booking(&self, booking: &Booking) -> Result<Booking, LedgerError>;

    /// Looks up a booking by its internal id.
    async fn find_by_id(&self, id: &BookingId) -> Result<Option<Booking>, LedgerError>;

    /// Looks up a booking by the gateway-assigned charge id.
    ///
    /// Used by reconciliation to check whether a reported charge landed.
    async fn find_by_charge_id(&self, charge_id: &ChargeId)
        -> Result<Option<Booking>, LedgerError>;

    /// Looks up the booking produced by a logical attempt, if any.
    ///
    /// This is the pre-charge idempotency check: a hit means the attempt
    /// already completed and must be answered with the existing record.
    async fn find_by_idempotency_key(
        &self,
        key: &IdempotencyKey,
    ) -> Result<Option<Booking>, LedgerError>;

    /// A user's booking history, newest first.
    async fn find_by_user(&self, user: &UserIdentity) -> Result<Vec<Booking>, LedgerError>;

    /// All bookings for an event, newest first.
    async fn find_by_event(&self, event_id: &EventId) -> Result<Vec<Booking>, LedgerError>;

    /// Total tickets held by confirmed bookings for an event.
    ///
    /// Voided and refunded bookings release their capacity.
    async fn confirmed_ticket_total(&self, event_id: &EventId) -> Result<u32, LedgerError>;

    /// Persists a status transition (void/refund) on an existing booking.
    async fn update(&self, booking: &Booking) -> Result<(), LedgerError>;
}

/// Errors from booking ledger operations.
#[derive(Debug, Clone, Error)]
pub enum LedgerError {
    /// A booking already exists for this charge id. Carries the existing
    /// record so the caller can return it instead of failing.
    #[error("A booking already exists for charge {}", existing.charge_id)]
    DuplicateChargeId { existing: Box<Booking> },

    /// No booking with the given id.
    #[error("Booking {0} not found")]
    NotFound(BookingId),

    /// The store is unreachable or rejected the operation.
    #[error("Booking store unavailable: {0}")]
    Unavailable(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn booking_ledger_is_object_safe() {
        fn _accepts_dyn(_ledger: &dyn BookingLedger) {}
    }

    #[test]
    fn ledger_error_display() {
        let err = LedgerError::Unavailable("connection refused".to_string());
        assert!(err.to_string().contains("connection refused"));
    }
}
