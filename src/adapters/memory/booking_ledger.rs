//! In-memory implementation of the booking ledger.

use std::sync::Mutex;

use async_trait::async_trait;

use crate::domain::booking::{Booking, IdempotencyKey};
use crate::domain::foundation::{BookingId, ChargeId, EventId, UserIdentity};
use crate::ports::{BookingLedger, LedgerError};

/// In-memory booking ledger.
///
/// Enforces the same uniqueness invariants as the PostgreSQL adapter and
/// supports one-shot failure injection for partial-failure tests.
#[derive(Default)]
pub struct InMemoryBookingLedger {
    inner: Mutex<LedgerState>,
}

#[derive(Default)]
struct LedgerState {
    bookings: Vec<Booking>,

    /// Error message to fail the next `record_booking` with.
    fail_next_record: Option<String>,
}

impl InMemoryBookingLedger {
    /// Creates an empty ledger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes the next `record_booking` call fail with `Unavailable`,
    /// simulating a crash between charge and persist.
    pub fn fail_next_record(&self, message: impl Into<String>) {
        self.inner.lock().unwrap().fail_next_record = Some(message.into());
    }

    /// Snapshot of all stored bookings.
    pub fn bookings(&self) -> Vec<Booking> {
        self.inner.lock().unwrap().bookings.clone()
    }

    /// Number of stored bookings.
    pub fn len(&self) -> usize {
        self.inner.lock().unwrap().bookings.len()
    }

    /// True if no bookings are stored.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl BookingLedger for InMemoryBookingLedger {
    async fn record_booking(&self, booking: &Booking) -> Result<Booking, LedgerError> {
        let mut state = self.inner.lock().unwrap();

        if let Some(message) = state.fail_next_record.take() {
            return Err(LedgerError::Unavailable(message));
        }

        // Uniqueness on charge_id and on idempotency_key; either conflict
        // resolves to the record that won.
        if let Some(existing) = state.bookings.iter().find(|b| {
            b.charge_id == booking.charge_id || b.idempotency_key == booking.idempotency_key
        }) {
            return Err(LedgerError::DuplicateChargeId {
                existing: Box::new(existing.clone()),
            });
        }

        state.bookings.push(booking.clone());
        Ok(booking.clone())
    }

    async fn find_by_id(&self, id: &BookingId) -> Result<Option<Booking>, LedgerError> {
        Ok(self
            .inner
            .lock()
            .unwrap()
            .bookings
            .iter()
            .find(|b| &b.id == id)
            .cloned())
    }

    async fn find_by_charge_id(
        &self,
        charge_id: &ChargeId,
    ) -> Result<Option<Booking>, LedgerError> {
        Ok(self
            .inner
            .lock()
            .unwrap()
            .bookings
            .iter()
            .find(|b| &b.charge_id == charge_id)
            .cloned())
    }

    async fn find_by_idempotency_key(
        &self,
        key: &IdempotencyKey,
    ) -> Result<Option<Booking>, LedgerError> {
        Ok(self
            .inner
            .lock()
            .unwrap()
            .bookings
            .iter()
            .find(|b| &b.idempotency_key == key)
            .cloned())
    }

    async fn find_by_user(&self, user: &UserIdentity) -> Result<Vec<Booking>, LedgerError> {
        let mut bookings: Vec<Booking> = self
            .inner
            .lock()
            .unwrap()
            .bookings
            .iter()
            .filter(|b| &b.user == user)
            .cloned()
            .collect();
        bookings.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(bookings)
    }

    async fn find_by_event(&self, event_id: &EventId) -> Result<Vec<Booking>, LedgerError> {
        let mut bookings: Vec<Booking> = self
            .inner
            .lock()
            .unwrap()
            .bookings
            .iter()
            .filter(|b| &b.event_id == event_id)
            .cloned()
            .collect();
        bookings.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(bookings)
    }

    async fn confirmed_ticket_total(&self, event_id: &EventId) -> Result<u32, LedgerError> {
        Ok(self
            .inner
            .lock()
            .unwrap()
            .bookings
            .iter()
            .filter(|b| &b.event_id == event_id && b.status.holds_capacity())
            .map(|b| b.ticket_count)
            .sum())
    }

    async fn update(&self, booking: &Booking) -> Result<(), LedgerError> {
        let mut state = self.inner.lock().unwrap();
        match state.bookings.iter_mut().find(|b| b.id == booking.id) {
            Some(stored) => {
                *stored = booking.clone();
                Ok(())
            }
            None => Err(LedgerError::NotFound(booking.id)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn booking(charge: &str, nonce: &str) -> Booking {
        let user = UserIdentity::new("guest@example.com").unwrap();
        let event_id = EventId::new();
        let key = IdempotencyKey::derive(&user, &event_id, nonce).unwrap();
        Booking::confirmed(
            BookingId::new(),
            event_id,
            user,
            1,
            ChargeId::new(charge).unwrap(),
            key,
            2500,
            "usd",
            None,
        )
    }

    #[tokio::test]
    async fn duplicate_charge_id_returns_first_record() {
        let ledger = InMemoryBookingLedger::new();
        let first = ledger.record_booking(&booking("ch_1", "a")).await.unwrap();

        let mut second = booking("ch_1", "b");
        second.ticket_count = 9;
        let err = ledger.record_booking(&second).await.unwrap_err();

        match err {
            LedgerError::DuplicateChargeId { existing } => assert_eq!(*existing, first),
            other => panic!("expected duplicate, got {:?}", other),
        }
        assert_eq!(ledger.len(), 1);
    }

    #[tokio::test]
    async fn confirmed_ticket_total_ignores_voided() {
        let ledger = InMemoryBookingLedger::new();
        let mut a = booking("ch_1", "a");
        let event_id = a.event_id;
        a.ticket_count = 3;
        let mut b = booking("ch_2", "b");
        b.event_id = event_id;
        b.ticket_count = 2;

        ledger.record_booking(&a).await.unwrap();
        ledger.record_booking(&b).await.unwrap();
        assert_eq!(ledger.confirmed_ticket_total(&event_id).await.unwrap(), 5);

        b.void("released").unwrap();
        ledger.update(&b).await.unwrap();
        assert_eq!(ledger.confirmed_ticket_total(&event_id).await.unwrap(), 3);
    }

    #[tokio::test]
    async fn update_unknown_booking_is_not_found() {
        let ledger = InMemoryBookingLedger::new();
        let err = ledger.update(&booking("ch_1", "a")).await.unwrap_err();
        assert!(matches!(err, LedgerError::NotFound(_)));
    }

    #[tokio::test]
    async fn fail_next_record_is_one_shot() {
        let ledger = InMemoryBookingLedger::new();
        ledger.fail_next_record("store down");

        let record = booking("ch_1", "a");
        assert!(matches!(
            ledger.record_booking(&record).await,
            Err(LedgerError::Unavailable(_))
        ));
        assert!(ledger.record_booking(&record).await.is_ok());
    }
}
