//! BookEventHandler - the booking-and-payment orchestrator.
//!
//! Coordinates event lookup, the gateway charge, and the ledger write into
//! one logically-atomic outcome across two independently-failing external
//! systems. The ordering is strictly pay-then-book: no ledger row exists
//! before the gateway confirms the charge.
//!
//! # Failure windows
//!
//! - Before the charge is issued: nothing persisted, nothing charged -
//!   every failure is clean.
//! - Charge issued, outcome unknown (timeout/outage): the caller retries
//!   with the same request nonce; the provider's idempotent replay returns
//!   the original charge instead of minting a second one.
//! - Charge succeeded, ledger write lost: the failure response carries the
//!   charge id for reconciliation, and a retried attempt converges on one
//!   record through the ledger's charge-id uniqueness constraint.

use std::sync::Arc;

use crate::domain::booking::{Booking, BookingError, IdempotencyKey};
use crate::domain::foundation::{BookingId, EventId, UserIdentity};
use crate::ports::{
    BookingLedger, ChargeRequest, ChargeStatus, EventCatalog, EventRecord, LedgerError,
    PaymentGateway,
};

/// Command to book tickets for an event.
#[derive(Debug, Clone)]
pub struct BookEventCommand {
    pub event_id: EventId,
    pub user: UserIdentity,
    pub ticket_count: u32,
    /// Opaque payment method reference (e.g. a tokenized card).
    pub payment_method_ref: String,
    /// Client-supplied nonce identifying this logical attempt. Retries of
    /// the same purchase must reuse the same nonce.
    pub request_nonce: String,
}

/// Result of a successful booking attempt.
#[derive(Debug, Clone)]
pub struct BookEventResult {
    pub booking: Booking,
    /// True if this attempt was answered from a previously-completed
    /// attempt with the same nonce (no new charge was made).
    pub replayed: bool,
}

/// Handler for the booking-and-payment transaction flow.
pub struct BookEventHandler {
    catalog: Arc<dyn EventCatalog>,
    gateway: Arc<dyn PaymentGateway>,
    ledger: Arc<dyn BookingLedger>,
    currency: String,
}

impl BookEventHandler {
    pub fn new(
        catalog: Arc<dyn EventCatalog>,
        gateway: Arc<dyn PaymentGateway>,
        ledger: Arc<dyn BookingLedger>,
        currency: impl Into<String>,
    ) -> Self {
        Self {
            catalog,
            gateway,
            ledger,
            currency: currency.into(),
        }
    }

    pub async fn handle(&self, cmd: BookEventCommand) -> Result<BookEventResult, BookingError> {
        if cmd.ticket_count == 0 {
            return Err(BookingError::invalid_request(
                "ticket_count",
                "must be a positive integer",
            ));
        }
        if cmd.payment_method_ref.trim().is_empty() {
            return Err(BookingError::invalid_request(
                "payment_method_ref",
                "must not be empty",
            ));
        }

        // 1. Resolve event
        let event = self
            .catalog
            .get(&cmd.event_id)
            .await?
            .ok_or_else(|| BookingError::event_not_found(cmd.event_id))?;

        // 2. Idempotency pre-check: a completed attempt with the same key
        //    is answered with its booking, without touching the gateway.
        let key = IdempotencyKey::derive(&cmd.user, &cmd.event_id, &cmd.request_nonce)?;
        if let Some(existing) = self.ledger.find_by_idempotency_key(&key).await? {
            tracing::info!(
                booking_id = %existing.id,
                charge_id = %existing.charge_id,
                "Replayed completed booking attempt"
            );
            return Ok(BookEventResult {
                booking: existing,
                replayed: true,
            });
        }

        // Capacity is checked before any charge is attempted; payment must
        // never be taken for a request that cannot be fulfilled.
        self.check_capacity(&event, cmd.ticket_count).await?;

        // 3. Authoritative amount: always event price times count, never a
        //    client-supplied total.
        let amount_minor = event
            .price_minor
            .checked_mul(i64::from(cmd.ticket_count))
            .ok_or_else(|| {
                BookingError::invalid_request("ticket_count", "amount overflows")
            })?;

        // 4. Charge
        let charge_request = ChargeRequest::new(
            amount_minor,
            self.currency.clone(),
            cmd.payment_method_ref.clone(),
            key.clone(),
        )
        .map_err(|e| BookingError::invalid_request("payment", e.message.clone()))?
        .with_description(format!(
            "{} ticket(s) for event: {}",
            cmd.ticket_count, event.name
        ));

        let outcome = match self.gateway.charge(charge_request).await {
            Ok(outcome) => outcome,
            Err(e) if e.retryable => {
                return Err(BookingError::gateway_unavailable(e.message));
            }
            Err(e) if e.is_decline() => {
                return Err(BookingError::payment_declined(e.message));
            }
            Err(e) if e.is_invalid_request() => {
                return Err(BookingError::invalid_request("payment", e.message));
            }
            Err(e) => return Err(BookingError::infrastructure(e.to_string())),
        };

        if outcome.status != ChargeStatus::Succeeded {
            return Err(BookingError::payment_declined(format!(
                "charge {} did not succeed",
                outcome.charge_id
            )));
        }

        // 5. Persist, keyed by the gateway-assigned charge id. A duplicate
        //    means a racing or crashed attempt already wrote the record;
        //    that record is the answer.
        let booking = Booking::confirmed(
            BookingId::new(),
            cmd.event_id,
            cmd.user,
            cmd.ticket_count,
            outcome.charge_id.clone(),
            key,
            outcome.amount_minor,
            outcome.currency.clone(),
            outcome.receipt_ref.clone(),
        );

        match self.ledger.record_booking(&booking).await {
            Ok(recorded) => {
                tracing::info!(
                    booking_id = %recorded.id,
                    charge_id = %recorded.charge_id,
                    amount_minor = recorded.amount_minor,
                    "Booking confirmed"
                );
                Ok(BookEventResult {
                    booking: recorded,
                    replayed: false,
                })
            }
            Err(LedgerError::DuplicateChargeId { existing }) => {
                tracing::info!(
                    booking_id = %existing.id,
                    charge_id = %existing.charge_id,
                    "Charge already recorded by a prior attempt"
                );
                Ok(BookEventResult {
                    booking: *existing,
                    replayed: true,
                })
            }
            Err(e) => {
                // Money moved but the record did not land. Surface the
                // charge id so reconciliation can replay the persist step.
                tracing::error!(
                    charge_id = %outcome.charge_id,
                    error = %e,
                    "Charge succeeded but booking persist failed - needs reconciliation"
                );
                Err(BookingError::persist_failed(
                    outcome.charge_id,
                    e.to_string(),
                ))
            }
        }
    }

    async fn check_capacity(
        &self,
        event: &EventRecord,
        requested: u32,
    ) -> Result<(), BookingError> {
        let Some(capacity) = event.capacity else {
            return Ok(());
        };

        let booked = self.ledger.confirmed_ticket_total(&event.id).await?;
        let remaining = capacity.saturating_sub(booked);
        if requested > remaining {
            return Err(BookingError::capacity_exceeded(requested, remaining));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::{InMemoryBookingLedger, InMemoryEventCatalog};
    use crate::adapters::stripe::MockPaymentGateway;
    use crate::domain::booking::BookingStatus;
    use crate::ports::GatewayError;

    fn user() -> UserIdentity {
        UserIdentity::new("guest@example.com").unwrap()
    }

    fn event(price_minor: i64, capacity: Option<u32>) -> EventRecord {
        EventRecord {
            id: EventId::new(),
            name: "Autumn Gala".to_string(),
            price_minor,
            capacity,
        }
    }

    struct Fixture {
        catalog: Arc<InMemoryEventCatalog>,
        gateway: Arc<MockPaymentGateway>,
        ledger: Arc<InMemoryBookingLedger>,
        handler: BookEventHandler,
    }

    fn fixture(events: Vec<EventRecord>) -> Fixture {
        let catalog = Arc::new(InMemoryEventCatalog::with_events(events));
        let gateway = Arc::new(MockPaymentGateway::new());
        let ledger = Arc::new(InMemoryBookingLedger::new());
        let handler = BookEventHandler::new(
            catalog.clone(),
            gateway.clone(),
            ledger.clone(),
            "usd",
        );
        Fixture {
            catalog,
            gateway,
            ledger,
            handler,
        }
    }

    fn command(event_id: EventId, ticket_count: u32, nonce: &str) -> BookEventCommand {
        BookEventCommand {
            event_id,
            user: user(),
            ticket_count,
            payment_method_ref: "tok_visa".to_string(),
            request_nonce: nonce.to_string(),
        }
    }

    #[tokio::test]
    async fn happy_path_confirms_booking_with_authoritative_amount() {
        let event = event(4500, Some(100));
        let fx = fixture(vec![event.clone()]);

        let result = fx.handler.handle(command(event.id, 3, "n1")).await.unwrap();

        assert!(!result.replayed);
        assert_eq!(result.booking.status, BookingStatus::Confirmed);
        assert_eq!(result.booking.amount_minor, 3 * 4500);
        assert_eq!(result.booking.ticket_count, 3);
        assert_eq!(fx.ledger.len(), 1);

        // The amount sent to the gateway is price * count, nothing else.
        let sent = fx.gateway.last_request().unwrap();
        assert_eq!(sent.amount_minor, 13_500);
        assert_eq!(sent.currency, "usd");
    }

    #[tokio::test]
    async fn retrying_same_nonce_yields_one_booking_and_one_charge() {
        let event = event(4500, None);
        let fx = fixture(vec![event.clone()]);

        let first = fx.handler.handle(command(event.id, 2, "n1")).await.unwrap();
        let second = fx.handler.handle(command(event.id, 2, "n1")).await.unwrap();

        assert!(!first.replayed);
        assert!(second.replayed);
        assert_eq!(first.booking.id, second.booking.id);
        assert_eq!(fx.ledger.len(), 1);
        // Second attempt was answered from the ledger pre-check.
        assert_eq!(fx.gateway.call_count(), 1);
        assert_eq!(fx.gateway.minted_charges(), 1);
    }

    #[tokio::test]
    async fn different_nonces_are_independent_purchases() {
        let event = event(4500, None);
        let fx = fixture(vec![event.clone()]);

        let first = fx.handler.handle(command(event.id, 1, "n1")).await.unwrap();
        let second = fx.handler.handle(command(event.id, 1, "n2")).await.unwrap();

        assert_ne!(first.booking.charge_id, second.booking.charge_id);
        assert_eq!(fx.ledger.len(), 2);
        assert_eq!(fx.gateway.minted_charges(), 2);
    }

    #[tokio::test]
    async fn unknown_event_fails_before_charge() {
        let fx = fixture(vec![]);

        let err = fx
            .handler
            .handle(command(EventId::new(), 1, "n1"))
            .await
            .unwrap_err();

        assert!(matches!(err, BookingError::EventNotFound(_)));
        assert_eq!(fx.gateway.call_count(), 0);
    }

    #[tokio::test]
    async fn capacity_exceeded_never_reaches_the_gateway() {
        let event = event(4500, Some(5));
        let fx = fixture(vec![event.clone()]);

        // Fill 4 of 5 seats.
        fx.handler.handle(command(event.id, 4, "n1")).await.unwrap();

        let err = fx
            .handler
            .handle(command(event.id, 2, "n2"))
            .await
            .unwrap_err();

        match err {
            BookingError::CapacityExceeded {
                requested,
                remaining,
            } => {
                assert_eq!(requested, 2);
                assert_eq!(remaining, 1);
            }
            other => panic!("expected capacity error, got {:?}", other),
        }
        // Only the first attempt's charge exists.
        assert_eq!(fx.gateway.call_count(), 1);
        assert_eq!(fx.ledger.len(), 1);
    }

    #[tokio::test]
    async fn voided_bookings_release_capacity() {
        let event = event(4500, Some(4));
        let fx = fixture(vec![event.clone()]);

        let result = fx.handler.handle(command(event.id, 4, "n1")).await.unwrap();
        let mut booking = result.booking;
        booking.void("released").unwrap();
        fx.ledger.update(&booking).await.unwrap();

        assert!(fx.handler.handle(command(event.id, 4, "n2")).await.is_ok());
    }

    #[tokio::test]
    async fn decline_leaves_no_ledger_row() {
        let event = event(4500, None);
        let fx = fixture(vec![event.clone()]);
        fx.gateway
            .fail_next_with(GatewayError::declined("Your card was declined"));

        let err = fx
            .handler
            .handle(command(event.id, 1, "n1"))
            .await
            .unwrap_err();

        assert!(matches!(err, BookingError::PaymentDeclined { .. }));
        assert!(err.charge_id().is_none());
        assert!(fx.ledger.is_empty());
    }

    #[tokio::test]
    async fn failed_outcome_is_a_decline() {
        let event = event(4500, None);
        let fx = fixture(vec![event.clone()]);
        fx.gateway.fail_next_outcome();

        let err = fx
            .handler
            .handle(command(event.id, 1, "n1"))
            .await
            .unwrap_err();

        assert!(matches!(err, BookingError::PaymentDeclined { .. }));
        assert!(fx.ledger.is_empty());
    }

    #[tokio::test]
    async fn gateway_timeout_is_retryable_and_persists_nothing() {
        let event = event(4500, None);
        let fx = fixture(vec![event.clone()]);
        fx.gateway.fail_next_with(GatewayError::timeout("deadline"));

        let err = fx
            .handler
            .handle(command(event.id, 1, "n1"))
            .await
            .unwrap_err();

        assert!(err.is_retryable());
        assert!(fx.ledger.is_empty());

        // Same nonce retry completes the purchase.
        let result = fx.handler.handle(command(event.id, 1, "n1")).await.unwrap();
        assert_eq!(result.booking.status, BookingStatus::Confirmed);
        assert_eq!(fx.ledger.len(), 1);
    }

    #[tokio::test]
    async fn persist_failure_surfaces_charge_id_and_retry_recovers() {
        let event = event(4500, None);
        let fx = fixture(vec![event.clone()]);
        fx.ledger.fail_next_record("store down");

        // First attempt: charge lands, persist fails.
        let err = fx
            .handler
            .handle(command(event.id, 1, "n1"))
            .await
            .unwrap_err();

        let charged_id = match &err {
            BookingError::PersistFailed { charge_id, .. } => charge_id.clone(),
            other => panic!("expected persist failure, got {:?}", other),
        };
        assert!(fx.ledger.is_empty());

        // Retry with the identical nonce: the provider replays the same
        // charge and the persist completes. No second charge is created.
        let result = fx.handler.handle(command(event.id, 1, "n1")).await.unwrap();
        assert_eq!(result.booking.charge_id, charged_id);
        assert_eq!(fx.ledger.len(), 1);
        assert_eq!(fx.gateway.minted_charges(), 1);
    }

    #[tokio::test]
    async fn completed_attempt_whose_response_was_lost_replays_without_charging() {
        let event = event(4500, None);
        let fx = fixture(vec![event.clone()]);

        // A prior attempt charged and persisted, but its response never
        // reached the client. The row is already in the ledger.
        let cmd = command(event.id, 1, "n1");
        let prior_key =
            IdempotencyKey::derive(&cmd.user, &cmd.event_id, &cmd.request_nonce).unwrap();
        let prior = Booking::confirmed(
            BookingId::new(),
            event.id,
            user(),
            1,
            crate::domain::foundation::ChargeId::new("ch_prior").unwrap(),
            prior_key,
            4500,
            "usd",
            None,
        );
        fx.ledger.record_booking(&prior).await.unwrap();

        let result = fx.handler.handle(cmd).await.unwrap();
        assert!(result.replayed);
        assert_eq!(result.booking.id, prior.id);
        assert_eq!(fx.ledger.len(), 1);
        assert_eq!(fx.gateway.call_count(), 0);
    }

    #[tokio::test]
    async fn zero_tickets_is_rejected_up_front() {
        let event = event(4500, None);
        let fx = fixture(vec![event.clone()]);

        let err = fx
            .handler
            .handle(command(event.id, 0, "n1"))
            .await
            .unwrap_err();

        assert!(matches!(err, BookingError::InvalidRequest { .. }));
        assert_eq!(fx.gateway.call_count(), 0);
        assert!(fx.catalog.get(&event.id).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn empty_nonce_is_rejected_before_charge() {
        let event = event(4500, None);
        let fx = fixture(vec![event.clone()]);

        let err = fx
            .handler
            .handle(command(event.id, 1, "  "))
            .await
            .unwrap_err();

        assert!(matches!(err, BookingError::InvalidRequest { .. }));
        assert_eq!(fx.gateway.call_count(), 0);
    }

    mod amount_integrity {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            // The charged amount is always price * count, for any price
            // and count in sane ranges.
            #[test]
            fn charged_amount_is_price_times_count(
                price_minor in 1i64..1_000_000,
                ticket_count in 1u32..500,
            ) {
                let rt = tokio::runtime::Builder::new_current_thread()
                    .build()
                    .unwrap();
                rt.block_on(async {
                    let event = EventRecord {
                        id: EventId::new(),
                        name: "prop".to_string(),
                        price_minor,
                        capacity: None,
                    };
                    let fx = fixture(vec![event.clone()]);
                    fx.handler
                        .handle(command(event.id, ticket_count, "n"))
                        .await
                        .unwrap();
                    let sent = fx.gateway.last_request().unwrap();
                    prop_assert_eq!(
                        sent.amount_minor,
                        price_minor * i64::from(ticket_count)
                    );
                    Ok(())
                })?;
            }
        }
    }
}
