//! ListUserBookingsHandler - a user's booking history, newest first.

use std::sync::Arc;

use crate::domain::booking::{Booking, BookingError};
use crate::domain::foundation::UserIdentity;
use crate::ports::BookingLedger;

/// Query for all bookings belonging to a user.
#[derive(Debug, Clone)]
pub struct ListUserBookingsQuery {
    pub user: UserIdentity,
}

pub struct ListUserBookingsHandler {
    ledger: Arc<dyn BookingLedger>,
}

impl ListUserBookingsHandler {
    pub fn new(ledger: Arc<dyn BookingLedger>) -> Self {
        Self { ledger }
    }

    pub async fn handle(&self, query: ListUserBookingsQuery) -> Result<Vec<Booking>, BookingError> {
        let bookings = self.ledger.find_by_user(&query.user).await?;
        Ok(bookings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::InMemoryBookingLedger;
    use crate::domain::booking::IdempotencyKey;
    use crate::domain::foundation::{BookingId, ChargeId, EventId};

    async fn seed(ledger: &InMemoryBookingLedger, email: &str, charge: &str, nonce: &str) {
        let user = UserIdentity::new(email).unwrap();
        let event_id = EventId::new();
        let key = IdempotencyKey::derive(&user, &event_id, nonce).unwrap();
        let booking = Booking::confirmed(
            BookingId::new(),
            event_id,
            user,
            1,
            ChargeId::new(charge).unwrap(),
            key,
            4500,
            "usd",
            None,
        );
        ledger.record_booking(&booking).await.unwrap();
    }

    #[tokio::test]
    async fn returns_only_the_users_bookings() {
        let ledger = Arc::new(InMemoryBookingLedger::new());
        seed(&ledger, "alice@example.com", "ch_1", "n1").await;
        seed(&ledger, "alice@example.com", "ch_2", "n2").await;
        seed(&ledger, "bob@example.com", "ch_3", "n3").await;

        let handler = ListUserBookingsHandler::new(ledger);
        let bookings = handler
            .handle(ListUserBookingsQuery {
                user: UserIdentity::new("alice@example.com").unwrap(),
            })
            .await
            .unwrap();

        assert_eq!(bookings.len(), 2);
        assert!(bookings
            .iter()
            .all(|b| b.user.as_str() == "alice@example.com"));
    }

    #[tokio::test]
    async fn empty_history_is_an_empty_list() {
        let ledger = Arc::new(InMemoryBookingLedger::new());
        let handler = ListUserBookingsHandler::new(ledger);

        let bookings = handler
            .handle(ListUserBookingsQuery {
                user: UserIdentity::new("nobody@example.com").unwrap(),
            })
            .await
            .unwrap();

        assert!(bookings.is_empty());
    }
}
