//! ListEventBookingsHandler - all bookings for one event, with a sold-seat
//! total for the organizer view.

use std::sync::Arc;

use crate::domain::booking::{Booking, BookingError};
use crate::domain::foundation::EventId;
use crate::ports::{BookingLedger, EventCatalog};

/// Query for an event's bookings.
#[derive(Debug, Clone)]
pub struct ListEventBookingsQuery {
    pub event_id: EventId,
}

/// An event's bookings plus aggregate seat usage.
#[derive(Debug, Clone)]
pub struct EventBookings {
    pub bookings: Vec<Booking>,
    /// Total tickets currently holding capacity (confirmed only).
    pub confirmed_tickets: u32,
}

pub struct ListEventBookingsHandler {
    catalog: Arc<dyn EventCatalog>,
    ledger: Arc<dyn BookingLedger>,
}

impl ListEventBookingsHandler {
    pub fn new(catalog: Arc<dyn EventCatalog>, ledger: Arc<dyn BookingLedger>) -> Self {
        Self { catalog, ledger }
    }

    pub async fn handle(
        &self,
        query: ListEventBookingsQuery,
    ) -> Result<EventBookings, BookingError> {
        // Listing an unknown event is an error, not an empty list.
        self.catalog
            .get(&query.event_id)
            .await?
            .ok_or_else(|| BookingError::event_not_found(query.event_id))?;

        let bookings = self.ledger.find_by_event(&query.event_id).await?;
        let confirmed_tickets = self.ledger.confirmed_ticket_total(&query.event_id).await?;

        Ok(EventBookings {
            bookings,
            confirmed_tickets,
        })
    }
}
