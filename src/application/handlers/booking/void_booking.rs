//! VoidBookingHandler - administrative cancellation of a booking.
//!
//! Cancelling releases the booking's seats (it no longer counts toward
//! event capacity). A refund marks the row `Refunded`; reversing the
//! charge against the provider is a separate concern.

use std::sync::Arc;

use crate::domain::booking::{Booking, BookingError};
use crate::domain::foundation::BookingId;
use crate::ports::BookingLedger;

/// Command to void a confirmed booking.
#[derive(Debug, Clone)]
pub struct VoidBookingCommand {
    pub booking_id: BookingId,
    /// Operator-supplied reason, recorded on the booking.
    pub reason: String,
    /// Mark the booking refunded instead of voided. The charge itself is
    /// reversed out of band against the provider.
    pub refund: bool,
}

/// Handler for voiding bookings.
pub struct VoidBookingHandler {
    ledger: Arc<dyn BookingLedger>,
}

impl VoidBookingHandler {
    pub fn new(ledger: Arc<dyn BookingLedger>) -> Self {
        Self { ledger }
    }

    pub async fn handle(&self, cmd: VoidBookingCommand) -> Result<Booking, BookingError> {
        if cmd.reason.trim().is_empty() {
            return Err(BookingError::invalid_request("reason", "must not be empty"));
        }

        let mut booking = self
            .ledger
            .find_by_id(&cmd.booking_id)
            .await?
            .ok_or_else(|| BookingError::not_found(cmd.booking_id))?;

        if cmd.refund {
            booking.refund(&cmd.reason)?;
        } else {
            booking.void(&cmd.reason)?;
        }
        self.ledger.update(&booking).await?;

        tracing::info!(
            booking_id = %booking.id,
            event_id = %booking.event_id,
            status = ?booking.status,
            reason = %cmd.reason,
            "Booking cancelled"
        );

        Ok(booking)
    }
}
