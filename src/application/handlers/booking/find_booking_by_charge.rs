//! FindBookingByChargeHandler - reconciliation lookup by provider charge id.
//!
//! Used when a charge exists at the provider but the caller does not know
//! whether the corresponding booking landed.

use std::sync::Arc;

use crate::domain::booking::{Booking, BookingError};
use crate::domain::foundation::ChargeId;
use crate::ports::BookingLedger;

/// Query for the booking recorded against a charge.
#[derive(Debug, Clone)]
pub struct FindBookingByChargeQuery {
    pub charge_id: ChargeId,
}

pub struct FindBookingByChargeHandler {
    ledger: Arc<dyn BookingLedger>,
}

impl FindBookingByChargeHandler {
    pub fn new(ledger: Arc<dyn BookingLedger>) -> Self {
        Self { ledger }
    }

    /// Returns `None` when no booking was recorded for the charge, which
    /// tells the reconciler the persist step still needs to run.
    pub async fn handle(
        &self,
        query: FindBookingByChargeQuery,
    ) -> Result<Option<Booking>, BookingError> {
        let booking = self.ledger.find_by_charge_id(&query.charge_id).await?;
        Ok(booking)
    }
}
