//! Booking status state machine.

use crate::domain::foundation::StateMachine;
use serde::{Deserialize, Serialize};

/// Lifecycle status of a booking ledger record.
///
/// A booking is born `Confirmed` - it only comes into existence after the
/// gateway reports a succeeded charge. The other states are audit-preserving
/// cancellation outcomes; there is no "deleted" state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BookingStatus {
    /// Payment captured and booking persisted. The only entry state.
    Confirmed,

    /// Booking cancelled and the charge paid back to the card.
    Refunded,

    /// Booking cancelled without money movement (e.g. operator void
    /// before settlement, or event cancellation handled off-ledger).
    Voided,
}

impl BookingStatus {
    /// Returns true if this booking still occupies event capacity.
    pub fn holds_capacity(&self) -> bool {
        matches!(self, BookingStatus::Confirmed)
    }
}

impl StateMachine for BookingStatus {
    fn can_transition_to(&self, target: &Self) -> bool {
        use BookingStatus::*;
        matches!((self, target), (Confirmed, Refunded) | (Confirmed, Voided))
    }

    fn valid_transitions(&self) -> Vec<Self> {
        use BookingStatus::*;
        match self {
            Confirmed => vec![Refunded, Voided],
            Refunded => vec![],
            Voided => vec![],
        }
    }
}
