//! Booking-specific error types.
//!
//! The taxonomy mirrors the stages of a booking attempt, so every failure
//! response can name the stage that failed.
//!
//! # HTTP Status Mapping
//!
//! | Error | HTTP Status |
//! |-------|-------------|
//! | InvalidRequest | 400 |
//! | PaymentDeclined | 402 |
//! | EventNotFound | 404 |
//! | NotFound | 404 |
//! | CapacityExceeded | 409 |
//! | InvalidTransition | 409 |
//! | PersistFailed | 500 |
//! | Infrastructure | 500 |
//! | GatewayUnavailable | 503 |

use crate::domain::foundation::{BookingId, ChargeId, DomainError, EventId, ValidationError};
use crate::ports::LedgerError;

/// Booking flow errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BookingError {
    /// The requested event does not exist in the catalog.
    EventNotFound(EventId),

    /// The requested ticket count exceeds remaining event capacity.
    /// Reported before any charge is attempted.
    CapacityExceeded { requested: u32, remaining: u32 },

    /// Malformed input (ticket count, nonce, payment method, currency).
    InvalidRequest { field: String, message: String },

    /// The gateway call failed with an unknown outcome (network error,
    /// timeout, provider outage). Retryable with the same request nonce.
    GatewayUnavailable { reason: String },

    /// The gateway reached a terminal decline for this payment method.
    PaymentDeclined { reason: String },

    /// The charge succeeded but the ledger write did not. The charge id
    /// is carried so an operator or reconciliation job can replay the
    /// persist step alone.
    PersistFailed { charge_id: ChargeId, reason: String },

    /// Booking record was not found.
    NotFound(BookingId),

    /// The requested status transition is not allowed.
    InvalidTransition { current: String, attempted: String },

    /// Infrastructure failure outside the flow's taxonomy.
    Infrastructure(String),
}

impl BookingError {
    pub fn event_not_found(id: EventId) -> Self {
        BookingError::EventNotFound(id)
    }

    pub fn capacity_exceeded(requested: u32, remaining: u32) -> Self {
        BookingError::CapacityExceeded {
            requested,
            remaining,
        }
    }

    pub fn invalid_request(field: impl Into<String>, message: impl Into<String>) -> Self {
        BookingError::InvalidRequest {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn gateway_unavailable(reason: impl Into<String>) -> Self {
        BookingError::GatewayUnavailable {
            reason: reason.into(),
        }
    }

    pub fn payment_declined(reason: impl Into<String>) -> Self {
        BookingError::PaymentDeclined {
            reason: reason.into(),
        }
    }

    pub fn persist_failed(charge_id: ChargeId, reason: impl Into<String>) -> Self {
        BookingError::PersistFailed {
            charge_id,
            reason: reason.into(),
        }
    }

    pub fn not_found(id: BookingId) -> Self {
        BookingError::NotFound(id)
    }

    pub fn invalid_transition(current: impl Into<String>, attempted: impl Into<String>) -> Self {
        BookingError::InvalidTransition {
            current: current.into(),
            attempted: attempted.into(),
        }
    }

    pub fn infrastructure(reason: impl Into<String>) -> Self {
        BookingError::Infrastructure(reason.into())
    }

    /// The booking-attempt stage this error belongs to.
    pub fn stage(&self) -> &'static str {
        match self {
            BookingError::EventNotFound(_) => "resolve_event",
            BookingError::CapacityExceeded { .. } => "capacity_check",
            BookingError::InvalidRequest { .. } => "validate_request",
            BookingError::GatewayUnavailable { .. } => "charge",
            BookingError::PaymentDeclined { .. } => "charge",
            BookingError::PersistFailed { .. } => "persist",
            BookingError::NotFound(_) => "lookup",
            BookingError::InvalidTransition { .. } => "transition",
            BookingError::Infrastructure(_) => "infrastructure",
        }
    }

    /// True if the caller may safely retry with the same request nonce.
    pub fn is_retryable(&self) -> bool {
        matches!(self, BookingError::GatewayUnavailable { .. })
    }

    /// Charge id attached to the error, when money has already moved.
    pub fn charge_id(&self) -> Option<&ChargeId> {
        match self {
            BookingError::PersistFailed { charge_id, .. } => Some(charge_id),
            _ => None,
        }
    }

    /// Human-readable message for API responses.
    pub fn message(&self) -> String {
        match self {
            BookingError::EventNotFound(id) => format!("Event {} not found", id),
            BookingError::CapacityExceeded {
                requested,
                remaining,
            } => format!(
                "Requested {} tickets but only {} remain",
                requested, remaining
            ),
            BookingError::InvalidRequest { field, message } => {
                format!("Invalid {}: {}", field, message)
            }
            BookingError::GatewayUnavailable { reason } => format!(
                "Payment gateway unavailable ({}); retry with the same request nonce",
                reason
            ),
            BookingError::PaymentDeclined { reason } => {
                format!("Payment declined: {}", reason)
            }
            BookingError::PersistFailed { charge_id, reason } => format!(
                "Charge {} succeeded but the booking record was not persisted: {}",
                charge_id, reason
            ),
            BookingError::NotFound(id) => format!("Booking {} not found", id),
            BookingError::InvalidTransition { current, attempted } => {
                format!("Cannot transition booking from {} to {}", current, attempted)
            }
            BookingError::Infrastructure(reason) => {
                format!("Internal error: {}", reason)
            }
        }
    }
}

impl std::fmt::Display for BookingError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.stage(), self.message())
    }
}

impl std::error::Error for BookingError {}

impl From<ValidationError> for BookingError {
    fn from(err: ValidationError) -> Self {
        let field = match &err {
            ValidationError::EmptyField { field } => field.clone(),
            ValidationError::InvalidFormat { field, .. } => field.clone(),
        };
        BookingError::invalid_request(field, err.to_string())
    }
}

impl From<DomainError> for BookingError {
    fn from(err: DomainError) -> Self {
        BookingError::infrastructure(err.to_string())
    }
}

impl From<LedgerError> for BookingError {
    fn from(err: LedgerError) -> Self {
        match err {
            LedgerError::NotFound(id) => BookingError::not_found(id),
            // DuplicateChargeId must be handled explicitly where it is
            // meaningful (record_booking); reaching this conversion means
            // the caller did not expect it.
            other => BookingError::infrastructure(other.to_string()),
        }
    }
}
