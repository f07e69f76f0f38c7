//! Foundation module - Shared domain primitives.
//!
//! Contains value objects, identifiers, and error types that form
//! the vocabulary of the boxoffice domain.

mod errors;
mod identity;
mod ids;
mod state_machine;
mod timestamp;

pub use errors::{DomainError, ErrorCode, ValidationError};
pub use identity::UserIdentity;
pub use ids::{BookingId, ChargeId, EventId};
pub use state_machine::StateMachine;
pub use timestamp::Timestamp;
