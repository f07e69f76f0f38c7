//! Booking domain - the persisted outcome of a paid ticket purchase.
//!
//! A `Booking` exists only after the payment gateway confirms a charge;
//! it is never created speculatively and never hard-deleted. Cancellation
//! is a status transition (`Voided` / `Refunded`) so the financial audit
//! trail survives.

mod aggregate;
mod errors;
mod idempotency;
mod status;

pub use aggregate::Booking;
pub use errors::BookingError;
pub use idempotency::IdempotencyKey;
pub use status::BookingStatus;
