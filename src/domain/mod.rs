//! Domain layer - Business logic and aggregates.
//!
//! Pure domain types with no I/O. Persistence and gateway concerns
//! live behind the ports and inside the adapters.

pub mod booking;
pub mod foundation;
