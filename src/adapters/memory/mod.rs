//! In-memory adapters for tests and local development.
//!
//! These honor the full port contracts - including the ledger's
//! charge-id uniqueness - so orchestrator behavior can be exercised
//! without a database.

mod booking_ledger;
mod event_catalog;

pub use booking_ledger::InMemoryBookingLedger;
pub use event_catalog::InMemoryEventCatalog;
