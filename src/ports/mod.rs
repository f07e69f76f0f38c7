//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the outside world. Adapters implement these ports.
//!
//! - `PaymentGateway` - card charges against the external payment processor
//! - `BookingLedger` - the persisted booking store and its uniqueness invariant
//! - `EventCatalog` - read-only event lookup (consumed collaborator)
//! - `IdentityProvider` - bearer credential resolution (consumed collaborator)

mod booking_ledger;
mod event_catalog;
mod identity_provider;
mod payment_gateway;

pub use booking_ledger::{BookingLedger, LedgerError};
pub use event_catalog::{EventCatalog, EventRecord};
pub use identity_provider::{AuthError, IdentityProvider};
pub use payment_gateway::{
    ChargeRequest, ChargeStatus, GatewayError, GatewayErrorCode, PaymentGateway, PaymentOutcome,
};
