//! PostgreSQL adapters - database implementations of the persistence ports.
//!
//! Expected schema:
//!
//! ```sql
//! CREATE TABLE events (
//!     id          UUID PRIMARY KEY,
//!     name        TEXT NOT NULL,
//!     price_minor BIGINT NOT NULL CHECK (price_minor > 0),
//!     capacity    INTEGER,
//!     created_at  TIMESTAMPTZ NOT NULL DEFAULT now()
//! );
//!
//! CREATE TABLE bookings (
//!     id              UUID PRIMARY KEY,
//!     event_id        UUID NOT NULL REFERENCES events(id),
//!     user_email      TEXT NOT NULL,
//!     ticket_count    INTEGER NOT NULL CHECK (ticket_count > 0),
//!     charge_id       TEXT NOT NULL,
//!     idempotency_key TEXT NOT NULL,
//!     amount_minor    BIGINT NOT NULL,
//!     currency        TEXT NOT NULL,
//!     status          TEXT NOT NULL,
//!     receipt_ref     TEXT,
//!     void_reason     TEXT,
//!     created_at      TIMESTAMPTZ NOT NULL,
//!     updated_at      TIMESTAMPTZ NOT NULL,
//!     CONSTRAINT bookings_charge_id_key UNIQUE (charge_id),
//!     CONSTRAINT bookings_idempotency_key_key UNIQUE (idempotency_key)
//! );
//!
//! CREATE INDEX bookings_user_email_idx ON bookings (user_email, created_at DESC);
//! CREATE INDEX bookings_event_id_idx ON bookings (event_id, created_at DESC);
//! ```
//!
//! The two unique constraints on `bookings` are load-bearing: they are what
//! turns a racing duplicate persist into a `DuplicateChargeId` resolution
//! instead of a double booking.

mod booking_ledger;
mod event_catalog;

pub use booking_ledger::PostgresBookingLedger;
pub use event_catalog::PostgresEventCatalog;
