//! Adapters - Implementations of the ports.
//!
//! - `stripe` - payment gateway over the Stripe charges API, plus a mock
//! - `postgres` - booking ledger and event catalog over PostgreSQL
//! - `memory` - in-memory ledger/catalog for tests and local development
//! - `auth` - identity providers (JWT, mock)
//! - `http` - axum REST surface

pub mod auth;
pub mod http;
pub mod memory;
pub mod postgres;
pub mod stripe;
