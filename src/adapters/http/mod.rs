//! HTTP adapters - Axum routes, handlers, and DTOs.

pub mod booking;

pub use booking::{app_router, BookingAppState};
