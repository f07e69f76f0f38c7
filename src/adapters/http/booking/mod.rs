//! Booking HTTP module.
//!
//! Routes, handlers, and DTOs for the booking API.

pub mod dto;
pub mod handlers;
pub mod routes;

pub use handlers::{AuthenticatedUser, BookingApiError, BookingAppState};
pub use routes::{app_router, booking_routes};
