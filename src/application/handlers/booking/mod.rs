//! Booking handlers.
//!
//! `BookEventHandler` is the orchestrator for the booking-and-payment
//! transaction flow; the others are the read and cancellation paths
//! around the ledger.

mod book_event;
mod find_booking_by_charge;
mod list_event_bookings;
mod list_user_bookings;
mod void_booking;

pub use book_event::{BookEventCommand, BookEventHandler, BookEventResult};
pub use find_booking_by_charge::{FindBookingByChargeHandler, FindBookingByChargeQuery};
pub use list_event_bookings::{EventBookings, ListEventBookingsHandler, ListEventBookingsQuery};
pub use list_user_bookings::{ListUserBookingsHandler, ListUserBookingsQuery};
pub use void_booking::{VoidBookingCommand, VoidBookingHandler};
