//! Axum router configuration for booking endpoints.

use axum::{
    routing::{get, post},
    Router,
};

use super::handlers::{
    book_event, find_booking_by_charge, health, list_event_bookings, list_my_bookings,
    void_booking, BookingAppState,
};

/// Create the booking API router.
///
/// # Routes
///
/// ## Authenticated endpoints
/// - `POST /events/:event_id/book` - Book tickets with payment
/// - `GET /events/:event_id/bookings` - An event's bookings and seat usage
/// - `GET /bookings` - Current user's booking history
/// - `GET /bookings/by-charge/:charge_id` - Reconciliation lookup by charge
/// - `POST /bookings/:booking_id/void` - Void a confirmed booking
pub fn booking_routes() -> Router<BookingAppState> {
    Router::new()
        .route("/events/:event_id/book", post(book_event))
        .route("/events/:event_id/bookings", get(list_event_bookings))
        .route("/bookings", get(list_my_bookings))
        .route("/bookings/by-charge/:charge_id", get(find_booking_by_charge))
        .route("/bookings/:booking_id/void", post(void_booking))
}

/// Create the complete application router.
///
/// Mounts the booking API under `/api` and the unauthenticated health
/// probe at the root.
pub fn app_router(state: BookingAppState) -> Router {
    Router::new()
        .nest("/api", booking_routes())
        .route("/health", get(health))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use crate::adapters::auth::MockIdentityProvider;
    use crate::adapters::memory::{InMemoryBookingLedger, InMemoryEventCatalog};
    use crate::adapters::stripe::MockPaymentGateway;

    fn test_state() -> BookingAppState {
        BookingAppState {
            catalog: Arc::new(InMemoryEventCatalog::new()),
            gateway: Arc::new(MockPaymentGateway::new()),
            ledger: Arc::new(InMemoryBookingLedger::new()),
            identity_provider: Arc::new(MockIdentityProvider::new()),
            currency: "usd".to_string(),
        }
    }

    #[test]
    fn booking_routes_creates_router() {
        let router = booking_routes();
        let _: Router<()> = router.with_state(test_state());
    }

    #[test]
    fn app_router_creates_combined_router() {
        let _ = app_router(test_state());
    }
}
