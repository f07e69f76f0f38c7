//! HTTP handlers for booking endpoints.
//!
//! These handlers connect Axum routes to the application layer command and
//! query handlers.

use std::sync::Arc;

use axum::extract::{Json, Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;

use crate::application::handlers::booking::{
    BookEventCommand, BookEventHandler, FindBookingByChargeHandler, FindBookingByChargeQuery,
    ListEventBookingsHandler, ListEventBookingsQuery, ListUserBookingsHandler,
    ListUserBookingsQuery, VoidBookingCommand, VoidBookingHandler,
};
use crate::domain::booking::BookingError;
use crate::domain::foundation::{BookingId, ChargeId, EventId, UserIdentity};
use crate::ports::{AuthError, BookingLedger, EventCatalog, IdentityProvider, PaymentGateway};

use super::dto::{
    BookEventRequest, BookEventResponse, BookingListResponse, BookingResponse, ErrorResponse,
    EventBookingsResponse, HealthResponse, VoidBookingRequest,
};

// ════════════════════════════════════════════════════════════════════════════════
// Application State
// ════════════════════════════════════════════════════════════════════════════════

/// Shared application state containing all dependencies.
///
/// Cloned per request; everything inside is Arc-wrapped.
#[derive(Clone)]
pub struct BookingAppState {
    pub catalog: Arc<dyn EventCatalog>,
    pub gateway: Arc<dyn PaymentGateway>,
    pub ledger: Arc<dyn BookingLedger>,
    pub identity_provider: Arc<dyn IdentityProvider>,
    /// Currency all charges are made in (deployment-level setting).
    pub currency: String,
}

impl BookingAppState {
    /// Create handlers on demand from the shared state.
    pub fn book_event_handler(&self) -> BookEventHandler {
        BookEventHandler::new(
            self.catalog.clone(),
            self.gateway.clone(),
            self.ledger.clone(),
            self.currency.clone(),
        )
    }

    pub fn void_booking_handler(&self) -> VoidBookingHandler {
        VoidBookingHandler::new(self.ledger.clone())
    }

    pub fn list_user_bookings_handler(&self) -> ListUserBookingsHandler {
        ListUserBookingsHandler::new(self.ledger.clone())
    }

    pub fn list_event_bookings_handler(&self) -> ListEventBookingsHandler {
        ListEventBookingsHandler::new(self.catalog.clone(), self.ledger.clone())
    }

    pub fn find_booking_by_charge_handler(&self) -> FindBookingByChargeHandler {
        FindBookingByChargeHandler::new(self.ledger.clone())
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Authentication
// ════════════════════════════════════════════════════════════════════════════════

/// Authenticated caller extracted from the Authorization header.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub identity: UserIdentity,
}

/// Rejection type for AuthenticatedUser extraction.
pub struct AuthenticationRequired(Option<AuthError>);

impl IntoResponse for AuthenticationRequired {
    fn into_response(self) -> axum::response::Response {
        let error = match self.0 {
            Some(AuthError::Expired) => {
                ErrorResponse::new("CREDENTIAL_EXPIRED", "Credential has expired")
            }
            _ => ErrorResponse::new("AUTHENTICATION_REQUIRED", "Authentication is required"),
        };
        (StatusCode::UNAUTHORIZED, Json(error)).into_response()
    }
}

impl axum::extract::FromRequestParts<BookingAppState> for AuthenticatedUser {
    type Rejection = AuthenticationRequired;

    fn from_request_parts<'life0, 'life1, 'async_trait>(
        parts: &'life0 mut axum::http::request::Parts,
        state: &'life1 BookingAppState,
    ) -> std::pin::Pin<
        Box<dyn std::future::Future<Output = Result<Self, Self::Rejection>> + Send + 'async_trait>,
    >
    where
        'life0: 'async_trait,
        'life1: 'async_trait,
        Self: 'async_trait,
    {
        Box::pin(async move {
            let bearer = parts
                .headers
                .get(axum::http::header::AUTHORIZATION)
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.strip_prefix("Bearer "))
                .ok_or(AuthenticationRequired(None))?;

            let identity = state
                .identity_provider
                .resolve(bearer)
                .await
                .map_err(|e| AuthenticationRequired(Some(e)))?;

            Ok(AuthenticatedUser { identity })
        })
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Command Handlers (POST endpoints)
// ════════════════════════════════════════════════════════════════════════════════

/// POST /api/events/:event_id/book - Book tickets with payment
///
/// Returns 201 for a newly confirmed booking, 200 when the attempt replays
/// a previously-completed one.
pub async fn book_event(
    State(state): State<BookingAppState>,
    user: AuthenticatedUser,
    Path(event_id): Path<EventId>,
    Json(request): Json<BookEventRequest>,
) -> Result<impl IntoResponse, BookingApiError> {
    let handler = state.book_event_handler();
    let cmd = BookEventCommand {
        event_id,
        user: user.identity,
        ticket_count: request.ticket_count,
        payment_method_ref: request.payment_method_ref,
        request_nonce: request.request_nonce,
    };

    let result = handler.handle(cmd).await?;

    let status = if result.replayed {
        StatusCode::OK
    } else {
        StatusCode::CREATED
    };
    Ok((status, Json(BookEventResponse::from(result))))
}

/// POST /api/bookings/:booking_id/void - Void a confirmed booking
pub async fn void_booking(
    State(state): State<BookingAppState>,
    _user: AuthenticatedUser,
    Path(booking_id): Path<BookingId>,
    Json(request): Json<VoidBookingRequest>,
) -> Result<impl IntoResponse, BookingApiError> {
    let handler = state.void_booking_handler();
    let cmd = VoidBookingCommand {
        booking_id,
        reason: request.reason,
        refund: request.refund,
    };

    let booking = handler.handle(cmd).await?;

    Ok(Json(BookingResponse::from(booking)))
}

// ════════════════════════════════════════════════════════════════════════════════
// Query Handlers (GET endpoints)
// ════════════════════════════════════════════════════════════════════════════════

/// GET /api/bookings - Current user's booking history
pub async fn list_my_bookings(
    State(state): State<BookingAppState>,
    user: AuthenticatedUser,
) -> Result<impl IntoResponse, BookingApiError> {
    let handler = state.list_user_bookings_handler();
    let query = ListUserBookingsQuery {
        user: user.identity,
    };

    let bookings = handler.handle(query).await?;

    Ok(Json(BookingListResponse::from(bookings)))
}

/// GET /api/events/:event_id/bookings - An event's bookings with seat usage
pub async fn list_event_bookings(
    State(state): State<BookingAppState>,
    _user: AuthenticatedUser,
    Path(event_id): Path<EventId>,
) -> Result<impl IntoResponse, BookingApiError> {
    let handler = state.list_event_bookings_handler();
    let query = ListEventBookingsQuery { event_id };

    let result = handler.handle(query).await?;

    Ok(Json(EventBookingsResponse::from(result)))
}

/// GET /api/bookings/by-charge/:charge_id - Reconciliation lookup
pub async fn find_booking_by_charge(
    State(state): State<BookingAppState>,
    _user: AuthenticatedUser,
    Path(charge_id): Path<String>,
) -> Result<impl IntoResponse, BookingApiError> {
    let charge_id = ChargeId::new(charge_id)
        .map_err(|e| BookingError::invalid_request("charge_id", e.to_string()))?;

    let handler = state.find_booking_by_charge_handler();
    let query = FindBookingByChargeQuery { charge_id };

    match handler.handle(query).await? {
        Some(booking) => Ok(Json(BookingResponse::from(booking)).into_response()),
        None => Ok((
            StatusCode::NOT_FOUND,
            Json(ErrorResponse::new(
                "BOOKING_NOT_FOUND",
                "No booking recorded for this charge",
            )),
        )
            .into_response()),
    }
}

/// GET /health - Liveness probe
pub async fn health() -> impl IntoResponse {
    Json(HealthResponse { status: "ok" })
}

// ════════════════════════════════════════════════════════════════════════════════
// Error Handling
// ════════════════════════════════════════════════════════════════════════════════

/// API error type that converts booking errors to HTTP responses.
pub struct BookingApiError(BookingError);

impl From<BookingError> for BookingApiError {
    fn from(err: BookingError) -> Self {
        Self(err)
    }
}

impl IntoResponse for BookingApiError {
    fn into_response(self) -> axum::response::Response {
        let (status, error_code) = match &self.0 {
            BookingError::EventNotFound(_) => (StatusCode::NOT_FOUND, "EVENT_NOT_FOUND"),
            BookingError::NotFound(_) => (StatusCode::NOT_FOUND, "BOOKING_NOT_FOUND"),
            BookingError::CapacityExceeded { .. } => (StatusCode::CONFLICT, "CAPACITY_EXCEEDED"),
            BookingError::InvalidTransition { .. } => {
                (StatusCode::CONFLICT, "INVALID_STATE_TRANSITION")
            }
            BookingError::PaymentDeclined { .. } => {
                (StatusCode::PAYMENT_REQUIRED, "PAYMENT_DECLINED")
            }
            BookingError::GatewayUnavailable { .. } => {
                (StatusCode::SERVICE_UNAVAILABLE, "GATEWAY_UNAVAILABLE")
            }
            BookingError::PersistFailed { .. } => {
                (StatusCode::INTERNAL_SERVER_ERROR, "BOOKING_PERSIST_FAILED")
            }
            BookingError::InvalidRequest { .. } => (StatusCode::BAD_REQUEST, "INVALID_REQUEST"),
            BookingError::Infrastructure(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
        };

        let mut body = ErrorResponse::new(error_code, self.0.message());
        if self.0.is_retryable() {
            body = body.retryable();
        }
        if let Some(charge_id) = self.0.charge_id() {
            body = body.with_charge_id(charge_id.as_str());
        }

        (status, Json(body)).into_response()
    }
}
