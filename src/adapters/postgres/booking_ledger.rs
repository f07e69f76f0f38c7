//! PostgreSQL implementation of the BookingLedger port.
//!
//! Charge-id and idempotency-key uniqueness live in the `bookings` table's
//! unique constraints; a violated insert is resolved by fetching the row
//! that won and reporting `DuplicateChargeId` with it.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::booking::{Booking, BookingStatus, IdempotencyKey};
use crate::domain::foundation::{BookingId, ChargeId, EventId, Timestamp, UserIdentity};
use crate::ports::{BookingLedger, LedgerError};

/// PostgreSQL implementation of the BookingLedger port.
pub struct PostgresBookingLedger {
    pool: PgPool,
}

impl PostgresBookingLedger {
    /// Creates a new PostgresBookingLedger with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn fetch_where(
        &self,
        column: &str,
        value: &str,
    ) -> Result<Option<Booking>, LedgerError> {
        // column comes from a fixed set of call sites, never user input
        let sql = format!("{} WHERE {} = $1", SELECT_BOOKING, column);
        let row: Option<BookingRow> = sqlx::query_as(&sql)
            .bind(value)
            .fetch_optional(&self.pool)
            .await
            .map_err(unavailable)?;
        row.map(Booking::try_from).transpose()
    }
}

const SELECT_BOOKING: &str = r#"
    SELECT id, event_id, user_email, ticket_count, charge_id, idempotency_key,
           amount_minor, currency, status, receipt_ref, void_reason,
           created_at, updated_at
    FROM bookings
"#;

/// Database row representation of a booking.
#[derive(Debug, sqlx::FromRow)]
struct BookingRow {
    id: Uuid,
    event_id: Uuid,
    user_email: String,
    ticket_count: i32,
    charge_id: String,
    idempotency_key: String,
    amount_minor: i64,
    currency: String,
    status: String,
    receipt_ref: Option<String>,
    void_reason: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<BookingRow> for Booking {
    type Error = LedgerError;

    fn try_from(row: BookingRow) -> Result<Self, Self::Error> {
        let user = UserIdentity::new(&row.user_email)
            .map_err(|e| unavailable_msg(format!("Invalid user_email in row: {}", e)))?;
        let charge_id = ChargeId::new(&row.charge_id)
            .map_err(|e| unavailable_msg(format!("Invalid charge_id in row: {}", e)))?;
        let ticket_count = u32::try_from(row.ticket_count)
            .map_err(|_| unavailable_msg(format!("Invalid ticket_count: {}", row.ticket_count)))?;

        Ok(Booking {
            id: BookingId::from_uuid(row.id),
            event_id: EventId::from_uuid(row.event_id),
            user,
            ticket_count,
            charge_id,
            idempotency_key: IdempotencyKey::from_stored(row.idempotency_key),
            amount_minor: row.amount_minor,
            currency: row.currency,
            status: parse_status(&row.status)?,
            receipt_ref: row.receipt_ref,
            void_reason: row.void_reason,
            created_at: Timestamp::from_datetime(row.created_at),
            updated_at: Timestamp::from_datetime(row.updated_at),
        })
    }
}

fn parse_status(s: &str) -> Result<BookingStatus, LedgerError> {
    match s {
        "confirmed" => Ok(BookingStatus::Confirmed),
        "refunded" => Ok(BookingStatus::Refunded),
        "voided" => Ok(BookingStatus::Voided),
        _ => Err(unavailable_msg(format!("Invalid status value: {}", s))),
    }
}

fn status_to_str(status: BookingStatus) -> &'static str {
    match status {
        BookingStatus::Confirmed => "confirmed",
        BookingStatus::Refunded => "refunded",
        BookingStatus::Voided => "voided",
    }
}

fn unavailable(e: sqlx::Error) -> LedgerError {
    LedgerError::Unavailable(e.to_string())
}

fn unavailable_msg(msg: String) -> LedgerError {
    LedgerError::Unavailable(msg)
}

fn is_unique_violation(e: &sqlx::Error) -> bool {
    if let sqlx::Error::Database(db_err) = e {
        return matches!(
            db_err.constraint(),
            Some("bookings_charge_id_key") | Some("bookings_idempotency_key_key")
        );
    }
    false
}

#[async_trait]
impl BookingLedger for PostgresBookingLedger {
    async fn record_booking(&self, booking: &Booking) -> Result<Booking, LedgerError> {
        let result = sqlx::query(
            r#"
            INSERT INTO bookings (
                id, event_id, user_email, ticket_count, charge_id, idempotency_key,
                amount_minor, currency, status, receipt_ref, void_reason,
                created_at, updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
            "#,
        )
        .bind(booking.id.as_uuid())
        .bind(booking.event_id.as_uuid())
        .bind(booking.user.as_str())
        .bind(booking.ticket_count as i32)
        .bind(booking.charge_id.as_str())
        .bind(booking.idempotency_key.as_str())
        .bind(booking.amount_minor)
        .bind(&booking.currency)
        .bind(status_to_str(booking.status))
        .bind(&booking.receipt_ref)
        .bind(&booking.void_reason)
        .bind(booking.created_at.as_datetime())
        .bind(booking.updated_at.as_datetime())
        .execute(&self.pool)
        .await;

        match result {
            Ok(_) => self
                .find_by_id(&booking.id)
                .await?
                .ok_or_else(|| unavailable_msg("Inserted booking not readable".to_string())),
            Err(e) if is_unique_violation(&e) => {
                // Another attempt won the race. Hand back its record; the
                // key lookup covers both constraints.
                let existing = self
                    .find_by_charge_id(&booking.charge_id)
                    .await?
                    .or(self
                        .find_by_idempotency_key(&booking.idempotency_key)
                        .await?);
                match existing {
                    Some(existing) => Err(LedgerError::DuplicateChargeId {
                        existing: Box::new(existing),
                    }),
                    None => Err(unavailable(e)),
                }
            }
            Err(e) => Err(unavailable(e)),
        }
    }

    async fn find_by_id(&self, id: &BookingId) -> Result<Option<Booking>, LedgerError> {
        let sql = format!("{} WHERE id = $1", SELECT_BOOKING);
        let row: Option<BookingRow> = sqlx::query_as(&sql)
            .bind(id.as_uuid())
            .fetch_optional(&self.pool)
            .await
            .map_err(unavailable)?;
        row.map(Booking::try_from).transpose()
    }

    async fn find_by_charge_id(
        &self,
        charge_id: &ChargeId,
    ) -> Result<Option<Booking>, LedgerError> {
        self.fetch_where("charge_id", charge_id.as_str()).await
    }

    async fn find_by_idempotency_key(
        &self,
        key: &IdempotencyKey,
    ) -> Result<Option<Booking>, LedgerError> {
        self.fetch_where("idempotency_key", key.as_str()).await
    }

    async fn find_by_user(&self, user: &UserIdentity) -> Result<Vec<Booking>, LedgerError> {
        let sql = format!(
            "{} WHERE user_email = $1 ORDER BY created_at DESC",
            SELECT_BOOKING
        );
        let rows: Vec<BookingRow> = sqlx::query_as(&sql)
            .bind(user.as_str())
            .fetch_all(&self.pool)
            .await
            .map_err(unavailable)?;
        rows.into_iter().map(Booking::try_from).collect()
    }

    async fn find_by_event(&self, event_id: &EventId) -> Result<Vec<Booking>, LedgerError> {
        let sql = format!(
            "{} WHERE event_id = $1 ORDER BY created_at DESC",
            SELECT_BOOKING
        );
        let rows: Vec<BookingRow> = sqlx::query_as(&sql)
            .bind(event_id.as_uuid())
            .fetch_all(&self.pool)
            .await
            .map_err(unavailable)?;
        rows.into_iter().map(Booking::try_from).collect()
    }

    async fn confirmed_ticket_total(&self, event_id: &EventId) -> Result<u32, LedgerError> {
        let total: Option<i64> = sqlx::query_scalar(
            r#"
            SELECT SUM(ticket_count)::BIGINT
            FROM bookings
            WHERE event_id = $1 AND status = 'confirmed'
            "#,
        )
        .bind(event_id.as_uuid())
        .fetch_one(&self.pool)
        .await
        .map_err(unavailable)?;

        let total = total.unwrap_or(0);
        u32::try_from(total)
            .map_err(|_| unavailable_msg(format!("Ticket total out of range: {}", total)))
    }

    async fn update(&self, booking: &Booking) -> Result<(), LedgerError> {
        let result = sqlx::query(
            r#"
            UPDATE bookings SET
                status = $2,
                void_reason = $3,
                updated_at = $4
            WHERE id = $1
            "#,
        )
        .bind(booking.id.as_uuid())
        .bind(status_to_str(booking.status))
        .bind(&booking.void_reason)
        .bind(booking.updated_at.as_datetime())
        .execute(&self.pool)
        .await
        .map_err(unavailable)?;

        if result.rows_affected() == 0 {
            return Err(LedgerError::NotFound(booking.id));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_round_trips() {
        for status in [
            BookingStatus::Confirmed,
            BookingStatus::Refunded,
            BookingStatus::Voided,
        ] {
            assert_eq!(parse_status(status_to_str(status)).unwrap(), status);
        }
    }

    #[test]
    fn unknown_status_is_rejected() {
        assert!(parse_status("pending").is_err());
    }
}
