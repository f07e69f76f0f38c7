//! PostgreSQL implementation of the EventCatalog port.

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::foundation::{DomainError, ErrorCode, EventId};
use crate::ports::{EventCatalog, EventRecord};

/// PostgreSQL implementation of the EventCatalog port.
pub struct PostgresEventCatalog {
    pool: PgPool,
}

impl PostgresEventCatalog {
    /// Creates a new PostgresEventCatalog with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct EventRow {
    id: Uuid,
    name: String,
    price_minor: i64,
    capacity: Option<i32>,
}

impl TryFrom<EventRow> for EventRecord {
    type Error = DomainError;

    fn try_from(row: EventRow) -> Result<Self, Self::Error> {
        let capacity = row
            .capacity
            .map(|c| {
                u32::try_from(c).map_err(|_| {
                    DomainError::new(
                        ErrorCode::DatabaseError,
                        format!("Invalid capacity value: {}", c),
                    )
                })
            })
            .transpose()?;

        Ok(EventRecord {
            id: EventId::from_uuid(row.id),
            name: row.name,
            price_minor: row.price_minor,
            capacity,
        })
    }
}

#[async_trait]
impl EventCatalog for PostgresEventCatalog {
    async fn get(&self, id: &EventId) -> Result<Option<EventRecord>, DomainError> {
        let row: Option<EventRow> = sqlx::query_as(
            r#"
            SELECT id, name, price_minor, capacity
            FROM events
            WHERE id = $1
            "#,
        )
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            DomainError::new(ErrorCode::DatabaseError, format!("Failed to load event: {}", e))
        })?;

        row.map(EventRecord::try_from).transpose()
    }
}
