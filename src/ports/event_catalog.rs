//! Event catalog port - read-only event lookup.
//!
//! The catalog is an external collaborator: the booking flow reads events
//! and never mutates them. Prices come from here and only from here; a
//! client-supplied total is never trusted.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::foundation::{DomainError, EventId};

/// Port for the event catalog.
#[async_trait]
pub trait EventCatalog: Send + Sync {
    /// Looks up an event by id. `None` if it does not exist.
    async fn get(&self, event_id: &EventId) -> Result<Option<EventRecord>, DomainError>;
}

/// Catalog view of an event, immutable from the booking flow's perspective.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventRecord {
    /// Event identifier.
    pub id: EventId,

    /// Display name, used on receipts.
    pub name: String,

    /// Ticket price in minor currency units.
    pub price_minor: i64,

    /// Total ticket capacity. `None` means unlimited.
    pub capacity: Option<u32>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn event_catalog_is_object_safe() {
        fn _accepts_dyn(_catalog: &dyn EventCatalog) {}
    }

    #[test]
    fn event_record_serializes_price_as_integer() {
        let record = EventRecord {
            id: EventId::new(),
            name: "Autumn Gala".to_string(),
            price_minor: 4500,
            capacity: Some(200),
        };
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["price_minor"], 4500);
    }
}
