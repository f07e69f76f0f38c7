//! In-memory implementation of the event catalog.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, EventId};
use crate::ports::{EventCatalog, EventRecord};

/// In-memory, read-only event catalog seeded up front.
#[derive(Default)]
pub struct InMemoryEventCatalog {
    events: Mutex<HashMap<EventId, EventRecord>>,
}

impl InMemoryEventCatalog {
    /// Creates an empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a catalog seeded with the given events.
    pub fn with_events(events: impl IntoIterator<Item = EventRecord>) -> Self {
        let catalog = Self::new();
        for event in events {
            catalog.insert(event);
        }
        catalog
    }

    /// Adds or replaces an event.
    pub fn insert(&self, event: EventRecord) {
        self.events.lock().unwrap().insert(event.id, event);
    }
}

#[async_trait]
impl EventCatalog for InMemoryEventCatalog {
    async fn get(&self, event_id: &EventId) -> Result<Option<EventRecord>, DomainError> {
        Ok(self.events.lock().unwrap().get(event_id).cloned())
    }
}
