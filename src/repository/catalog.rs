use std::collections::HashMap;
use std::sync::RwLock;

use chrono::{NaiveDate, NaiveDateTime};

use crate::domain::event::{Event, EventCategory};
use crate::domain::location::Location;
use crate::domain::types::{EventId, TypeConstraintError};
use crate::repository::{EventCatalogReader, EventCatalogWriter, RepositoryResult};

/// Events known to the application, keyed by id.
#[derive(Debug, Default)]
pub struct InMemoryEventCatalog {
    events: RwLock<HashMap<EventId, Event>>,
}

impl InMemoryEventCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Catalog pre-filled with a couple of local events for demos and manual testing.
    pub fn with_demo_events() -> Result<Self, TypeConstraintError> {
        let events = demo_events()?
            .into_iter()
            .map(|event| (event.id.clone(), event))
            .collect();
        Ok(Self {
            events: RwLock::new(events),
        })
    }
}

fn demo_start(
    year: i32,
    month: u32,
    day: u32,
    hour: u32,
) -> Result<NaiveDateTime, TypeConstraintError> {
    NaiveDate::from_ymd_opt(year, month, day)
        .and_then(|d| d.and_hms_opt(hour, 0, 0))
        .ok_or_else(|| TypeConstraintError::InvalidValue(format!("{year}-{month}-{day} {hour}h")))
}

fn demo_events() -> Result<Vec<Event>, TypeConstraintError> {
    Ok(vec![
        Event {
            id: EventId::new("1")?,
            name: "Campus Concert".into(),
            description: "Live music at UofT.".into(),
            address: "123 College St".into(),
            category: EventCategory::parse("Music"),
            location: Location::new("123 College St", 43.6629, -79.3957)?,
            start_time: demo_start(2025, 11, 20, 19)?,
            image_url: None,
        },
        Event {
            id: EventId::new("2")?,
            name: "Art Fair".into(),
            description: "An outdoor art fair with local artists.".into(),
            address: "456 King St".into(),
            category: EventCategory::parse("Art"),
            location: Location::new("456 King St", 43.6532, -79.3832)?,
            start_time: demo_start(2025, 12, 5, 10)?,
            image_url: None,
        },
    ])
}

impl EventCatalogReader for InMemoryEventCatalog {
    fn get_event(&self, id: &EventId) -> RepositoryResult<Option<Event>> {
        Ok(self.events.read()?.get(id).cloned())
    }

    fn event_exists(&self, id: &EventId) -> RepositoryResult<bool> {
        Ok(self.events.read()?.contains_key(id))
    }

    fn list_events(&self) -> RepositoryResult<Vec<Event>> {
        let mut events: Vec<Event> = self.events.read()?.values().cloned().collect();
        events.sort_by(|a, b| a.start_time.cmp(&b.start_time).then_with(|| a.id.cmp(&b.id)));
        Ok(events)
    }
}

impl EventCatalogWriter for InMemoryEventCatalog {
    fn put_event(&self, event: Event) -> RepositoryResult<()> {
        self.events.write()?.insert(event.id.clone(), event);
        Ok(())
    }
}
