use serde::Serialize;

use crate::domain::event::Event;
use crate::services::{SaveEventOutput, ServiceResult};

const START_TIME_FORMAT: &str = "%a %b %-d, %Y %-I:%M %p";

/// Flattened event as shown in lists and detail panes.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EventDto {
    pub id: String,
    pub name: String,
    pub description: String,
    pub category: &'static str,
    pub address: String,
    pub latitude: f64,
    pub longitude: f64,
    pub start_time: String,
    pub image_url: Option<String>,
}

impl From<Event> for EventDto {
    fn from(value: Event) -> Self {
        Self {
            start_time: value.start_time.format(START_TIME_FORMAT).to_string(),
            category: value.category.display_name(),
            address: value.location.address().to_string(),
            latitude: value.location.latitude(),
            longitude: value.location.longitude(),
            image_url: value.image_url.map(String::from),
            id: value.id.into_inner(),
            name: value.name,
            description: value.description,
        }
    }
}

/// What changed after applying a service result to [`SaveEventState`].
#[derive(Debug, Clone, PartialEq)]
pub enum ViewUpdate {
    EventSaved(EventDto),
    Error(String),
}

/// View state of the saved-events screen.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SaveEventState {
    pub saved_events: Vec<EventDto>,
    pub error: Option<String>,
}

impl SaveEventState {
    /// Folds the outcome of a save into the state.
    pub fn apply_save(&mut self, result: ServiceResult<SaveEventOutput>) -> ViewUpdate {
        match result {
            Ok(output) => {
                let dto = EventDto::from(output.event);
                self.saved_events.push(dto.clone());
                self.error = None;
                ViewUpdate::EventSaved(dto)
            }
            Err(e) => {
                let message = e.to_string();
                self.error = Some(message.clone());
                ViewUpdate::Error(message)
            }
        }
    }

    /// Resyncs the list with the store, e.g. after an unsave.
    pub fn replace_saved(&mut self, events: Vec<Event>) {
        self.saved_events = events.into_iter().map(EventDto::from).collect();
    }
}
