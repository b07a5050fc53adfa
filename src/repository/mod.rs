use crate::domain::event::Event;
use crate::domain::types::{EventId, Username};

pub mod catalog;
pub mod csv_file;
pub mod errors;
pub mod memory;

pub use catalog::InMemoryEventCatalog;
pub use csv_file::CsvFileRepository;
pub use errors::{RepositoryError, RepositoryResult};
pub use memory::InMemoryRepository;

/// Read-only operations on the saved-events relation.
pub trait SavedEventReader {
    /// Snapshot of the events `user` saved, in save order. Empty for unknown users.
    fn get_saved_events(&self, user: &Username) -> RepositoryResult<Vec<Event>>;
    /// Whether `user` has saved the event identified by `event_id`.
    fn is_event_saved(&self, user: &Username, event_id: &EventId) -> RepositoryResult<bool>;
    /// Users that currently own a saved-events entry, sorted.
    fn list_users(&self) -> RepositoryResult<Vec<Username>>;
}

/// Mutating operations on the saved-events relation.
pub trait SavedEventWriter {
    /// Appends `event` to the user's list.
    ///
    /// Returns `false` without touching the store when an event with the same
    /// id is already saved for that user.
    fn save_event(&self, user: &Username, event: &Event) -> RepositoryResult<bool>;
    /// Removes the event with the same id as `event`. Returns whether anything was removed.
    fn unsave_event(&self, user: &Username, event: &Event) -> RepositoryResult<bool>;
}

/// Read-only lookups against the catalog of discoverable events.
pub trait EventCatalogReader {
    fn get_event(&self, id: &EventId) -> RepositoryResult<Option<Event>>;
    fn event_exists(&self, id: &EventId) -> RepositoryResult<bool>;
    /// All catalog events ordered by start time.
    fn list_events(&self) -> RepositoryResult<Vec<Event>>;
}

pub trait EventCatalogWriter {
    /// Inserts `event`, replacing any catalog entry with the same id.
    fn put_event(&self, event: Event) -> RepositoryResult<()>;
}

impl<T: SavedEventReader + ?Sized> SavedEventReader for &T {
    fn get_saved_events(&self, user: &Username) -> RepositoryResult<Vec<Event>> {
        (**self).get_saved_events(user)
    }

    fn is_event_saved(&self, user: &Username, event_id: &EventId) -> RepositoryResult<bool> {
        (**self).is_event_saved(user, event_id)
    }

    fn list_users(&self) -> RepositoryResult<Vec<Username>> {
        (**self).list_users()
    }
}

impl<T: SavedEventWriter + ?Sized> SavedEventWriter for &T {
    fn save_event(&self, user: &Username, event: &Event) -> RepositoryResult<bool> {
        (**self).save_event(user, event)
    }

    fn unsave_event(&self, user: &Username, event: &Event) -> RepositoryResult<bool> {
        (**self).unsave_event(user, event)
    }
}
