use std::collections::HashMap;
use std::sync::Mutex;

use crate::domain::event::Event;
use crate::domain::saved_event::SavedEvent;
use crate::domain::types::{EventId, Username};
use crate::repository::{RepositoryResult, SavedEventReader, SavedEventWriter};

/// Username to saved events, each list kept in save order without duplicate ids.
#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) struct SavedEventMap {
    by_user: HashMap<Username, Vec<Event>>,
}

impl SavedEventMap {
    pub(crate) fn insert(&mut self, user: &Username, event: &Event) -> bool {
        let events = self.by_user.entry(user.clone()).or_default();
        if events.iter().any(|e| e.same_event(event)) {
            return false;
        }
        events.push(event.clone());
        true
    }

    pub(crate) fn remove(&mut self, user: &Username, event: &Event) -> bool {
        let Some(events) = self.by_user.get_mut(user) else {
            return false;
        };
        let before = events.len();
        events.retain(|e| !e.same_event(event));
        events.len() != before
    }

    pub(crate) fn events(&self, user: &Username) -> Vec<Event> {
        self.by_user.get(user).cloned().unwrap_or_default()
    }

    pub(crate) fn contains(&self, user: &Username, event_id: &EventId) -> bool {
        self.by_user
            .get(user)
            .is_some_and(|events| events.iter().any(|e| &e.id == event_id))
    }

    pub(crate) fn users(&self) -> Vec<Username> {
        let mut users: Vec<Username> = self.by_user.keys().cloned().collect();
        users.sort();
        users
    }

    /// Every entry, users sorted and each user's events in save order.
    pub(crate) fn entries(&self) -> Vec<SavedEvent> {
        self.users()
            .into_iter()
            .flat_map(|username| {
                self.events(&username)
                    .into_iter()
                    .map(move |event| SavedEvent {
                        username: username.clone(),
                        event,
                    })
            })
            .collect()
    }
}

/// Volatile saved-events store, lost when the process exits.
#[derive(Debug, Default)]
pub struct InMemoryRepository {
    saved: Mutex<SavedEventMap>,
}

impl InMemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SavedEventReader for InMemoryRepository {
    fn get_saved_events(&self, user: &Username) -> RepositoryResult<Vec<Event>> {
        Ok(self.saved.lock()?.events(user))
    }

    fn is_event_saved(&self, user: &Username, event_id: &EventId) -> RepositoryResult<bool> {
        Ok(self.saved.lock()?.contains(user, event_id))
    }

    fn list_users(&self) -> RepositoryResult<Vec<Username>> {
        Ok(self.saved.lock()?.users())
    }
}

impl SavedEventWriter for InMemoryRepository {
    fn save_event(&self, user: &Username, event: &Event) -> RepositoryResult<bool> {
        let inserted = self.saved.lock()?.insert(user, event);
        if inserted {
            log::debug!("Saved event {} for user {user}", event.id);
        } else {
            log::debug!("Event {} already saved for user {user}", event.id);
        }
        Ok(inserted)
    }

    fn unsave_event(&self, user: &Username, event: &Event) -> RepositoryResult<bool> {
        Ok(self.saved.lock()?.remove(user, event))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::test::{sample_event, user};

    #[test]
    fn save_is_idempotent() {
        let repo = InMemoryRepository::new();
        let alice = user("alice");
        let event = sample_event("1");

        assert!(repo.save_event(&alice, &event).unwrap());
        assert!(!repo.save_event(&alice, &event).unwrap());

        let saved = repo.get_saved_events(&alice).unwrap();
        assert_eq!(saved.len(), 1);
        assert_eq!(saved[0], event);
    }

    #[test]
    fn duplicate_detection_is_by_id() {
        let repo = InMemoryRepository::new();
        let alice = user("alice");
        let mut renamed = sample_event("1");
        renamed.name = "Renamed".into();

        repo.save_event(&alice, &sample_event("1")).unwrap();
        assert!(!repo.save_event(&alice, &renamed).unwrap());
        assert_eq!(repo.get_saved_events(&alice).unwrap()[0].name, "Event 1");
    }

    #[test]
    fn keeps_save_order() {
        let repo = InMemoryRepository::new();
        let alice = user("alice");
        for id in ["3", "1", "2"] {
            repo.save_event(&alice, &sample_event(id)).unwrap();
        }
        let ids: Vec<String> = repo
            .get_saved_events(&alice)
            .unwrap()
            .into_iter()
            .map(|e| e.id.into_inner())
            .collect();
        assert_eq!(ids, ["3", "1", "2"]);
    }

    #[test]
    fn unsave_removes_only_that_event() {
        let repo = InMemoryRepository::new();
        let alice = user("alice");
        repo.save_event(&alice, &sample_event("1")).unwrap();
        repo.save_event(&alice, &sample_event("2")).unwrap();

        assert!(repo.unsave_event(&alice, &sample_event("1")).unwrap());
        assert!(!repo.is_event_saved(&alice, &sample_event("1").id).unwrap());
        assert!(repo.is_event_saved(&alice, &sample_event("2").id).unwrap());
        assert!(!repo.unsave_event(&alice, &sample_event("1")).unwrap());
    }

    #[test]
    fn users_are_isolated() {
        let repo = InMemoryRepository::new();
        repo.save_event(&user("alice"), &sample_event("1")).unwrap();

        assert!(repo.get_saved_events(&user("bob")).unwrap().is_empty());
        assert!(!repo.is_event_saved(&user("bob"), &sample_event("1").id).unwrap());
        assert!(!repo.unsave_event(&user("bob"), &sample_event("1")).unwrap());
        assert_eq!(repo.list_users().unwrap(), vec![user("alice")]);
    }

    #[test]
    fn snapshot_is_detached_from_store() {
        let repo = InMemoryRepository::new();
        let alice = user("alice");
        repo.save_event(&alice, &sample_event("1")).unwrap();

        let mut snapshot = repo.get_saved_events(&alice).unwrap();
        snapshot.clear();
        assert_eq!(repo.get_saved_events(&alice).unwrap().len(), 1);
    }
}
