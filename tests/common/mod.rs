//! Helpers for integration tests.

#![allow(dead_code)]

use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use event_discovery::domain::event::{Event, EventCategory};
use event_discovery::domain::location::Location;
use event_discovery::domain::types::{EventId, ImageUrl, Username};
use tempfile::TempDir;

/// Temporary directory holding a saved-events file, removed on drop.
pub struct TestStore {
    dir: TempDir,
}

impl TestStore {
    pub fn new() -> Self {
        TestStore {
            dir: TempDir::new().expect("Failed to create temp dir"),
        }
    }

    pub fn path(&self) -> PathBuf {
        self.dir.path().join("saved_events.csv")
    }

    pub fn write(&self, content: &str) -> PathBuf {
        let path = self.path();
        std::fs::write(&path, content).expect("Failed to seed saved events file");
        path
    }

    pub fn dir(&self) -> &Path {
        self.dir.path()
    }
}

pub fn user(name: &str) -> Username {
    Username::new(name).expect("valid username")
}

pub fn event(id: &str, category: EventCategory) -> Event {
    Event {
        id: EventId::new(id).expect("valid event id"),
        name: format!("Event {id}"),
        description: "An exciting NBA matchup, \"live\" at the arena.".into(),
        address: "Scotiabank Arena, 40 Bay St, Toronto, ON".into(),
        category,
        location: Location::new("Scotiabank Arena, 40 Bay St, Toronto, ON", 43.6435, -79.3791)
            .expect("valid location"),
        start_time: NaiveDate::from_ymd_opt(2025, 11, 28)
            .expect("valid date")
            .and_hms_opt(19, 30, 0)
            .expect("valid time"),
        image_url: Some(
            ImageUrl::new("https://via.placeholder.com/500x700?text=Raptors+vs+Lakers")
                .expect("valid url"),
        ),
    }
}
