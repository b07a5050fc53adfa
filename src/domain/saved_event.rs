use serde::{Deserialize, Serialize};

use crate::domain::event::Event;
use crate::domain::types::Username;

/// One entry of the saved-events relation: `username` bookmarked `event`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SavedEvent {
    pub username: Username,
    pub event: Event,
}
