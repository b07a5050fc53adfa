use log::error;

use crate::domain::event::Event;
use crate::domain::types::EventId;
use crate::repository::{SavedEventReader, SavedEventWriter};
use crate::services::identity::CurrentUserProvider;

use super::errors::{ServiceError, ServiceResult};

/// Result of a successful save.
#[derive(Debug, Clone, PartialEq)]
pub struct SaveEventOutput {
    pub event: Event,
}

/// Save/unsave workflow for the current user's favorite events.
///
/// The user is resolved through `U` on every call, so the same service keeps
/// working across logins. Repository errors are logged and reported as
/// [`ServiceError::Internal`].
pub struct SaveEventService<R, U> {
    repo: R,
    users: U,
}

impl<R, U> SaveEventService<R, U>
where
    R: SavedEventReader + SavedEventWriter,
    U: CurrentUserProvider,
{
    pub fn new(repo: R, users: U) -> Self {
        Self { repo, users }
    }

    /// Saves `event` for the current user.
    ///
    /// Fails with [`ServiceError::NoEventFound`] when no event was selected and
    /// with [`ServiceError::AlreadySaved`] when the user already bookmarked it.
    pub fn execute(&self, event: Option<Event>) -> ServiceResult<SaveEventOutput> {
        let Some(event) = event else {
            return Err(ServiceError::NoEventFound);
        };
        let username = self
            .users
            .current_username()
            .ok_or(ServiceError::NotAuthenticated)?;

        match self.repo.is_event_saved(&username, &event.id) {
            Ok(true) => return Err(ServiceError::AlreadySaved),
            Ok(false) => {}
            Err(e) => {
                error!("Failed to check saved event: {e}");
                return Err(ServiceError::Internal);
            }
        }

        match self.repo.save_event(&username, &event) {
            Ok(true) => Ok(SaveEventOutput { event }),
            Ok(false) => Err(ServiceError::AlreadySaved),
            Err(e) => {
                error!("Failed to save event: {e}");
                Err(ServiceError::Internal)
            }
        }
    }

    /// Removes `event` from the current user's list. Does nothing when nobody is logged in.
    pub fn unsave_event(&self, event: &Event) -> ServiceResult<()> {
        let Some(username) = self.users.current_username() else {
            return Ok(());
        };

        match self.repo.unsave_event(&username, event) {
            Ok(_) => Ok(()),
            Err(e) => {
                error!("Failed to unsave event: {e}");
                Err(ServiceError::Internal)
            }
        }
    }

    /// Removes the saved event identified by `event_id`.
    ///
    /// Returns the removed event, or `None` when it was not saved or nobody is logged in.
    pub fn unsave_event_by_id(&self, event_id: &str) -> ServiceResult<Option<Event>> {
        let Some(event) = self
            .get_saved_events()?
            .into_iter()
            .find(|event| event.id == event_id.trim())
        else {
            return Ok(None);
        };

        self.unsave_event(&event)?;
        Ok(Some(event))
    }

    /// The current user's saved events in save order; empty when nobody is logged in.
    pub fn get_saved_events(&self) -> ServiceResult<Vec<Event>> {
        let Some(username) = self.users.current_username() else {
            return Ok(Vec::new());
        };

        self.repo.get_saved_events(&username).map_err(|e| {
            error!("Failed to list saved events: {e}");
            ServiceError::Internal
        })
    }

    pub fn is_event_saved(&self, event_id: Option<&str>) -> ServiceResult<bool> {
        let Some(username) = self.users.current_username() else {
            return Ok(false);
        };
        let Some(event_id) = event_id.and_then(|id| EventId::new(id).ok()) else {
            return Ok(false);
        };

        self.repo.is_event_saved(&username, &event_id).map_err(|e| {
            error!("Failed to check saved event: {e}");
            ServiceError::Internal
        })
    }
}
