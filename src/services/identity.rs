use std::sync::Mutex;

use crate::domain::types::Username;

/// Supplies the identity of the user the application is acting for.
pub trait CurrentUserProvider {
    /// The logged-in user, or `None` when nobody is authenticated.
    fn current_username(&self) -> Option<Username>;
}

impl<T: CurrentUserProvider + ?Sized> CurrentUserProvider for &T {
    fn current_username(&self) -> Option<Username> {
        (**self).current_username()
    }
}

/// Identity fixed at construction, e.g. taken from configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FixedUser(pub Option<Username>);

impl FixedUser {
    pub fn new(username: Username) -> Self {
        Self(Some(username))
    }

    pub fn anonymous() -> Self {
        Self(None)
    }
}

impl CurrentUserProvider for FixedUser {
    fn current_username(&self) -> Option<Username> {
        self.0.clone()
    }
}

/// Mutable login session shared between the login flow and the services.
#[derive(Debug, Default)]
pub struct UserSession {
    current: Mutex<Option<Username>>,
}

impl UserSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn login(&self, username: Username) {
        log::info!("User {username} logged in");
        *self.lock() = Some(username);
    }

    pub fn logout(&self) {
        if let Some(previous) = self.lock().take() {
            log::info!("User {previous} logged out");
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Option<Username>> {
        // An Option<Username> cannot be left half-written by a panicking holder.
        self.current
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

impl CurrentUserProvider for UserSession {
    fn current_username(&self) -> Option<Username> {
        self.lock().clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_user_reports_configured_identity() {
        let alice = Username::new("alice").unwrap();
        assert_eq!(FixedUser::new(alice.clone()).current_username(), Some(alice));
        assert_eq!(FixedUser::anonymous().current_username(), None);
    }

    #[test]
    fn session_tracks_login_and_logout() {
        let session = UserSession::new();
        assert_eq!(session.current_username(), None);

        session.login(Username::new("bob").unwrap());
        assert_eq!(session.current_username().unwrap(), "bob");

        session.logout();
        assert_eq!(session.current_username(), None);
    }
}
