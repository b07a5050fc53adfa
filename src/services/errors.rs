use thiserror::Error;

/// Failures reported by the service layer.
///
/// The `Display` text is the message shown to the user.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ServiceError {
    /// The caller asked to save without selecting an event.
    #[error("No Event Found")]
    NoEventFound,
    /// The current user has already saved this event.
    #[error("Event already saved")]
    AlreadySaved,
    /// No user is logged in.
    #[error("No user is logged in")]
    NotAuthenticated,
    /// An unexpected internal error occurred.
    #[error("internal error")]
    Internal,
}

/// Convenient alias for results returned from service functions.
pub type ServiceResult<T> = Result<T, ServiceError>;
