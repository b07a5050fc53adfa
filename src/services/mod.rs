pub mod errors;
pub mod identity;
pub mod save_event;

pub use errors::{ServiceError, ServiceResult};
pub use identity::{CurrentUserProvider, FixedUser, UserSession};
pub use save_event::{SaveEventOutput, SaveEventService};
