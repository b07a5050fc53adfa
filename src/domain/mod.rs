//! Domain entities and value objects, free of persistence concerns.

pub mod event;
pub mod location;
pub mod saved_event;
pub mod types;
