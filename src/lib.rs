//! Core library for the event-discovery application.
//!
//! Users browse local events and bookmark favorites. This crate exposes the
//! domain entities, the saved-events repositories (volatile and CSV-backed),
//! the save/unsave service and the presentation DTOs used by the front end.

#[cfg(feature = "data")]
pub mod domain;
#[cfg(feature = "data")]
pub mod dto;
#[cfg(feature = "data")]
pub mod models;
#[cfg(feature = "data")]
pub mod repository;
#[cfg(feature = "data")]
pub mod services;
