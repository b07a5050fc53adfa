//! Persistence-facing record types and application configuration.

pub mod config;
pub mod saved_event;
