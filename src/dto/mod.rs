//! Display-ready views of domain data for the presentation layer.

pub mod events;
