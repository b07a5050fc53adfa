use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::convert::Infallible;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

use crate::domain::location::Location;
use crate::domain::types::{EventId, ImageUrl};

/// Closed set of event categories, mirroring the upstream event source segments.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EventCategory {
    Music,
    Sports,
    ArtsTheatre,
    Film,
    Family,
    Miscellaneous,
    #[default]
    Unknown,
}

impl EventCategory {
    pub const ALL: [EventCategory; 7] = [
        Self::Music,
        Self::Sports,
        Self::ArtsTheatre,
        Self::Film,
        Self::Family,
        Self::Miscellaneous,
        Self::Unknown,
    ];

    /// Canonical name used in persistence.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Music => "MUSIC",
            Self::Sports => "SPORTS",
            Self::ArtsTheatre => "ARTS_THEATRE",
            Self::Film => "FILM",
            Self::Family => "FAMILY",
            Self::Miscellaneous => "MISCELLANEOUS",
            Self::Unknown => "UNKNOWN",
        }
    }

    /// Human readable label.
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::Music => "Music",
            Self::Sports => "Sports",
            Self::ArtsTheatre => "Arts & Theatre",
            Self::Film => "Film",
            Self::Family => "Family",
            Self::Miscellaneous => "Miscellaneous",
            Self::Unknown => "Unknown",
        }
    }

    /// Maps free text onto the closed category set.
    ///
    /// Matching ignores case and surrounding whitespace, treats `-`, `&`, `/`
    /// and inner spaces as separators, and accepts a few common aliases.
    /// Anything unrecognised becomes [`EventCategory::Unknown`].
    pub fn parse(value: &str) -> Self {
        let normalized = value
            .trim()
            .to_ascii_uppercase()
            .split(|c: char| c == ' ' || c == '_' || c == '-' || c == '&' || c == '/')
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join("_");

        match normalized.as_str() {
            "MUSIC" | "CONCERT" | "CONCERTS" => Self::Music,
            "SPORTS" | "SPORT" => Self::Sports,
            "ARTS_THEATRE" | "ARTS_THEATER" | "ARTS" | "ART" | "THEATRE" | "THEATER" => {
                Self::ArtsTheatre
            }
            "FILM" | "FILMS" | "MOVIE" | "MOVIES" => Self::Film,
            "FAMILY" => Self::Family,
            "MISCELLANEOUS" | "MISC" | "OTHER" => Self::Miscellaneous,
            _ => Self::Unknown,
        }
    }
}

impl Display for EventCategory {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for EventCategory {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::parse(s))
    }
}

impl From<&str> for EventCategory {
    fn from(value: &str) -> Self {
        Self::parse(value)
    }
}

/// A discoverable event. Treated as an immutable value once built.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Event {
    pub id: EventId,
    pub name: String,
    pub description: String,
    pub address: String,
    pub category: EventCategory,
    pub location: Location,
    pub start_time: NaiveDateTime,
    pub image_url: Option<ImageUrl>,
}

impl Event {
    /// Whether `other` refers to the same event, regardless of field drift.
    pub fn same_event(&self, other: &Event) -> bool {
        self.id == other.id
    }
}
