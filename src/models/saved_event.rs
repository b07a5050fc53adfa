use chrono::NaiveDateTime;
use csv::StringRecord;
use thiserror::Error;

use crate::domain::event::{Event, EventCategory};
use crate::domain::location::Location;
use crate::domain::saved_event::SavedEvent;
use crate::domain::types::{EventId, ImageUrl, TypeConstraintError, Username};

/// Column order of the saved-events file.
pub const HEADER: [&str; 10] = [
    "username",
    "eventId",
    "eventName",
    "category",
    "dateTime",
    "address",
    "latitude",
    "longitude",
    "imageUrl",
    "description",
];

const DATE_TIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f";
const DATE_TIME_FORMAT_MINUTES: &str = "%Y-%m-%dT%H:%M";

/// Reasons a persisted row cannot be turned back into a [`SavedEvent`].
#[derive(Debug, Error, PartialEq)]
pub enum RowError {
    #[error("expected {expected} columns, found {found}")]
    TooFewColumns { expected: usize, found: usize },
    #[error("{field} is not a number: {value:?}")]
    InvalidNumber { field: &'static str, value: String },
    #[error("invalid date/time: {0:?}")]
    InvalidDateTime(String),
    #[error(transparent)]
    Constraint(#[from] TypeConstraintError),
}

/// Flat, string-typed representation of one line of the saved-events file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavedEventRow {
    pub username: String,
    pub event_id: String,
    pub event_name: String,
    pub category: String,
    pub date_time: String,
    pub address: String,
    pub latitude: String,
    pub longitude: String,
    pub image_url: String,
    pub description: String,
}

impl SavedEventRow {
    /// Reads the ten leading columns of a record, trimming each field.
    pub fn from_record(record: &StringRecord) -> Result<Self, RowError> {
        if record.len() < HEADER.len() {
            return Err(RowError::TooFewColumns {
                expected: HEADER.len(),
                found: record.len(),
            });
        }
        let col = |idx: usize| record.get(idx).unwrap_or_default().trim().to_string();

        Ok(Self {
            username: col(0),
            event_id: col(1),
            event_name: col(2),
            category: col(3),
            date_time: col(4),
            address: col(5),
            latitude: col(6),
            longitude: col(7),
            image_url: col(8),
            description: col(9),
        })
    }

    /// Renders the row as a single file line, without the trailing newline.
    ///
    /// Free-text columns are always quoted; identifiers are quoted only when
    /// they contain a delimiter or a quote.
    pub fn to_line(&self) -> String {
        [
            quote_if_needed(&self.username),
            quote_if_needed(&self.event_id),
            quote(&self.event_name),
            self.category.clone(),
            self.date_time.clone(),
            quote(&self.address),
            self.latitude.clone(),
            self.longitude.clone(),
            quote(&self.image_url),
            quote(&self.description),
        ]
        .join(",")
    }
}

/// Doubles embedded quotes and flattens line breaks.
pub fn escape_field(value: &str) -> String {
    value
        .replace('"', "\"\"")
        .replace('\n', " ")
        .replace('\r', "")
}

fn quote(value: &str) -> String {
    format!("\"{}\"", escape_field(value))
}

fn quote_if_needed(value: &str) -> String {
    if value.contains([',', '"', '\n', '\r']) {
        quote(value)
    } else {
        value.to_string()
    }
}

fn parse_coordinate(value: &str, field: &'static str) -> Result<f64, RowError> {
    if value.is_empty() {
        return Ok(0.0);
    }
    value.parse::<f64>().map_err(|_| RowError::InvalidNumber {
        field,
        value: value.to_string(),
    })
}

/// Parses the timestamp column, accepting second or minute precision.
pub fn parse_date_time(value: &str) -> Result<NaiveDateTime, RowError> {
    NaiveDateTime::parse_from_str(value, DATE_TIME_FORMAT)
        .or_else(|_| NaiveDateTime::parse_from_str(value, DATE_TIME_FORMAT_MINUTES))
        .map_err(|_| RowError::InvalidDateTime(value.to_string()))
}

pub fn format_date_time(value: &NaiveDateTime) -> String {
    value.format(DATE_TIME_FORMAT).to_string()
}

impl TryFrom<SavedEventRow> for SavedEvent {
    type Error = RowError;

    fn try_from(row: SavedEventRow) -> Result<Self, Self::Error> {
        let latitude = parse_coordinate(&row.latitude, "latitude")?;
        let longitude = parse_coordinate(&row.longitude, "longitude")?;
        let location = Location::new(row.address.clone(), latitude, longitude)?;
        let image_url = if row.image_url.is_empty() {
            None
        } else {
            Some(ImageUrl::new(row.image_url)?)
        };

        Ok(Self {
            username: Username::new(row.username)?,
            event: Event {
                id: EventId::new(row.event_id)?,
                name: row.event_name,
                description: row.description,
                address: row.address,
                category: EventCategory::parse(&row.category),
                location,
                start_time: parse_date_time(&row.date_time)?,
                image_url,
            },
        })
    }
}

impl From<&SavedEvent> for SavedEventRow {
    fn from(saved: &SavedEvent) -> Self {
        let event = &saved.event;
        Self {
            username: saved.username.as_str().to_string(),
            event_id: event.id.as_str().to_string(),
            event_name: event.name.clone(),
            category: event.category.as_str().to_string(),
            date_time: format_date_time(&event.start_time),
            address: event.location.address().to_string(),
            latitude: event.location.latitude().to_string(),
            longitude: event.location.longitude().to_string(),
            image_url: event
                .image_url
                .as_ref()
                .map(|url| url.as_str().to_string())
                .unwrap_or_default(),
            description: event.description.clone(),
        }
    }
}
