use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

use crate::domain::types::TypeConstraintError;

/// Mean earth radius used by the haversine formula, in kilometres.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

const LATITUDE_RANGE: (f64, f64) = (-90.0, 90.0);
const LONGITUDE_RANGE: (f64, f64) = (-180.0, 180.0);

/// Street address plus validated WGS84 coordinates.
///
/// Fields are private so every instance went through [`Location::new`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawLocation")]
pub struct Location {
    address: String,
    latitude: f64,
    longitude: f64,
}

#[derive(Deserialize)]
struct RawLocation {
    #[serde(default)]
    address: String,
    latitude: f64,
    longitude: f64,
}

impl TryFrom<RawLocation> for Location {
    type Error = TypeConstraintError;

    fn try_from(raw: RawLocation) -> Result<Self, Self::Error> {
        Self::new(raw.address, raw.latitude, raw.longitude)
    }
}

fn validate_coordinate(
    value: f64,
    (min, max): (f64, f64),
    field: &'static str,
) -> Result<f64, TypeConstraintError> {
    // NaN fails the range check as well.
    if (min..=max).contains(&value) {
        Ok(value)
    } else {
        Err(TypeConstraintError::OutOfRange { field, min, max })
    }
}

impl Location {
    /// Builds a location, trimming the address and rejecting out-of-range coordinates.
    pub fn new<S: Into<String>>(
        address: S,
        latitude: f64,
        longitude: f64,
    ) -> Result<Self, TypeConstraintError> {
        Ok(Self {
            address: address.into().trim().to_string(),
            latitude: validate_coordinate(latitude, LATITUDE_RANGE, "latitude")?,
            longitude: validate_coordinate(longitude, LONGITUDE_RANGE, "longitude")?,
        })
    }

    /// Location without an address.
    pub fn from_coordinates(latitude: f64, longitude: f64) -> Result<Self, TypeConstraintError> {
        Self::new(String::new(), latitude, longitude)
    }

    pub fn address(&self) -> &str {
        &self.address
    }

    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    pub fn longitude(&self) -> f64 {
        self.longitude
    }

    /// Great-circle distance to `other` in kilometres.
    ///
    /// Returns [`f64::MAX`] when there is nothing to measure against, so that
    /// callers sorting by distance push unknown locations to the end.
    pub fn calculate_distance(&self, other: Option<&Location>) -> f64 {
        let Some(other) = other else {
            return f64::MAX;
        };

        let lat1 = self.latitude.to_radians();
        let lat2 = other.latitude.to_radians();
        let d_lat = lat2 - lat1;
        let d_lon = (other.longitude - self.longitude).to_radians();

        let a = (d_lat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (d_lon / 2.0).sin().powi(2);
        let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

        EARTH_RADIUS_KM * c
    }
}

impl Display for Location {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Location{{address='{}', latitude={:.6}, longitude={:.6}}}",
            self.address, self.latitude, self.longitude
        )
    }
}
