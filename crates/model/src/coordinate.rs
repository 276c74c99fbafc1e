use std::{error, fmt};

use schemars::{gen::SchemaGenerator, schema::Schema, JsonSchema};
use serde::{de::Error as DeError, Deserialize, Deserializer, Serialize, Serializer};
use utility::geo;

#[derive(Debug, Clone, PartialEq)]
pub enum CoordinateError {
    NonFinite,
    LatitudeOutOfRange(f64),
    LongitudeOutOfRange(f64),
}

impl fmt::Display for CoordinateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NonFinite => write!(f, "coordinate is not finite"),
            Self::LatitudeOutOfRange(lat) => {
                write!(f, "latitude {} is outside [-90, 90]", lat)
            }
            Self::LongitudeOutOfRange(lng) => {
                write!(f, "longitude {} is outside [-180, 180]", lng)
            }
        }
    }
}

impl error::Error for CoordinateError {}

/// A point in decimal degrees. Persisted as a `[latitude, longitude]` pair.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinate {
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, CoordinateError> {
        if !latitude.is_finite() || !longitude.is_finite() {
            return Err(CoordinateError::NonFinite);
        }
        if !(-90.0..=90.0).contains(&latitude) {
            return Err(CoordinateError::LatitudeOutOfRange(latitude));
        }
        if !(-180.0..=180.0).contains(&longitude) {
            return Err(CoordinateError::LongitudeOutOfRange(longitude));
        }
        Ok(Self {
            latitude,
            longitude,
        })
    }

    pub const fn new_unchecked(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Runs the checks of `new` on an already built value, e.g. one made with
    /// `new_unchecked` or by setting fields directly.
    pub fn validate(&self) -> Result<(), CoordinateError> {
        Self::new(self.latitude, self.longitude).map(|_| ())
    }

    pub fn as_tuple(&self) -> (f64, f64) {
        (self.latitude, self.longitude)
    }

    pub fn distance_to(&self, other: &Coordinate) -> f64 {
        point_distance_km(*self, *other)
    }
}

impl From<Coordinate> for (f64, f64) {
    fn from(coordinate: Coordinate) -> Self {
        coordinate.as_tuple()
    }
}

impl Serialize for Coordinate {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        [self.latitude, self.longitude].serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Coordinate {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let [latitude, longitude] = <[f64; 2]>::deserialize(deserializer)?;
        Coordinate::new(latitude, longitude).map_err(D::Error::custom)
    }
}

impl JsonSchema for Coordinate {
    fn schema_name() -> String {
        "Coordinate".to_owned()
    }

    fn json_schema(gen: &mut SchemaGenerator) -> Schema {
        <[f64; 2]>::json_schema(gen)
    }
}

/// Great-circle distance in km.
pub fn point_distance_km(a: Coordinate, b: Coordinate) -> f64 {
    geo::haversine_distance(a.latitude, a.longitude, b.latitude, b.longitude)
}

/// Length in km of the polyline through `points`, 0 for fewer than two.
pub fn path_length_km(points: &[Coordinate]) -> f64 {
    let pairs = points.iter().map(Coordinate::as_tuple).collect::<Vec<_>>();
    geo::path_length(&pairs)
}
