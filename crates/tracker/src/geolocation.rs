use std::{error, fmt};

use model::Coordinate;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GeolocationError {
    Denied,
    Unavailable,
    Timeout,
}

impl fmt::Display for GeolocationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Denied => write!(f, "location permission denied"),
            Self::Unavailable => write!(f, "location unavailable"),
            Self::Timeout => write!(f, "location request timed out"),
        }
    }
}

impl error::Error for GeolocationError {}

pub trait Geolocation {
    fn current_position(&self) -> Result<Coordinate, GeolocationError>;
}

/// A position source that always answers the same way.
#[derive(Debug, Clone, Copy)]
pub struct FixedPosition(pub Result<Coordinate, GeolocationError>);

impl Geolocation for FixedPosition {
    fn current_position(&self) -> Result<Coordinate, GeolocationError> {
        self.0
    }
}

/// The user's position, or `fallback` when it cannot be determined.
pub fn resolve_center(geolocation: &dyn Geolocation, fallback: Coordinate) -> Coordinate {
    match geolocation.current_position() {
        Ok(position) => position,
        Err(why) => {
            log::warn!(
                "{}, centering on {:.4},{:.4}",
                why,
                fallback.latitude,
                fallback.longitude
            );
            fallback
        }
    }
}
