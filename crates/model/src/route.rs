use std::{error, fmt};

use chrono::{DateTime, Utc};
use utility::id::Id;

use crate::{coordinate::CoordinateError, non_blank, Coordinate, EntryBase, ExampleData, LogEntry};

pub const DEFAULT_ROUTE_TITLE: &str = "Untitled Route";

#[derive(Debug, Clone, PartialEq)]
pub enum RouteError {
    TooFewCoordinates(usize),
    InvalidCoordinate(usize, CoordinateError),
    InvalidDistance(f64),
}

impl fmt::Display for RouteError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TooFewCoordinates(count) => {
                write!(f, "a route needs at least 2 coordinates, got {}", count)
            }
            Self::InvalidCoordinate(index, why) => {
                write!(f, "route vertex {}: {}", index, why)
            }
            Self::InvalidDistance(distance) => {
                write!(f, "invalid route distance {}", distance)
            }
        }
    }
}

impl error::Error for RouteError {}

/// A drawn polyline with workout metadata.
///
/// `distance_km` is whatever the drawing session measured when the route was
/// finished. It is never recomputed from `coordinates`.
#[derive(Debug, Clone, PartialEq)]
pub struct Route {
    base: EntryBase,
    coordinates: Vec<Coordinate>,
    title: String,
    distance_km: f64,
    duration_min: u32,
    notes: String,
}

impl Route {
    pub fn create(
        coordinates: Vec<Coordinate>,
        distance_km: f64,
        title: Option<String>,
        duration_min: Option<u32>,
        notes: Option<String>,
    ) -> Result<Self, RouteError> {
        Self::from_parts(
            EntryBase::new(),
            coordinates,
            distance_km,
            title,
            duration_min,
            notes,
        )
    }

    pub(crate) fn from_parts(
        base: EntryBase,
        coordinates: Vec<Coordinate>,
        distance_km: f64,
        title: Option<String>,
        duration_min: Option<u32>,
        notes: Option<String>,
    ) -> Result<Self, RouteError> {
        if coordinates.len() < 2 {
            return Err(RouteError::TooFewCoordinates(coordinates.len()));
        }
        for (index, coordinate) in coordinates.iter().enumerate() {
            coordinate
                .validate()
                .map_err(|why| RouteError::InvalidCoordinate(index, why))?;
        }
        if !distance_km.is_finite() || distance_km < 0.0 {
            return Err(RouteError::InvalidDistance(distance_km));
        }
        Ok(Self {
            base,
            coordinates,
            title: non_blank(title).unwrap_or_else(|| DEFAULT_ROUTE_TITLE.to_owned()),
            distance_km,
            duration_min: duration_min.unwrap_or(0),
            notes: notes.unwrap_or_default(),
        })
    }

    pub fn id(&self) -> &Id<LogEntry> {
        self.base.id()
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.base.created_at()
    }

    pub fn coordinates(&self) -> &[Coordinate] {
        &self.coordinates
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn distance_km(&self) -> f64 {
        self.distance_km
    }

    pub fn duration_min(&self) -> u32 {
        self.duration_min
    }

    pub fn notes(&self) -> &str {
        &self.notes
    }

    /// Minutes per km, or 0 when distance or duration is missing.
    pub fn pace_min_per_km(&self) -> f64 {
        if self.distance_km > 0.0 && self.duration_min > 0 {
            self.duration_min as f64 / self.distance_km
        } else {
            0.0
        }
    }

    pub fn formatted_distance(&self) -> String {
        format!("{:.2} km", self.distance_km)
    }

    pub fn formatted_duration(&self) -> String {
        format!("{} min", self.duration_min)
    }

    pub fn formatted_pace(&self) -> String {
        format!("{:.1} min/km", self.pace_min_per_km())
    }
}

impl From<Route> for LogEntry {
    fn from(route: Route) -> Self {
        LogEntry::Route(route)
    }
}

impl ExampleData for Route {
    fn example_data() -> Self {
        Self {
            base: EntryBase::new(),
            coordinates: vec![
                Coordinate::new_unchecked(28.6, 77.2),
                Coordinate::new_unchecked(28.61, 77.21),
            ],
            title: "Morning run".to_owned(),
            distance_km: 1.5,
            duration_min: 15,
            notes: String::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_points() -> Vec<Coordinate> {
        vec![
            Coordinate::new_unchecked(28.6, 77.2),
            Coordinate::new_unchecked(28.61, 77.21),
        ]
    }

    #[test]
    fn formats_distance_and_pace() {
        let route = Route::create(two_points(), 1.5, None, Some(15), None).unwrap();
        assert_eq!(route.formatted_distance(), "1.50 km");
        assert_eq!(route.formatted_pace(), "10.0 min/km");
        assert_eq!(route.formatted_duration(), "15 min");
        assert_eq!(route.title(), DEFAULT_ROUTE_TITLE);
        assert_eq!(route.notes(), "");
    }

    #[test]
    fn pace_is_duration_over_distance() {
        let route = Route::create(two_points(), 10.0, None, Some(50), None).unwrap();
        assert_eq!(route.pace_min_per_km(), 5.0);
    }

    #[test]
    fn pace_without_distance_or_duration_is_zero() {
        let no_distance = Route::create(two_points(), 0.0, None, Some(30), None).unwrap();
        assert_eq!(no_distance.pace_min_per_km(), 0.0);
        let no_duration = Route::create(two_points(), 4.2, None, None, None).unwrap();
        assert_eq!(no_duration.duration_min(), 0);
        assert_eq!(no_duration.pace_min_per_km(), 0.0);
    }

    #[test]
    fn keeps_the_supplied_distance() {
        // far longer than the straight line between the points
        let route = Route::create(two_points(), 42.0, None, None, None).unwrap();
        assert_eq!(route.distance_km(), 42.0);
    }

    #[test]
    fn rejects_single_point() {
        let result = Route::create(
            vec![Coordinate::new_unchecked(0.0, 0.0)],
            0.0,
            None,
            None,
            None,
        );
        assert_eq!(result, Err(RouteError::TooFewCoordinates(1)));
    }

    #[test]
    fn rejects_negative_distance() {
        let result = Route::create(two_points(), -1.0, None, None, None);
        assert_eq!(result, Err(RouteError::InvalidDistance(-1.0)));
    }

    #[test]
    fn rejects_non_finite_vertices() {
        let mut coordinates = two_points();
        coordinates.push(Coordinate::new_unchecked(f64::NAN, 77.2));
        let result = Route::create(coordinates, 1.5, None, None, None);
        assert_eq!(
            result,
            Err(RouteError::InvalidCoordinate(2, CoordinateError::NonFinite))
        );
    }
}
