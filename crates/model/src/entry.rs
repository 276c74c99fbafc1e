use std::fmt;

use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use utility::id::Id;

use crate::{Coordinate, Route, Spot};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub enum EntryKind {
    Spot,
    Route,
}

impl fmt::Display for EntryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Spot => write!(f, "spot"),
            Self::Route => write!(f, "route"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum LogEntry {
    Spot(Spot),
    Route(Route),
}

impl LogEntry {
    pub fn id(&self) -> &Id<LogEntry> {
        match self {
            Self::Spot(spot) => spot.id(),
            Self::Route(route) => route.id(),
        }
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        match self {
            Self::Spot(spot) => spot.created_at(),
            Self::Route(route) => route.created_at(),
        }
    }

    pub fn kind(&self) -> EntryKind {
        match self {
            Self::Spot(_) => EntryKind::Spot,
            Self::Route(_) => EntryKind::Route,
        }
    }

    /// All vertices of the entry; a spot has exactly one.
    pub fn coordinates(&self) -> &[Coordinate] {
        match self {
            Self::Spot(spot) => std::slice::from_ref(spot.coordinate_ref()),
            Self::Route(route) => route.coordinates(),
        }
    }

    pub fn title(&self) -> &str {
        match self {
            Self::Spot(spot) => spot.title(),
            Self::Route(route) => route.title(),
        }
    }

    pub fn as_route(&self) -> Option<&Route> {
        match self {
            Self::Route(route) => Some(route),
            Self::Spot(_) => None,
        }
    }

    pub fn formatted_date(&self) -> String {
        self.created_at().format("%b %-d, %Y").to_string()
    }

    /// Text for the popup bound to the entry's map layer.
    pub fn popup_text(&self) -> String {
        match self {
            Self::Spot(spot) if spot.description().is_empty() => {
                format!("{} · {}", spot.title(), self.formatted_date())
            }
            Self::Spot(spot) => format!(
                "{} · {}\n{}",
                spot.title(),
                self.formatted_date(),
                spot.description()
            ),
            Self::Route(route) => format!(
                "{} · {}\n{} · {} · {}",
                route.title(),
                self.formatted_date(),
                route.formatted_distance(),
                route.formatted_duration(),
                route.formatted_pace()
            ),
        }
    }
}
