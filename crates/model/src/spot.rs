use chrono::{DateTime, Utc};
use utility::id::Id;

use crate::{non_blank, Coordinate, EntryBase, ExampleData, LogEntry};

pub const DEFAULT_SPOT_TITLE: &str = "Untitled Spot";

/// A single marked location.
#[derive(Debug, Clone, PartialEq)]
pub struct Spot {
    base: EntryBase,
    coordinate: Coordinate,
    title: String,
    description: String,
}

impl Spot {
    pub fn create(
        coordinate: Coordinate,
        title: Option<String>,
        description: Option<String>,
    ) -> Self {
        Self::from_parts(EntryBase::new(), coordinate, title, description)
    }

    pub(crate) fn from_parts(
        base: EntryBase,
        coordinate: Coordinate,
        title: Option<String>,
        description: Option<String>,
    ) -> Self {
        Self {
            base,
            coordinate,
            title: non_blank(title).unwrap_or_else(|| DEFAULT_SPOT_TITLE.to_owned()),
            description: description.unwrap_or_default(),
        }
    }

    pub fn id(&self) -> &Id<LogEntry> {
        self.base.id()
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.base.created_at()
    }

    pub fn coordinate(&self) -> Coordinate {
        self.coordinate
    }

    pub(crate) fn coordinate_ref(&self) -> &Coordinate {
        &self.coordinate
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn description(&self) -> &str {
        &self.description
    }
}

impl From<Spot> for LogEntry {
    fn from(spot: Spot) -> Self {
        LogEntry::Spot(spot)
    }
}

impl ExampleData for Spot {
    fn example_data() -> Self {
        Spot::create(
            Coordinate::new_unchecked(28.6129, 77.2295),
            Some("India Gate".to_owned()),
            Some("Evening stretch before the loop.".to_owned()),
        )
    }
}
