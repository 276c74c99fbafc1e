use chrono::{DateTime, SubsecRound as _, Utc};
use utility::id::{HasId, Id};

pub mod coordinate;
pub mod entry;
pub mod record;
pub mod route;
pub mod spot;

pub use coordinate::{path_length_km, point_distance_km, Coordinate};
pub use entry::{EntryKind, LogEntry};
pub use route::Route;
pub use spot::Spot;

pub trait ExampleData {
    fn example_data() -> Self;
}

/// Identity shared by every entry variant. Set once at construction.
#[derive(Debug, Clone, PartialEq)]
pub struct EntryBase {
    id: Id<LogEntry>,
    created_at: DateTime<Utc>,
}

impl EntryBase {
    /// A new identity stamped with the current time. The timestamp is cut to
    /// milliseconds, which is all the persisted form keeps.
    pub fn new() -> Self {
        Self {
            id: Id::generate(),
            created_at: Utc::now().trunc_subsecs(3),
        }
    }

    pub fn restore(id: Id<LogEntry>, created_at: DateTime<Utc>) -> Self {
        Self { id, created_at }
    }

    pub fn id(&self) -> &Id<LogEntry> {
        &self.id
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

impl Default for EntryBase {
    fn default() -> Self {
        Self::new()
    }
}

impl HasId for LogEntry {
    type IdType = String;
}

/// Returns the trimmed text, or `None` when nothing is left.
pub(crate) fn non_blank(text: Option<String>) -> Option<String> {
    text.map(|text| text.trim().to_owned())
        .filter(|text| !text.is_empty())
}
