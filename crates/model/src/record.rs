//! Plain-data form of entries as they are persisted: a JSON object per entry,
//! tagged by `type`.

use std::{error, fmt};

use chrono::{DateTime, Utc};
use schemars::{schema::RootSchema, schema_for, JsonSchema};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use utility::id::Id;

use crate::{
    route::RouteError, Coordinate, EntryBase, EntryKind, LogEntry, Route, Spot,
};

#[derive(Debug)]
pub enum RecordError {
    MissingType,
    UnknownType(String),
    Malformed(serde_json::Error),
    Invalid(RouteError),
}

impl fmt::Display for RecordError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingType => write!(f, "record has no `type`"),
            Self::UnknownType(kind) => write!(f, "unknown entry type `{}`", kind),
            Self::Malformed(why) => write!(f, "malformed record: {}", why),
            Self::Invalid(why) => write!(f, "invalid record: {}", why),
        }
    }
}

impl error::Error for RecordError {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match self {
            Self::Malformed(why) => Some(why),
            Self::Invalid(why) => Some(why),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for RecordError {
    fn from(why: serde_json::Error) -> Self {
        Self::Malformed(why)
    }
}

impl From<RouteError> for RecordError {
    fn from(why: RouteError) -> Self {
        Self::Invalid(why)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum LogRecord {
    #[serde(rename_all = "camelCase")]
    Spot {
        id: Id<LogEntry>,
        #[serde(with = "utility::serde::timestamp")]
        #[schemars(schema_with = "utility::serde::timestamp::schema")]
        created_at: DateTime<Utc>,
        coordinates: Coordinate,
        #[serde(default)]
        title: String,
        #[serde(default)]
        description: String,
    },
    #[serde(rename_all = "camelCase")]
    Route {
        id: Id<LogEntry>,
        #[serde(with = "utility::serde::timestamp")]
        #[schemars(schema_with = "utility::serde::timestamp::schema")]
        created_at: DateTime<Utc>,
        coordinates: Vec<Coordinate>,
        #[serde(default)]
        title: String,
        distance_km: f64,
        #[serde(default)]
        duration_min: u32,
        #[serde(default)]
        notes: String,
    },
}

impl LogRecord {
    pub fn kind(&self) -> EntryKind {
        match self {
            Self::Spot { .. } => EntryKind::Spot,
            Self::Route { .. } => EntryKind::Route,
        }
    }
}

impl From<&LogEntry> for LogRecord {
    fn from(entry: &LogEntry) -> Self {
        match entry {
            LogEntry::Spot(spot) => LogRecord::Spot {
                id: spot.id().clone(),
                created_at: spot.created_at(),
                coordinates: spot.coordinate(),
                title: spot.title().to_owned(),
                description: spot.description().to_owned(),
            },
            LogEntry::Route(route) => LogRecord::Route {
                id: route.id().clone(),
                created_at: route.created_at(),
                coordinates: route.coordinates().to_vec(),
                title: route.title().to_owned(),
                distance_km: route.distance_km(),
                duration_min: route.duration_min(),
                notes: route.notes().to_owned(),
            },
        }
    }
}

impl TryFrom<LogRecord> for LogEntry {
    type Error = RecordError;

    fn try_from(record: LogRecord) -> Result<Self, Self::Error> {
        let entry = match record {
            LogRecord::Spot {
                id,
                created_at,
                coordinates,
                title,
                description,
            } => LogEntry::Spot(Spot::from_parts(
                EntryBase::restore(id, created_at),
                coordinates,
                Some(title),
                Some(description),
            )),
            LogRecord::Route {
                id,
                created_at,
                coordinates,
                title,
                distance_km,
                duration_min,
                notes,
            } => LogEntry::Route(Route::from_parts(
                EntryBase::restore(id, created_at),
                coordinates,
                distance_km,
                Some(title),
                Some(duration_min),
                Some(notes),
            )?),
        };
        Ok(entry)
    }
}

pub fn serialize(entry: &LogEntry) -> Value {
    // a record is plain strings and numbers, so this cannot fail
    serde_json::to_value(LogRecord::from(entry)).unwrap_or(Value::Null)
}

/// Restores an entry, keeping its persisted `id` and `createdAt`.
pub fn deserialize(value: Value) -> Result<LogEntry, RecordError> {
    match value.get("type").and_then(Value::as_str) {
        Some("spot") | Some("route") => {}
        Some(other) => return Err(RecordError::UnknownType(other.to_owned())),
        None => return Err(RecordError::MissingType),
    }
    let record: LogRecord = serde_json::from_value(value)?;
    LogEntry::try_from(record)
}

/// Schema of the persisted collection, an array of records.
pub fn schema() -> RootSchema {
    schema_for!(Vec<LogRecord>)
}
