use std::{error, fmt};

use indexmap::IndexMap;
use model::{record, LogEntry};
use serde_json::Value;
use utility::id::Id;

use crate::storage::{KeyValueStore, StorageError};

#[derive(Debug)]
pub enum StoreError {
    DuplicateId(Id<LogEntry>),
    Storage(StorageError),
    Encode(serde_json::Error),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DuplicateId(id) => write!(f, "an entry with id {} already exists", id),
            Self::Storage(why) => write!(f, "{}", why),
            Self::Encode(why) => write!(f, "could not encode entries: {}", why),
        }
    }
}

impl error::Error for StoreError {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match self {
            Self::DuplicateId(_) => None,
            Self::Storage(why) => Some(why),
            Self::Encode(why) => Some(why),
        }
    }
}

impl From<StorageError> for StoreError {
    fn from(why: StorageError) -> Self {
        Self::Storage(why)
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(why: serde_json::Error) -> Self {
        Self::Encode(why)
    }
}

/// All entries in display order, looked up by id.
#[derive(Debug, Default)]
pub struct EntryStore {
    entries: IndexMap<Id<LogEntry>, LogEntry>,
}

impl EntryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads the collection saved under `key`. Records that do not parse are
    /// skipped; an unreadable or malformed blob yields an empty store.
    pub fn load(storage: &dyn KeyValueStore, key: &str) -> Self {
        match storage.get(key) {
            Ok(Some(json)) => Self::from_json(&json),
            Ok(None) => Self::new(),
            Err(why) => {
                log::warn!("could not read saved entries, starting empty: {}", why);
                Self::new()
            }
        }
    }

    pub fn from_json(json: &str) -> Self {
        match serde_json::from_str::<Vec<Value>>(json) {
            Ok(records) => Self::from_records(records),
            Err(why) => {
                log::warn!("saved entries are not a JSON array, starting empty: {}", why);
                Self::new()
            }
        }
    }

    pub fn from_records(records: Vec<Value>) -> Self {
        let mut store = Self::new();
        for (index, value) in records.into_iter().enumerate() {
            match record::deserialize(value) {
                Ok(entry) => {
                    if let Err(why) = store.add(entry) {
                        log::warn!("dropping saved entry #{}: {}", index, why);
                    }
                }
                Err(why) => log::warn!("dropping saved entry #{}: {}", index, why),
            }
        }
        log::info!("loaded {} entries", store.len());
        store
    }

    pub fn to_json(&self) -> Result<String, StoreError> {
        let records = self.entries.values().map(record::serialize).collect::<Vec<_>>();
        Ok(serde_json::to_string(&records)?)
    }

    /// Writes the whole collection under `key`.
    pub fn save(&self, storage: &mut dyn KeyValueStore, key: &str) -> Result<(), StoreError> {
        storage.set(key, &self.to_json()?)?;
        log::debug!("saved {} entries", self.len());
        Ok(())
    }

    pub fn add(&mut self, entry: LogEntry) -> Result<&LogEntry, StoreError> {
        let id = entry.id().clone();
        if self.entries.contains_key(&id) {
            return Err(StoreError::DuplicateId(id));
        }
        let (index, _) = self.entries.insert_full(id, entry);
        Ok(&self.entries[index])
    }

    pub fn remove(&mut self, id: &Id<LogEntry>) -> Option<LogEntry> {
        self.entries.shift_remove(id)
    }

    pub fn get(&self, id: &Id<LogEntry>) -> Option<&LogEntry> {
        self.entries.get(id)
    }

    pub fn contains(&self, id: &Id<LogEntry>) -> bool {
        self.entries.contains_key(id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &LogEntry> {
        self.entries.values()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
