use std::{collections::HashMap, error, fmt, io};

#[derive(Debug)]
pub enum StorageError {
    Io(io::Error),
    Other(Box<dyn error::Error + Send + Sync>),
}

impl StorageError {
    pub fn other<T: error::Error + Send + Sync + 'static>(why: T) -> Self {
        Self::Other(Box::new(why))
    }
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(why) => write!(f, "storage i/o failed: {}", why),
            Self::Other(why) => write!(f, "storage failed: {}", why),
        }
    }
}

impl error::Error for StorageError {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match self {
            Self::Io(why) => Some(why),
            Self::Other(why) => Some(why.as_ref()),
        }
    }
}

impl From<io::Error> for StorageError {
    fn from(why: io::Error) -> Self {
        Self::Io(why)
    }
}

pub type Result<T> = std::result::Result<T, StorageError>;

/// A string blob store addressed by fixed keys, in the manner of browser
/// local storage.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&mut self, key: &str, value: &str) -> Result<()>;
    fn remove(&mut self, key: &str) -> Result<()>;
}

#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    values: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_value(key: &str, value: &str) -> Self {
        let mut store = Self::new();
        store.values.insert(key.to_owned(), value.to_owned());
        store
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.values.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.values.insert(key.to_owned(), value.to_owned());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        self.values.remove(key);
        Ok(())
    }
}
