//! Durable `KeyValueStore` backed by one file per key.

use std::{
    env, fs, io,
    path::{Path, PathBuf},
};

use tracker::storage::{KeyValueStore, Result};

pub const DEFAULT_DATA_DIR: &str = "./data";

pub struct StorageConfig {
    pub data_dir: PathBuf,
}

impl StorageConfig {
    pub fn from_env() -> Self {
        let data_dir = env::var("MAPLOG_DATA_DIR")
            .ok()
            .filter(|dir| !dir.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_DATA_DIR.to_owned());
        Self {
            data_dir: PathBuf::from(data_dir),
        }
    }
}

#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Opens the store, creating the directory if needed.
    pub fn open(config: StorageConfig) -> io::Result<Self> {
        fs::create_dir_all(&config.data_dir)?;
        log::debug!("file store at {}", config.data_dir.display());
        Ok(Self {
            dir: config.data_dir,
        })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", file_name(key)))
    }
}

/// Maps a key onto a safe file name. Anything outside `[A-Za-z0-9._-]`
/// becomes `_`, and a leading dot is escaped so keys never name hidden or
/// parent entries.
fn file_name(key: &str) -> String {
    let name: String = key
        .chars()
        .map(|c| match c {
            'a'..='z' | 'A'..='Z' | '0'..='9' | '.' | '-' | '_' => c,
            _ => '_',
        })
        .collect();
    match name.strip_prefix('.') {
        Some(rest) => format!("_{}", rest),
        None if name.is_empty() => "_".to_owned(),
        None => name,
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        match fs::read_to_string(self.path(key)) {
            Ok(value) => Ok(Some(value)),
            Err(why) if why.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(why) => Err(why.into()),
        }
    }

    /// Writes to a sibling temp file first and renames it over the target,
    /// so a crash mid-write leaves the previous value intact.
    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let path = self.path(key);
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, value)?;
        fs::rename(&tmp, &path)?;
        log::trace!("wrote {} bytes to {}", value.len(), path.display());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        match fs::remove_file(self.path(key)) {
            Err(why) if why.kind() != io::ErrorKind::NotFound => Err(why.into()),
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store(dir: &Path) -> FileStore {
        FileStore::open(StorageConfig {
            data_dir: dir.join("nested"),
        })
        .unwrap()
    }

    #[test]
    fn sanitizes_keys() {
        assert_eq!(file_name("maplog.entries"), "maplog.entries");
        assert_eq!(file_name("../etc/passwd"), "_._etc_passwd");
        assert_eq!(file_name("a b/c"), "a_b_c");
        assert_eq!(file_name(""), "_");
    }

    #[test]
    fn reads_back_what_was_written() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = store(dir.path());
        assert_eq!(store.get("maplog.entries").unwrap(), None);

        store.set("maplog.entries", "[]").unwrap();
        store.set("maplog.entries", "[1]").unwrap();
        assert_eq!(store.get("maplog.entries").unwrap().as_deref(), Some("[1]"));
        assert!(!store.path("maplog.entries").with_extension("json.tmp").exists());
    }

    #[test]
    fn remove_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = store(dir.path());
        store.set("k", "v").unwrap();
        store.remove("k").unwrap();
        store.remove("k").unwrap();
        assert_eq!(store.get("k").unwrap(), None);
    }

    #[test]
    fn survives_reopening() {
        let dir = tempfile::tempdir().unwrap();
        store(dir.path()).set("k", "v").unwrap();
        assert_eq!(store(dir.path()).get("k").unwrap().as_deref(), Some("v"));
    }
}
