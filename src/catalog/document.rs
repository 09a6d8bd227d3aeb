//! A single JSON collection file
//!
//! Handles the two on-disk shapes (bare array or `{"<key>": [...]}`) and keeps
//! a snapshot of the last parsed contents keyed by the file's modification time.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::SystemTime;

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::error::{Result, StoreError};

/// How the collection is laid out on disk
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Envelope {
    /// `[ ... ]`
    Bare,
    /// `{ "<key>": [ ... ] }`
    Wrapped,
}

/// Raw result of reading the file
pub(crate) enum Contents<T> {
    /// File missing or zero bytes long
    Empty { modified: Option<SystemTime> },
    Parsed { modified: SystemTime, items: Vec<T> },
}

struct Snapshot<T> {
    modified: SystemTime,
    items: Arc<Vec<T>>,
}

pub(crate) struct JsonDocument<T> {
    path: PathBuf,
    key: &'static str,
    snapshot: Mutex<Option<Snapshot<T>>>,
}

impl<T> JsonDocument<T>
where
    T: Serialize + DeserializeOwned,
{
    pub fn new(path: impl Into<PathBuf>, key: &'static str) -> Self {
        Self {
            path: path.into(),
            key,
            snapshot: Mutex::new(None),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn modified(&self) -> Option<SystemTime> {
        fs::metadata(&self.path).and_then(|m| m.modified()).ok()
    }

    fn lock(&self) -> MutexGuard<'_, Option<Snapshot<T>>> {
        self.snapshot.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// The cached items, if the file has not changed since they were read
    pub fn cached(&self) -> Option<Arc<Vec<T>>> {
        let modified = self.modified()?;
        match self.lock().as_ref() {
            Some(snapshot) if snapshot.modified == modified => Some(Arc::clone(&snapshot.items)),
            _ => None,
        }
    }

    /// Cache freshly read items under the modification time they were read at
    pub fn remember(&self, modified: SystemTime, items: Vec<T>) -> Arc<Vec<T>> {
        let items = Arc::new(items);
        *self.lock() = Some(Snapshot {
            modified,
            items: Arc::clone(&items),
        });
        items
    }

    pub fn invalidate(&self) {
        *self.lock() = None;
    }

    /// Read and parse the file, bypassing the cache.
    ///
    /// Malformed content is reported as `StoreError::Json`.
    pub fn read(&self) -> Result<Contents<T>> {
        // Capture the timestamp before the contents so a concurrent write is
        // seen as a change on the next read.
        let modified = self.modified();

        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Ok(Contents::Empty { modified: None });
            }
            Err(source) => {
                return Err(StoreError::Read {
                    path: self.path.clone(),
                    source,
                });
            }
        };

        if content.is_empty() {
            return Ok(Contents::Empty { modified });
        }

        let items = parse_collection(&content, self.key)?;
        Ok(Contents::Parsed {
            modified: modified.unwrap_or_else(SystemTime::now),
            items,
        })
    }

    /// Shape of the file currently on disk; anything unreadable counts as bare
    pub fn envelope(&self) -> Envelope {
        let Ok(content) = fs::read_to_string(&self.path) else {
            return Envelope::Bare;
        };
        match serde_json::from_str::<Value>(&content) {
            Ok(Value::Object(map)) if map.contains_key(self.key) => Envelope::Wrapped,
            _ => Envelope::Bare,
        }
    }

    /// Replace the whole file, keeping whichever envelope it already had.
    ///
    /// The document is fully serialized before the file is opened, so a
    /// serialization failure leaves the existing file untouched.
    pub fn write(&self, items: &[T]) -> Result<()> {
        self.invalidate();

        let content = match self.envelope() {
            Envelope::Bare => serde_json::to_string_pretty(items)?,
            Envelope::Wrapped => {
                let mut map = Map::new();
                map.insert(self.key.to_string(), serde_json::to_value(items)?);
                serde_json::to_string_pretty(&Value::Object(map))?
            }
        };

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|source| StoreError::Write {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        fs::write(&self.path, content).map_err(|source| StoreError::Write {
            path: self.path.clone(),
            source,
        })
    }
}

/// Parse either `[...]` or `{"<key>": [...]}` into typed records
fn parse_collection<T: DeserializeOwned>(content: &str, key: &str) -> Result<Vec<T>> {
    let value: Value = serde_json::from_str(content)?;
    let list = match value {
        Value::Object(mut map) if map.contains_key(key) => map.remove(key).unwrap_or(Value::Null),
        other => other,
    };
    Ok(serde_json::from_value(list)?)
}
