//! Persisted key-value store backing client-local table state.
//!
//! Pending edits (and any other per-table client state) must survive a page
//! reload, so the buffer writes through an injected [`KvStore`] on every
//! mutation instead of living in an ambient global. The file-backed
//! implementation keeps one JSON document per key inside a state directory.

use std::collections::HashMap;
use std::io;
use std::path::PathBuf;

use parking_lot::RwLock;

use crate::error::{Error, Result};

/// A persisted key-value store, injected into table controllers.
///
/// Implementations load on init and save on mutation; keys are scoped per
/// logical table by the caller so two tables' state never collides.
pub trait KvStore: Send + Sync {
    /// Loads the value stored under a key, or `None` when absent.
    fn load(&self, key: &str) -> Result<Option<String>>;

    /// Stores a value under a key, replacing any previous value.
    fn save(&self, key: &str, raw: &str) -> Result<()>;

    /// Removes a key; removing an absent key is not an error.
    fn remove(&self, key: &str) -> Result<()>;
}

/// File-backed store: one `<key>.json` file per key inside a directory.
#[derive(Debug, Clone)]
pub struct FileKvStore {
    dir: PathBuf,
}

impl FileKvStore {
    /// Opens (creating if needed) a store rooted at the given directory.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    /// Maps a logical key to a file path.
    ///
    /// Keys may contain separators (e.g. `pending_edits/policies`), so the
    /// file name is an escaped form keeping the layout to a single directory:
    /// alphanumerics and `-` pass through, `_` becomes `__`, every other byte
    /// becomes `_` plus two hex digits. The escaping is injective, so two
    /// distinct keys never share a file.
    fn path_for(&self, key: &str) -> PathBuf {
        let mut name = String::with_capacity(key.len() + 8);
        for byte in key.bytes() {
            match byte {
                b'_' => name.push_str("__"),
                b if b.is_ascii_alphanumeric() || b == b'-' => name.push(char::from(b)),
                b => {
                    name.push('_');
                    name.push_str(&format!("{b:02x}"));
                }
            }
        }
        self.dir.join(format!("{name}.json"))
    }
}

impl KvStore for FileKvStore {
    fn load(&self, key: &str) -> Result<Option<String>> {
        match std::fs::read_to_string(self.path_for(key)) {
            Ok(raw) => Ok(Some(raw)),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(Error::Storage(format!("reading '{key}': {err}"))),
        }
    }

    fn save(&self, key: &str, raw: &str) -> Result<()> {
        std::fs::write(self.path_for(key), raw)
            .map_err(|err| Error::Storage(format!("writing '{key}': {err}")))
    }

    fn remove(&self, key: &str) -> Result<()> {
        match std::fs::remove_file(self.path_for(key)) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(Error::Storage(format!("removing '{key}': {err}"))),
        }
    }
}

/// In-memory store for tests and ephemeral sessions.
#[derive(Debug, Default)]
pub struct MemoryKvStore {
    entries: RwLock<HashMap<String, String>>,
}

impl MemoryKvStore {
    /// Creates an empty in-memory store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl KvStore for MemoryKvStore {
    fn load(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.read().get(key).cloned())
    }

    fn save(&self, key: &str, raw: &str) -> Result<()> {
        self.entries.write().insert(key.to_string(), raw.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.entries.write().remove(key);
        Ok(())
    }
}
