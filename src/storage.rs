use crate::config::atomic_rename;
use crate::error::{LoadError, StoreError};
use crate::model::{PetState, SaveRecord};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Key/value blob storage the pet is persisted into.
pub trait BlobStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;
    fn put(&mut self, key: &str, blob: &str) -> Result<(), StoreError>;
}

/// One `<key>.json` file per key inside a directory.
#[derive(Clone, Debug)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl BlobStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        match fs::read_to_string(self.path_for(key)) {
            Ok(s) => Ok(Some(s)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn put(&mut self, key: &str, blob: &str) -> Result<(), StoreError> {
        fs::create_dir_all(&self.dir)?;
        let path = self.path_for(key);
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, blob)?;
        atomic_rename(&tmp, &path)?;
        Ok(())
    }
}

/// In-process store for headless runs and tests.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    blobs: HashMap<String, String>,
    pub writes: usize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_blob(key: &str, blob: &str) -> Self {
        let mut s = Self::new();
        s.blobs.insert(key.to_string(), blob.to_string());
        s
    }
}

impl BlobStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.blobs.get(key).cloned())
    }

    fn put(&mut self, key: &str, blob: &str) -> Result<(), StoreError> {
        self.blobs.insert(key.to_string(), blob.to_string());
        self.writes += 1;
        Ok(())
    }
}

/// Loads the pet once and coalesces writes of the persisted subset.
#[derive(Clone, Debug)]
pub struct PersistenceManager {
    key: String,
    coalesce: Duration,
    dirty_since: Option<Duration>,
}

impl PersistenceManager {
    pub fn new(key: impl Into<String>, coalesce: Duration) -> Self {
        Self {
            key: key.into(),
            coalesce,
            dirty_since: None,
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Read the saved pet. Flags and the battle log always start fresh.
    pub fn load<S: BlobStore>(&self, store: &S) -> Result<PetState, LoadError> {
        let blob = store
            .get(&self.key)?
            .ok_or_else(|| LoadError::Missing(self.key.clone()))?;
        let record: SaveRecord = serde_json::from_str(&blob)?;
        let mut st = PetState::default();
        record.apply_to(&mut st);
        Ok(st)
    }

    /// Like [`load`](Self::load), falling back to a fresh pet on any failure.
    pub fn load_or_default<S: BlobStore>(&self, store: &S) -> PetState {
        match self.load(store) {
            Ok(st) => {
                log::info!("restored pet from '{}' (level {})", self.key, st.level);
                st
            }
            Err(LoadError::Missing(_)) => {
                log::info!("no save under '{}', starting fresh", self.key);
                PetState::default()
            }
            Err(e) => {
                log::warn!("could not restore pet: {e}; starting fresh");
                PetState::default()
            }
        }
    }

    /// Note a state change at clock time `now`. The first unflushed change starts the window.
    pub fn mark_dirty(&mut self, now: Duration) {
        self.dirty_since.get_or_insert(now);
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty_since.is_some()
    }

    /// Whether a coalesced write is owed at clock time `now`.
    pub fn flush_due(&self, now: Duration) -> bool {
        self.dirty_since
            .is_some_and(|since| now.saturating_sub(since) >= self.coalesce)
    }

    /// Write unconditionally and clear the dirty mark.
    pub fn save<S: BlobStore>(&mut self, store: &mut S, st: &PetState) -> Result<(), StoreError> {
        let blob = serde_json::to_string(&SaveRecord::from(st))?;
        store.put(&self.key, &blob)?;
        self.dirty_since = None;
        log::debug!("saved pet under '{}'", self.key);
        Ok(())
    }
}
