//! Instance stores
//!
//! The registry is the single shared mutable resource in the system: every
//! launch, termination, and sweep goes through it. The store trait keeps
//! each operation atomic; the file-backed implementation holds an exclusive
//! lock across each read-modify-write and replaces the file by rename.

use std::collections::HashMap;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use fs2::FileExt;
use tracing::debug;

use sync_core::InstanceRecord;

use crate::error::{Error, Result};

/// Registry file name within the state directory
const REGISTRY_FILE: &str = "instances.json";
/// Lock file guarding registry mutations
const LOCK_FILE: &str = "instances.lock";

/// Typed record store keyed by group name
///
/// Every call is atomic with respect to other calls on the same store.
pub trait InstanceStore: Send + Sync {
    /// Fetch the record for a group, if one is tracked
    fn get(&self, name: &str) -> Result<Option<InstanceRecord>>;
    /// Insert or replace the record for `record.name`
    fn put(&self, record: InstanceRecord) -> Result<()>;
    /// Delete and return the record for a group
    fn remove(&self, name: &str) -> Result<Option<InstanceRecord>>;
    /// Snapshot of all tracked records, in name order
    fn list(&self) -> Result<Vec<InstanceRecord>>;
}

/// JSON-file-backed store under a state directory
///
/// Records live in a single document so that a snapshot read is one read.
/// Mutations take the lock file exclusively, rewrite to a temp file, and
/// rename over the original.
#[derive(Debug)]
pub struct FileStore {
    registry_path: PathBuf,
    lock_path: PathBuf,
}

impl FileStore {
    /// Create a store rooted at the given state directory.
    ///
    /// The directory is created if missing.
    pub fn open(state_dir: &Path) -> Result<Self> {
        fs::create_dir_all(state_dir)?;
        Ok(Self {
            registry_path: state_dir.join(REGISTRY_FILE),
            lock_path: state_dir.join(LOCK_FILE),
        })
    }

    /// Acquire the registry lock for the duration of one operation
    fn lock(&self) -> Result<fs::File> {
        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(false)
            .open(&self.lock_path)?;
        file.lock_exclusive().map_err(|_| Error::LockFailed {
            path: self.lock_path.clone(),
        })?;
        Ok(file)
    }

    fn load(&self) -> Result<HashMap<String, InstanceRecord>> {
        if !self.registry_path.exists() {
            return Ok(HashMap::new());
        }
        let content = fs::read_to_string(&self.registry_path)?;
        if content.trim().is_empty() {
            return Ok(HashMap::new());
        }
        serde_json::from_str(&content).map_err(|source| Error::InvalidFile {
            path: self.registry_path.clone(),
            source,
        })
    }

    fn save(&self, state: &HashMap<String, InstanceRecord>) -> Result<()> {
        let content = serde_json::to_string_pretty(state)?;

        // Same directory as the target so the rename stays on one filesystem
        let temp_path = self.registry_path.with_extension(format!("tmp.{}", std::process::id()));
        let mut temp_file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(&temp_path)?;
        temp_file.write_all(content.as_bytes())?;
        temp_file.sync_all()?;
        drop(temp_file);

        fs::rename(&temp_path, &self.registry_path)?;
        Ok(())
    }
}

impl InstanceStore for FileStore {
    fn get(&self, name: &str) -> Result<Option<InstanceRecord>> {
        let guard = self.lock()?;
        let state = self.load()?;
        let _ = FileExt::unlock(&guard);
        Ok(state.get(name).cloned())
    }

    fn put(&self, record: InstanceRecord) -> Result<()> {
        let guard = self.lock()?;
        let mut state = self.load()?;
        debug!(name = %record.name, pid = record.pid, "recording instance");
        state.insert(record.name.clone(), record);
        let result = self.save(&state);
        let _ = FileExt::unlock(&guard);
        result
    }

    fn remove(&self, name: &str) -> Result<Option<InstanceRecord>> {
        let guard = self.lock()?;
        let mut state = self.load()?;
        let removed = state.remove(name);
        if removed.is_some() {
            debug!(name, "removing instance record");
            self.save(&state)?;
        }
        let _ = FileExt::unlock(&guard);
        Ok(removed)
    }

    fn list(&self) -> Result<Vec<InstanceRecord>> {
        let guard = self.lock()?;
        let state = self.load()?;
        let _ = FileExt::unlock(&guard);
        let mut records: Vec<_> = state.into_values().collect();
        records.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(records)
    }
}

/// In-memory store for tests and embedders that manage persistence
/// themselves
#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: Mutex<HashMap<String, InstanceRecord>>,
}

impl MemoryStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    fn entries(&self) -> std::sync::MutexGuard<'_, HashMap<String, InstanceRecord>> {
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl InstanceStore for MemoryStore {
    fn get(&self, name: &str) -> Result<Option<InstanceRecord>> {
        Ok(self.entries().get(name).cloned())
    }

    fn put(&self, record: InstanceRecord) -> Result<()> {
        self.entries().insert(record.name.clone(), record);
        Ok(())
    }

    fn remove(&self, name: &str) -> Result<Option<InstanceRecord>> {
        Ok(self.entries().remove(name))
    }

    fn list(&self) -> Result<Vec<InstanceRecord>> {
        let mut records: Vec<_> = self.entries().values().cloned().collect();
        records.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(records)
    }
}
