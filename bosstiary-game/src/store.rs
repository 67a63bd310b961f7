//! Persistence backends for the boosted-boss record.
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use crate::BoostedBossStore;
use crate::error::StoreError;
use crate::record::BoostedBossRecord;

/// In-process store, used by tests and day simulations.
#[derive(Debug, Default)]
pub struct MemoryStore {
    row: Mutex<Option<BoostedBossRecord>>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A store whose row already exists.
    #[must_use]
    pub fn seeded(record: BoostedBossRecord) -> Self {
        Self {
            row: Mutex::new(Some(record)),
        }
    }

    /// Current row without going through the gateway.
    #[must_use]
    pub fn snapshot(&self) -> Option<BoostedBossRecord> {
        self.row
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl BoostedBossStore for MemoryStore {
    fn load(&self) -> Result<Option<BoostedBossRecord>, StoreError> {
        Ok(self.snapshot())
    }

    fn save(&self, record: &BoostedBossRecord) -> Result<(), StoreError> {
        *self.row.lock().unwrap_or_else(PoisonError::into_inner) = Some(record.clone());
        Ok(())
    }
}

/// Store keeping the row as one JSON document on disk.
///
/// A missing file means no record has been written yet. Saves go through a
/// sibling temporary file that is renamed over the target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn staging_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|name| name.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }

    fn io_error(&self, source: std::io::Error) -> StoreError {
        StoreError::Io {
            path: self.path.clone(),
            source,
        }
    }
}

impl BoostedBossStore for JsonFileStore {
    fn load(&self) -> Result<Option<BoostedBossRecord>, StoreError> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(self.io_error(err)),
        };
        if raw.trim().is_empty() {
            return Ok(None);
        }
        serde_json::from_str(&raw)
            .map(Some)
            .map_err(|source| StoreError::Corrupt {
                path: self.path.clone(),
                source,
            })
    }

    fn save(&self, record: &BoostedBossRecord) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent).map_err(|err| self.io_error(err))?;
        }
        let payload = serde_json::to_vec_pretty(record).map_err(|source| StoreError::Corrupt {
            path: self.path.clone(),
            source,
        })?;
        let staging = self.staging_path();
        fs::write(&staging, payload).map_err(|err| self.io_error(err))?;
        fs::rename(&staging, &self.path).map_err(|err| self.io_error(err))
    }
}
