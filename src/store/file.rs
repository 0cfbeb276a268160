//! File-backed store: one JSON document, whole-tree read and rewrite.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::engine;
use crate::model::{Record, RecordPatch, SerialNo};

use super::errors::{StoreError, StoreResult};
use super::PhaseStore;

/// Whole-document JSON store.
///
/// Every operation reads the full tree, applies the engine in memory
/// and rewrites the file. The mutex keeps read-modify-write cycles
/// from interleaving within this process; cross-process writers are
/// still unsynchronized.
pub struct FileStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl FileStore {
    /// Store over an existing document at `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    /// Create the document with an empty tree, parent directories
    /// included. An existing document is left untouched.
    pub fn init(path: impl Into<PathBuf>) -> StoreResult<Self> {
        let store = Self::new(path);
        if !store.path.exists() {
            if let Some(dir) = store.path.parent() {
                fs::create_dir_all(dir).map_err(|e| StoreError::io(&store.path, e))?;
            }
            store.write(&[])?;
        }
        Ok(store)
    }

    /// Path of the backing document.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read(&self) -> StoreResult<Vec<Record>> {
        let raw =
            fs::read_to_string(&self.path).map_err(|e| StoreError::io(&self.path, e))?;
        Ok(serde_json::from_str(&raw)?)
    }

    fn write(&self, records: &[Record]) -> StoreResult<()> {
        let json = serde_json::to_string_pretty(records)?;
        fs::write(&self.path, json).map_err(|e| StoreError::io(&self.path, e))
    }
}

impl PhaseStore for FileStore {
    fn fetch_all(&self) -> StoreResult<Vec<Record>> {
        let _guard = self.lock.lock().expect("file store lock poisoned");
        self.read()
    }

    fn insert(
        &self,
        parent_serial_no: Option<&SerialNo>,
        new_phase: Record,
    ) -> StoreResult<Record> {
        let _guard = self.lock.lock().expect("file store lock poisoned");
        let mut records = self.read()?;
        engine::insert_record(&mut records, parent_serial_no, new_phase.clone())?;
        self.write(&records)?;
        Ok(new_phase)
    }

    fn update(&self, serial_no: &str, patch: &RecordPatch) -> StoreResult<usize> {
        let _guard = self.lock.lock().expect("file store lock poisoned");
        let records = self.read()?;
        let (updated, affected) = engine::update_records(records, serial_no, patch);
        self.write(&updated)?;
        Ok(affected)
    }

    fn delete(&self, serial_no: &str) -> StoreResult<usize> {
        let _guard = self.lock.lock().expect("file store lock poisoned");
        let records = self.read()?;
        let (survivors, affected) = engine::delete_records(records, serial_no);
        self.write(&survivors)?;
        Ok(affected)
    }
}
