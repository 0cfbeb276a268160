//! Record persistence
//!
//! Two interchangeable backends behind the `PhaseStore` trait:
//!
//! - `FileStore`: one JSON document holding the whole tree, read and
//!   rewritten in full on every mutation; arbitrary nesting depth.
//! - `SqliteStore`: embedded SQLite with a parent and a child table;
//!   models exactly one level of nesting, which is an explicit
//!   capability gap versus the file backend.

mod errors;
mod file;
mod sqlite;

pub use errors::{StoreError, StoreResult};
pub use file::FileStore;
pub use sqlite::SqliteStore;

use crate::model::{Record, RecordPatch, SerialNo};

/// Persistence interface shared by both backends.
///
/// Update and delete report how many nodes were affected; zero matches
/// is a no-op success, not an error.
pub trait PhaseStore: Send + Sync {
    /// Read the full tree in insertion order.
    fn fetch_all(&self) -> StoreResult<Vec<Record>>;

    /// Append a record top-level, or under the named top-level parent.
    /// Returns the record as persisted.
    fn insert(
        &self,
        parent_serial_no: Option<&SerialNo>,
        new_phase: Record,
    ) -> StoreResult<Record>;

    /// Patch every node whose serial number matches.
    fn update(&self, serial_no: &str, patch: &RecordPatch) -> StoreResult<usize>;

    /// Remove every node whose serial number matches, with its subtree.
    fn delete(&self, serial_no: &str) -> StoreResult<usize>;
}
