//! SQLite-backed store: a parent and a child table, one level deep.

use std::fs;
use std::path::Path;
use std::sync::Mutex;

use rusqlite::{params, params_from_iter, Connection, OptionalExtension, Row, Transaction};

use crate::model::{Record, RecordPatch, SerialNo};

use super::errors::{StoreError, StoreResult};
use super::PhaseStore;

const SCHEMA_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS phases (
    id               INTEGER PRIMARY KEY,
    serialno         TEXT NOT NULL,
    phase            TEXT,
    status           TEXT,
    document         TEXT,
    responsibleparty TEXT,
    updatedate       TEXT
);

CREATE TABLE IF NOT EXISTS sub_phases (
    id               INTEGER PRIMARY KEY,
    serialno         TEXT NOT NULL,
    phase            TEXT,
    status           TEXT,
    document         TEXT,
    responsibleparty TEXT,
    updatedate       TEXT,
    phase_id         INTEGER NOT NULL REFERENCES phases(id) ON DELETE CASCADE
);
"#;

/// Embedded relational store.
///
/// The schema models exactly one level of nesting: `phases` rows own
/// `sub_phases` rows through `phase_id`. Records nested any deeper are
/// rejected with `StoreError::NestingTooDeep` rather than silently
/// flattened.
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    /// Open or create the database at `path` and ensure the schema
    /// exists, parent directories included.
    pub fn open(path: impl AsRef<Path>) -> StoreResult<Self> {
        let path = path.as_ref();
        if let Some(dir) = path.parent() {
            if !dir.as_os_str().is_empty() {
                fs::create_dir_all(dir).map_err(|e| StoreError::io(path, e))?;
            }
        }
        Self::configure(Connection::open(path)?)
    }

    /// In-memory database, used by tests.
    pub fn open_memory() -> StoreResult<Self> {
        Self::configure(Connection::open_in_memory()?)
    }

    fn configure(conn: Connection) -> StoreResult<Self> {
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        conn.execute_batch(SCHEMA_SQL)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }
}

/// Map the record columns of a row starting at `start`
/// (serialno, phase, status, document, responsibleparty, updatedate).
fn record_from_columns(row: &Row<'_>, start: usize) -> rusqlite::Result<Record> {
    Ok(Record {
        serial_no: SerialNo::from_stored(row.get(start)?),
        phase: row.get(start + 1)?,
        status: row.get(start + 2)?,
        document: row.get(start + 3)?,
        responsible_party: row.get(start + 4)?,
        update_date: row.get(start + 5)?,
        sub_phases: Vec::new(),
    })
}

fn insert_phase(tx: &Transaction<'_>, record: &Record) -> rusqlite::Result<i64> {
    tx.execute(
        r#"
        INSERT INTO phases (serialno, phase, status, document, responsibleparty, updatedate)
        VALUES (?1, ?2, ?3, ?4, ?5, ?6)
        "#,
        params![
            record.serial_no.canonical(),
            record.phase,
            record.status,
            record.document,
            record.responsible_party,
            record.update_date,
        ],
    )?;
    Ok(tx.last_insert_rowid())
}

fn insert_sub_phase(tx: &Transaction<'_>, phase_id: i64, record: &Record) -> rusqlite::Result<()> {
    tx.execute(
        r#"
        INSERT INTO sub_phases (serialno, phase, status, document, responsibleparty, updatedate, phase_id)
        VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
        "#,
        params![
            record.serial_no.canonical(),
            record.phase,
            record.status,
            record.document,
            record.responsible_party,
            record.update_date,
            phase_id,
        ],
    )?;
    Ok(())
}

/// Columns a patch can set, with their provided values.
fn patch_columns(patch: &RecordPatch) -> (Vec<&'static str>, Vec<String>) {
    let mut columns = Vec::new();
    let mut values = Vec::new();
    if let Some(v) = &patch.serial_no {
        columns.push("serialno");
        values.push(v.canonical());
    }
    if let Some(v) = &patch.phase {
        columns.push("phase");
        values.push(v.clone());
    }
    if let Some(v) = &patch.status {
        columns.push("status");
        values.push(v.clone());
    }
    if let Some(v) = &patch.document {
        columns.push("document");
        values.push(v.clone());
    }
    if let Some(v) = &patch.responsible_party {
        columns.push("responsibleparty");
        values.push(v.clone());
    }
    if let Some(v) = &patch.update_date {
        columns.push("updatedate");
        values.push(v.clone());
    }
    (columns, values)
}

impl PhaseStore for SqliteStore {
    fn fetch_all(&self) -> StoreResult<Vec<Record>> {
        let conn = self.conn.lock().expect("sqlite store lock poisoned");

        let mut parents = conn.prepare_cached(
            r#"
            SELECT id, serialno, phase, status, document, responsibleparty, updatedate
            FROM phases
            ORDER BY id
            "#,
        )?;
        let mut children = conn.prepare_cached(
            r#"
            SELECT serialno, phase, status, document, responsibleparty, updatedate
            FROM sub_phases
            WHERE phase_id = ?1
            ORDER BY id
            "#,
        )?;

        let rows = parents
            .query_map([], |row| {
                Ok((row.get::<_, i64>(0)?, record_from_columns(row, 1)?))
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        let mut records = Vec::with_capacity(rows.len());
        for (id, mut record) in rows {
            record.sub_phases = children
                .query_map(params![id], |row| record_from_columns(row, 0))?
                .collect::<rusqlite::Result<Vec<_>>>()?;
            records.push(record);
        }
        Ok(records)
    }

    fn insert(
        &self,
        parent_serial_no: Option<&SerialNo>,
        new_phase: Record,
    ) -> StoreResult<Record> {
        // Anything the two-table schema cannot represent is rejected up
        // front: children on a sub-phase, grandchildren on a phase.
        let too_deep = match parent_serial_no {
            Some(_) => !new_phase.sub_phases.is_empty(),
            None => new_phase
                .sub_phases
                .iter()
                .any(|child| !child.sub_phases.is_empty()),
        };
        if too_deep {
            return Err(StoreError::NestingTooDeep);
        }

        let mut conn = self.conn.lock().expect("sqlite store lock poisoned");
        let tx = conn.transaction()?;

        match parent_serial_no {
            Some(parent) => {
                // Parent resolution and the child insert share one
                // transaction, so a concurrently deleted parent cannot
                // leave an orphaned row.
                let phase_id: Option<i64> = tx
                    .query_row(
                        "SELECT id FROM phases WHERE serialno = ?1",
                        params![parent.canonical()],
                        |row| row.get(0),
                    )
                    .optional()?;
                let phase_id = phase_id
                    .ok_or_else(|| StoreError::ParentNotFound(parent.canonical()))?;
                insert_sub_phase(&tx, phase_id, &new_phase)?;
            }
            None => {
                let phase_id = insert_phase(&tx, &new_phase)?;
                for child in &new_phase.sub_phases {
                    insert_sub_phase(&tx, phase_id, child)?;
                }
            }
        }

        tx.commit()?;
        Ok(new_phase)
    }

    fn update(&self, serial_no: &str, patch: &RecordPatch) -> StoreResult<usize> {
        // Replacing a node's children is a tree operation the
        // two-table schema cannot express for sub-phase rows.
        if patch.sub_phases.is_some() {
            return Err(StoreError::NestingTooDeep);
        }

        let (columns, mut values) = patch_columns(patch);
        if columns.is_empty() {
            return Ok(0);
        }

        let assignments = columns
            .iter()
            .enumerate()
            .map(|(i, column)| format!("{} = ?{}", column, i + 1))
            .collect::<Vec<_>>()
            .join(", ");
        values.push(serial_no.to_string());
        let target = values.len();

        let mut conn = self.conn.lock().expect("sqlite store lock poisoned");
        let tx = conn.transaction()?;
        let mut affected = 0;
        for table in ["phases", "sub_phases"] {
            let sql = format!(
                "UPDATE {} SET {} WHERE serialno = ?{}",
                table, assignments, target
            );
            affected += tx.execute(&sql, params_from_iter(values.iter()))?;
        }
        tx.commit()?;
        Ok(affected)
    }

    fn delete(&self, serial_no: &str) -> StoreResult<usize> {
        let mut conn = self.conn.lock().expect("sqlite store lock poisoned");
        let tx = conn.transaction()?;
        // A deleted phase takes its sub-phases with it via the cascade;
        // those are not counted, matching the tree semantics where a
        // removed subtree counts once.
        let sub_phases =
            tx.execute("DELETE FROM sub_phases WHERE serialno = ?1", params![serial_no])?;
        let phases = tx.execute("DELETE FROM phases WHERE serialno = ?1", params![serial_no])?;
        tx.commit()?;
        Ok(sub_phases + phases)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(serial: i64, status: &str) -> Record {
        Record {
            status: Some(status.to_string()),
            ..Record::new(serial)
        }
    }

    #[test]
    fn test_fetch_all_aggregates_one_level() {
        let store = SqliteStore::open_memory().unwrap();
        store.insert(None, record(1, "open")).unwrap();
        store.insert(None, record(2, "open")).unwrap();
        store
            .insert(Some(&SerialNo::Number(1)), record(3, "closed"))
            .unwrap();

        let records = store.fetch_all().unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].sub_phases.len(), 1);
        assert_eq!(records[0].sub_phases[0].serial_no, 3.into());
        assert!(records[1].sub_phases.is_empty());
    }

    #[test]
    fn test_insert_preserves_serial_forms() {
        let store = SqliteStore::open_memory().unwrap();
        store.insert(None, record(1, "open")).unwrap();
        store
            .insert(None, Record::new(SerialNo::Text("2b".to_string())))
            .unwrap();

        let records = store.fetch_all().unwrap();
        assert_eq!(records[0].serial_no, SerialNo::Number(1));
        assert_eq!(records[1].serial_no, SerialNo::Text("2b".to_string()));
    }

    #[test]
    fn test_insert_under_missing_parent_fails_cleanly() {
        let store = SqliteStore::open_memory().unwrap();
        let err = store.insert(Some(&SerialNo::Number(9)), record(1, "open"));
        assert!(matches!(err, Err(StoreError::ParentNotFound(_))));
        assert!(store.fetch_all().unwrap().is_empty());
    }

    #[test]
    fn test_insert_with_immediate_children_stores_both_levels() {
        let store = SqliteStore::open_memory().unwrap();
        let parent = Record {
            sub_phases: vec![record(2, "open"), record(3, "open")],
            ..record(1, "open")
        };
        store.insert(None, parent).unwrap();

        let records = store.fetch_all().unwrap();
        assert_eq!(records[0].sub_phases.len(), 2);
    }

    #[test]
    fn test_insert_rejects_nesting_beyond_schema() {
        let store = SqliteStore::open_memory().unwrap();
        let grandchild = Record {
            sub_phases: vec![Record {
                sub_phases: vec![record(3, "open")],
                ..record(2, "open")
            }],
            ..record(1, "open")
        };
        assert!(matches!(
            store.insert(None, grandchild),
            Err(StoreError::NestingTooDeep)
        ));

        store.insert(None, record(1, "open")).unwrap();
        let nested_child = Record {
            sub_phases: vec![record(3, "open")],
            ..record(2, "open")
        };
        assert!(matches!(
            store.insert(Some(&SerialNo::Number(1)), nested_child),
            Err(StoreError::NestingTooDeep)
        ));
    }

    #[test]
    fn test_update_patches_both_tables() {
        let store = SqliteStore::open_memory().unwrap();
        store.insert(None, record(1, "open")).unwrap();
        store
            .insert(Some(&SerialNo::Number(1)), record(2, "open"))
            .unwrap();

        let patch = RecordPatch {
            status: Some("Done".to_string()),
            ..RecordPatch::default()
        };
        assert_eq!(store.update("2", &patch).unwrap(), 1);

        let records = store.fetch_all().unwrap();
        assert_eq!(records[0].status.as_deref(), Some("open"));
        assert_eq!(records[0].sub_phases[0].status.as_deref(), Some("Done"));
    }

    #[test]
    fn test_update_leaves_unprovided_fields_alone() {
        let store = SqliteStore::open_memory().unwrap();
        store
            .insert(
                None,
                Record {
                    phase: Some("Design".to_string()),
                    ..record(1, "open")
                },
            )
            .unwrap();

        let patch = RecordPatch {
            status: Some("Done".to_string()),
            ..RecordPatch::default()
        };
        store.update("1", &patch).unwrap();

        let records = store.fetch_all().unwrap();
        assert_eq!(records[0].phase.as_deref(), Some("Design"));
        assert_eq!(records[0].status.as_deref(), Some("Done"));
    }

    #[test]
    fn test_update_zero_match_and_empty_patch_are_noops() {
        let store = SqliteStore::open_memory().unwrap();
        store.insert(None, record(1, "open")).unwrap();

        let patch = RecordPatch {
            status: Some("Done".to_string()),
            ..RecordPatch::default()
        };
        assert_eq!(store.update("99", &patch).unwrap(), 0);
        assert_eq!(store.update("1", &RecordPatch::default()).unwrap(), 0);
    }

    #[test]
    fn test_update_rejects_sub_phase_replacement() {
        let store = SqliteStore::open_memory().unwrap();
        store.insert(None, record(1, "open")).unwrap();

        let patch = RecordPatch {
            sub_phases: Some(vec![]),
            ..RecordPatch::default()
        };
        assert!(matches!(
            store.update("1", &patch),
            Err(StoreError::NestingTooDeep)
        ));
    }

    #[test]
    fn test_delete_cascades_children() {
        let store = SqliteStore::open_memory().unwrap();
        store.insert(None, record(1, "open")).unwrap();
        store
            .insert(Some(&SerialNo::Number(1)), record(2, "open"))
            .unwrap();

        assert_eq!(store.delete("1").unwrap(), 1);
        assert!(store.fetch_all().unwrap().is_empty());
    }

    #[test]
    fn test_delete_sub_phase_keeps_parent() {
        let store = SqliteStore::open_memory().unwrap();
        store.insert(None, record(1, "open")).unwrap();
        store
            .insert(Some(&SerialNo::Number(1)), record(2, "open"))
            .unwrap();

        assert_eq!(store.delete("2").unwrap(), 1);
        let records = store.fetch_all().unwrap();
        assert_eq!(records.len(), 1);
        assert!(records[0].sub_phases.is_empty());
    }

    #[test]
    fn test_delete_zero_match_succeeds() {
        let store = SqliteStore::open_memory().unwrap();
        assert_eq!(store.delete("99").unwrap(), 0);
    }
}
