//! Recursive tree mutation.

use thiserror::Error;

use crate::model::{Record, RecordPatch, SerialNo};

/// Insert named a top-level parent that does not exist.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("parent phase not found: {0}")]
pub struct ParentNotFound(pub String);

/// Append a record, either top-level or under a named top-level parent.
///
/// Parent lookup deliberately stays at the top level; nested records
/// cannot adopt children this way.
pub fn insert_record(
    records: &mut Vec<Record>,
    parent_serial_no: Option<&SerialNo>,
    new_phase: Record,
) -> Result<(), ParentNotFound> {
    match parent_serial_no {
        Some(parent) => {
            let target = parent.canonical();
            match records
                .iter_mut()
                .find(|record| record.serial_no.matches_str(&target))
            {
                Some(parent) => {
                    parent.sub_phases.push(new_phase);
                    Ok(())
                }
                None => Err(ParentNotFound(target)),
            }
        }
        None => {
            records.push(new_phase);
            Ok(())
        }
    }
}

/// Apply a patch to every node whose serial number matches.
///
/// Every depth is visited, including the children of matched nodes, so
/// matches in different branches are all patched. Returns the mutated
/// tree and the number of nodes patched; zero is not an error.
pub fn update_records(
    records: Vec<Record>,
    serial_no: &str,
    patch: &RecordPatch,
) -> (Vec<Record>, usize) {
    let mut affected = 0;
    let updated = update_inner(records, serial_no, patch, &mut affected);
    (updated, affected)
}

fn update_inner(
    records: Vec<Record>,
    serial_no: &str,
    patch: &RecordPatch,
    affected: &mut usize,
) -> Vec<Record> {
    records
        .into_iter()
        .map(|record| {
            let mut record = if record.serial_no.matches_str(serial_no) {
                *affected += 1;
                patch.apply(&record)
            } else {
                record
            };
            record.sub_phases =
                update_inner(std::mem::take(&mut record.sub_phases), serial_no, patch, affected);
            record
        })
        .collect()
}

/// Remove every node whose serial number matches, together with its
/// entire subtree; children are not promoted. Returns the surviving
/// tree and the number of nodes removed (subtrees count once).
pub fn delete_records(records: Vec<Record>, serial_no: &str) -> (Vec<Record>, usize) {
    let mut affected = 0;
    let survivors = delete_inner(records, serial_no, &mut affected);
    (survivors, affected)
}

fn delete_inner(records: Vec<Record>, serial_no: &str, affected: &mut usize) -> Vec<Record> {
    records
        .into_iter()
        .filter_map(|mut record| {
            if record.serial_no.matches_str(serial_no) {
                *affected += 1;
                return None;
            }
            record.sub_phases =
                delete_inner(std::mem::take(&mut record.sub_phases), serial_no, affected);
            Some(record)
        })
        .collect()
}
