//! Partial updates.

use serde::{Deserialize, Serialize};

use super::{Record, SerialNo};

/// Field-by-field partial update for a `Record`.
///
/// Absent fields are a distinguished "not provided" state and leave the
/// existing value untouched; `subPhases` is only replaced when
/// explicitly present.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub serial_no: Option<SerialNo>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phase: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub document: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub responsible_party: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub update_date: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub_phases: Option<Vec<Record>>,
}

impl RecordPatch {
    /// Shallow-merge this patch over a record: provided fields
    /// override, absent fields keep the record's values.
    pub fn apply(&self, record: &Record) -> Record {
        Record {
            serial_no: self
                .serial_no
                .clone()
                .unwrap_or_else(|| record.serial_no.clone()),
            phase: self.phase.clone().or_else(|| record.phase.clone()),
            status: self.status.clone().or_else(|| record.status.clone()),
            document: self.document.clone().or_else(|| record.document.clone()),
            responsible_party: self
                .responsible_party
                .clone()
                .or_else(|| record.responsible_party.clone()),
            update_date: self
                .update_date
                .clone()
                .or_else(|| record.update_date.clone()),
            sub_phases: self
                .sub_phases
                .clone()
                .unwrap_or_else(|| record.sub_phases.clone()),
        }
    }

    /// True when no field is provided.
    pub fn is_empty(&self) -> bool {
        self.serial_no.is_none()
            && self.phase.is_none()
            && self.status.is_none()
            && self.document.is_none()
            && self.responsible_party.is_none()
            && self.update_date.is_none()
            && self.sub_phases.is_none()
    }
}
