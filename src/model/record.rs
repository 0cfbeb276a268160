//! The recursive phase record.

use serde::{Deserialize, Serialize};

use super::SerialNo;

/// A phase or sub-phase.
///
/// Field presence is permissive: apart from the serial number, absent
/// fields deserialize to `None` rather than failing, matching the
/// schema-less documents the store accepts. `subPhases` defaults to an
/// empty sequence and nests without a depth limit in the file-backed
/// store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Record {
    pub serial_no: SerialNo,

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

    #[serde(default)]
    pub sub_phases: Vec<Record>,
}

impl Record {
    /// Minimal record with the given serial number and no other fields.
    pub fn new(serial_no: impl Into<SerialNo>) -> Self {
        Self {
            serial_no: serial_no.into(),
            phase: None,
            status: None,
            document: None,
            responsible_party: None,
            update_date: None,
            sub_phases: Vec::new(),
        }
    }
}
