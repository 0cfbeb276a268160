//! Recursive tree filtering.

use serde::Deserialize;

use crate::model::Record;

/// Criteria for `/api/records/search`.
///
/// Every criterion is optional; present criteria are AND-combined to
/// decide a node's own match. Empty strings count as absent so that a
/// search form submitting all its inputs does not over-constrain.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterCriteria {
    pub serial_no: Option<String>,
    pub phase: Option<String>,
    pub status: Option<String>,
    pub document: Option<String>,
    pub responsible_party: Option<String>,
    pub update_date: Option<String>,
}

impl FilterCriteria {
    /// True when no criterion constrains the result.
    pub fn is_empty(&self) -> bool {
        given(&self.serial_no).is_none()
            && given(&self.phase).is_none()
            && given(&self.status).is_none()
            && given(&self.document).is_none()
            && given(&self.responsible_party).is_none()
            && given(&self.update_date).is_none()
    }

    /// Whether a single node matches on its own fields.
    fn matches(&self, record: &Record) -> bool {
        let serial_ok = given(&self.serial_no)
            .map_or(true, |want| record.serial_no.matches_str(want));

        let phase_ok = given(&self.phase)
            .map_or(true, |want| text_eq_ignore_case(record.phase.as_deref(), want));

        let status_ok = given(&self.status)
            .map_or(true, |want| text_eq_ignore_case(record.status.as_deref(), want));

        // A record without a document is not excluded by a document
        // criterion.
        let document_ok = given(&self.document).map_or(true, |want| {
            match record.document.as_deref() {
                Some(have) => have.to_lowercase() == want.to_lowercase(),
                None => true,
            }
        });

        let party_ok = given(&self.responsible_party).map_or(true, |want| {
            record
                .responsible_party
                .as_deref()
                .map_or(false, |have| have.to_lowercase().contains(&want.to_lowercase()))
        });

        // Raw equality, no date normalization.
        let date_ok = given(&self.update_date)
            .map_or(true, |want| record.update_date.as_deref() == Some(want));

        serial_ok && phase_ok && status_ok && document_ok && party_ok && date_ok
    }
}

fn given(criterion: &Option<String>) -> Option<&str> {
    criterion.as_deref().filter(|s| !s.is_empty())
}

fn text_eq_ignore_case(have: Option<&str>, want: &str) -> bool {
    have.map_or(false, |h| h.to_lowercase() == want.to_lowercase())
}

/// Filter a record tree, preserving hierarchy.
///
/// Children are filtered first; a node survives when it matches on its
/// own or when any child survived, and it carries the filtered
/// children, not the originals. Sibling order is preserved.
pub fn filter_records(records: &[Record], criteria: &FilterCriteria) -> Vec<Record> {
    records
        .iter()
        .filter_map(|record| {
            let sub_phases = filter_records(&record.sub_phases, criteria);
            if criteria.matches(record) || !sub_phases.is_empty() {
                Some(Record {
                    sub_phases,
                    ..record.clone()
                })
            } else {
                None
            }
        })
        .collect()
}
