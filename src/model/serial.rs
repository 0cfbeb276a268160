//! Serial number identifiers.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifier for a phase or sub-phase.
///
/// Stored documents carry both integer and numeric-string forms; all
/// lookups compare the canonical string form, so `1` and `"1"` name
/// the same record. Uniqueness is only expected within a sibling
/// scope.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SerialNo {
    Number(i64),
    Text(String),
}

impl SerialNo {
    /// Canonical string form used for all comparisons.
    pub fn canonical(&self) -> String {
        match self {
            SerialNo::Number(n) => n.to_string(),
            SerialNo::Text(s) => s.clone(),
        }
    }

    /// Compare against a raw string target (path parameter or query
    /// value) in canonical form.
    pub fn matches_str(&self, target: &str) -> bool {
        match self {
            SerialNo::Number(n) => n.to_string() == target,
            SerialNo::Text(s) => s == target,
        }
    }

    /// Rebuild from a stored string, restoring the integer form where
    /// the text parses as one.
    pub fn from_stored(value: String) -> Self {
        match value.parse::<i64>() {
            Ok(n) => SerialNo::Number(n),
            Err(_) => SerialNo::Text(value),
        }
    }
}

impl PartialEq for SerialNo {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (SerialNo::Number(a), SerialNo::Number(b)) => a == b,
            (SerialNo::Text(a), SerialNo::Text(b)) => a == b,
            _ => self.canonical() == other.canonical(),
        }
    }
}

impl Eq for SerialNo {}

impl fmt::Display for SerialNo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SerialNo::Number(n) => write!(f, "{}", n),
            SerialNo::Text(s) => write!(f, "{}", s),
        }
    }
}

impl From<i64> for SerialNo {
    fn from(n: i64) -> Self {
        SerialNo::Number(n)
    }
}

impl From<&str> for SerialNo {
    fn from(s: &str) -> Self {
        SerialNo::Text(s.to_string())
    }
}
