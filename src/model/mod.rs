//! Data model for the phase hierarchy
//!
//! A `Record` is a phase or a sub-phase; the same shape nests
//! recursively through `subPhases`. `RecordPatch` is the explicit
//! partial-update companion type: every field optional, absent meaning
//! "leave unchanged".

mod patch;
mod record;
mod serial;

pub use patch::RecordPatch;
pub use record::Record;
pub use serial::SerialNo;
