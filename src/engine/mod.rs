//! Recursive tree engines
//!
//! Pure functions over the in-memory record tree. Filtering keeps the
//! hierarchy while pruning non-matching branches; mutation applies
//! insert/update/delete at every depth. Persistence lives in `store`.

mod filter;
mod mutate;

pub use filter::{filter_records, FilterCriteria};
pub use mutate::{delete_records, insert_record, update_records, ParentNotFound};
