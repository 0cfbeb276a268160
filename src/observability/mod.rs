//! Observability for phasetrack
//!
//! Structured JSON logging. Backend failures are logged here in full;
//! HTTP responses only ever carry a generic message.

mod logger;

pub use logger::{Logger, Severity};
