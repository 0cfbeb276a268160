//! phasetrack - hierarchical phase records over REST
//!
//! A phase is a top-level record; sub-phases nest beneath it. The tree
//! engines filter and mutate the hierarchy recursively; persistence is
//! either a whole-document JSON file or an embedded SQLite database.

pub mod cli;
pub mod config;
pub mod engine;
pub mod http_server;
pub mod model;
pub mod observability;
pub mod store;
