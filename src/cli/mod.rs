//! CLI module for phasetrack
//!
//! Provides the command-line interface:
//! - init: seed the configured storage backend
//! - start: boot the store and serve HTTP

mod args;
mod commands;
mod errors;

pub use args::{Cli, Command};
pub use commands::{init, run, start};
pub use errors::{CliError, CliResult};
