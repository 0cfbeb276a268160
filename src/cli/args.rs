//! CLI argument definitions using clap
//!
//! Commands:
//! - phasetrack init --config <path>
//! - phasetrack start --config <path>

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// phasetrack - hierarchical phase records over REST
#[derive(Parser, Debug)]
#[command(name = "phasetrack")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Seed the configured storage backend
    Init {
        /// Path to configuration file
        #[arg(long, default_value = "./phasetrack.json")]
        config: PathBuf,
    },

    /// Start the phasetrack server
    Start {
        /// Path to configuration file
        #[arg(long, default_value = "./phasetrack.json")]
        config: PathBuf,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
