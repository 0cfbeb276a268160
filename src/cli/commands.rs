//! CLI command implementations.

use std::path::Path;
use std::sync::Arc;

use crate::config::{Config, StorageBackend};
use crate::http_server::HttpServer;
use crate::observability::Logger;
use crate::store::{FileStore, PhaseStore, SqliteStore};

use super::args::{Cli, Command};
use super::errors::CliResult;

/// Parse arguments and dispatch.
pub fn run() -> CliResult<()> {
    let cli = Cli::parse_args();
    match cli.command {
        Command::Init { config } => init(&config),
        Command::Start { config } => start(&config),
    }
}

/// Seed the configured backend: an empty JSON document for the file
/// store, schema creation for the database store.
pub fn init(config_path: &Path) -> CliResult<()> {
    let config = Config::load(config_path)?;
    match config.storage.backend {
        StorageBackend::File => {
            let store = FileStore::init(&config.storage.data_path)?;
            Logger::info(
                "STORE_INITIALIZED",
                &[
                    ("backend", "file"),
                    ("path", &store.path().display().to_string()),
                ],
            );
        }
        StorageBackend::Database => {
            SqliteStore::open(&config.storage.database_path)?;
            Logger::info(
                "STORE_INITIALIZED",
                &[
                    ("backend", "database"),
                    ("path", &config.storage.database_path.display().to_string()),
                ],
            );
        }
    }
    Ok(())
}

/// Boot the store and serve HTTP until interrupted.
pub fn start(config_path: &Path) -> CliResult<()> {
    let config = Config::load(config_path)?;
    let store = build_store(&config)?;
    let server = HttpServer::new(config.http, store);

    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(server.start())?;
    Ok(())
}

fn build_store(config: &Config) -> CliResult<Arc<dyn PhaseStore>> {
    let store: Arc<dyn PhaseStore> = match config.storage.backend {
        StorageBackend::File => Arc::new(FileStore::new(&config.storage.data_path)),
        StorageBackend::Database => Arc::new(SqliteStore::open(&config.storage.database_path)?),
    };
    Ok(store)
}
