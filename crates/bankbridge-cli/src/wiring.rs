//! Startup wiring: configuration, seed data and shared services.
//!
//! Every failure here is fatal; the process does not start serving.

use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{anyhow, Context};
use bankbridge_client::{RemoteAggregator, RemoteBankClient, WorkerPool};
use bankbridge_core::{default_config_path, load_app_config, AppConfig, RecordStore};
use bankbridge_server::AppState;
use tracing::info;

use crate::config::{Command, Config};

/// Resolves the config file path and applies command-line overrides.
pub fn load_settings(cli: &Config) -> anyhow::Result<AppConfig> {
    let path: PathBuf = match &cli.config {
        Some(path) => path.clone(),
        None => default_config_path()
            .ok_or_else(|| anyhow!("No config directory on this platform; pass --config"))?,
    };

    let mut settings = load_app_config(&path)
        .with_context(|| format!("Failed to load configuration from {}", path.display()))?;

    if let Some(port) = cli.port {
        settings.server.port = port;
    }
    if let Some(workers) = cli.workers {
        anyhow::ensure!(workers > 0, "--workers must be at least 1");
        settings.aggregator.worker_pool_size = workers;
    }

    info!("Configuration loaded from {}", path.display());
    Ok(settings)
}

/// Seeds the record store from the configured file.
pub fn load_store(settings: &AppConfig) -> anyhow::Result<Arc<RecordStore>> {
    let store = RecordStore::new();
    store
        .load_from_path(&settings.seed.path)
        .context("Failed to initialize bank store")?;
    Ok(Arc::new(store))
}

/// Seeds the store for the commands that read it. `remote` never touches the
/// local table, so it gets an empty store and does not require the seed file.
pub fn store_for(command: Command, settings: &AppConfig) -> anyhow::Result<Arc<RecordStore>> {
    match command {
        Command::Serve | Command::Local => load_store(settings),
        Command::Remote => Ok(Arc::new(RecordStore::new())),
    }
}

/// Builds the process-wide services shared by every request.
pub fn build_state(settings: &AppConfig, store: Arc<RecordStore>) -> anyhow::Result<AppState> {
    let directory = settings
        .endpoint_directory()
        .context("Invalid endpoint directory")?;
    let client = RemoteBankClient::new().context("Failed to build HTTP client")?;
    let aggregator = RemoteAggregator::new(
        client,
        WorkerPool::new(settings.aggregator.worker_pool_size),
        settings.aggregator.call_timeout(),
    );

    info!(
        "{} remote providers, worker pool size {}, call timeout {:?}",
        directory.len(),
        aggregator.pool().size(),
        aggregator.call_timeout()
    );

    Ok(AppState::new(
        store,
        Arc::new(directory),
        aggregator,
        &settings.server.public_url(),
    ))
}

/// Socket address the server binds.
pub fn listen_addr(settings: &AppConfig) -> anyhow::Result<SocketAddr> {
    let host: IpAddr = settings
        .server
        .host
        .parse()
        .with_context(|| format!("Invalid server.host: {}", settings.server.host))?;
    Ok(SocketAddr::new(host, settings.server.port))
}
