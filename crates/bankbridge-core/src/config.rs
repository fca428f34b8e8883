//! Configuration types for Bankbridge components.
//!
//! Configuration lives in a single TOML file:
//!
//! ```toml
//! [server]
//! port = 8080
//!
//! [aggregator]
//! worker_pool_size = 10
//! call_timeout_ms = 30000
//!
//! [seed]
//! path = "banks-v1.json"
//!
//! [endpoints]
//! "Royal Bank of Boredom" = "http://localhost:1234/rbb"
//! "Credit Sweets" = "http://localhost:1234/cs"
//! ```
//!
//! Relative seed paths resolve against the directory holding the config file.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use crate::error::AppError;
use crate::models::EndpointDirectory;

const DEFAULT_PORT: u16 = 8080;
const DEFAULT_WORKER_POOL_SIZE: usize = 10;
const DEFAULT_CALL_TIMEOUT_MS: u64 = 30_000;

/// HTTP listener configuration.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Base URL used in "relevant links" hints. Defaults to `http://localhost:<port>`.
    pub public_url: Option<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: DEFAULT_PORT,
            public_url: None,
        }
    }
}

impl ServerConfig {
    pub fn public_url(&self) -> String {
        match &self.public_url {
            Some(url) => url.trim_end_matches('/').to_string(),
            None => format!("http://localhost:{}", self.port),
        }
    }
}

/// Remote fan-out configuration.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct AggregatorConfig {
    /// Process-wide cap on in-flight remote calls.
    pub worker_pool_size: usize,
    /// Per-call deadline in milliseconds. `0` disables the deadline.
    pub call_timeout_ms: u64,
}

impl Default for AggregatorConfig {
    fn default() -> Self {
        Self {
            worker_pool_size: DEFAULT_WORKER_POOL_SIZE,
            call_timeout_ms: DEFAULT_CALL_TIMEOUT_MS,
        }
    }
}

impl AggregatorConfig {
    pub fn call_timeout(&self) -> Option<Duration> {
        (self.call_timeout_ms > 0).then(|| Duration::from_millis(self.call_timeout_ms))
    }
}

/// Location of the local lookup seed data.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct SeedConfig {
    pub path: PathBuf,
}

/// Root of `bankbridge.toml`.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub aggregator: AggregatorConfig,
    pub seed: SeedConfig,
    /// Label to URL mapping of remote providers.
    #[serde(default)]
    pub endpoints: BTreeMap<String, String>,
}

impl AppConfig {
    /// Validates the endpoint table and builds the directory.
    pub fn endpoint_directory(&self) -> Result<EndpointDirectory, AppError> {
        EndpointDirectory::from_pairs(self.endpoints.iter().map(|(l, u)| (l.as_str(), u)))
    }

    fn validate(&self) -> Result<(), AppError> {
        if self.aggregator.worker_pool_size == 0 {
            return Err(AppError::Config(
                "aggregator.worker_pool_size must be at least 1".to_string(),
            ));
        }
        self.endpoint_directory()?;
        Ok(())
    }
}

/// Returns the default configuration path:
/// `<platform config dir>/bankbridge/bankbridge.toml`.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("bankbridge").join("bankbridge.toml"))
}

/// Loads and validates the configuration file at `path`.
///
/// # Errors
///
/// Returns `AppError::Config` if the file is missing, unreadable, malformed or
/// semantically invalid, and `AppError::InvalidUrl` for a bad endpoint URL.
pub fn load_app_config(path: &Path) -> Result<AppConfig, AppError> {
    let raw = std::fs::read_to_string(path)
        .map_err(|e| AppError::Config(format!("cannot read {}: {}", path.display(), e)))?;
    let mut config = parse_app_config(&raw)?;

    if config.seed.path.is_relative() {
        if let Some(base) = path.parent() {
            config.seed.path = base.join(&config.seed.path);
        }
    }

    Ok(config)
}

/// Parses and validates configuration text. Seed paths are left as written.
pub fn parse_app_config(raw: &str) -> Result<AppConfig, AppError> {
    let config: AppConfig = toml::from_str(raw).map_err(|e| AppError::Config(e.to_string()))?;
    config.validate()?;
    Ok(config)
}
