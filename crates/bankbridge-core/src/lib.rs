//! Bankbridge Core - Domain types, error handling, configuration, the local
//! record store and response assembly.

pub mod aggregate;
pub mod config;
pub mod error;
pub mod models;
pub mod response;
pub mod store;

pub use aggregate::{AggregationResult, CallOutcome};
pub use config::{
    default_config_path, load_app_config, parse_app_config, AggregatorConfig, AppConfig,
    SeedConfig, ServerConfig,
};
pub use error::AppError;
pub use models::{BankEntry, BankList, Endpoint, EndpointDirectory, Record};
pub use response::assemble;
pub use store::{read_seed_file, RecordStore};
