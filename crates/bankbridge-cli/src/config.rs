use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// CLI configuration parsed from command line arguments and environment variables
#[derive(Parser, Debug)]
#[command(name = "bankbridge")]
#[command(
    author,
    version,
    about = "Local and live lookup of banking institution codes"
)]
#[command(after_help = "Examples:
  bankbridge serve --config ./bankbridge.toml
  bankbridge local
  bankbridge remote --config ./bankbridge.toml")]
pub struct Config {
    /// Path to bankbridge.toml (defaults to the platform config directory)
    #[arg(short, long, global = true, env = "BANKBRIDGE_CONFIG", value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Override the HTTP listen port
    #[arg(long, global = true, env = "BANKBRIDGE_PORT")]
    pub port: Option<u16>,

    /// Override the worker pool size for remote calls
    #[arg(long, global = true, env = "BANKBRIDGE_WORKERS")]
    pub workers: Option<usize>,

    /// Log at debug level
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Available CLI commands
#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Serve /v1/banks/all (local) and /v2/banks/all (remote) over HTTP
    Serve,
    /// Print the locally seeded banks as JSON
    Local,
    /// Query every remote provider once and print the merged banks as JSON
    #[command(after_help = "Failed providers are reported on stderr; the exit code is non-zero \
only when no provider returned usable data.")]
    Remote,
}
