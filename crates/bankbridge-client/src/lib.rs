//! Bankbridge Client - remote bank providers and the concurrent aggregator
//!
//! - [`remote`] - HTTP client for a single bank provider
//! - [`pool`] - process-wide worker slots bounding in-flight calls
//! - [`aggregator`] - fan-out/join across an endpoint directory

pub mod aggregator;
pub mod pool;
pub mod remote;

pub use aggregator::RemoteAggregator;
pub use pool::WorkerPool;
pub use remote::RemoteBankClient;
