//! Concurrent fan-out across every configured bank provider.
//!
//! One task per endpoint, all joined before assembly. A failing endpoint
//! only removes its own record; the call as a whole fails only when nothing
//! usable came back.

use std::future::Future;
use std::time::{Duration, Instant};

use bankbridge_core::aggregate::{AggregationResult, CallOutcome};
use bankbridge_core::error::AppError;
use bankbridge_core::models::{Endpoint, EndpointDirectory, Record};
use futures::stream::{FuturesUnordered, StreamExt};
use tracing::{debug, info, warn};

use crate::pool::WorkerPool;
use crate::remote::RemoteBankClient;

/// Queries every endpoint of a directory in parallel and merges the answers.
///
/// The aggregator holds no per-request state; concurrent `aggregate` calls
/// share only the client connection pool and the worker slots.
///
/// # Examples
///
/// ```no_run
/// use std::time::Duration;
/// use bankbridge_client::{RemoteAggregator, RemoteBankClient, WorkerPool};
/// use bankbridge_core::EndpointDirectory;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let aggregator = RemoteAggregator::new(
///     RemoteBankClient::new()?,
///     WorkerPool::new(10),
///     Some(Duration::from_secs(5)),
/// );
/// let directory = EndpointDirectory::from_pairs([
///     ("Royal Bank of Boredom", "http://localhost:1234/rbb"),
///     ("Credit Sweets", "http://localhost:1234/cs"),
/// ])?;
///
/// let result = aggregator.aggregate(&directory).await?;
/// println!("{} banks, {} failed", result.successful_count(), result.failed_count());
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct RemoteAggregator {
    client: RemoteBankClient,
    pool: WorkerPool,
    call_timeout: Option<Duration>,
}

impl RemoteAggregator {
    /// `call_timeout` bounds each network call once it holds a worker slot.
    /// `None` waits for every endpoint indefinitely.
    pub fn new(
        client: RemoteBankClient,
        pool: WorkerPool,
        call_timeout: Option<Duration>,
    ) -> Self {
        Self {
            client,
            pool,
            call_timeout,
        }
    }

    pub fn pool(&self) -> &WorkerPool {
        &self.pool
    }

    pub fn call_timeout(&self) -> Option<Duration> {
        self.call_timeout
    }

    /// Fans out one call per endpoint and waits for all of them to settle.
    ///
    /// Records come back in completion order.
    ///
    /// # Errors
    ///
    /// - `AppError::NoEndpointsConfigured` if `directory` is empty; no call is made
    /// - `AppError::NoDataAvailable` if every call failed or returned an invalid record
    pub async fn aggregate(
        &self,
        directory: &EndpointDirectory,
    ) -> Result<AggregationResult, AppError> {
        if directory.is_empty() {
            return Err(AppError::NoEndpointsConfigured);
        }

        let started = Instant::now();
        let total = directory.len();
        debug!("Dispatching {} remote bank calls", total);

        let mut pending: FuturesUnordered<_> = directory
            .iter()
            .map(|endpoint| self.dispatch(endpoint.clone()))
            .collect();

        // Join barrier: drain until every unit has settled.
        let mut outcomes = Vec::with_capacity(total);
        while let Some(outcome) = pending.next().await {
            if let CallOutcome::Failure { label, cause } = &outcome {
                warn!("Remote bank '{}' excluded: {}", label, cause);
            }
            outcomes.push(outcome);
        }

        // Total failure is reported once, by whoever surfaces it.
        let result = AggregationResult::from_outcomes(outcomes)?;
        info!(
            "Aggregation complete: {} successful, {} failed out of {} total in {:?}",
            result.successful_count(),
            result.failed_count(),
            total,
            started.elapsed()
        );
        Ok(result)
    }

    /// Spawns the unit of work for one endpoint and maps its settlement,
    /// including a panic inside the task, to exactly one outcome.
    fn dispatch(&self, endpoint: Endpoint) -> impl Future<Output = CallOutcome> {
        let label = endpoint.label.clone();
        let client = self.client.clone();
        let pool = self.pool.clone();
        let call_timeout = self.call_timeout;

        let handle = tokio::spawn(async move {
            let _slot = pool.acquire().await?;
            fetch_within(&client, &endpoint, call_timeout).await
        });

        async move {
            match handle.await {
                Ok(Ok(record)) => CallOutcome::Success(record),
                Ok(Err(cause)) => CallOutcome::failure(label, cause),
                Err(join_err) => CallOutcome::failure(
                    label,
                    AppError::Generic(format!("remote call task aborted: {}", join_err)),
                ),
            }
        }
    }
}

async fn fetch_within(
    client: &RemoteBankClient,
    endpoint: &Endpoint,
    call_timeout: Option<Duration>,
) -> Result<Record, AppError> {
    match call_timeout {
        Some(limit) => tokio::time::timeout(limit, client.fetch_record(endpoint))
            .await
            .map_err(|_| AppError::Timeout(limit))?,
        None => client.fetch_record(endpoint).await,
    }
}
