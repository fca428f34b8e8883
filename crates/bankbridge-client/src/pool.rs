//! Process-wide bound on concurrent remote calls.

use std::sync::Arc;

use bankbridge_core::error::AppError;
use tokio::sync::{OwnedSemaphorePermit, Semaphore};

/// A fixed number of worker slots shared by every aggregation.
///
/// Acquiring a slot waits when all slots are busy; submissions queue, they
/// never fail because the pool is full. Cloning shares the same slots.
#[derive(Clone, Debug)]
pub struct WorkerPool {
    slots: Arc<Semaphore>,
    size: usize,
}

impl WorkerPool {
    /// Creates a pool with `size` slots.
    ///
    /// # Panics
    ///
    /// Panics if `size` is zero. Configuration loading rejects that value.
    pub fn new(size: usize) -> Self {
        assert!(size > 0, "worker pool size must be at least 1");
        Self {
            slots: Arc::new(Semaphore::new(size)),
            size,
        }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    /// Number of slots currently free.
    pub fn available(&self) -> usize {
        self.slots.available_permits()
    }

    /// Waits for a free slot. The slot is released when the permit drops.
    pub async fn acquire(&self) -> Result<OwnedSemaphorePermit, AppError> {
        Arc::clone(&self.slots)
            .acquire_owned()
            .await
            .map_err(|_| AppError::Generic("worker pool is closed".to_string()))
    }
}
