use std::sync::Arc;

use bankbridge_client::RemoteAggregator;
use bankbridge_core::{AppError, EndpointDirectory, RecordStore};

use tower_http::catch_panic::CatchPanicLayer;

use crate::error::{ApiError, PanicAsUnavailable};

/// Services shared by every request handler.
///
/// Built once at startup and cloned into each request; all fields are
/// cheap handles onto the same underlying objects.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<RecordStore>,
    pub directory: Arc<EndpointDirectory>,
    pub aggregator: RemoteAggregator,
    public_url: Arc<str>,
}

impl AppState {
    pub fn new(
        store: Arc<RecordStore>,
        directory: Arc<EndpointDirectory>,
        aggregator: RemoteAggregator,
        public_url: &str,
    ) -> Self {
        Self {
            store,
            directory,
            aggregator,
            public_url: Arc::from(public_url.trim_end_matches('/')),
        }
    }

    pub fn public_url(&self) -> &str {
        &self.public_url
    }

    /// Wraps `error` as a 503 whose hint points at `sibling_path`.
    pub fn unavailable(&self, error: AppError, sibling_path: &str) -> ApiError {
        ApiError::new(error, format!("{}{}", self.public_url, sibling_path))
    }

    /// Layer turning a handler panic into a 503 that points at `sibling_path`.
    pub fn catch_panic(&self, sibling_path: &str) -> CatchPanicLayer<PanicAsUnavailable> {
        CatchPanicLayer::custom(PanicAsUnavailable::new(format!(
            "{}{}",
            self.public_url, sibling_path
        )))
    }
}
