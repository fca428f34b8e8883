//! GET handlers for the two read paths.

use axum::extract::State;
use axum::http::header;
use axum::response::{IntoResponse, Response};
use bankbridge_core::assemble;
use tracing::debug;

use crate::error::ApiError;
use crate::router::{LOCAL_BANKS_PATH, REMOTE_BANKS_PATH};
use crate::state::AppState;

/// GET /v1/banks/all returns every row of the locally seeded table.
pub async fn local_banks(State(state): State<AppState>) -> Result<Response, ApiError> {
    let records = state.store.all_entries();
    debug!("Serving {} local banks", records.len());

    let body = assemble(&records).map_err(|e| state.unavailable(e, REMOTE_BANKS_PATH))?;
    Ok(json(body))
}

/// GET /v2/banks/all runs the live fan-out across the remote providers.
pub async fn remote_banks(State(state): State<AppState>) -> Result<Response, ApiError> {
    let result = state
        .aggregator
        .aggregate(&state.directory)
        .await
        .map_err(|e| state.unavailable(e, LOCAL_BANKS_PATH))?;

    let body = assemble(result.records()).map_err(|e| state.unavailable(e, LOCAL_BANKS_PATH))?;
    Ok(json(body))
}

fn json(body: Vec<u8>) -> Response {
    ([(header::CONTENT_TYPE, "application/json")], body).into_response()
}
