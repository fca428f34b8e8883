//! Router construction and the listen loop.

use std::net::SocketAddr;

use axum::routing::get;
use axum::Router;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use crate::handlers;
use crate::state::AppState;

pub const LOCAL_BANKS_PATH: &str = "/v1/banks/all";
pub const REMOTE_BANKS_PATH: &str = "/v2/banks/all";

/// Build the axum router with both read routes.
///
/// A panic in either handler is answered with the 503 body, linking to the
/// other route.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route(
            LOCAL_BANKS_PATH,
            get(handlers::local_banks).layer(state.catch_panic(REMOTE_BANKS_PATH)),
        )
        .route(
            REMOTE_BANKS_PATH,
            get(handlers::remote_banks).layer(state.catch_panic(LOCAL_BANKS_PATH)),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Binds `addr` and serves until Ctrl-C.
pub async fn serve(state: AppState, addr: SocketAddr) -> std::io::Result<()> {
    let listener = TcpListener::bind(addr).await?;
    info!("bankbridge listening on {}", listener.local_addr()?);

    axum::serve(listener, build_router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("Shutdown signal received"),
        Err(e) => {
            warn!("Cannot listen for shutdown signal: {}", e);
            std::future::pending::<()>().await;
        }
    }
}
