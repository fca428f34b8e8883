//! Bankbridge Server - HTTP boundary for the local and remote bank lookups.
//!
//! Both routes answer `application/json` arrays of `{"id", "name"}` objects.
//! Any failure is reported as a single HTTP 503 pointing at the sibling route.

pub mod error;
pub mod handlers;
pub mod router;
pub mod state;

pub use error::{ApiError, PanicAsUnavailable};
pub use router::{build_router, serve, LOCAL_BANKS_PATH, REMOTE_BANKS_PATH};
pub use state::AppState;
