use std::any::Any;
use std::sync::Arc;

use axum::body::Body;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use bankbridge_core::AppError;
use serde::Serialize;
use tower_http::catch_panic::ResponseForPanic;
use tracing::error;

/// A request-level failure, always rendered as HTTP 503.
#[derive(Debug)]
pub struct ApiError {
    source: AppError,
    relevant_link: String,
}

/// JSON body of a 503 response.
#[derive(Debug, Serialize)]
pub struct UnavailableBody {
    pub status: u16,
    pub code: u32,
    pub message: String,
    pub relevant_links: String,
}

impl ApiError {
    pub fn new(source: AppError, relevant_link: String) -> Self {
        Self {
            source,
            relevant_link,
        }
    }

    pub fn cause(&self) -> &AppError {
        &self.source
    }

    pub fn body(&self) -> UnavailableBody {
        UnavailableBody {
            status: StatusCode::SERVICE_UNAVAILABLE.as_u16(),
            code: self.source.code(),
            message: format!("SERVICE UNAVAILABLE - {}", self.source),
            relevant_links: self.relevant_link.clone(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        error!("Request failed: {}", self.source);
        (StatusCode::SERVICE_UNAVAILABLE, Json(self.body())).into_response()
    }
}

/// Renders a panic inside a handler as the same 503 body as any other failure.
#[derive(Debug, Clone)]
pub struct PanicAsUnavailable {
    relevant_link: Arc<str>,
}

impl PanicAsUnavailable {
    pub fn new(relevant_link: impl Into<Arc<str>>) -> Self {
        Self {
            relevant_link: relevant_link.into(),
        }
    }
}

impl ResponseForPanic for PanicAsUnavailable {
    type ResponseBody = Body;

    fn response_for_panic(&mut self, err: Box<dyn Any + Send + 'static>) -> Response<Body> {
        let detail = if let Some(msg) = err.downcast_ref::<&str>() {
            msg.to_string()
        } else if let Some(msg) = err.downcast_ref::<String>() {
            msg.clone()
        } else {
            "unknown panic".to_string()
        };

        ApiError::new(
            AppError::Generic(format!("Request handler panicked: {}", detail)),
            self.relevant_link.to_string(),
        )
        .into_response()
    }
}
