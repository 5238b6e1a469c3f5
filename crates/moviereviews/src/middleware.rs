//! Request-level middleware.

use std::time::Duration;

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::handlers::AppError;

/// A request that outlived the configured timeout.
#[derive(Debug, Error)]
#[error("Request timed out after {0:?}")]
pub struct RequestTimeout(pub Duration);

/// Aborts the request once `timeout` elapses.
///
/// Dropping the handler future cancels any in-flight store call. The client
/// sees the same 500 body as any other store fault.
pub async fn enforce_request_timeout(
    State(timeout): State<Duration>,
    request: Request,
    next: Next,
) -> Response {
    match tokio::time::timeout(timeout, next.run(request)).await {
        Ok(response) => response,
        Err(_) => {
            tracing::warn!(timeout = ?timeout, "Request aborted");
            AppError::from(RequestTimeout(timeout)).into_response()
        }
    }
}
