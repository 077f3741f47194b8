//! Middleware for runtime, [tower_http] extensions.

use crate::error::AppError;
use axum::response::{IntoResponse, Response};
use std::any::Any;

/// Middleware function for catching runtime panics, logging
/// them, and converting them into a `500 Internal Server` response.
pub fn catch_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let details = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "Unknown panic message".to_string()
    };

    tracing::error!(panic = %details, "Handler panicked");

    AppError::new(
        http::StatusCode::INTERNAL_SERVER_ERROR,
        Some("Internal server error"),
    )
    .into_response()
}
