//! JSON body extractor whose rejections come out as [`AppError`]s.

use crate::error::AppError;
use axum::response::{IntoResponse, Response};
use axum_macros::FromRequest;

/// Drop-in for [`axum::Json`].
///
/// Malformed or mistyped bodies are answered in the same error format as
/// every other failure.
#[derive(Debug, Clone, Copy, Default, FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct Json<T>(pub T);

impl<T: serde::Serialize> IntoResponse for Json<T> {
    fn into_response(self) -> Response {
        let Self(value) = self;
        axum::Json(value).into_response()
    }
}
