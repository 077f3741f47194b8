//! Generic result/error resprentation(s).

use std::convert::Infallible;

use axum::{
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::ValidationErrors;

/// Standard return type out of routes / handlers
pub type AppResult<T> = std::result::Result<T, AppError>;

/// Encodes [JSONAPI error object responses](https://jsonapi.org/examples/#error-objects).
///
/// JSONAPI error object -  ALL Fields are technically optional.
///
/// This struct uses the following guidelines:
///
/// 1. Always encode the StatusCode of the response
/// 2. Set the title to the `canonical_reason` of the status code.
///    According to spec, this should NOT change over time.
/// 3. For unrecoverable errors, encode the detail as the to_string of the error
///
/// How failures map onto statuses:
///
/// - missing or invalid session: `401 Unauthorized`
/// - absent record, or one owned by someone else: `404 Not Found`
/// - field constraint violations: `400 Bad Request`, field errors as detail
/// - anything else: `500 Internal Server Error` with a message
#[derive(ToSchema, thiserror::Error, Eq, PartialEq, Debug, Deserialize, Serialize)]
pub struct AppError {
    #[schema(value_type = String, example = "404")]
    #[serde(with = "crate::error::serde_status_code")]
    pub(crate) status: StatusCode,
    #[schema(example = "Application with id 01HV6T8R4Y3C9W2M5K7N1P0QZS not found")]
    pub(crate) detail: Option<String>,
    #[schema(example = "Not Found")]
    pub(crate) title: Option<String>,
}

impl AppError {
    /// New instance of [AppError].
    pub fn new<M: ToString>(status_code: StatusCode, message: Option<M>) -> AppError {
        Self {
            status: status_code,
            title: Self::canonical_reason_to_string(&status_code),
            detail: message.map(|m| m.to_string()),
        }
    }

    /// [AppError] for [StatusCode::NOT_FOUND].
    ///
    /// Used both for ids that don't exist and for ids owned by another user.
    pub fn not_found(id: &str) -> AppError {
        Self::new(
            StatusCode::NOT_FOUND,
            Some(format!("Application with id {id} not found")),
        )
    }

    /// [AppError] for [StatusCode::UNAUTHORIZED].
    pub fn unauthenticated<M: ToString>(message: M) -> AppError {
        Self::new(StatusCode::UNAUTHORIZED, Some(message))
    }

    /// The HTTP status this error responds with.
    pub fn status(&self) -> StatusCode {
        self.status
    }

    fn canonical_reason_to_string(status_code: &StatusCode) -> Option<String> {
        status_code.canonical_reason().map(|r| r.to_string())
    }
}

#[derive(Debug, Deserialize, Serialize)]
/// Error in JSON API response format.
pub struct ErrorResponse {
    pub(crate) errors: Vec<AppError>,
}

impl From<AppError> for ErrorResponse {
    fn from(e: AppError) -> Self {
        Self { errors: vec![e] }
    }
}

impl From<AppError> for (StatusCode, Json<ErrorResponse>) {
    fn from(app_error: AppError) -> Self {
        (app_error.status, Json(app_error.into()))
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            tracing::error!(status = %self.status, detail = ?self.detail, "Request failed");
        }

        let error_response: (StatusCode, Json<ErrorResponse>) = self.into();
        error_response.into_response()
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        let err = match err.downcast::<diesel::result::Error>() {
            Ok(err) => return Self::from(err),
            Err(e) => e,
        };

        let err = match err.downcast::<ValidationErrors>() {
            Ok(err) => return Self::from(err),
            Err(e) => e,
        };

        let err = match err.downcast::<JsonRejection>() {
            Ok(err) => return Self::from(err),
            Err(e) => e,
        };

        let err = match err.downcast::<QueryRejection>() {
            Ok(err) => return Self::from(err),
            Err(e) => e,
        };

        Self::new(StatusCode::INTERNAL_SERVER_ERROR, Some(err))
    }
}

impl From<diesel::result::Error> for AppError {
    fn from(err: diesel::result::Error) -> Self {
        match err {
            diesel::result::Error::NotFound => {
                Self::new(StatusCode::NOT_FOUND, Some("Resource Not Found"))
            }
            diesel::result::Error::DatabaseError(
                diesel::result::DatabaseErrorKind::UniqueViolation,
                info,
            ) => Self::new(
                StatusCode::CONFLICT,
                Some(match info.details() {
                    Some(details) => format!("{} ({details})", info.message()),
                    None => info.message().to_string(),
                }),
            ),
            _ => Self::new(StatusCode::INTERNAL_SERVER_ERROR, Some(err)),
        }
    }
}

impl From<ValidationErrors> for AppError {
    fn from(err: ValidationErrors) -> Self {
        Self::new(StatusCode::BAD_REQUEST, Some(err))
    }
}

impl From<JsonRejection> for AppError {
    fn from(value: JsonRejection) -> Self {
        Self::new(value.status(), Some(value.body_text()))
    }
}

impl From<QueryRejection> for AppError {
    fn from(value: QueryRejection) -> Self {
        Self::new(StatusCode::BAD_REQUEST, Some(value))
    }
}

impl From<Infallible> for AppError {
    fn from(the_impossible: Infallible) -> Self {
        match the_impossible {}
    }
}

/// Serialize/Deserializer for status codes.
///
/// This is needed because status code according to JSON API spec must
/// be the status code as a STRING.
///
/// We could have used http_serde, but it encodes the status code as a NUMBER.
pub mod serde_status_code {
    use http::StatusCode;
    use serde::{de::Unexpected, Deserialize, Deserializer, Serialize, Serializer};

    /// Serialize [StatusCode]s.
    pub fn serialize<S: Serializer>(status: &StatusCode, ser: S) -> Result<S::Ok, S::Error> {
        String::serialize(&status.as_u16().to_string(), ser)
    }

    /// Deserialize [StatusCode]s.
    pub fn deserialize<'de, D>(de: D) -> Result<StatusCode, D::Error>
    where
        D: Deserializer<'de>,
    {
        let str = String::deserialize(de)?;
        StatusCode::from_bytes(str.as_bytes()).map_err(|_| {
            serde::de::Error::invalid_value(
                Unexpected::Str(str.as_str()),
                &"A valid http status code",
            )
        })
    }
}

// Needed to support thiserror::Error, outputs debug for AppError
impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{self:?}")
    }
}

#[cfg(test)]
/// Parse the app error out of the json body
pub(crate) async fn parse_error(response: Response) -> AppError {
    let body_bytes = hyper::body::to_bytes(response.into_body()).await.unwrap();
    let mut err_response: ErrorResponse = serde_json::from_slice(&body_bytes).unwrap();
    err_response.errors.remove(0)
}
