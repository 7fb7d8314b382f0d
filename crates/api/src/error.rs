//! Mapping of domain errors to JSON responses.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use kassenwart_shared::{AppError, ErrorKind};
use serde_json::json;
use tracing::error;

/// Converts any domain error into a `{"error", "message"}` response.
///
/// Internal failures are logged and their detail is not exposed.
pub fn error_response(err: impl Into<AppError>) -> Response {
    let err = err.into();
    let status =
        StatusCode::from_u16(err.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

    if err.kind() == ErrorKind::Internal {
        error!(error = %err, "Request failed with internal error");
        return (
            status,
            Json(json!({
                "error": "internal_error",
                "message": "An error occurred"
            })),
        )
            .into_response();
    }

    (
        status,
        Json(json!({
            "error": err.error_code(),
            "message": err.message()
        })),
    )
        .into_response()
}
