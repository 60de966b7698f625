use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

/// Request-level errors surfaced to HTTP callers.
///
/// Transport failures and configuration gaps are deliberately not here: per
/// the dispatch contract they resolve to 200 responses, never error statuses.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("invalid or missing fields: {}", fields.join(", "))]
    InvalidReport { fields: Vec<String> },

    #[error("Internal Server Error: {0:?}")]
    Internal(#[from] anyhow::Error),
}

impl Error {
    fn http_code(&self) -> StatusCode {
        match self {
            Error::InvalidReport { .. } => StatusCode::BAD_REQUEST,
            Error::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        // Trace server errors since we don't return the detailed error in the response body
        if self.http_code().is_server_error() {
            tracing::error!("Error Status {}: {}", self.http_code(), self);
            let body = Json(json!({"error": "an internal server error occurred"}));
            return (self.http_code(), body).into_response();
        }

        let body = Json(json!({"error": self.to_string()}));
        (self.http_code(), body).into_response()
    }
}
