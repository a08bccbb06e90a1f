//! Mapping of request failures to HTTP responses.
//!
//! Only failures that happen before the stream response is returned reach
//! here; once the SSE headers are out, the status stays 200.

use axum::http::{header, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use thiserror::Error;

use crate::bridge::BridgeError;

/// Errors returned to the client as plain text.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// Request body is not a decodable chat request.
    #[error("{0}")]
    MalformedInput(String),

    #[error(transparent)]
    Bridge(#[from] BridgeError),
}

impl GatewayError {
    pub fn status(&self) -> StatusCode {
        match self {
            GatewayError::MalformedInput(_) => StatusCode::BAD_REQUEST,
            GatewayError::Bridge(BridgeError::BackendUnavailable(_))
            | GatewayError::Bridge(BridgeError::StreamingUnsupported) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        let mut response = (self.status(), format!("{}\n", self)).into_response();
        response.headers_mut().insert(
            header::X_CONTENT_TYPE_OPTIONS,
            HeaderValue::from_static("nosniff"),
        );
        response
    }
}
