//! HTTP error envelope and status mapping.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use focusboard_domain::FocusboardError;
use tracing::{error, warn};

/// Wraps a domain error so handlers can use `?` and still produce a
/// JSON envelope of the form `{"error": "..."}`.
#[derive(Debug)]
pub struct ApiError(pub FocusboardError);

impl From<FocusboardError> for ApiError {
    fn from(err: FocusboardError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = status_for(&self.0);
        if status.is_server_error() {
            error!(error = %self.0, "request failed");
        } else {
            warn!(error = %self.0, "request rejected");
        }

        (status, Json(serde_json::json!({ "error": self.0.to_string() }))).into_response()
    }
}

fn status_for(err: &FocusboardError) -> StatusCode {
    match err {
        FocusboardError::InvalidInput(_) => StatusCode::BAD_REQUEST,
        FocusboardError::Auth(_) | FocusboardError::Security(_) => StatusCode::UNAUTHORIZED,
        FocusboardError::NotConnected(_) | FocusboardError::NotFound(_) => StatusCode::NOT_FOUND,
        FocusboardError::Network(_) => StatusCode::BAD_GATEWAY,
        FocusboardError::Config(_)
        | FocusboardError::Database(_)
        | FocusboardError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}
