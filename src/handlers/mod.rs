pub mod rest;
pub mod rpc;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::service::ServiceError;

/// Plain-text response for a failed operation. Storage failures are logged
/// here; the caller gets a generic message.
fn error_response(e: &ServiceError, action: &str) -> Response {
    match e {
        ServiceError::Validation(e) => (StatusCode::BAD_REQUEST, e.to_string()).into_response(),
        ServiceError::Store(e) => {
            tracing::error!("failed to {action}: {e}");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Failed to {action}"),
            )
                .into_response()
        }
    }
}
