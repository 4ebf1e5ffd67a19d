use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::error::{CommandError, FetchError};

pub mod alerts_controller;
pub mod floor_controller;
pub mod home_controller;
pub mod watch_controller;

/// Maps a failed command onto an HTTP status with a JSON error body.
pub(crate) fn command_error(e: CommandError) -> Response {
    let status = match &e {
        CommandError::InvalidCollection | CommandError::InvalidThreshold => StatusCode::BAD_REQUEST,
        CommandError::Upstream(FetchError::NotFound) => StatusCode::NOT_FOUND,
        CommandError::Upstream(FetchError::RateLimited) => StatusCode::TOO_MANY_REQUESTS,
        CommandError::Upstream(FetchError::Timeout) => StatusCode::GATEWAY_TIMEOUT,
        CommandError::Upstream(_) => StatusCode::BAD_GATEWAY,
        CommandError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };

    if status.is_server_error() {
        tracing::error!(error = %e, "command failed");
    }

    (status, Json(json!({ "error": e.to_string() }))).into_response()
}
