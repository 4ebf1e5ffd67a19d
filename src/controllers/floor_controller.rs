use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::{
    services::{floor_service, messages},
    AppState,
};

use super::command_error;

// GET /collections/:collection/floor
pub async fn get_floor(State(state): State<AppState>, Path(collection): Path<String>) -> Response {
    match floor_service::floor_lookup(&state, &collection).await {
        Ok(report) => {
            let message = messages::floor_report(&report.snapshot, report.info.as_ref());
            (StatusCode::OK, Json(json!({ "report": report, "message": message }))).into_response()
        }
        Err(e) => command_error(e),
    }
}
