use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use serde_json::json;

use crate::{
    models::{AlertDirection, OwnerId},
    services::{alerts_service, messages},
    AppState,
};

use super::command_error;

#[derive(Deserialize)]
pub struct CreateAlertForm {
    pub collection: String,
    pub threshold: f64,
    #[serde(default)]
    pub direction: AlertDirection,
}

// GET /users/:owner_id/alerts
pub async fn get_alerts(State(state): State<AppState>, Path(owner_id): Path<OwnerId>) -> Response {
    let alerts = match alerts_service::list_alerts(&state, owner_id).await {
        Ok(v) => v,
        Err(e) => return command_error(e),
    };

    let items: Vec<serde_json::Value> = alerts
        .iter()
        .map(|a| {
            json!({
                "collection": a.collection_key,
                "threshold": a.threshold,
                "direction": a.direction,
                "created_at": a.created_at,
            })
        })
        .collect();

    let message = messages::alert_list(&alerts);

    (StatusCode::OK, Json(json!({ "alerts": items, "message": message }))).into_response()
}

// POST /users/:owner_id/alerts
pub async fn post_create_alert(
    State(state): State<AppState>,
    Path(owner_id): Path<OwnerId>,
    Json(form): Json<CreateAlertForm>,
) -> Response {
    let outcome = match alerts_service::set_alert(
        &state,
        owner_id,
        &form.collection,
        form.threshold,
        form.direction,
    )
    .await
    {
        Ok(o) => o,
        Err(e) => return command_error(e),
    };

    let status = if outcome.created {
        StatusCode::CREATED
    } else {
        StatusCode::OK
    };

    (
        status,
        Json(json!({
            "collection": outcome.collection_key,
            "threshold": outcome.threshold,
            "direction": outcome.direction,
            "created": outcome.created,
        })),
    )
        .into_response()
}

// DELETE /users/:owner_id/alerts/:collection
pub async fn delete_alerts(
    State(state): State<AppState>,
    Path((owner_id, collection)): Path<(OwnerId, String)>,
) -> Response {
    match alerts_service::remove_alerts(&state, owner_id, &collection).await {
        Ok(removed) => (StatusCode::OK, Json(json!({ "removed": removed }))).into_response(),
        Err(e) => command_error(e),
    }
}
