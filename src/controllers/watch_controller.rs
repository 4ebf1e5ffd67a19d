use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use serde_json::json;

use crate::{
    models::{normalize_collection_key, OwnerId},
    services::{floor_service, messages, watchlist_service},
    AppState,
};

use super::command_error;

#[derive(Deserialize)]
pub struct AddWatchForm {
    pub collection: String,
}

// GET /users/:owner_id/watches
pub async fn get_watches(State(state): State<AppState>, Path(owner_id): Path<OwnerId>) -> Response {
    match watchlist_service::list_watches(&state, owner_id).await {
        Ok(collections) => (StatusCode::OK, Json(json!({ "collections": collections }))).into_response(),
        Err(e) => command_error(e),
    }
}

// POST /users/:owner_id/watches
pub async fn post_add_watch(
    State(state): State<AppState>,
    Path(owner_id): Path<OwnerId>,
    Json(form): Json<AddWatchForm>,
) -> Response {
    let added = match watchlist_service::add_watch(&state, owner_id, &form.collection).await {
        Ok(v) => v,
        Err(e) => return command_error(e),
    };

    let status = if added { StatusCode::CREATED } else { StatusCode::OK };
    let collection = normalize_collection_key(&form.collection);

    (status, Json(json!({ "collection": collection, "added": added }))).into_response()
}

// DELETE /users/:owner_id/watches/:collection
pub async fn delete_watch(
    State(state): State<AppState>,
    Path((owner_id, collection)): Path<(OwnerId, String)>,
) -> Response {
    match watchlist_service::remove_watch(&state, owner_id, &collection).await {
        Ok(true) => (StatusCode::OK, Json(json!({ "removed": true }))).into_response(),
        Ok(false) => (
            StatusCode::NOT_FOUND,
            Json(json!({ "removed": false, "error": "collection is not on the watch list" })),
        )
            .into_response(),
        Err(e) => command_error(e),
    }
}

// GET /users/:owner_id/check
pub async fn get_check_watches(State(state): State<AppState>, Path(owner_id): Path<OwnerId>) -> Response {
    let entries = match floor_service::check_watched(&state, owner_id).await {
        Ok(v) => v,
        Err(e) => return command_error(e),
    };

    let items: Vec<serde_json::Value> = entries
        .iter()
        .map(|entry| match &entry.result {
            Ok(s) => json!({
                "collection": entry.collection_key,
                "floor_price": s.floor_price,
                "currency_symbol": s.currency_symbol,
            }),
            Err(e) => json!({
                "collection": entry.collection_key,
                "error": e.to_string(),
                "kind": e.kind(),
            }),
        })
        .collect();

    let message = messages::check_report(&entries);

    (StatusCode::OK, Json(json!({ "results": items, "message": message }))).into_response()
}
