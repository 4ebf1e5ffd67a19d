mod common;

use std::sync::Arc;

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
};
use floorwatch::{
    error::FetchError,
    routes,
    services::{memory_store::MemoryStore, watch_store::WatchStore},
};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;

use common::{test_state, FakePriceSource};

fn setup() -> (Arc<MemoryStore>, Arc<FakePriceSource>, axum::Router) {
    let store = Arc::new(MemoryStore::new());
    let prices = Arc::new(FakePriceSource::new());
    let app = routes::app(test_state(&store, &prices));
    (store, prices, app)
}

fn request(method: &str, uri: &str, body: Option<Value>) -> Request<Body> {
    let builder = Request::builder().method(method).uri(uri);
    match body {
        Some(b) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(b.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

async fn response_json(res: axum::response::Response) -> Value {
    let bytes = res.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn health_is_ok() {
    let (_store, _prices, app) = setup();
    let res = app.oneshot(request("GET", "/health", None)).await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
}

#[tokio::test]
async fn unknown_route_is_404_json() {
    let (_store, _prices, app) = setup();
    let res = app.oneshot(request("GET", "/nope", None)).await.unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    assert_eq!(response_json(res).await["error"], "not found");
}

#[tokio::test]
async fn add_watch_normalizes_and_dedupes() {
    let (store, prices, app) = setup();
    prices.set_floor("boredapeyachtclub", 30.0);

    let res = app
        .clone()
        .oneshot(request(
            "POST",
            "/users/1/watches",
            Some(json!({ "collection": "BoredApeYachtClub" })),
        ))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);
    assert_eq!(response_json(res).await["collection"], "boredapeyachtclub");

    let res = app
        .oneshot(request(
            "POST",
            "/users/1/watches",
            Some(json!({ "collection": "boredapeyachtclub" })),
        ))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(response_json(res).await["added"], false);

    assert_eq!(store.list_for(1).await.unwrap(), vec!["boredapeyachtclub".to_string()]);
}

#[tokio::test]
async fn add_watch_for_unknown_collection_fails() {
    let (store, prices, app) = setup();
    prices.set_error("ghost", FetchError::NotFound);

    let res = app
        .oneshot(request("POST", "/users/1/watches", Some(json!({ "collection": "ghost" }))))
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    assert!(store.list_for(1).await.unwrap().is_empty());
}

#[tokio::test]
async fn blank_collection_is_bad_request() {
    let (_store, prices, app) = setup();

    let res = app
        .oneshot(request("POST", "/users/1/watches", Some(json!({ "collection": "   " }))))
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    assert_eq!(prices.total_calls(), 0);
}

#[tokio::test]
async fn path_like_collection_is_rejected_before_lookup() {
    let (store, prices, app) = setup();

    for raw in ["../accounts/x", "azuki?limit=1", "azuki stats"] {
        let res = app
            .clone()
            .oneshot(request("POST", "/users/1/watches", Some(json!({ "collection": raw }))))
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST, "{raw}");
    }

    assert_eq!(prices.total_calls(), 0);
    assert!(store.list_for(1).await.unwrap().is_empty());
}

#[tokio::test]
async fn collection_named_check_can_be_removed() {
    let (store, prices, app) = setup();
    prices.set_floor("check", 1.0);

    let res = app
        .clone()
        .oneshot(request("POST", "/users/1/watches", Some(json!({ "collection": "check" }))))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);

    let res = app
        .oneshot(request("DELETE", "/users/1/watches/check", None))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    assert!(store.list_for(1).await.unwrap().is_empty());
}

#[tokio::test]
async fn list_and_remove_watches() {
    let (store, _prices, app) = setup();
    WatchStore::add(store.as_ref(), 1, "azuki").await.unwrap();
    WatchStore::add(store.as_ref(), 1, "doodles").await.unwrap();

    let res = app.clone().oneshot(request("GET", "/users/1/watches", None)).await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(response_json(res).await["collections"], json!(["azuki", "doodles"]));

    let res = app
        .clone()
        .oneshot(request("DELETE", "/users/1/watches/Azuki", None))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let res = app
        .oneshot(request("DELETE", "/users/1/watches/azuki", None))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    assert_eq!(store.list_for(1).await.unwrap(), vec!["doodles".to_string()]);
}

#[tokio::test]
async fn check_reports_partial_failures_inline() {
    let (store, prices, app) = setup();
    WatchStore::add(store.as_ref(), 1, "azuki").await.unwrap();
    WatchStore::add(store.as_ref(), 1, "broken").await.unwrap();
    prices.set_floor("azuki", 4.5);
    prices.set_error("broken", FetchError::Timeout);

    let res = app
        .oneshot(request("GET", "/users/1/check", None))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let body = response_json(res).await;
    let results = body["results"].as_array().unwrap();
    assert_eq!(results.len(), 2);
    assert_eq!(results[0]["floor_price"], 4.5);
    assert_eq!(results[1]["kind"], "timeout");

    let message = body["message"].as_str().unwrap();
    assert!(message.contains("`azuki`: *4.5000 ETH*"));
    assert!(message.contains("`broken`: ❌"));

    assert_eq!(prices.calls("azuki"), 1);
    assert_eq!(prices.calls("broken"), 1);
}

#[tokio::test]
async fn floor_lookup_merges_stats_and_info() {
    let (_store, prices, app) = setup();
    prices.set_floor("azuki", 5.0);
    prices.set_name("azuki", "Azuki");

    let res = app
        .oneshot(request("GET", "/collections/Azuki/floor", None))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let body = response_json(res).await;
    assert_eq!(body["report"]["snapshot"]["floor_price"], 5.0);
    assert_eq!(body["report"]["info"]["name"], "Azuki");
    let message = body["message"].as_str().unwrap();
    assert!(message.contains("*Azuki*"));
    assert!(message.contains("10,000"));
}

#[tokio::test]
async fn floor_lookup_survives_missing_info() {
    let (_store, prices, app) = setup();
    prices.set_floor("azuki", 5.0);

    let res = app
        .oneshot(request("GET", "/collections/azuki/floor", None))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let body = response_json(res).await;
    assert!(body["report"]["info"].is_null());
    assert!(body["message"].as_str().unwrap().contains("*Collection*"));
}

#[tokio::test]
async fn floor_lookup_failure_maps_status() {
    let (_store, prices, app) = setup();
    prices.set_error("azuki", FetchError::UpstreamError(502));

    let res = app
        .oneshot(request("GET", "/collections/azuki/floor", None))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_GATEWAY);
}
