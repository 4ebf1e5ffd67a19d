//! Runs against a live MongoDB. Ignored by default:
//! `MONGODB_URI=mongodb://localhost:27017 cargo test -- --ignored`

use floorwatch::{
    models::AlertDirection,
    services::{
        alert_store::{AlertStore, MongoAlertStore},
        db_init,
        watch_store::{MongoWatchStore, WatchStore},
    },
};
use mongodb::{bson::oid::ObjectId, Client, Database};

async fn scratch_db() -> Database {
    let uri = std::env::var("MONGODB_URI").unwrap_or_else(|_| "mongodb://localhost:27017".to_string());
    let client = Client::with_uri_str(&uri).await.unwrap();
    let db = client.database(&format!("floorwatch_test_{}", ObjectId::new().to_hex()));
    db_init::ensure_indexes(&db).await.unwrap();
    db
}

#[tokio::test]
#[ignore]
async fn mongo_alert_add_and_deactivate_are_idempotent() {
    let db = scratch_db().await;
    let store = MongoAlertStore::new(&db);

    assert!(store.add(1, "azuki", 10.0, AlertDirection::Below).await.unwrap());
    // the unique index rejects the repeat, direction does not matter
    assert!(!store.add(1, "Azuki", 10.0, AlertDirection::Above).await.unwrap());
    assert!(store.add(1, "azuki", 12.0, AlertDirection::Above).await.unwrap());

    assert_eq!(store.list_active_for(1).await.unwrap().len(), 2);

    assert!(store.deactivate(1, "AZUKI", 10.0).await.unwrap());
    assert!(!store.deactivate(1, "azuki", 10.0).await.unwrap());

    let active = store.list_all_active().await.unwrap();
    assert_eq!(active.len(), 1);
    assert_eq!(active[0].threshold, 12.0);

    assert_eq!(store.remove(1, "Azuki").await.unwrap(), 2);
    assert_eq!(store.remove(1, "azuki").await.unwrap(), 0);

    db.drop(None).await.unwrap();
}

#[tokio::test]
#[ignore]
async fn mongo_watch_keys_match_across_case() {
    let db = scratch_db().await;
    let store = MongoWatchStore::new(&db);

    assert!(store.add(1, "BoredApeYachtClub").await.unwrap());
    assert!(!store.add(1, "boredapeyachtclub").await.unwrap());
    assert!(store.add(2, "boredapeyachtclub").await.unwrap());

    assert_eq!(store.list_for(1).await.unwrap(), vec!["boredapeyachtclub".to_string()]);
    assert_eq!(store.list_all().await.unwrap().len(), 2);

    assert!(store.remove(1, "BOREDAPEYACHTCLUB").await.unwrap());
    assert!(!store.remove(1, "boredapeyachtclub").await.unwrap());
    assert!(store.list_for(1).await.unwrap().is_empty());

    db.drop(None).await.unwrap();
}
