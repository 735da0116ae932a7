use records_service::services::{InMemoryStore, SearchStore};
use records_service::startup::load_records;
use serde_json::json;
use std::path::PathBuf;
use uuid::Uuid;

fn temp_seed_path() -> PathBuf {
    std::env::temp_dir().join(format!("seed-{}.json", Uuid::new_v4()))
}

#[tokio::test]
async fn seed_file_records_are_indexed_and_searchable() {
    let path = temp_seed_path();
    let records = json!([
        {"name": "Jane Doe", "conditions": "flu"},
        {"name": "John Smith", "conditions": "hypertension"}
    ]);
    tokio::fs::write(&path, records.to_string())
        .await
        .expect("Failed to write seed file");

    let store = InMemoryStore::new("patients");
    let indexed = load_records(&store, path.to_str().unwrap())
        .await
        .expect("Seeding should succeed");

    assert_eq!(indexed, 2);

    let hits = store.search("flu").await.expect("Search should succeed");
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].source["name"], "Jane Doe");

    tokio::fs::remove_file(&path).await.ok();
}

#[tokio::test]
async fn invalid_seed_file_is_rejected() {
    let path = temp_seed_path();
    tokio::fs::write(&path, "{not json")
        .await
        .expect("Failed to write seed file");

    let store = InMemoryStore::new("patients");
    let result = load_records(&store, path.to_str().unwrap()).await;

    let error = result.expect_err("Invalid JSON should fail seeding");
    assert!(
        error.to_string().contains("Invalid seed file"),
        "unexpected error: {}",
        error
    );

    tokio::fs::remove_file(&path).await.ok();
}

#[tokio::test]
async fn missing_seed_file_is_rejected() {
    let path = temp_seed_path();

    let store = InMemoryStore::new("patients");
    let result = load_records(&store, path.to_str().unwrap()).await;

    let error = result.expect_err("A missing file should fail seeding");
    assert!(
        error.to_string().contains("Failed to read seed file"),
        "unexpected error: {}",
        error
    );
}
