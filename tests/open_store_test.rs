use bookshop_catalog::{CatalogStore, ConfigError, NewGenre, StoreConfig, StoreError};
use std::path::Path;
use tempfile::TempDir;

fn write_config(dir: &Path, connection_string: &str) -> std::path::PathBuf {
    let path = dir.join("connect_to_db_config.json");
    let json = serde_json::json!({
        "ConnectionStrings": { "DefaultConnection": connection_string }
    });
    std::fs::write(&path, json.to_string()).unwrap();
    path
}

#[tokio::test]
async fn test_open_from_config_file() {
    let temp_dir = TempDir::new().unwrap();
    let db_path = temp_dir.path().join("bookshop.db");
    let config_path = write_config(
        temp_dir.path(),
        &format!("sqlite://{}", db_path.to_string_lossy()),
    );

    let config = StoreConfig::from_file(&config_path).expect("config failed");
    let store = CatalogStore::open(&config).await.expect("open failed");

    assert!(db_path.exists());
    assert_eq!(store.table_counts().await.unwrap().genres, 0);
}

#[tokio::test]
async fn test_unreachable_database_is_connection_error() {
    let temp_dir = TempDir::new().unwrap();
    let unreachable = temp_dir.path().join("missing").join("nested").join("bookshop.db");
    let config_path = write_config(
        temp_dir.path(),
        &format!("sqlite://{}", unreachable.to_string_lossy()),
    );

    let config = StoreConfig::from_file(&config_path).unwrap();
    let result = CatalogStore::open(&config).await;

    match result {
        Err(StoreError::Connection(_)) => {}
        Err(other) => panic!("Expected Connection error, got {:?}", other),
        Ok(_) => panic!("Expected Connection error, store opened"),
    }
    assert!(!unreachable.exists());
}

#[tokio::test]
async fn test_missing_config_file_is_configuration_error() {
    let temp_dir = TempDir::new().unwrap();
    let result = StoreConfig::from_file(temp_dir.path().join("connect_to_db_config.json"));
    let err: StoreError = result.unwrap_err().into();
    assert!(matches!(
        err,
        StoreError::Configuration(ConfigError::Io { .. })
    ));
}

#[tokio::test]
async fn test_malformed_config_file_is_configuration_error() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("connect_to_db_config.json");
    std::fs::write(&path, "{ not json").unwrap();

    let result = StoreConfig::from_file(&path);
    assert!(matches!(result, Err(ConfigError::Parse(_))));
}

#[tokio::test]
async fn test_reopen_keeps_data() {
    let temp_dir = TempDir::new().unwrap();
    let db_path = temp_dir.path().join("bookshop.db");
    let config = StoreConfig::new(format!("sqlite://{}", db_path.to_string_lossy()));

    let store = CatalogStore::open(&config).await.unwrap();
    let genre = store.insert_genre(&NewGenre::new("Essay")).await.unwrap();
    store.close().await;

    let reopened = CatalogStore::open(&config).await.expect("reopen failed");
    let fetched = reopened.get_genre(genre.id).await.unwrap();
    assert_eq!(fetched, Some(genre));
}
