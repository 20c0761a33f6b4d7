//! Session bootstrap: connect, configure pragmas, apply the schema.

use crate::config::{ConfigError, StoreConfig, DEFAULT_CONNECTION_NAME};
use crate::error::StoreError;
use sqlx::sqlite::{SqliteConnectOptions, SqliteConnection, SqlitePool, SqlitePoolOptions};
use std::str::FromStr;
use tracing::{debug, info};

/// Open a pool for `config` and bring the schema up to date.
///
/// # Errors
/// `Configuration` if the connection string cannot be parsed, `Connection`
/// if the database cannot be opened, `Database` if applying the schema fails.
pub async fn init_db(config: &StoreConfig) -> Result<SqlitePool, StoreError> {
    let options = SqliteConnectOptions::from_str(&config.connection_string)
        .map_err(|e| {
            ConfigError::InvalidValue(DEFAULT_CONNECTION_NAME.to_string(), e.to_string())
        })?
        .create_if_missing(config.create_if_missing);

    let pool = SqlitePoolOptions::new()
        .max_connections(config.max_connections)
        // An in-memory database lives only as long as its connection.
        .idle_timeout(None)
        .max_lifetime(None)
        .after_connect(|conn, _meta| Box::pin(async move { configure_pragmas_conn(conn).await }))
        .connect_with(options)
        .await
        .map_err(StoreError::Connection)?;

    run_migrations(&pool).await?;

    info!(
        max_connections = config.max_connections,
        "Catalog store opened"
    );
    Ok(pool)
}

/// Apply `schema.sql`. Every statement is `IF NOT EXISTS`, so this is safe to rerun.
pub(crate) async fn run_migrations(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    info!("Applying catalog schema...");
    let schema_sql = include_str!("schema.sql");

    for statement in schema_sql.split(';') {
        let trimmed = statement.trim();
        if !trimmed.is_empty() {
            sqlx::query(trimmed).execute(pool).await?;
        }
    }

    info!("Catalog schema ready");
    Ok(())
}

async fn configure_pragmas_conn(conn: &mut SqliteConnection) -> Result<(), sqlx::Error> {
    use sqlx::Row;

    // Referential integrity depends on this; SQLite leaves it off by default.
    sqlx::query("PRAGMA foreign_keys = ON")
        .execute(&mut *conn)
        .await?;

    // journal_mode returns the actual mode set; must use fetch to get result
    let row = sqlx::query("PRAGMA journal_mode = WAL")
        .fetch_one(&mut *conn)
        .await?;
    let journal_mode: String = row.get(0);
    debug!("SQLite journal_mode set to: {}", journal_mode);

    sqlx::query("PRAGMA busy_timeout = 5000")
        .execute(&mut *conn)
        .await?;
    sqlx::query("PRAGMA synchronous = NORMAL")
        .execute(&mut *conn)
        .await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;
    use tempfile::TempDir;

    fn file_config(temp_dir: &TempDir) -> (StoreConfig, String) {
        let db_path = temp_dir
            .path()
            .join("bookshop.db")
            .to_string_lossy()
            .to_string();
        (StoreConfig::new(format!("sqlite://{}", db_path)), db_path)
    }

    #[tokio::test]
    async fn test_init_db_creates_database() {
        let temp_dir = TempDir::new().unwrap();
        let (config, db_path) = file_config(&temp_dir);

        let pool = init_db(&config).await.expect("init_db failed");
        assert!(Path::new(&db_path).exists());

        let result: (i64,) = sqlx::query_as("SELECT 1")
            .fetch_one(&pool)
            .await
            .expect("query failed");
        assert_eq!(result.0, 1);
    }

    #[tokio::test]
    async fn test_migrations_create_all_tables() {
        let temp_dir = TempDir::new().unwrap();
        let (config, _) = file_config(&temp_dir);
        let pool = init_db(&config).await.expect("init_db failed");

        let rows: Vec<(String,)> = sqlx::query_as(
            "SELECT name FROM sqlite_master WHERE type='table' AND name LIKE 'tab_%' ORDER BY name",
        )
        .fetch_all(&pool)
        .await
        .expect("query failed");
        let names: Vec<&str> = rows.iter().map(|r| r.0.as_str()).collect();
        assert_eq!(
            names,
            vec![
                "tab_authors",
                "tab_books",
                "tab_editions",
                "tab_genres",
                "tab_prices",
                "tab_publishing_houses",
            ]
        );
    }

    #[tokio::test]
    async fn test_migrations_create_named_indexes() {
        let temp_dir = TempDir::new().unwrap();
        let (config, _) = file_config(&temp_dir);
        let pool = init_db(&config).await.expect("init_db failed");

        for (index, table) in [
            ("id_author", "tab_books"),
            ("id_genre", "tab_books"),
            ("id_book", "tab_editions"),
            ("id_publishing_house", "tab_editions"),
            ("id_edition", "tab_prices"),
        ] {
            let result: (String,) = sqlx::query_as(
                "SELECT tbl_name FROM sqlite_master WHERE type='index' AND name = ?",
            )
            .bind(index)
            .fetch_one(&pool)
            .await
            .expect("index missing");
            assert_eq!(result.0, table);
        }
    }

    #[tokio::test]
    async fn test_migrations_idempotent() {
        let temp_dir = TempDir::new().unwrap();
        let (config, _) = file_config(&temp_dir);
        let pool = init_db(&config).await.expect("init_db failed");

        run_migrations(&pool)
            .await
            .expect("second migration run failed");
    }

    #[tokio::test]
    async fn test_foreign_keys_enabled() {
        let temp_dir = TempDir::new().unwrap();
        let (config, _) = file_config(&temp_dir);
        let pool = init_db(&config).await.expect("init_db failed");

        let result: (i64,) = sqlx::query_as("PRAGMA foreign_keys")
            .fetch_one(&pool)
            .await
            .expect("query failed");
        assert_eq!(result.0, 1);
    }

    #[tokio::test]
    async fn test_missing_directory_is_connection_error() {
        let temp_dir = TempDir::new().unwrap();
        let db_path = temp_dir.path().join("no_such_dir").join("bookshop.db");
        let config = StoreConfig::new(format!("sqlite://{}", db_path.to_string_lossy()));

        let err = init_db(&config).await.unwrap_err();
        assert!(matches!(err, StoreError::Connection(_)), "got {:?}", err);
    }

    #[tokio::test]
    async fn test_missing_file_without_create_is_connection_error() {
        let temp_dir = TempDir::new().unwrap();
        let (mut config, _) = file_config(&temp_dir);
        config.create_if_missing = false;

        let err = init_db(&config).await.unwrap_err();
        assert!(matches!(err, StoreError::Connection(_)), "got {:?}", err);
    }
}
