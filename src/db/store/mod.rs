//! Catalog store: typed access to the six catalog tables.
//!
//! `CatalogStore` owns the session pool. Methods are organized across
//! submodules by table:
//! - `authors.rs`, `genres.rs`, `publishing_houses.rs` - parent tables
//! - `books.rs` - books and the book/author/genre join
//! - `editions.rs` - editions and their joins
//! - `prices.rs` - edition prices
//!
//! Every write is a single statement, so a rejected write changes nothing.

mod authors;
mod books;
mod editions;
mod genres;
mod prices;
mod publishing_houses;

use crate::config::StoreConfig;
use crate::db::migrations::init_db;
use crate::domain::{Author, Book, Edition, Genre, Price, PublishingHouse, ValidationError};
use crate::error::StoreError;
use serde::Serialize;
use sqlx::sqlite::{SqlitePool, SqliteQueryResult};
use tracing::{debug, warn};

/// Row count of every catalog table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TableCounts {
    pub authors: i64,
    pub genres: i64,
    pub books: i64,
    pub publishing_houses: i64,
    pub editions: i64,
    pub prices: i64,
}

/// Session handle for the bookshop catalog.
pub struct CatalogStore {
    pool: SqlitePool,
}

impl CatalogStore {
    /// Open a session described by `config` and apply the schema.
    ///
    /// # Errors
    /// `Configuration` for an unusable connection string, `Connection` when
    /// the database cannot be opened.
    pub async fn open(config: &StoreConfig) -> Result<Self, StoreError> {
        let pool = init_db(config).await?;
        Ok(CatalogStore { pool })
    }

    /// Open using `connect_to_db_config.json` (or `$BOOKSHOP_CONFIG`).
    ///
    /// # Errors
    /// See [`StoreConfig::load_default`] and [`CatalogStore::open`].
    pub async fn open_default() -> Result<Self, StoreError> {
        let config = StoreConfig::load_default()?;
        Self::open(&config).await
    }

    /// Underlying session pool, for queries the typed API does not cover.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Close every connection in the session.
    pub async fn close(&self) {
        self.pool.close().await;
    }

    /// # Errors
    /// Returns an error if any count query fails.
    pub async fn table_counts(&self) -> Result<TableCounts, StoreError> {
        Ok(TableCounts {
            authors: self.count_rows(Author::TABLE).await?,
            genres: self.count_rows(Genre::TABLE).await?,
            books: self.count_rows(Book::TABLE).await?,
            publishing_houses: self.count_rows(PublishingHouse::TABLE).await?,
            editions: self.count_rows(Edition::TABLE).await?,
            prices: self.count_rows(Price::TABLE).await?,
        })
    }

    // =========================================================================
    // Shared statement helpers
    // =========================================================================

    /// `table` is always one of the `TABLE` constants, never caller input.
    async fn count_rows(&self, table: &'static str) -> Result<i64, StoreError> {
        let (count,): (i64,) = sqlx::query_as(&format!("SELECT COUNT(*) FROM {}", table))
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    /// Delete one row by key. Fails instead of cascading when dependents exist.
    async fn delete_row(&self, table: &'static str, id: i64) -> Result<(), StoreError> {
        let result = sqlx::query(&format!("DELETE FROM {} WHERE id = ?", table))
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| StoreError::from_write(table, e));

        match result {
            Ok(done) => {
                expect_one_row(table, id, &done)?;
                debug!(table, id, "row deleted");
                Ok(())
            }
            Err(err) => {
                if err.is_constraint_violation() {
                    warn!(table, id, "delete blocked by dependent rows");
                }
                Err(err)
            }
        }
    }
}

fn expect_one_row(
    table: &'static str,
    id: i64,
    result: &SqliteQueryResult,
) -> Result<(), StoreError> {
    if result.rows_affected() == 0 {
        return Err(StoreError::NotFound { table, id });
    }
    Ok(())
}

fn validated(check: Result<(), ValidationError>) -> Result<(), StoreError> {
    check.map_err(|err| {
        debug!(table = err.table, column = err.column, "write rejected: {}", err.kind);
        StoreError::Validation(err)
    })
}

/// Decode a text column holding a [`crate::domain::Decimal`].
fn decode_decimal(
    row: &sqlx::sqlite::SqliteRow,
    column: &str,
) -> Result<crate::domain::Decimal, sqlx::Error> {
    use sqlx::Row;

    let raw: String = row.try_get(column)?;
    crate::domain::Decimal::parse(&raw).map_err(|e| sqlx::Error::ColumnDecode {
        index: column.to_string(),
        source: Box::new(e),
    })
}
