//! `tab_genres` operations for the catalog store.

use crate::domain::{Genre, GenreId, NewGenre};
use crate::error::StoreError;
use sqlx::sqlite::SqliteRow;
use sqlx::Row;
use tracing::debug;

use super::{expect_one_row, validated, CatalogStore};

impl CatalogStore {
    /// # Errors
    /// `Validation` if the name is blank or longer than 50 characters.
    pub async fn insert_genre(&self, genre: &NewGenre) -> Result<Genre, StoreError> {
        validated(genre.validate())?;

        let result = sqlx::query("INSERT INTO tab_genres (name) VALUES (?)")
            .bind(genre.name.as_str())
            .execute(&self.pool)
            .await
            .map_err(|e| StoreError::from_write(Genre::TABLE, e))?;

        let id = GenreId::new(result.last_insert_rowid());
        debug!(table = Genre::TABLE, id = id.as_i64(), "row inserted");
        Ok(Genre {
            id,
            name: genre.name.clone(),
        })
    }

    /// # Errors
    /// Returns an error if the query fails.
    pub async fn get_genre(&self, id: GenreId) -> Result<Option<Genre>, StoreError> {
        let row = sqlx::query("SELECT id, name FROM tab_genres WHERE id = ?")
            .bind(id.as_i64())
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(|r| genre_from_row(&r, "")).transpose()?)
    }

    /// # Errors
    /// Returns an error if the query fails.
    pub async fn list_genres(&self) -> Result<Vec<Genre>, StoreError> {
        let rows = sqlx::query("SELECT id, name FROM tab_genres ORDER BY id ASC")
            .fetch_all(&self.pool)
            .await?;

        Ok(rows
            .iter()
            .map(|r| genre_from_row(r, ""))
            .collect::<Result<_, _>>()?)
    }

    /// # Errors
    /// `Validation` for a bad name, `NotFound` if the genre does not exist.
    pub async fn update_genre(&self, genre: &Genre) -> Result<(), StoreError> {
        validated(genre.validate())?;

        let result = sqlx::query("UPDATE tab_genres SET name = ? WHERE id = ?")
            .bind(genre.name.as_str())
            .bind(genre.id.as_i64())
            .execute(&self.pool)
            .await
            .map_err(|e| StoreError::from_write(Genre::TABLE, e))?;

        expect_one_row(Genre::TABLE, genre.id.as_i64(), &result)
    }

    /// # Errors
    /// `ConstraintViolation` while books still use the genre,
    /// `NotFound` if the genre does not exist.
    pub async fn delete_genre(&self, id: GenreId) -> Result<(), StoreError> {
        self.delete_row(Genre::TABLE, id.as_i64()).await
    }
}

pub(super) fn genre_from_row(row: &SqliteRow, prefix: &str) -> Result<Genre, sqlx::Error> {
    Ok(Genre {
        id: GenreId::new(row.try_get(format!("{}id", prefix).as_str())?),
        name: row.try_get(format!("{}name", prefix).as_str())?,
    })
}
