//! `tab_authors` operations for the catalog store.

use crate::domain::{Author, AuthorId, NewAuthor};
use crate::error::StoreError;
use sqlx::sqlite::SqliteRow;
use sqlx::Row;
use tracing::debug;

use super::{expect_one_row, validated, CatalogStore};

impl CatalogStore {
    /// Insert an author and return it with its assigned id.
    ///
    /// # Errors
    /// `Validation` if a name is blank or too long.
    pub async fn insert_author(&self, author: &NewAuthor) -> Result<Author, StoreError> {
        validated(author.validate())?;

        let result = sqlx::query("INSERT INTO tab_authors (first_name, last_name) VALUES (?, ?)")
            .bind(author.first_name.as_str())
            .bind(author.last_name.as_str())
            .execute(&self.pool)
            .await
            .map_err(|e| StoreError::from_write(Author::TABLE, e))?;

        let id = AuthorId::new(result.last_insert_rowid());
        debug!(table = Author::TABLE, id = id.as_i64(), "row inserted");
        Ok(Author {
            id,
            first_name: author.first_name.clone(),
            last_name: author.last_name.clone(),
        })
    }

    /// # Errors
    /// Returns an error if the query fails.
    pub async fn get_author(&self, id: AuthorId) -> Result<Option<Author>, StoreError> {
        let row = sqlx::query("SELECT id, first_name, last_name FROM tab_authors WHERE id = ?")
            .bind(id.as_i64())
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(|r| author_from_row(&r, "")).transpose()?)
    }

    /// # Errors
    /// Returns an error if the query fails.
    pub async fn list_authors(&self) -> Result<Vec<Author>, StoreError> {
        let rows = sqlx::query("SELECT id, first_name, last_name FROM tab_authors ORDER BY id ASC")
            .fetch_all(&self.pool)
            .await?;

        Ok(rows
            .iter()
            .map(|r| author_from_row(r, ""))
            .collect::<Result<_, _>>()?)
    }

    /// # Errors
    /// `Validation` for a bad name, `NotFound` if the author does not exist.
    pub async fn update_author(&self, author: &Author) -> Result<(), StoreError> {
        validated(author.validate())?;

        let result =
            sqlx::query("UPDATE tab_authors SET first_name = ?, last_name = ? WHERE id = ?")
                .bind(author.first_name.as_str())
                .bind(author.last_name.as_str())
                .bind(author.id.as_i64())
                .execute(&self.pool)
                .await
                .map_err(|e| StoreError::from_write(Author::TABLE, e))?;

        expect_one_row(Author::TABLE, author.id.as_i64(), &result)
    }

    /// Delete an author that no book references.
    ///
    /// # Errors
    /// `ConstraintViolation` while books still reference the author,
    /// `NotFound` if the author does not exist.
    pub async fn delete_author(&self, id: AuthorId) -> Result<(), StoreError> {
        self.delete_row(Author::TABLE, id.as_i64()).await
    }
}

/// Map an author from `row`, reading columns named `{prefix}id` etc.
pub(super) fn author_from_row(row: &SqliteRow, prefix: &str) -> Result<Author, sqlx::Error> {
    Ok(Author {
        id: AuthorId::new(row.try_get(format!("{}id", prefix).as_str())?),
        first_name: row.try_get(format!("{}first_name", prefix).as_str())?,
        last_name: row.try_get(format!("{}last_name", prefix).as_str())?,
    })
}
