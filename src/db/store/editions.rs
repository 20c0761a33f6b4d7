//! `tab_editions` operations for the catalog store.

use crate::domain::{
    BookId, Edition, EditionDetails, EditionId, EditionWithPrices, NewEdition, PublishingHouseId,
    Year,
};
use crate::error::StoreError;
use sqlx::sqlite::SqliteRow;
use sqlx::Row;
use tracing::debug;

use super::books::book_from_row;
use super::publishing_houses::publishing_house_from_row;
use super::{expect_one_row, validated, CatalogStore};

const EDITION_COLUMNS: &str =
    "id, id_book, id_publishing_house, number_of_pages, year_of_publishing";

impl CatalogStore {
    /// Insert an edition of an existing book by an existing publishing house.
    ///
    /// # Errors
    /// `Validation` for a bad page count or year, `ConstraintViolation` if the
    /// book or publishing house does not exist.
    pub async fn insert_edition(&self, edition: &NewEdition) -> Result<Edition, StoreError> {
        validated(edition.validate())?;

        let result = sqlx::query(
            r#"
            INSERT INTO tab_editions (id_book, id_publishing_house, number_of_pages, year_of_publishing)
            VALUES (?, ?, ?, ?)
            "#,
        )
        .bind(edition.book_id.as_i64())
        .bind(edition.publishing_house_id.as_i64())
        .bind(edition.number_of_pages)
        .bind(edition.year_of_publishing.map(|y| y.as_i32()))
        .execute(&self.pool)
        .await
        .map_err(|e| StoreError::from_write(Edition::TABLE, e))?;

        let id = EditionId::new(result.last_insert_rowid());
        debug!(table = Edition::TABLE, id = id.as_i64(), "row inserted");
        Ok(Edition {
            id,
            book_id: edition.book_id,
            publishing_house_id: edition.publishing_house_id,
            number_of_pages: edition.number_of_pages,
            year_of_publishing: edition.year_of_publishing,
        })
    }

    /// # Errors
    /// Returns an error if the query fails.
    pub async fn get_edition(&self, id: EditionId) -> Result<Option<Edition>, StoreError> {
        let row = sqlx::query(&format!(
            "SELECT {} FROM tab_editions WHERE id = ?",
            EDITION_COLUMNS
        ))
        .bind(id.as_i64())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|r| edition_from_row(&r, "")).transpose()?)
    }

    /// # Errors
    /// Returns an error if the query fails.
    pub async fn list_editions(&self) -> Result<Vec<Edition>, StoreError> {
        let rows = sqlx::query(&format!(
            "SELECT {} FROM tab_editions ORDER BY id ASC",
            EDITION_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(collect_editions(&rows)?)
    }

    /// # Errors
    /// Returns an error if the query fails.
    pub async fn list_editions_by_book(&self, book_id: BookId) -> Result<Vec<Edition>, StoreError> {
        let rows = sqlx::query(&format!(
            "SELECT {} FROM tab_editions WHERE id_book = ? ORDER BY id ASC",
            EDITION_COLUMNS
        ))
        .bind(book_id.as_i64())
        .fetch_all(&self.pool)
        .await?;

        Ok(collect_editions(&rows)?)
    }

    /// # Errors
    /// Returns an error if the query fails.
    pub async fn list_editions_by_publishing_house(
        &self,
        publishing_house_id: PublishingHouseId,
    ) -> Result<Vec<Edition>, StoreError> {
        let rows = sqlx::query(&format!(
            "SELECT {} FROM tab_editions WHERE id_publishing_house = ? ORDER BY id ASC",
            EDITION_COLUMNS
        ))
        .bind(publishing_house_id.as_i64())
        .fetch_all(&self.pool)
        .await?;

        Ok(collect_editions(&rows)?)
    }

    /// Fetch an edition with all of its prices.
    ///
    /// Two reads on the same session; a price written between them may or may
    /// not be included.
    ///
    /// # Errors
    /// Returns an error if either query fails.
    pub async fn get_edition_with_prices(
        &self,
        id: EditionId,
    ) -> Result<Option<EditionWithPrices>, StoreError> {
        let Some(edition) = self.get_edition(id).await? else {
            return Ok(None);
        };
        let prices = self.list_prices_by_edition(id).await?;
        Ok(Some(EditionWithPrices { edition, prices }))
    }

    /// Fetch an edition with its book and publishing house.
    ///
    /// # Errors
    /// Returns an error if the query fails.
    pub async fn get_edition_details(
        &self,
        id: EditionId,
    ) -> Result<Option<EditionDetails>, StoreError> {
        let row = sqlx::query(
            r#"
            SELECT e.id AS e_id, e.id_book AS e_id_book,
                   e.id_publishing_house AS e_id_publishing_house,
                   e.number_of_pages AS e_number_of_pages,
                   e.year_of_publishing AS e_year_of_publishing,
                   b.id AS b_id, b.id_author AS b_id_author, b.id_genre AS b_id_genre,
                   b.title AS b_title, b.year_of_creation AS b_year_of_creation,
                   p.id AS p_id, p.name AS p_name
            FROM tab_editions e
            JOIN tab_books b ON b.id = e.id_book
            JOIN tab_publishing_houses p ON p.id = e.id_publishing_house
            WHERE e.id = ?
            "#,
        )
        .bind(id.as_i64())
        .fetch_optional(&self.pool)
        .await?;

        let Some(row) = row else {
            return Ok(None);
        };
        Ok(Some(EditionDetails {
            edition: edition_from_row(&row, "e_")?,
            book: book_from_row(&row, "b_")?,
            publishing_house: publishing_house_from_row(&row, "p_")?,
        }))
    }

    /// # Errors
    /// `Validation` for a bad page count or year, `ConstraintViolation` if the
    /// new book or publishing house does not exist, `NotFound` if the edition
    /// does not exist.
    pub async fn update_edition(&self, edition: &Edition) -> Result<(), StoreError> {
        validated(edition.validate())?;

        let result = sqlx::query(
            r#"
            UPDATE tab_editions
            SET id_book = ?, id_publishing_house = ?, number_of_pages = ?, year_of_publishing = ?
            WHERE id = ?
            "#,
        )
        .bind(edition.book_id.as_i64())
        .bind(edition.publishing_house_id.as_i64())
        .bind(edition.number_of_pages)
        .bind(edition.year_of_publishing.map(|y| y.as_i32()))
        .bind(edition.id.as_i64())
        .execute(&self.pool)
        .await
        .map_err(|e| StoreError::from_write(Edition::TABLE, e))?;

        expect_one_row(Edition::TABLE, edition.id.as_i64(), &result)
    }

    /// # Errors
    /// `ConstraintViolation` while prices still reference the edition,
    /// `NotFound` if the edition does not exist.
    pub async fn delete_edition(&self, id: EditionId) -> Result<(), StoreError> {
        self.delete_row(Edition::TABLE, id.as_i64()).await
    }

    /// Move every edition of book `from` to book `to`.
    ///
    /// # Errors
    /// `ConstraintViolation` if editions would move to a book that does not exist.
    pub async fn reassign_editions_to_book(
        &self,
        from: BookId,
        to: BookId,
    ) -> Result<u64, StoreError> {
        let result = sqlx::query("UPDATE tab_editions SET id_book = ? WHERE id_book = ?")
            .bind(to.as_i64())
            .bind(from.as_i64())
            .execute(&self.pool)
            .await
            .map_err(|e| StoreError::from_write(Edition::TABLE, e))?;

        debug!(
            from = from.as_i64(),
            to = to.as_i64(),
            moved = result.rows_affected(),
            "editions reassigned to book"
        );
        Ok(result.rows_affected())
    }

    /// Move every edition of publishing house `from` to house `to`.
    ///
    /// # Errors
    /// `ConstraintViolation` if editions would move to a house that does not exist.
    pub async fn reassign_editions_to_publishing_house(
        &self,
        from: PublishingHouseId,
        to: PublishingHouseId,
    ) -> Result<u64, StoreError> {
        let result = sqlx::query(
            "UPDATE tab_editions SET id_publishing_house = ? WHERE id_publishing_house = ?",
        )
        .bind(to.as_i64())
        .bind(from.as_i64())
        .execute(&self.pool)
        .await
        .map_err(|e| StoreError::from_write(Edition::TABLE, e))?;

        debug!(
            from = from.as_i64(),
            to = to.as_i64(),
            moved = result.rows_affected(),
            "editions reassigned to publishing house"
        );
        Ok(result.rows_affected())
    }
}

pub(super) fn edition_from_row(row: &SqliteRow, prefix: &str) -> Result<Edition, sqlx::Error> {
    let year: Option<i32> = row.try_get(format!("{}year_of_publishing", prefix).as_str())?;
    Ok(Edition {
        id: EditionId::new(row.try_get(format!("{}id", prefix).as_str())?),
        book_id: BookId::new(row.try_get(format!("{}id_book", prefix).as_str())?),
        publishing_house_id: PublishingHouseId::new(
            row.try_get(format!("{}id_publishing_house", prefix).as_str())?,
        ),
        number_of_pages: row.try_get(format!("{}number_of_pages", prefix).as_str())?,
        year_of_publishing: year.map(Year::new),
    })
}

fn collect_editions(rows: &[SqliteRow]) -> Result<Vec<Edition>, sqlx::Error> {
    rows.iter().map(|r| edition_from_row(r, "")).collect()
}
