//! `tab_publishing_houses` operations for the catalog store.

use crate::domain::{NewPublishingHouse, PublishingHouse, PublishingHouseId};
use crate::error::StoreError;
use sqlx::sqlite::SqliteRow;
use sqlx::Row;
use tracing::debug;

use super::{expect_one_row, validated, CatalogStore};

impl CatalogStore {
    /// # Errors
    /// `Validation` if the name is blank or longer than 255 characters.
    pub async fn insert_publishing_house(
        &self,
        house: &NewPublishingHouse,
    ) -> Result<PublishingHouse, StoreError> {
        validated(house.validate())?;

        let result = sqlx::query("INSERT INTO tab_publishing_houses (name) VALUES (?)")
            .bind(house.name.as_str())
            .execute(&self.pool)
            .await
            .map_err(|e| StoreError::from_write(PublishingHouse::TABLE, e))?;

        let id = PublishingHouseId::new(result.last_insert_rowid());
        debug!(table = PublishingHouse::TABLE, id = id.as_i64(), "row inserted");
        Ok(PublishingHouse {
            id,
            name: house.name.clone(),
        })
    }

    /// # Errors
    /// Returns an error if the query fails.
    pub async fn get_publishing_house(
        &self,
        id: PublishingHouseId,
    ) -> Result<Option<PublishingHouse>, StoreError> {
        let row = sqlx::query("SELECT id, name FROM tab_publishing_houses WHERE id = ?")
            .bind(id.as_i64())
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(|r| publishing_house_from_row(&r, "")).transpose()?)
    }

    /// # Errors
    /// Returns an error if the query fails.
    pub async fn list_publishing_houses(&self) -> Result<Vec<PublishingHouse>, StoreError> {
        let rows = sqlx::query("SELECT id, name FROM tab_publishing_houses ORDER BY id ASC")
            .fetch_all(&self.pool)
            .await?;

        Ok(rows
            .iter()
            .map(|r| publishing_house_from_row(r, ""))
            .collect::<Result<_, _>>()?)
    }

    /// # Errors
    /// `Validation` for a bad name, `NotFound` if the house does not exist.
    pub async fn update_publishing_house(&self, house: &PublishingHouse) -> Result<(), StoreError> {
        validated(house.validate())?;

        let result = sqlx::query("UPDATE tab_publishing_houses SET name = ? WHERE id = ?")
            .bind(house.name.as_str())
            .bind(house.id.as_i64())
            .execute(&self.pool)
            .await
            .map_err(|e| StoreError::from_write(PublishingHouse::TABLE, e))?;

        expect_one_row(PublishingHouse::TABLE, house.id.as_i64(), &result)
    }

    /// # Errors
    /// `ConstraintViolation` while editions still reference the house,
    /// `NotFound` if the house does not exist.
    pub async fn delete_publishing_house(&self, id: PublishingHouseId) -> Result<(), StoreError> {
        self.delete_row(PublishingHouse::TABLE, id.as_i64()).await
    }
}

pub(super) fn publishing_house_from_row(
    row: &SqliteRow,
    prefix: &str,
) -> Result<PublishingHouse, sqlx::Error> {
    Ok(PublishingHouse {
        id: PublishingHouseId::new(row.try_get(format!("{}id", prefix).as_str())?),
        name: row.try_get(format!("{}name", prefix).as_str())?,
    })
}
