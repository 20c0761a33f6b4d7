//! `tab_prices` operations for the catalog store.

use crate::domain::{EditionId, NewPrice, Price, PriceId};
use crate::error::StoreError;
use sqlx::sqlite::SqliteRow;
use sqlx::Row;
use tracing::debug;

use super::{decode_decimal, expect_one_row, validated, CatalogStore};

impl CatalogStore {
    /// # Errors
    /// `Validation` for a negative amount, `ConstraintViolation` if the
    /// edition does not exist.
    pub async fn insert_price(&self, price: &NewPrice) -> Result<Price, StoreError> {
        validated(price.validate())?;

        let result =
            sqlx::query("INSERT INTO tab_prices (id_edition, cost, price) VALUES (?, ?, ?)")
                .bind(price.edition_id.as_i64())
                .bind(price.cost_of_edition.to_storage_string())
                .bind(price.price_of_edition.to_storage_string())
                .execute(&self.pool)
                .await
                .map_err(|e| StoreError::from_write(Price::TABLE, e))?;

        let id = PriceId::new(result.last_insert_rowid());
        debug!(table = Price::TABLE, id = id.as_i64(), "row inserted");
        Ok(Price {
            id,
            edition_id: price.edition_id,
            cost_of_edition: price.cost_of_edition,
            price_of_edition: price.price_of_edition,
        })
    }

    /// # Errors
    /// Returns an error if the query fails or a stored amount is not a decimal.
    pub async fn get_price(&self, id: PriceId) -> Result<Option<Price>, StoreError> {
        let row = sqlx::query("SELECT id, id_edition, cost, price FROM tab_prices WHERE id = ?")
            .bind(id.as_i64())
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(|r| price_from_row(&r)).transpose()?)
    }

    /// # Errors
    /// Returns an error if the query fails or a stored amount is not a decimal.
    pub async fn list_prices(&self) -> Result<Vec<Price>, StoreError> {
        let rows = sqlx::query("SELECT id, id_edition, cost, price FROM tab_prices ORDER BY id ASC")
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.iter().map(price_from_row).collect::<Result<_, _>>()?)
    }

    /// # Errors
    /// Returns an error if the query fails or a stored amount is not a decimal.
    pub async fn list_prices_by_edition(
        &self,
        edition_id: EditionId,
    ) -> Result<Vec<Price>, StoreError> {
        let rows = sqlx::query(
            "SELECT id, id_edition, cost, price FROM tab_prices WHERE id_edition = ? ORDER BY id ASC",
        )
        .bind(edition_id.as_i64())
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(price_from_row).collect::<Result<_, _>>()?)
    }

    /// # Errors
    /// `Validation` for a negative amount, `ConstraintViolation` if the new
    /// edition does not exist, `NotFound` if the price does not exist.
    pub async fn update_price(&self, price: &Price) -> Result<(), StoreError> {
        validated(price.validate())?;

        let result =
            sqlx::query("UPDATE tab_prices SET id_edition = ?, cost = ?, price = ? WHERE id = ?")
                .bind(price.edition_id.as_i64())
                .bind(price.cost_of_edition.to_storage_string())
                .bind(price.price_of_edition.to_storage_string())
                .bind(price.id.as_i64())
                .execute(&self.pool)
                .await
                .map_err(|e| StoreError::from_write(Price::TABLE, e))?;

        expect_one_row(Price::TABLE, price.id.as_i64(), &result)
    }

    /// # Errors
    /// `NotFound` if the price does not exist.
    pub async fn delete_price(&self, id: PriceId) -> Result<(), StoreError> {
        self.delete_row(Price::TABLE, id.as_i64()).await
    }

    /// Delete every price of an edition so the edition itself can be deleted.
    /// Returns the number of prices removed.
    ///
    /// # Errors
    /// Returns an error if the delete fails.
    pub async fn delete_prices_by_edition(&self, edition_id: EditionId) -> Result<u64, StoreError> {
        let result = sqlx::query("DELETE FROM tab_prices WHERE id_edition = ?")
            .bind(edition_id.as_i64())
            .execute(&self.pool)
            .await
            .map_err(|e| StoreError::from_write(Price::TABLE, e))?;

        debug!(
            edition_id = edition_id.as_i64(),
            removed = result.rows_affected(),
            "prices cleared"
        );
        Ok(result.rows_affected())
    }

    /// Move every price of edition `from` to edition `to`.
    ///
    /// # Errors
    /// `ConstraintViolation` if prices would move to an edition that does not exist.
    pub async fn reassign_prices_to_edition(
        &self,
        from: EditionId,
        to: EditionId,
    ) -> Result<u64, StoreError> {
        let result = sqlx::query("UPDATE tab_prices SET id_edition = ? WHERE id_edition = ?")
            .bind(to.as_i64())
            .bind(from.as_i64())
            .execute(&self.pool)
            .await
            .map_err(|e| StoreError::from_write(Price::TABLE, e))?;

        debug!(
            from = from.as_i64(),
            to = to.as_i64(),
            moved = result.rows_affected(),
            "prices reassigned to edition"
        );
        Ok(result.rows_affected())
    }
}

fn price_from_row(row: &SqliteRow) -> Result<Price, sqlx::Error> {
    Ok(Price {
        id: PriceId::new(row.try_get("id")?),
        edition_id: EditionId::new(row.try_get("id_edition")?),
        cost_of_edition: decode_decimal(row, "cost")?,
        price_of_edition: decode_decimal(row, "price")?,
    })
}

#[cfg(test)]
mod tests {
    use super::super::tests::setup_test_store;
    use super::*;
    use crate::domain::{
        Decimal, Edition, NewAuthor, NewBook, NewEdition, NewGenre, NewPublishingHouse,
    };
    use crate::CatalogStore;

    fn dec(s: &str) -> Decimal {
        Decimal::parse(s).unwrap()
    }

    async fn seed_edition(store: &CatalogStore) -> Edition {
        let author = store
            .insert_author(&NewAuthor::new("Serhiy", "Zhadan"))
            .await
            .unwrap();
        let genre = store.insert_genre(&NewGenre::new("Novel")).await.unwrap();
        let book = store
            .insert_book(&NewBook::new(author.id, genre.id, "Voroshilovgrad"))
            .await
            .unwrap();
        let house = store
            .insert_publishing_house(&NewPublishingHouse::new("Meridian Czernowitz"))
            .await
            .unwrap();
        store
            .insert_edition(&NewEdition::new(book.id, house.id))
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_price_keeps_exact_decimals() {
        let (store, _temp) = setup_test_store().await;
        let edition = seed_edition(&store).await;

        let price = store
            .insert_price(&NewPrice::new(edition.id, dec("7.05"), dec("19.90")))
            .await
            .unwrap();
        let fetched = store.get_price(price.id).await.unwrap().unwrap();

        assert_eq!(fetched.cost_of_edition.to_string(), "7.05");
        assert_eq!(fetched.price_of_edition.to_string(), "19.90");
        assert_eq!(fetched, price);
    }

    #[tokio::test]
    async fn test_edition_with_prices_in_insert_order() {
        let (store, _temp) = setup_test_store().await;
        let edition = seed_edition(&store).await;

        let first = store
            .insert_price(&NewPrice::new(edition.id, dec("5"), dec("12")))
            .await
            .unwrap();
        let second = store
            .insert_price(&NewPrice::new(edition.id, dec("5"), dec("10.50")))
            .await
            .unwrap();

        let with_prices = store
            .get_edition_with_prices(edition.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(with_prices.prices, vec![first, second]);
    }

    #[tokio::test]
    async fn test_price_for_missing_edition_rejected() {
        let (store, _temp) = setup_test_store().await;
        let err = store
            .insert_price(&NewPrice::new(EditionId::new(3), dec("1"), dec("2")))
            .await
            .unwrap_err();
        assert!(err.is_constraint_violation(), "got {:?}", err);
        assert!(store.list_prices().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_clear_prices_then_delete_edition() {
        let (store, _temp) = setup_test_store().await;
        let edition = seed_edition(&store).await;
        store
            .insert_price(&NewPrice::new(edition.id, dec("3"), dec("9")))
            .await
            .unwrap();

        assert!(store
            .delete_edition(edition.id)
            .await
            .unwrap_err()
            .is_constraint_violation());

        assert_eq!(store.delete_prices_by_edition(edition.id).await.unwrap(), 1);
        store.delete_edition(edition.id).await.expect("delete failed");
    }

    #[tokio::test]
    async fn test_update_price() {
        let (store, _temp) = setup_test_store().await;
        let edition = seed_edition(&store).await;
        let mut price = store
            .insert_price(&NewPrice::new(edition.id, dec("4.00"), dec("8.00")))
            .await
            .unwrap();

        price.price_of_edition = dec("8.50");
        store.update_price(&price).await.unwrap();
        assert_eq!(
            store.get_price(price.id).await.unwrap().unwrap().margin(),
            dec("4.50")
        );
    }
}
