//! `tab_books` operations for the catalog store.

use crate::domain::{AuthorId, Book, BookDetails, BookId, GenreId, NewBook, Year};
use crate::error::StoreError;
use sqlx::sqlite::SqliteRow;
use sqlx::Row;
use tracing::debug;

use super::authors::author_from_row;
use super::genres::genre_from_row;
use super::{expect_one_row, validated, CatalogStore};

const BOOK_COLUMNS: &str = "id, id_author, id_genre, title, year_of_creation";

impl CatalogStore {
    /// Insert a book for an existing author and genre.
    ///
    /// # Errors
    /// `Validation` for a bad title or year, `ConstraintViolation` if the
    /// author or genre does not exist.
    pub async fn insert_book(&self, book: &NewBook) -> Result<Book, StoreError> {
        validated(book.validate())?;

        let result = sqlx::query(
            r#"
            INSERT INTO tab_books (id_author, id_genre, title, year_of_creation)
            VALUES (?, ?, ?, ?)
            "#,
        )
        .bind(book.author_id.as_i64())
        .bind(book.genre_id.as_i64())
        .bind(book.title.as_str())
        .bind(book.year_of_creation.map(|y| y.as_i32()))
        .execute(&self.pool)
        .await
        .map_err(|e| StoreError::from_write(Book::TABLE, e))?;

        let id = BookId::new(result.last_insert_rowid());
        debug!(table = Book::TABLE, id = id.as_i64(), "row inserted");
        Ok(Book {
            id,
            author_id: book.author_id,
            genre_id: book.genre_id,
            title: book.title.clone(),
            year_of_creation: book.year_of_creation,
        })
    }

    /// # Errors
    /// Returns an error if the query fails.
    pub async fn get_book(&self, id: BookId) -> Result<Option<Book>, StoreError> {
        let row = sqlx::query(&format!("SELECT {} FROM tab_books WHERE id = ?", BOOK_COLUMNS))
            .bind(id.as_i64())
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(|r| book_from_row(&r, "")).transpose()?)
    }

    /// # Errors
    /// Returns an error if the query fails.
    pub async fn list_books(&self) -> Result<Vec<Book>, StoreError> {
        let rows = sqlx::query(&format!(
            "SELECT {} FROM tab_books ORDER BY id ASC",
            BOOK_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(collect_books(&rows)?)
    }

    /// # Errors
    /// Returns an error if the query fails.
    pub async fn list_books_by_author(&self, author_id: AuthorId) -> Result<Vec<Book>, StoreError> {
        let rows = sqlx::query(&format!(
            "SELECT {} FROM tab_books WHERE id_author = ? ORDER BY id ASC",
            BOOK_COLUMNS
        ))
        .bind(author_id.as_i64())
        .fetch_all(&self.pool)
        .await?;

        Ok(collect_books(&rows)?)
    }

    /// # Errors
    /// Returns an error if the query fails.
    pub async fn list_books_by_genre(&self, genre_id: GenreId) -> Result<Vec<Book>, StoreError> {
        let rows = sqlx::query(&format!(
            "SELECT {} FROM tab_books WHERE id_genre = ? ORDER BY id ASC",
            BOOK_COLUMNS
        ))
        .bind(genre_id.as_i64())
        .fetch_all(&self.pool)
        .await?;

        Ok(collect_books(&rows)?)
    }

    /// Fetch a book together with its author and genre.
    ///
    /// # Errors
    /// Returns an error if the query fails.
    pub async fn get_book_details(&self, id: BookId) -> Result<Option<BookDetails>, StoreError> {
        let row = sqlx::query(
            r#"
            SELECT b.id AS b_id, b.id_author AS b_id_author, b.id_genre AS b_id_genre,
                   b.title AS b_title, b.year_of_creation AS b_year_of_creation,
                   a.id AS a_id, a.first_name AS a_first_name, a.last_name AS a_last_name,
                   g.id AS g_id, g.name AS g_name
            FROM tab_books b
            JOIN tab_authors a ON a.id = b.id_author
            JOIN tab_genres g ON g.id = b.id_genre
            WHERE b.id = ?
            "#,
        )
        .bind(id.as_i64())
        .fetch_optional(&self.pool)
        .await?;

        let Some(row) = row else {
            return Ok(None);
        };
        Ok(Some(BookDetails {
            book: book_from_row(&row, "b_")?,
            author: author_from_row(&row, "a_")?,
            genre: genre_from_row(&row, "g_")?,
        }))
    }

    /// # Errors
    /// `Validation` for a bad title or year, `ConstraintViolation` if the new
    /// author or genre does not exist, `NotFound` if the book does not exist.
    pub async fn update_book(&self, book: &Book) -> Result<(), StoreError> {
        validated(book.validate())?;

        let result = sqlx::query(
            r#"
            UPDATE tab_books
            SET id_author = ?, id_genre = ?, title = ?, year_of_creation = ?
            WHERE id = ?
            "#,
        )
        .bind(book.author_id.as_i64())
        .bind(book.genre_id.as_i64())
        .bind(book.title.as_str())
        .bind(book.year_of_creation.map(|y| y.as_i32()))
        .bind(book.id.as_i64())
        .execute(&self.pool)
        .await
        .map_err(|e| StoreError::from_write(Book::TABLE, e))?;

        expect_one_row(Book::TABLE, book.id.as_i64(), &result)
    }

    /// # Errors
    /// `ConstraintViolation` while editions still reference the book,
    /// `NotFound` if the book does not exist.
    pub async fn delete_book(&self, id: BookId) -> Result<(), StoreError> {
        self.delete_row(Book::TABLE, id.as_i64()).await
    }

    /// Move every book of author `from` to author `to`. Returns the number of
    /// books moved.
    ///
    /// # Errors
    /// `ConstraintViolation` if books would move to an author that does not
    /// exist; no book moves in that case.
    pub async fn reassign_books_to_author(
        &self,
        from: AuthorId,
        to: AuthorId,
    ) -> Result<u64, StoreError> {
        let result = sqlx::query("UPDATE tab_books SET id_author = ? WHERE id_author = ?")
            .bind(to.as_i64())
            .bind(from.as_i64())
            .execute(&self.pool)
            .await
            .map_err(|e| StoreError::from_write(Book::TABLE, e))?;

        debug!(
            from = from.as_i64(),
            to = to.as_i64(),
            moved = result.rows_affected(),
            "books reassigned to author"
        );
        Ok(result.rows_affected())
    }

    /// Move every book of genre `from` to genre `to`.
    ///
    /// # Errors
    /// `ConstraintViolation` if books would move to a genre that does not exist.
    pub async fn reassign_books_to_genre(
        &self,
        from: GenreId,
        to: GenreId,
    ) -> Result<u64, StoreError> {
        let result = sqlx::query("UPDATE tab_books SET id_genre = ? WHERE id_genre = ?")
            .bind(to.as_i64())
            .bind(from.as_i64())
            .execute(&self.pool)
            .await
            .map_err(|e| StoreError::from_write(Book::TABLE, e))?;

        debug!(
            from = from.as_i64(),
            to = to.as_i64(),
            moved = result.rows_affected(),
            "books reassigned to genre"
        );
        Ok(result.rows_affected())
    }
}

pub(super) fn book_from_row(row: &SqliteRow, prefix: &str) -> Result<Book, sqlx::Error> {
    let year: Option<i32> = row.try_get(format!("{}year_of_creation", prefix).as_str())?;
    Ok(Book {
        id: BookId::new(row.try_get(format!("{}id", prefix).as_str())?),
        author_id: AuthorId::new(row.try_get(format!("{}id_author", prefix).as_str())?),
        genre_id: GenreId::new(row.try_get(format!("{}id_genre", prefix).as_str())?),
        title: row.try_get(format!("{}title", prefix).as_str())?,
        year_of_creation: year.map(Year::new),
    })
}

fn collect_books(rows: &[SqliteRow]) -> Result<Vec<Book>, sqlx::Error> {
    rows.iter().map(|r| book_from_row(r, "")).collect()
}

#[cfg(test)]
mod tests {
    use super::super::tests::setup_test_store;
    use super::*;
    use crate::domain::{Author, Genre, NewAuthor, NewGenre};
    use crate::CatalogStore;

    async fn seed_parents(store: &CatalogStore) -> (Author, Genre) {
        let author = store
            .insert_author(&NewAuthor::new("Ivan", "Franko"))
            .await
            .unwrap();
        let genre = store
            .insert_genre(&NewGenre::new("Historical novel"))
            .await
            .unwrap();
        (author, genre)
    }

    #[tokio::test]
    async fn test_book_details_join() {
        let (store, _temp) = setup_test_store().await;
        let (author, genre) = seed_parents(&store).await;
        let book = store
            .insert_book(
                &NewBook::new(author.id, genre.id, "Zakhar Berkut")
                    .with_year_of_creation(Year::new(1902)),
            )
            .await
            .unwrap();

        let details = store
            .get_book_details(book.id)
            .await
            .unwrap()
            .expect("details missing");
        assert_eq!(details.book, book);
        assert_eq!(details.author, author);
        assert_eq!(details.genre, genre);
    }

    #[tokio::test]
    async fn test_book_details_missing() {
        let (store, _temp) = setup_test_store().await;
        assert!(store.get_book_details(BookId::new(5)).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_year_of_creation_optional() {
        let (store, _temp) = setup_test_store().await;
        let (author, genre) = seed_parents(&store).await;
        let book = store
            .insert_book(&NewBook::new(author.id, genre.id, "Moisei"))
            .await
            .unwrap();
        let fetched = store.get_book(book.id).await.unwrap().unwrap();
        assert_eq!(fetched.year_of_creation, None);
    }

    #[tokio::test]
    async fn test_list_books_by_author_and_genre() {
        let (store, _temp) = setup_test_store().await;
        let (author, genre) = seed_parents(&store).await;
        let other_genre = store.insert_genre(&NewGenre::new("Poetry")).await.unwrap();

        let novel = store
            .insert_book(&NewBook::new(author.id, genre.id, "Perekhresni stezhky"))
            .await
            .unwrap();
        let poems = store
            .insert_book(&NewBook::new(author.id, other_genre.id, "Zivyale lystya"))
            .await
            .unwrap();

        assert_eq!(
            store.list_books_by_author(author.id).await.unwrap(),
            vec![novel.clone(), poems.clone()]
        );
        assert_eq!(store.list_books_by_genre(other_genre.id).await.unwrap(), vec![poems]);
        assert_eq!(store.list_books().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_update_book_to_missing_genre_rejected() {
        let (store, _temp) = setup_test_store().await;
        let (author, genre) = seed_parents(&store).await;
        let book = store
            .insert_book(&NewBook::new(author.id, genre.id, "Boa constrictor"))
            .await
            .unwrap();

        let mut changed = book.clone();
        changed.genre_id = GenreId::new(999);
        let err = store.update_book(&changed).await.unwrap_err();
        assert!(err.is_constraint_violation(), "got {:?}", err);
        assert_eq!(store.get_book(book.id).await.unwrap(), Some(book));
    }

    #[tokio::test]
    async fn test_reassign_books_to_genre() {
        let (store, _temp) = setup_test_store().await;
        let (author, genre) = seed_parents(&store).await;
        let target = store.insert_genre(&NewGenre::new("Prose")).await.unwrap();
        store
            .insert_book(&NewBook::new(author.id, genre.id, "Lel i Polel"))
            .await
            .unwrap();

        let moved = store.reassign_books_to_genre(genre.id, target.id).await.unwrap();
        assert_eq!(moved, 1);
        store.delete_genre(genre.id).await.expect("genre now unreferenced");
    }
}
