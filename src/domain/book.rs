//! Row of `tab_books` and its joined view.

use super::validation::{optional_year, required_text, ValidationError};
use super::{Author, AuthorId, BookId, Genre, GenreId, Year};
use serde::{Deserialize, Serialize};

pub const TITLE_MAX: usize = 255;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Book {
    pub id: BookId,
    /// `id_author`, constrained by `tab_books_ibfk_1`.
    pub author_id: AuthorId,
    /// `id_genre`, constrained by `tab_books_ibfk_2`.
    pub genre_id: GenreId,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub year_of_creation: Option<Year>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewBook {
    pub author_id: AuthorId,
    pub genre_id: GenreId,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub year_of_creation: Option<Year>,
}

/// A book together with the author and genre it references.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookDetails {
    pub book: Book,
    pub author: Author,
    pub genre: Genre,
}

impl Book {
    pub const TABLE: &'static str = "tab_books";

    /// # Errors
    /// Returns the first column rule the row breaks.
    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_columns(&self.title, self.year_of_creation)
    }
}

impl NewBook {
    pub fn new(author_id: AuthorId, genre_id: GenreId, title: impl Into<String>) -> Self {
        NewBook {
            author_id,
            genre_id,
            title: title.into(),
            year_of_creation: None,
        }
    }

    pub fn with_year_of_creation(mut self, year: Year) -> Self {
        self.year_of_creation = Some(year);
        self
    }

    /// # Errors
    /// Returns the first column rule the payload breaks.
    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_columns(&self.title, self.year_of_creation)
    }
}

fn validate_columns(title: &str, year_of_creation: Option<Year>) -> Result<(), ValidationError> {
    required_text(Book::TABLE, "title", title, TITLE_MAX)?;
    optional_year(Book::TABLE, "year_of_creation", year_of_creation)
}
