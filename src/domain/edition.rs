//! Row of `tab_editions` and its joined views.

use super::validation::{optional_count, optional_year, ValidationError};
use super::{Book, BookId, EditionId, Price, PublishingHouse, PublishingHouseId, Year};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Edition {
    pub id: EditionId,
    /// `id_book`, constrained by `tab_editions_ibfk_1`.
    pub book_id: BookId,
    /// `id_publishing_house`, constrained by `tab_editions_ibfk_2`.
    pub publishing_house_id: PublishingHouseId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub number_of_pages: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub year_of_publishing: Option<Year>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewEdition {
    pub book_id: BookId,
    pub publishing_house_id: PublishingHouseId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub number_of_pages: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub year_of_publishing: Option<Year>,
}

/// An edition with every price recorded for it, ordered by price id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EditionWithPrices {
    pub edition: Edition,
    pub prices: Vec<Price>,
}

/// An edition with the book and publishing house it references.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EditionDetails {
    pub edition: Edition,
    pub book: Book,
    pub publishing_house: PublishingHouse,
}

impl Edition {
    pub const TABLE: &'static str = "tab_editions";

    /// # Errors
    /// Returns the first column rule the row breaks.
    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_columns(self.number_of_pages, self.year_of_publishing)
    }
}

impl NewEdition {
    pub fn new(book_id: BookId, publishing_house_id: PublishingHouseId) -> Self {
        NewEdition {
            book_id,
            publishing_house_id,
            number_of_pages: None,
            year_of_publishing: None,
        }
    }

    pub fn with_number_of_pages(mut self, pages: i64) -> Self {
        self.number_of_pages = Some(pages);
        self
    }

    pub fn with_year_of_publishing(mut self, year: Year) -> Self {
        self.year_of_publishing = Some(year);
        self
    }

    /// # Errors
    /// Returns the first column rule the payload breaks.
    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_columns(self.number_of_pages, self.year_of_publishing)
    }
}

fn validate_columns(
    number_of_pages: Option<i64>,
    year_of_publishing: Option<Year>,
) -> Result<(), ValidationError> {
    optional_count(Edition::TABLE, "number_of_pages", number_of_pages)?;
    optional_year(Edition::TABLE, "year_of_publishing", year_of_publishing)
}
