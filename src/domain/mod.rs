//! Catalog record types.
//!
//! This module provides:
//! - One plain record per table with explicit foreign-key fields
//! - Insert payloads (`New*`) without the store-assigned id
//! - Column rules (required, length, range) checked by `validate`
//! - Joined views used for relationship traversal

pub mod author;
pub mod book;
pub mod decimal;
pub mod edition;
pub mod genre;
pub mod price;
pub mod primitives;
pub mod publishing_house;
pub mod validation;

pub use author::{Author, NewAuthor};
pub use book::{Book, BookDetails, NewBook};
pub use decimal::Decimal;
pub use edition::{Edition, EditionDetails, EditionWithPrices, NewEdition};
pub use genre::{Genre, NewGenre};
pub use price::{NewPrice, Price};
pub use primitives::{AuthorId, BookId, EditionId, GenreId, PriceId, PublishingHouseId, Year};
pub use publishing_house::{NewPublishingHouse, PublishingHouse};
pub use validation::{ValidationError, ValidationErrorKind};
