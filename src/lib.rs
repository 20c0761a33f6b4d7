pub mod config;
pub mod db;
pub mod domain;
pub mod error;

pub use config::{ConfigError, StoreConfig};
pub use db::{init_db, CatalogStore, TableCounts};
pub use domain::{
    Author, AuthorId, Book, BookDetails, BookId, Decimal, Edition, EditionDetails, EditionId,
    EditionWithPrices, Genre, GenreId, NewAuthor, NewBook, NewEdition, NewGenre, NewPrice,
    NewPublishingHouse, Price, PriceId, PublishingHouse, PublishingHouseId, ValidationError,
    ValidationErrorKind, Year,
};
pub use error::StoreError;
