//! Row of `tab_genres`.

use super::validation::{required_text, ValidationError};
use super::GenreId;
use serde::{Deserialize, Serialize};

pub const NAME_MAX: usize = 50;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Genre {
    pub id: GenreId,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewGenre {
    pub name: String,
}

impl Genre {
    pub const TABLE: &'static str = "tab_genres";

    /// # Errors
    /// Returns an error if `name` is blank or too long.
    pub fn validate(&self) -> Result<(), ValidationError> {
        required_text(Self::TABLE, "name", &self.name, NAME_MAX)
    }
}

impl NewGenre {
    pub fn new(name: impl Into<String>) -> Self {
        NewGenre { name: name.into() }
    }

    /// # Errors
    /// Returns an error if `name` is blank or too long.
    pub fn validate(&self) -> Result<(), ValidationError> {
        required_text(Genre::TABLE, "name", &self.name, NAME_MAX)
    }
}
