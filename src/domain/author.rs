//! Row of `tab_authors`.

use super::validation::{required_text, ValidationError};
use super::AuthorId;
use serde::{Deserialize, Serialize};

pub const FIRST_NAME_MAX: usize = 50;
pub const LAST_NAME_MAX: usize = 75;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Author {
    pub id: AuthorId,
    pub first_name: String,
    pub last_name: String,
}

/// Insert payload; the id is assigned by the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewAuthor {
    pub first_name: String,
    pub last_name: String,
}

impl Author {
    pub const TABLE: &'static str = "tab_authors";

    /// # Errors
    /// Returns the first column rule the row breaks.
    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_names(&self.first_name, &self.last_name)
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

impl NewAuthor {
    pub fn new(first_name: impl Into<String>, last_name: impl Into<String>) -> Self {
        NewAuthor {
            first_name: first_name.into(),
            last_name: last_name.into(),
        }
    }

    /// # Errors
    /// Returns the first column rule the payload breaks.
    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_names(&self.first_name, &self.last_name)
    }
}

fn validate_names(first_name: &str, last_name: &str) -> Result<(), ValidationError> {
    required_text(Author::TABLE, "first_name", first_name, FIRST_NAME_MAX)?;
    required_text(Author::TABLE, "last_name", last_name, LAST_NAME_MAX)
}
