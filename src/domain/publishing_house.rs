//! Row of `tab_publishing_houses`.

use super::validation::{required_text, ValidationError};
use super::PublishingHouseId;
use serde::{Deserialize, Serialize};

pub const NAME_MAX: usize = 255;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublishingHouse {
    pub id: PublishingHouseId,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewPublishingHouse {
    pub name: String,
}

impl PublishingHouse {
    pub const TABLE: &'static str = "tab_publishing_houses";

    /// # Errors
    /// Returns an error if `name` is blank or too long.
    pub fn validate(&self) -> Result<(), ValidationError> {
        required_text(Self::TABLE, "name", &self.name, NAME_MAX)
    }
}

impl NewPublishingHouse {
    pub fn new(name: impl Into<String>) -> Self {
        NewPublishingHouse { name: name.into() }
    }

    /// # Errors
    /// Returns an error if `name` is blank or too long.
    pub fn validate(&self) -> Result<(), ValidationError> {
        required_text(PublishingHouse::TABLE, "name", &self.name, NAME_MAX)
    }
}
