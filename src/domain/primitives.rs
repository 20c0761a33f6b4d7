//! Domain primitives: typed surrogate keys and the four-digit `Year`.

use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! surrogate_key {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub i64);

        impl $name {
            pub fn new(id: i64) -> Self {
                $name(id)
            }

            pub fn as_i64(&self) -> i64 {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

surrogate_key!(
    /// Key of a row in `tab_authors`.
    AuthorId
);
surrogate_key!(
    /// Key of a row in `tab_genres`.
    GenreId
);
surrogate_key!(
    /// Key of a row in `tab_books`.
    BookId
);
surrogate_key!(
    /// Key of a row in `tab_publishing_houses`.
    PublishingHouseId
);
surrogate_key!(
    /// Key of a row in `tab_editions`.
    EditionId
);
surrogate_key!(
    /// Key of a row in `tab_prices`.
    PriceId
);

/// Calendar year stored in a `year(4)` column.
///
/// The accepted range mirrors MySQL's `YEAR` type so values written here stay
/// valid in the original database. Range checks happen in `validate`, not at
/// construction, so a row read back from an older database is never dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Year(pub i32);

impl Year {
    pub const MIN: i32 = 1901;
    pub const MAX: i32 = 2155;

    pub fn new(year: i32) -> Self {
        Year(year)
    }

    pub fn as_i32(&self) -> i32 {
        self.0
    }

    pub fn is_in_range(&self) -> bool {
        (Self::MIN..=Self::MAX).contains(&self.0)
    }
}

impl fmt::Display for Year {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_year_range_bounds() {
        assert!(Year::new(1901).is_in_range());
        assert!(Year::new(2155).is_in_range());
        assert!(!Year::new(1900).is_in_range());
        assert!(!Year::new(2156).is_in_range());
    }

    #[test]
    fn test_year_display_is_four_digits() {
        assert_eq!(Year::new(1999).to_string(), "1999");
    }

    #[test]
    fn test_ids_serialize_transparently() {
        let json = serde_json::to_string(&BookId::new(42)).unwrap();
        assert_eq!(json, "42");
        let id: AuthorId = serde_json::from_str("7").unwrap();
        assert_eq!(id, AuthorId::new(7));
    }

    #[test]
    fn test_id_display() {
        assert_eq!(EditionId::new(3).to_string(), "3");
    }
}
