//! Row of `tab_prices`.

use super::validation::{non_negative, ValidationError};
use super::{Decimal, EditionId, PriceId};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Price {
    pub id: PriceId,
    /// `id_edition`, constrained by `tab_prices_ibfk_1`.
    pub edition_id: EditionId,
    /// Column `cost`.
    pub cost_of_edition: Decimal,
    /// Column `price`.
    pub price_of_edition: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewPrice {
    pub edition_id: EditionId,
    pub cost_of_edition: Decimal,
    pub price_of_edition: Decimal,
}

impl Price {
    pub const TABLE: &'static str = "tab_prices";

    /// # Errors
    /// Returns an error if either amount is negative.
    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_amounts(&self.cost_of_edition, &self.price_of_edition)
    }

    /// Selling price minus cost. Negative when the edition sells at a loss.
    pub fn margin(&self) -> Decimal {
        self.price_of_edition - self.cost_of_edition
    }
}

impl NewPrice {
    pub fn new(edition_id: EditionId, cost_of_edition: Decimal, price_of_edition: Decimal) -> Self {
        NewPrice {
            edition_id,
            cost_of_edition,
            price_of_edition,
        }
    }

    /// # Errors
    /// Returns an error if either amount is negative.
    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_amounts(&self.cost_of_edition, &self.price_of_edition)
    }
}

fn validate_amounts(cost: &Decimal, price: &Decimal) -> Result<(), ValidationError> {
    non_negative(Price::TABLE, "cost", cost)?;
    non_negative(Price::TABLE, "price", price)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(s: &str) -> Decimal {
        Decimal::parse(s).unwrap()
    }

    #[test]
    fn test_margin() {
        let price = Price {
            id: PriceId::new(1),
            edition_id: EditionId::new(1),
            cost_of_edition: dec("120.00"),
            price_of_edition: dec("99.50"),
        };
        assert_eq!(price.margin(), dec("-20.50"));
    }

    #[test]
    fn test_negative_cost_rejected() {
        let err = NewPrice::new(EditionId::new(1), dec("-1"), dec("5"))
            .validate()
            .unwrap_err();
        assert_eq!(err.column, "cost");
    }
}
