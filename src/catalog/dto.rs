use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use super::CatalogError;

/// Largest price the catalog accepts (ten digits, two after the point).
const MAX_PRICE: Decimal = Decimal::from_parts(1_410_065_407, 2, 0, false, 2);

/// Fields for a new catalog item. The id is assigned on creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewItem {
    pub name: String,
    pub category: String,
    pub price: Decimal,
    pub quantity: u32,
}

impl NewItem {
    pub fn new(
        name: impl Into<String>,
        category: impl Into<String>,
        price: Decimal,
        quantity: u32,
    ) -> Self {
        Self {
            name: name.into(),
            category: category.into(),
            price,
            quantity,
        }
    }
}

/// Edit of an item's descriptive fields. Stock changes go through `CatalogService::restock`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemPatch {
    pub name: Option<String>,
    pub category: Option<String>,
    pub price: Option<Decimal>,
}

impl ItemPatch {
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn price(mut self, price: Decimal) -> Self {
        self.price = Some(price);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.category.is_none() && self.price.is_none()
    }
}

pub(super) fn required_text(field: &str, value: &str) -> Result<String, CatalogError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(CatalogError::Validation(format!("{field} must not be empty")));
    }
    Ok(trimmed.to_string())
}

/// Non-negative, at most `MAX_PRICE`, rounded half away from zero to exactly
/// two decimal places.
pub(super) fn normalized_price(price: Decimal) -> Result<Decimal, CatalogError> {
    if price.is_sign_negative() && !price.is_zero() {
        return Err(CatalogError::Validation(format!(
            "price must be non-negative, got {price}"
        )));
    }
    let mut rounded = price
        .abs()
        .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(2);
    if rounded > MAX_PRICE {
        return Err(CatalogError::Validation(format!(
            "price must not exceed {MAX_PRICE}, got {price}"
        )));
    }
    Ok(rounded)
}
