use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::CatalogError;
use crate::inventory::Item;

/// Search filters. Every filter is optional; set filters are ANDed.
///
/// - `name`: case-insensitive substring of the item name
/// - `category`: exact category match
/// - `min_price` / `max_price`: inclusive price bounds
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemQuery {
    pub name: Option<String>,
    pub category: Option<String>,
    pub min_price: Option<Decimal>,
    pub max_price: Option<Decimal>,
}

impl ItemQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn min_price(mut self, price: Decimal) -> Self {
        self.min_price = Some(price);
        self
    }

    pub fn max_price(mut self, price: Decimal) -> Self {
        self.max_price = Some(price);
        self
    }

    pub fn validate(&self) -> Result<(), CatalogError> {
        if let (Some(min), Some(max)) = (self.min_price, self.max_price) {
            if min > max {
                return Err(CatalogError::Validation(format!(
                    "min_price {min} is greater than max_price {max}"
                )));
            }
        }
        Ok(())
    }

    pub fn matches(&self, item: &Item) -> bool {
        let name_ok = match self.name.as_deref().map(str::trim) {
            Some(needle) if !needle.is_empty() => item
                .name
                .to_lowercase()
                .contains(&needle.to_lowercase()),
            _ => true,
        };
        let category_ok = match self.category.as_deref().map(str::trim) {
            Some(category) if !category.is_empty() => item.category == category,
            _ => true,
        };
        let min_ok = self.min_price.map_or(true, |min| item.price >= min);
        let max_ok = self.max_price.map_or(true, |max| item.price <= max);

        name_ok && category_ok && min_ok && max_ok
    }
}
