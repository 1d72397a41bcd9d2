use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::model::Model;

/// A catalog record with a stock counter.
///
/// `quantity` is unsigned, so a negative stock level cannot be represented,
/// let alone persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub id: String,
    pub name: String,
    pub category: String,
    /// Unit price, two decimal places.
    pub price: Decimal,
    pub quantity: u32,
    pub created_at: DateTime<Utc>,
    /// Bumped by every committed change, stock movements included.
    pub updated_at: DateTime<Utc>,
}

impl Item {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        category: impl Into<String>,
        price: Decimal,
        quantity: u32,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: id.into(),
            name: name.into(),
            category: category.into(),
            price,
            quantity,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn in_stock(&self) -> bool {
        self.quantity > 0
    }

    pub(crate) fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

impl Model for Item {
    const COLLECTION: &'static str = "items";

    fn id(&self) -> &str {
        &self.id
    }
}
