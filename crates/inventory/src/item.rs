use serde::{Deserialize, Serialize};

use stockbook_core::{InventoryError, ItemName};

/// Genre given to rows whose sheet has no genre column.
pub const DEFAULT_GENRE: &str = "Uncategorized";

/// One catalog row after defaults and numeric coercion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemRecord {
    pub name: ItemName,
    /// Current stock. Normally non-negative; an unclamped restock may push it
    /// below zero.
    pub quantity: i64,
    pub genre: String,
    pub required_quantity: i64,
    /// Cached projection of the movement ledger, refreshed only by an
    /// explicit usage aggregation.
    pub monthly_usage: i64,
}

impl ItemRecord {
    pub fn new(name: ItemName, quantity: i64) -> Self {
        Self {
            name,
            quantity,
            genre: DEFAULT_GENRE.to_string(),
            required_quantity: 0,
            monthly_usage: 0,
        }
    }

    pub fn with_genre(mut self, genre: impl Into<String>) -> Self {
        self.genre = genre.into();
        self
    }

    pub fn with_required(mut self, required_quantity: i64) -> Self {
        self.required_quantity = required_quantity;
        self
    }

    pub fn with_monthly_usage(mut self, monthly_usage: i64) -> Self {
        self.monthly_usage = monthly_usage;
        self
    }

    pub fn status(&self) -> crate::StockStatus {
        crate::classify(self.quantity, self.required_quantity)
    }
}

/// Raw "add item" form input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewItem {
    pub name: String,
    pub genre: String,
    #[serde(default)]
    pub quantity: i64,
    #[serde(default)]
    pub required_quantity: i64,
}

impl NewItem {
    /// Turn form input into a catalog record.
    ///
    /// Name and genre must be non-blank; both counts must be non-negative.
    pub fn validate(&self) -> Result<ItemRecord, InventoryError> {
        let name = ItemName::parse(&self.name)?;
        let genre = self.genre.trim();
        if genre.is_empty() {
            return Err(InventoryError::validation("genre cannot be blank"));
        }
        if self.quantity < 0 {
            return Err(InventoryError::validation("initial quantity cannot be negative"));
        }
        if self.required_quantity < 0 {
            return Err(InventoryError::validation("required quantity cannot be negative"));
        }

        Ok(ItemRecord {
            name,
            quantity: self.quantity,
            genre: genre.to_string(),
            required_quantity: self.required_quantity,
            monthly_usage: 0,
        })
    }
}
