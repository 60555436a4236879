//! Display category for a catalog row.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StockStatus {
    /// Below the required quantity.
    Shortage,
    /// At least twice the required quantity (and actually in stock).
    Surplus,
    Normal,
}

impl StockStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            StockStatus::Shortage => "shortage",
            StockStatus::Surplus => "surplus",
            StockStatus::Normal => "normal",
        }
    }
}

/// Classify a row from its current and required quantity.
///
/// Shortage is checked first. Zero stock is never Surplus, so
/// `classify(0, 0)` is Normal.
pub fn classify(quantity: i64, required: i64) -> StockStatus {
    if quantity < required {
        return StockStatus::Shortage;
    }
    if quantity > 0 && quantity >= required.saturating_mul(2) {
        return StockStatus::Surplus;
    }
    StockStatus::Normal
}
