//! Movement ledger entries (append-only history of quantity changes).

use core::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use stockbook_core::{EntryId, InventoryError};

/// Why a quantity changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MovementKind {
    Restock,
    Consume,
    Recount,
}

impl MovementKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            MovementKind::Restock => "restock",
            MovementKind::Consume => "consume",
            MovementKind::Recount => "recount",
        }
    }
}

impl core::fmt::Display for MovementKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MovementKind {
    type Err = InventoryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "restock" => Ok(MovementKind::Restock),
            "consume" => Ok(MovementKind::Consume),
            "recount" => Ok(MovementKind::Recount),
            other => Err(InventoryError::validation(format!(
                "unknown movement kind '{other}'"
            ))),
        }
    }
}

/// One ledger row. Never mutated or deleted once appended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerEntry {
    pub entry_id: EntryId,
    pub occurred_at: DateTime<Utc>,
    /// Not checked against the catalog; entries may outlive their item.
    pub item_name: String,
    /// Negative = consumption, positive = replenishment. Never zero.
    pub delta: i64,
    pub kind: MovementKind,
}

impl LedgerEntry {
    /// Build an entry, refusing a zero delta.
    pub fn new(
        occurred_at: DateTime<Utc>,
        item_name: impl Into<String>,
        delta: i64,
        kind: MovementKind,
    ) -> Result<Self, InventoryError> {
        if delta == 0 {
            return Err(InventoryError::validation("ledger delta cannot be zero"));
        }
        Ok(Self {
            entry_id: EntryId::new(),
            occurred_at,
            item_name: item_name.into(),
            delta,
            kind,
        })
    }

    pub fn is_consumption(&self) -> bool {
        self.delta < 0
    }
}
