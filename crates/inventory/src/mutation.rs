//! Decision logic for quantity changes and catalog additions.
//!
//! These functions only decide; infra performs the store write and the
//! ledger append they describe.

use serde::{Deserialize, Serialize};

use stockbook_core::InventoryError;

use crate::{DuplicateNamePolicy, ItemRecord, MovementKind, NewItem, RecountKindPolicy, Snapshot};

/// Relative change requested by the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "direction", content = "amount")]
pub enum Adjustment {
    /// Take `amount` out of stock. Clamped so stock never drops below zero.
    Consume(i64),
    /// Put `amount` into stock. Not clamped: a negative amount may leave the
    /// item below zero.
    Restock(i64),
}

/// Outcome of a planned quantity mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuantityChange {
    pub old: i64,
    pub new: i64,
    /// `new - old`; the value logged to the ledger.
    pub delta: i64,
    pub kind: MovementKind,
}

impl QuantityChange {
    fn between(old: i64, new: i64, kind: MovementKind) -> Result<Self, InventoryError> {
        let delta = new.checked_sub(old).ok_or_else(|| {
            InventoryError::validation(format!("change from {old} to {new} is out of range"))
        })?;
        Ok(Self {
            old,
            new,
            delta,
            kind,
        })
    }

    /// Zero-delta changes still write the cell but leave no ledger entry.
    pub fn should_log(&self) -> bool {
        self.delta != 0
    }

    pub fn went_negative(&self) -> bool {
        self.new < 0
    }
}

pub fn plan_set_absolute(
    old: i64,
    new: i64,
    policy: RecountKindPolicy,
) -> Result<QuantityChange, InventoryError> {
    if new < 0 {
        return Err(InventoryError::validation("quantity cannot be negative"));
    }
    let kind = match policy {
        RecountKindPolicy::Recount => MovementKind::Recount,
        RecountKindPolicy::BySign if new > old => MovementKind::Restock,
        RecountKindPolicy::BySign if new < old => MovementKind::Consume,
        RecountKindPolicy::BySign => MovementKind::Recount,
    };
    QuantityChange::between(old, new, kind)
}

pub fn plan_adjust(old: i64, adjustment: Adjustment) -> Result<QuantityChange, InventoryError> {
    match adjustment {
        Adjustment::Consume(amount) => {
            if amount < 0 {
                return Err(InventoryError::validation("consumed amount cannot be negative"));
            }
            // Stock already at or below zero has nothing left to consume.
            let floor = old.min(0);
            let new = old.saturating_sub(amount).max(floor);
            QuantityChange::between(old, new, MovementKind::Consume)
        }
        Adjustment::Restock(amount) => {
            let new = old.checked_add(amount).ok_or_else(|| {
                InventoryError::validation(format!("restocking {amount} onto {old} is out of range"))
            })?;
            QuantityChange::between(old, new, MovementKind::Restock)
        }
    }
}

/// Validate an add-item form against the current catalog.
pub fn check_new_item(
    form: &NewItem,
    snapshot: &Snapshot,
    policy: DuplicateNamePolicy,
) -> Result<ItemRecord, InventoryError> {
    let record = form.validate()?;
    if policy == DuplicateNamePolicy::Reject && snapshot.contains(record.name.as_str()) {
        return Err(InventoryError::validation(format!(
            "an item named '{}' already exists",
            record.name
        )));
    }
    Ok(record)
}
