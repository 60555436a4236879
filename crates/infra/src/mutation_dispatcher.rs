//! Mutation pipeline for the catalog.
//!
//! Every user action follows the same shape:
//!
//! ```text
//! request
//!   ↓
//! 1. Admin check (catalog-changing operations only)
//!   ↓
//! 2. Pure planning in `stockbook-inventory` (validation happens here,
//!    before the store is touched)
//!   ↓
//! 3. Row lookup through the snapshot's name index, confirmed against the store
//!   ↓
//! 4. Exactly one row-level write, append or delete on the catalog
//!   ↓
//! 5. Ledger append for non-zero quantity changes
//! ```
//!
//! The caller reloads the snapshot afterwards; nothing here caches state.

use serde::Serialize;

use stockbook_auth::{AdminGate, AdminSession};
use stockbook_core::InventoryError;
use stockbook_inventory::{
    Adjustment, InventoryPolicies, ItemRecord, LedgerEntry, NewItem, QuantityChange, RowId,
    SnapshotRow, check_new_item, plan_adjust, plan_set_absolute,
};

use crate::ledger::MovementLedger;
use crate::loader::Catalog;
use crate::schema::{self, SheetLayout};
use crate::table_store::{SheetRef, TableStore};

/// Result of a quantity write.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QuantityOutcome {
    pub item: String,
    pub row: u32,
    #[serde(flatten)]
    pub change: QuantityChange,
    /// `None` when the quantity did not actually change.
    pub entry: Option<LedgerEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AddOutcome {
    pub item: ItemRecord,
    pub row: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RemoveOutcome {
    pub item: String,
    pub row: u32,
}

/// Routes user actions to the table store and the movement ledger.
#[derive(Debug, Clone)]
pub struct MutationDispatcher<S> {
    store: S,
    sheet: SheetRef,
    ledger: MovementLedger<S>,
    gate: AdminGate,
    policies: InventoryPolicies,
}

impl<S: TableStore> MutationDispatcher<S> {
    pub fn new(
        store: S,
        sheet: SheetRef,
        ledger: MovementLedger<S>,
        gate: AdminGate,
        policies: InventoryPolicies,
    ) -> Self {
        Self {
            store,
            sheet,
            ledger,
            gate,
            policies,
        }
    }

    pub fn policies(&self) -> InventoryPolicies {
        self.policies
    }

    /// Overwrite an item's quantity.
    pub fn set_absolute(
        &self,
        catalog: &Catalog,
        name: &str,
        new_quantity: i64,
    ) -> Result<QuantityOutcome, InventoryError> {
        ensure_loaded(catalog)?;
        let current = find_in_snapshot(catalog, name)?;
        let change = plan_set_absolute(
            current.item.quantity,
            new_quantity,
            self.policies.recount_kind,
        )?;
        self.write_quantity(catalog, current, change)
    }

    /// Apply a consume or restock to an item's quantity.
    pub fn relative_adjust(
        &self,
        catalog: &Catalog,
        name: &str,
        adjustment: Adjustment,
    ) -> Result<QuantityOutcome, InventoryError> {
        ensure_loaded(catalog)?;
        let current = find_in_snapshot(catalog, name)?;
        let change = plan_adjust(current.item.quantity, adjustment)?;
        self.write_quantity(catalog, current, change)
    }

    /// Append a new catalog row. Admin only.
    pub fn add_item(
        &self,
        session: &AdminSession,
        catalog: &Catalog,
        form: &NewItem,
    ) -> Result<AddOutcome, InventoryError> {
        self.gate.authorize(session)?;
        let record = check_new_item(form, &catalog.snapshot, self.policies.duplicate_names)?;
        ensure_loaded(catalog)?;

        let mut layout = catalog.layout.clone();
        layout.ensure_all(&self.store, &self.sheet)?;
        let row = self.store.append_row(&self.sheet, &row_values(&layout, &record))?;

        tracing::info!(
            sheet = %self.sheet,
            item = %record.name,
            genre = %record.genre,
            row,
            "item added"
        );
        Ok(AddOutcome { item: record, row })
    }

    /// Delete the first row carrying `name`. Admin only.
    pub fn remove_item(
        &self,
        session: &AdminSession,
        catalog: &Catalog,
        name: &str,
    ) -> Result<RemoveOutcome, InventoryError> {
        self.gate.authorize(session)?;
        ensure_loaded(catalog)?;
        let current = find_in_snapshot(catalog, name)?;
        let row = self.confirm_row(catalog, current)?;
        self.store.delete_row(&self.sheet, row.get())?;

        tracing::info!(sheet = %self.sheet, item = %current.item.name, row = row.get(), "item removed");
        Ok(RemoveOutcome {
            item: current.item.name.to_string(),
            row: row.get(),
        })
    }

    fn write_quantity(
        &self,
        catalog: &Catalog,
        current: &SnapshotRow,
        change: QuantityChange,
    ) -> Result<QuantityOutcome, InventoryError> {
        let name = current.item.name.as_str();
        let column = catalog
            .layout
            .column(&schema::QUANTITY)
            .ok_or_else(|| InventoryError::row_not_found(name))?;
        let row = self.confirm_row(catalog, current)?;

        self.store
            .update_cell(&self.sheet, row.get(), column, &change.new.to_string())?;
        if change.went_negative() {
            tracing::warn!(item = name, quantity = change.new, "quantity is now negative");
        }
        tracing::info!(
            item = name,
            row = row.get(),
            old = change.old,
            new = change.new,
            kind = %change.kind,
            "quantity updated"
        );

        let entry = if change.should_log() {
            let entry = self
                .ledger
                .append(name, change.delta, change.kind)
                .map_err(|e| {
                    tracing::error!(item = name, delta = change.delta, error = %e, "ledger append failed after quantity write");
                    InventoryError::store(format!(
                        "quantity for '{name}' was saved but the movement was not logged: {e}"
                    ))
                })?;
            Some(entry)
        } else {
            None
        };

        Ok(QuantityOutcome {
            item: name.to_string(),
            row: row.get(),
            change,
            entry,
        })
    }

    /// Re-check the row against the store; rows shift when others delete.
    fn confirm_row(&self, catalog: &Catalog, current: &SnapshotRow) -> Result<RowId, InventoryError> {
        let name = current.item.name.as_str();
        let column = catalog
            .layout
            .column(&schema::NAME)
            .ok_or_else(|| InventoryError::row_not_found(name))?;

        match self.store.find_row(&self.sheet, column, name)? {
            None => Err(InventoryError::row_not_found(name)),
            Some(found) if found == current.row.get() => Ok(current.row),
            Some(found) => {
                tracing::warn!(
                    item = name,
                    snapshot_row = current.row.get(),
                    store_row = found,
                    "snapshot row is stale; using the store's row"
                );
                Ok(RowId(found))
            }
        }
    }
}

/// A catalog that failed to load is empty; report why instead of a missing row.
fn ensure_loaded(catalog: &Catalog) -> Result<(), InventoryError> {
    match &catalog.notice {
        Some(notice) => Err(notice.clone()),
        None => Ok(()),
    }
}

fn find_in_snapshot<'a>(catalog: &'a Catalog, name: &str) -> Result<&'a SnapshotRow, InventoryError> {
    catalog
        .snapshot
        .find(name.trim())
        .ok_or_else(|| InventoryError::row_not_found(name.trim()))
}

/// Cells for a new row, placed by header position.
fn row_values(layout: &SheetLayout, record: &ItemRecord) -> Vec<String> {
    let mut cells = vec![String::new(); layout.width() as usize];
    let values = [
        (schema::NAME, record.name.to_string()),
        (schema::QUANTITY, record.quantity.to_string()),
        (schema::GENRE, record.genre.clone()),
        (schema::REQUIRED_QUANTITY, record.required_quantity.to_string()),
        (schema::MONTHLY_USAGE, record.monthly_usage.to_string()),
    ];
    for (spec, value) in values {
        if let Some(col) = layout.column(&spec) {
            cells[col as usize - 1] = value;
        }
    }
    cells
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_row_follows_header_order() {
        let header: Vec<String> = ["genre", "name", "notes", "quantity"]
            .iter()
            .map(|h| h.to_string())
            .collect();
        let mut layout = SheetLayout::from_header(&header);
        let store = crate::table_store::InMemoryTableStore::new();
        let sheet = SheetRef::new("t", "items");
        store.seed(&sheet, vec![header]);
        layout.ensure_all(&store, &sheet).unwrap();

        let record = ItemRecord::new(stockbook_core::ItemName::parse("Resin").unwrap(), 4)
            .with_genre("Chemicals")
            .with_required(2);
        let cells = row_values(&layout, &record);
        assert_eq!(cells, vec!["Chemicals", "Resin", "", "4", "2", "0"]);
    }
}
