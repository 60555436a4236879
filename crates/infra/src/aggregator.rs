//! Usage aggregation: fold the ledger and write per-item usage back into the
//! catalog's `monthly_usage` column.

use std::collections::BTreeMap;
use std::sync::Mutex;

use chrono::{DateTime, Utc};
use serde::Serialize;

use stockbook_auth::{AdminGate, AdminSession};
use stockbook_core::InventoryError;
use stockbook_inventory::{UsageWindow, fold_usage, write_back_plan};

use crate::ledger::MovementLedger;
use crate::loader::SnapshotLoader;
use crate::schema;
use crate::table_store::TableStore;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UsageReport {
    pub window_days: u32,
    pub computed_at: DateTime<Utc>,
    /// Consumption per item name, ledger items outside the catalog included.
    pub usage: BTreeMap<String, i64>,
    pub rows_written: usize,
    /// Ledger items with consumption but no catalog row; not written.
    pub unmatched_items: Vec<String>,
}

/// Recomputes `monthly_usage` for every catalog row.
///
/// Runs are serialized inside one process. Two processes aggregating at once
/// are not coordinated; the later write-back wins per row.
#[derive(Debug)]
pub struct UsageAggregator<S> {
    store: S,
    loader: SnapshotLoader<S>,
    ledger: MovementLedger<S>,
    gate: AdminGate,
    running: Mutex<()>,
}

impl<S: TableStore> UsageAggregator<S> {
    pub fn new(
        store: S,
        loader: SnapshotLoader<S>,
        ledger: MovementLedger<S>,
        gate: AdminGate,
    ) -> Self {
        Self {
            store,
            loader,
            ledger,
            gate,
            running: Mutex::new(()),
        }
    }

    /// Admin only. Every catalog row is overwritten, with `0` for items that
    /// had no consumption in the window.
    pub fn aggregate(
        &self,
        session: &AdminSession,
        window: UsageWindow,
    ) -> Result<UsageReport, InventoryError> {
        self.gate.authorize(session)?;
        let _guard = self
            .running
            .lock()
            .map_err(|_| InventoryError::store("usage aggregation lock poisoned"))?;

        let now = self.ledger.now();
        let entries = self.ledger.entries()?;
        let usage = fold_usage(&entries, now, window);

        // Fresh load: row numbers must match the sheet as it is now.
        let mut catalog = self.loader.try_load()?;
        let sheet = self.loader.sheet();
        let plan = write_back_plan(&catalog.snapshot, &usage);

        let mut rows_written = 0;
        if !plan.is_empty() {
            let column = catalog.layout.ensure(&self.store, sheet, &schema::MONTHLY_USAGE)?;
            for (row, value) in &plan {
                self.store
                    .update_cell(sheet, row.get(), column, &value.to_string())?;
                rows_written += 1;
            }
        }

        let unmatched_items: Vec<String> = usage
            .keys()
            .filter(|name| !catalog.snapshot.contains(name))
            .cloned()
            .collect();
        if !unmatched_items.is_empty() {
            tracing::debug!(items = ?unmatched_items, "ledger items without a catalog row");
        }

        tracing::info!(
            sheet = %sheet,
            window_days = window.days(),
            entries = entries.len(),
            rows_written,
            "usage aggregated"
        );

        Ok(UsageReport {
            window_days: window.days(),
            computed_at: now,
            usage,
            rows_written,
            unmatched_items,
        })
    }
}
