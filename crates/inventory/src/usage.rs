//! Usage fold: ledger → per-item consumption over a trailing window.

use std::collections::BTreeMap;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use stockbook_core::InventoryError;

use crate::{LedgerEntry, RowId, Snapshot};

pub const DEFAULT_WINDOW_DAYS: u32 = 30;

/// Trailing window, in whole days, ending at "now".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UsageWindow {
    days: u32,
}

impl UsageWindow {
    pub fn new(days: u32) -> Result<Self, InventoryError> {
        if days == 0 {
            return Err(InventoryError::validation("usage window must be at least one day"));
        }
        Ok(Self { days })
    }

    pub fn days(&self) -> u32 {
        self.days
    }

    /// Earliest timestamp still inside the window (inclusive).
    pub fn start(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        now - Duration::days(i64::from(self.days))
    }
}

impl Default for UsageWindow {
    fn default() -> Self {
        Self {
            days: DEFAULT_WINDOW_DAYS,
        }
    }
}

/// Sum of `|delta|` over consumption entries inside the window, per item.
///
/// Positive deltas never count, whatever their kind. Items with no
/// qualifying entry are absent from the result.
pub fn fold_usage<'a>(
    entries: impl IntoIterator<Item = &'a LedgerEntry>,
    now: DateTime<Utc>,
    window: UsageWindow,
) -> BTreeMap<String, i64> {
    let start = window.start(now);
    let mut usage: BTreeMap<String, i64> = BTreeMap::new();

    for entry in entries {
        if entry.occurred_at < start || entry.delta >= 0 {
            continue;
        }
        let total = usage.entry(entry.item_name.clone()).or_insert(0);
        *total = total.saturating_add(entry.delta.saturating_abs());
    }

    usage
}

/// Value to write into every catalog row, in catalog order.
///
/// Rows without recent consumption get `0` so a stale figure is cleared.
/// Ledger items missing from the catalog produce nothing.
pub fn write_back_plan(snapshot: &Snapshot, usage: &BTreeMap<String, i64>) -> Vec<(RowId, i64)> {
    snapshot
        .rows()
        .iter()
        .map(|r| (r.row, usage.get(r.item.name.as_str()).copied().unwrap_or(0)))
        .collect()
}
