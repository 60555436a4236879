//! Movement ledger stored in its own worksheet.

use std::sync::Arc;

use chrono::{DateTime, NaiveDateTime, SecondsFormat, Utc};
use uuid::Uuid;

use stockbook_core::{Clock, EntryId, InventoryError};
use stockbook_inventory::{LedgerEntry, MovementKind};

use crate::table_store::{SheetRef, TableStore, TableStoreError};

/// Ledger columns, in the order new rows are written.
pub const LEDGER_HEADER: [&str; 5] = ["timestamp", "item_name", "delta", "action_kind", "entry_id"];

/// Append-only log of quantity changes.
///
/// Appends are independent rows, so concurrent writers cannot lose each
/// other's entries.
#[derive(Clone)]
pub struct MovementLedger<S> {
    store: S,
    sheet: SheetRef,
    clock: Arc<dyn Clock>,
}

impl<S> core::fmt::Debug for MovementLedger<S> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("MovementLedger").field("sheet", &self.sheet).finish()
    }
}

impl<S: TableStore> MovementLedger<S> {
    pub fn new(store: S, sheet: SheetRef, clock: Arc<dyn Clock>) -> Self {
        Self { store, sheet, clock }
    }

    pub fn sheet(&self) -> &SheetRef {
        &self.sheet
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    /// Append one entry stamped with the current time.
    ///
    /// The item is not checked against the catalog.
    pub fn append(
        &self,
        item_name: &str,
        delta: i64,
        kind: MovementKind,
    ) -> Result<LedgerEntry, InventoryError> {
        let entry = LedgerEntry::new(self.clock.now(), item_name, delta, kind)?;
        self.ensure_header()?;
        self.store.append_row(&self.sheet, &entry_to_row(&entry))?;
        tracing::info!(
            item = %entry.item_name,
            delta = entry.delta,
            kind = %entry.kind,
            entry_id = %entry.entry_id,
            "movement logged"
        );
        Ok(entry)
    }

    /// Every readable entry, in sheet (append) order.
    ///
    /// A missing worksheet is an empty ledger. Unparseable rows are skipped.
    pub fn entries(&self) -> Result<Vec<LedgerEntry>, InventoryError> {
        let rows = match self.store.read_all(&self.sheet) {
            Ok(rows) => rows,
            Err(TableStoreError::WorksheetNotFound(_)) => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };
        let Some((header, data)) = rows.split_first() else {
            return Ok(Vec::new());
        };

        let layout = LedgerLayout::from_header(header);
        let mut entries = Vec::with_capacity(data.len());
        for (idx, cells) in data.iter().enumerate() {
            if cells.iter().all(|c| c.trim().is_empty()) {
                continue;
            }
            match layout.parse(cells) {
                Ok(entry) => entries.push(entry),
                Err(reason) => {
                    tracing::warn!(sheet = %self.sheet, row = idx + 2, %reason, "skipping unreadable ledger row");
                }
            }
        }
        Ok(entries)
    }

    /// Most recent entries first, at most `limit`.
    pub fn recent(&self, limit: usize) -> Result<Vec<LedgerEntry>, InventoryError> {
        let mut entries = self.entries()?;
        entries.sort_by(|a, b| b.occurred_at.cmp(&a.occurred_at));
        entries.truncate(limit);
        Ok(entries)
    }

    fn ensure_header(&self) -> Result<(), TableStoreError> {
        let has_header = match self.store.read_all(&self.sheet) {
            Ok(rows) => rows.first().is_some_and(|h| h.iter().any(|c| !c.trim().is_empty())),
            Err(TableStoreError::WorksheetNotFound(_)) => false,
            Err(e) => return Err(e),
        };
        if !has_header {
            let header: Vec<String> = LEDGER_HEADER.iter().map(|h| h.to_string()).collect();
            self.store.append_row(&self.sheet, &header)?;
        }
        Ok(())
    }
}

fn entry_to_row(entry: &LedgerEntry) -> Vec<String> {
    vec![
        entry.occurred_at.to_rfc3339_opts(SecondsFormat::Secs, true),
        entry.item_name.clone(),
        entry.delta.to_string(),
        entry.kind.as_str().to_string(),
        entry.entry_id.to_string(),
    ]
}

/// Column positions of the ledger sheet, resolved by header name so a
/// hand-reordered sheet still reads correctly.
struct LedgerLayout {
    timestamp: Option<usize>,
    item_name: Option<usize>,
    delta: Option<usize>,
    kind: Option<usize>,
    entry_id: Option<usize>,
}

impl LedgerLayout {
    fn from_header(header: &[String]) -> Self {
        let pos = |name: &str| header.iter().position(|h| h.trim() == name);
        Self {
            timestamp: pos(LEDGER_HEADER[0]),
            item_name: pos(LEDGER_HEADER[1]),
            delta: pos(LEDGER_HEADER[2]),
            kind: pos(LEDGER_HEADER[3]),
            entry_id: pos(LEDGER_HEADER[4]),
        }
    }

    fn parse(&self, cells: &[String]) -> Result<LedgerEntry, String> {
        let cell = |idx: Option<usize>, name: &str| -> Result<&str, String> {
            idx.and_then(|i| cells.get(i))
                .map(|c| c.trim())
                .filter(|c| !c.is_empty())
                .ok_or_else(|| format!("missing {name}"))
        };

        let occurred_at = parse_timestamp(cell(self.timestamp, "timestamp")?)?;
        let item_name = cell(self.item_name, "item_name")?.to_string();
        let delta: i64 = cell(self.delta, "delta")?
            .parse()
            .map_err(|e| format!("bad delta: {e}"))?;
        if delta == 0 {
            return Err("zero delta".to_string());
        }
        let kind: MovementKind = cell(self.kind, "action_kind")?
            .parse()
            .map_err(|e: InventoryError| e.to_string())?;
        // Hand-entered rows carry no id.
        let entry_id = cell(self.entry_id, "entry_id")
            .ok()
            .and_then(|raw| raw.parse::<EntryId>().ok())
            .unwrap_or_else(|| EntryId::from_uuid(Uuid::nil()));

        Ok(LedgerEntry {
            entry_id,
            occurred_at,
            item_name,
            delta,
            kind,
        })
    }
}

/// RFC3339, or the `YYYY-MM-DD HH:MM:SS` a spreadsheet shows (read as UTC).
fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>, String> {
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Ok(ts.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S")
        .map(|naive| naive.and_utc())
        .map_err(|e| format!("bad timestamp '{raw}': {e}"))
}
