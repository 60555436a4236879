//! Snapshot loader: table rows → typed catalog.

use stockbook_core::{InventoryError, ItemName};
use stockbook_inventory::{ItemRecord, NumericPolicy, RowId, Snapshot, SnapshotRow};

use crate::schema::{self, ColumnSpec, SheetLayout};
use crate::table_store::{SheetRef, TableStore, TableStoreError};

/// Counters collected while building a snapshot.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadStats {
    /// Numeric cells that could not be parsed and became zero.
    pub coerced_cells: usize,
    /// Data rows dropped because their name cell was blank.
    pub skipped_rows: usize,
}

/// A loaded catalog: snapshot plus what is needed to write back into it.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    pub snapshot: Snapshot,
    pub layout: SheetLayout,
    pub stats: LoadStats,
    /// Why the catalog is empty, when loading failed. Never fatal.
    pub notice: Option<InventoryError>,
}

impl Catalog {
    pub fn unavailable(err: InventoryError) -> Self {
        Self {
            notice: Some(err),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone)]
pub struct SnapshotLoader<S> {
    store: S,
    sheet: SheetRef,
    numeric: NumericPolicy,
}

impl<S: TableStore> SnapshotLoader<S> {
    pub fn new(store: S, sheet: SheetRef, numeric: NumericPolicy) -> Self {
        Self {
            store,
            sheet,
            numeric,
        }
    }

    pub fn sheet(&self) -> &SheetRef {
        &self.sheet
    }

    /// Load the catalog, turning every failure into an empty catalog with a
    /// notice.
    pub fn load(&self) -> Catalog {
        match self.try_load() {
            Ok(catalog) => catalog,
            Err(err) => {
                tracing::warn!(sheet = %self.sheet, error = %err, "catalog load failed; serving empty snapshot");
                Catalog::unavailable(err)
            }
        }
    }

    /// Load the catalog, propagating failures.
    ///
    /// A missing worksheet or a sheet without a header is an empty catalog,
    /// not an error.
    pub fn try_load(&self) -> Result<Catalog, InventoryError> {
        let rows = match self.store.read_all(&self.sheet) {
            Ok(rows) => rows,
            Err(TableStoreError::WorksheetNotFound(_)) => Vec::new(),
            Err(e) => return Err(e.into()),
        };
        build_catalog(&rows, self.numeric)
    }
}

/// Turn a raw grid (header first) into a catalog.
pub fn build_catalog(rows: &[Vec<String>], numeric: NumericPolicy) -> Result<Catalog, InventoryError> {
    let Some((header, data)) = rows.split_first() else {
        return Ok(Catalog::default());
    };

    let layout = SheetLayout::from_header(header);
    let missing = layout.missing_required();
    if !missing.is_empty() {
        return Err(InventoryError::validation(format!(
            "catalog sheet is missing required column(s): {}",
            missing.join(", ")
        )));
    }

    let mut stats = LoadStats::default();
    let mut out: Vec<SnapshotRow> = Vec::with_capacity(data.len());

    for (idx, cells) in data.iter().enumerate() {
        let row = RowId(idx as u32 + 2);
        let mut reader = RowReader {
            cells,
            layout: &layout,
            row,
            numeric,
            stats: &mut stats,
        };

        let Ok(name) = ItemName::parse(reader.text(&schema::NAME)) else {
            reader.stats.skipped_rows += 1;
            tracing::debug!(row = row.get(), "skipping catalog row with blank name");
            continue;
        };

        let item = ItemRecord {
            name,
            quantity: reader.number(&schema::QUANTITY)?,
            genre: reader.text(&schema::GENRE).to_string(),
            required_quantity: reader.number(&schema::REQUIRED_QUANTITY)?,
            monthly_usage: reader.number(&schema::MONTHLY_USAGE)?,
        };
        out.push(SnapshotRow { row, item });
    }

    if stats.coerced_cells > 0 {
        tracing::debug!(coerced = stats.coerced_cells, "numeric cells defaulted to zero");
    }

    Ok(Catalog {
        snapshot: Snapshot::from_rows(out),
        layout,
        stats,
        notice: None,
    })
}

struct RowReader<'a> {
    cells: &'a [String],
    layout: &'a SheetLayout,
    row: RowId,
    numeric: NumericPolicy,
    stats: &'a mut LoadStats,
}

impl<'a> RowReader<'a> {
    /// Cell text, or the column default when the sheet has no such column.
    fn text(&self, spec: &ColumnSpec) -> &'a str {
        match self.layout.column(spec) {
            Some(col) => self
                .cells
                .get((col - 1) as usize)
                .map(String::as_str)
                .unwrap_or(""),
            None => spec.default.unwrap_or(""),
        }
    }

    fn number(&mut self, spec: &ColumnSpec) -> Result<i64, InventoryError> {
        let raw = self.text(spec).trim();
        if raw.is_empty() {
            self.stats.coerced_cells += 1;
            return Ok(0);
        }
        match parse_number(raw) {
            Some(n) => {
                if raw.parse::<i64>().is_err() && raw.parse::<f64>().is_ok_and(|f| f.fract() != 0.0) {
                    tracing::debug!(row = self.row.get(), column = spec.header, value = raw, truncated = n, "fractional cell truncated");
                }
                Ok(n)
            }
            None => match self.numeric {
                NumericPolicy::CoerceToZero => {
                    self.stats.coerced_cells += 1;
                    tracing::debug!(row = self.row.get(), column = spec.header, value = raw, "non-numeric cell coerced to 0");
                    Ok(0)
                }
                NumericPolicy::Strict => Err(InventoryError::validation(format!(
                    "row {}: column '{}' is not a number: '{raw}'",
                    self.row, spec.header
                ))),
            },
        }
    }
}

/// Integers, or finite floats truncated toward zero ("12", "12.0", "1e2",
/// "2.5" → 2).
pub fn parse_number(raw: &str) -> Option<i64> {
    let raw = raw.trim();
    if let Ok(n) = raw.parse::<i64>() {
        return Some(n);
    }
    let whole = raw.parse::<f64>().ok()?.trunc();
    if whole.is_finite() && whole.abs() < i64::MAX as f64 {
        Some(whole as i64)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table_store::InMemoryTableStore;
    use std::sync::Arc;

    fn grid(rows: &[&[&str]]) -> Vec<Vec<String>> {
        rows.iter()
            .map(|r| r.iter().map(|c| c.to_string()).collect())
            .collect()
    }

    #[test]
    fn missing_optional_columns_get_defaults() {
        let catalog = build_catalog(
            &grid(&[&["name", "quantity"], &["Resin", "10"], &["Glue", "2"]]),
            NumericPolicy::CoerceToZero,
        )
        .unwrap();

        let resin = catalog.snapshot.find("Resin").unwrap();
        assert_eq!(resin.row, RowId(2));
        assert_eq!(resin.item.genre, "Uncategorized");
        assert_eq!(resin.item.required_quantity, 0);
        assert_eq!(resin.item.monthly_usage, 0);
        assert_eq!(catalog.stats.coerced_cells, 0);
    }

    #[test]
    fn malformed_numbers_become_zero() {
        let catalog = build_catalog(
            &grid(&[
                &["name", "quantity", "genre", "required_quantity"],
                &["Resin", "lots", "Craft", ""],
                &["Glue", "3.0", "Office", "2"],
                &["Tape"],
            ]),
            NumericPolicy::CoerceToZero,
        )
        .unwrap();

        let resin = &catalog.snapshot.find("Resin").unwrap().item;
        assert_eq!((resin.quantity, resin.required_quantity), (0, 0));
        let glue = &catalog.snapshot.find("Glue").unwrap().item;
        assert_eq!((glue.quantity, glue.required_quantity), (3, 2));
        let tape = &catalog.snapshot.find("Tape").unwrap().item;
        assert_eq!((tape.quantity, tape.genre.as_str()), (0, ""));
        // "lots", "", and Tape's blank quantity + required.
        assert_eq!(catalog.stats.coerced_cells, 4);
    }

    #[test]
    fn strict_policy_rejects_garbage_but_not_blanks() {
        let err = build_catalog(
            &grid(&[&["name", "quantity"], &["Resin", "lots"]]),
            NumericPolicy::Strict,
        )
        .unwrap_err();
        assert!(matches!(err, InventoryError::Validation(msg) if msg.contains("quantity")));

        let ok = build_catalog(&grid(&[&["name", "quantity"], &["Resin", ""]]), NumericPolicy::Strict);
        assert!(ok.is_ok());
    }

    #[test]
    fn fractional_cells_are_truncated_not_zeroed() {
        for policy in [NumericPolicy::CoerceToZero, NumericPolicy::Strict] {
            let catalog = build_catalog(
                &grid(&[&["name", "quantity", "required_quantity"], &["Resin", "2.5", "7.9"]]),
                policy,
            )
            .unwrap();
            let resin = &catalog.snapshot.find("Resin").unwrap().item;
            assert_eq!((resin.quantity, resin.required_quantity), (2, 7));
            assert_eq!(catalog.stats.coerced_cells, 0);
        }
    }

    #[test]
    fn blank_names_are_skipped_but_row_numbers_hold() {
        let catalog = build_catalog(
            &grid(&[&["name", "quantity"], &["", "4"], &["Glue", "1"]]),
            NumericPolicy::CoerceToZero,
        )
        .unwrap();
        assert_eq!(catalog.snapshot.len(), 1);
        assert_eq!(catalog.snapshot.find("Glue").unwrap().row, RowId(3));
        assert_eq!(catalog.stats.skipped_rows, 1);
    }

    #[test]
    fn missing_quantity_column_is_an_error() {
        let err = build_catalog(&grid(&[&["name", "genre"], &["Resin", "Craft"]]), NumericPolicy::CoerceToZero)
            .unwrap_err();
        assert!(matches!(err, InventoryError::Validation(_)));
    }

    #[test]
    fn parse_number_cases() {
        assert_eq!(parse_number(" 12 "), Some(12));
        assert_eq!(parse_number("-3"), Some(-3));
        assert_eq!(parse_number("4.0"), Some(4));
        assert_eq!(parse_number("2.5"), Some(2));
        assert_eq!(parse_number("-2.5"), Some(-2));
        assert_eq!(parse_number("0.4"), Some(0));
        assert_eq!(parse_number("1e30"), None);
        assert_eq!(parse_number("inf"), None);
        assert_eq!(parse_number("NaN"), None);
        assert_eq!(parse_number("abc"), None);
    }

    #[test]
    fn unreachable_store_yields_empty_catalog_with_notice() {
        let store = Arc::new(crate::table_store::UnavailableTableStore::new(
            TableStoreError::Unreachable("dns failure".to_string()),
        ));
        let loader = SnapshotLoader::new(store, SheetRef::new("t", "items"), NumericPolicy::default());
        let catalog = loader.load();
        assert!(catalog.snapshot.is_empty());
        assert!(matches!(catalog.notice, Some(InventoryError::StoreUnreachable(_))));
    }

    #[test]
    fn missing_worksheet_is_empty_without_notice() {
        let store = Arc::new(InMemoryTableStore::new());
        let loader = SnapshotLoader::new(store, SheetRef::new("t", "items"), NumericPolicy::default());
        let catalog = loader.load();
        assert!(catalog.snapshot.is_empty());
        assert!(catalog.notice.is_none());
    }
}
