//! Declarative catalog schema, applied once at the store boundary.
//!
//! Each column the catalog understands is listed with the default used when
//! the sheet lacks that column. Nothing else in the crate special-cases a
//! missing column.

use std::collections::HashMap;

use stockbook_inventory::DEFAULT_GENRE;

use crate::table_store::{SheetRef, TableStore, TableStoreError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnSpec {
    pub header: &'static str,
    /// Value synthesized for every row when the column is absent. `None`
    /// marks a column the catalog cannot work without.
    pub default: Option<&'static str>,
    pub numeric: bool,
}

pub const NAME: ColumnSpec = ColumnSpec {
    header: "name",
    default: None,
    numeric: false,
};

pub const QUANTITY: ColumnSpec = ColumnSpec {
    header: "quantity",
    default: None,
    numeric: true,
};

pub const GENRE: ColumnSpec = ColumnSpec {
    header: "genre",
    default: Some(DEFAULT_GENRE),
    numeric: false,
};

pub const REQUIRED_QUANTITY: ColumnSpec = ColumnSpec {
    header: "required_quantity",
    default: Some("0"),
    numeric: true,
};

pub const MONTHLY_USAGE: ColumnSpec = ColumnSpec {
    header: "monthly_usage",
    default: Some("0"),
    numeric: true,
};

/// Catalog columns in the order a fresh sheet gets them.
pub const CATALOG_SCHEMA: [ColumnSpec; 5] = [NAME, QUANTITY, GENRE, REQUIRED_QUANTITY, MONTHLY_USAGE];

/// Where each header lives in one worksheet (1-based columns).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SheetLayout {
    headers: Vec<String>,
    positions: HashMap<String, u32>,
}

impl SheetLayout {
    /// Build from a header row. Headers are matched after trimming; the first
    /// occurrence of a repeated header wins.
    pub fn from_header(header: &[String]) -> Self {
        let headers: Vec<String> = header.iter().map(|h| h.trim().to_string()).collect();
        let mut positions = HashMap::new();
        for (idx, h) in headers.iter().enumerate() {
            if !h.is_empty() {
                positions.entry(h.clone()).or_insert(idx as u32 + 1);
            }
        }
        Self { headers, positions }
    }

    pub fn has_header(&self) -> bool {
        !self.headers.is_empty()
    }

    pub fn width(&self) -> u32 {
        self.headers.len() as u32
    }

    pub fn column(&self, spec: &ColumnSpec) -> Option<u32> {
        self.positions.get(spec.header).copied()
    }

    /// Schema columns this sheet lacks and that have no default.
    pub fn missing_required(&self) -> Vec<&'static str> {
        CATALOG_SCHEMA
            .iter()
            .filter(|c| c.default.is_none() && self.column(c).is_none())
            .map(|c| c.header)
            .collect()
    }

    /// Column for `spec`, creating the header cell if the sheet lacks it.
    ///
    /// A sheet with no header row at all receives the full schema header in
    /// one append.
    pub fn ensure<S: TableStore + ?Sized>(
        &mut self,
        store: &S,
        sheet: &SheetRef,
        spec: &ColumnSpec,
    ) -> Result<u32, TableStoreError> {
        if let Some(col) = self.column(spec) {
            return Ok(col);
        }

        if !self.has_header() {
            let header: Vec<String> = CATALOG_SCHEMA.iter().map(|c| c.header.to_string()).collect();
            store.append_row(sheet, &header)?;
            *self = Self::from_header(&header);
        } else {
            let col = self.width() + 1;
            store.update_cell(sheet, 1, col, spec.header)?;
            self.headers.push(spec.header.to_string());
            self.positions.insert(spec.header.to_string(), col);
            tracing::info!(sheet = %sheet, column = spec.header, col, "created missing column");
        }

        self.column(spec).ok_or_else(|| {
            TableStoreError::Unreachable(format!("column '{}' could not be created", spec.header))
        })
    }

    /// Ensure every schema column exists.
    pub fn ensure_all<S: TableStore + ?Sized>(
        &mut self,
        store: &S,
        sheet: &SheetRef,
    ) -> Result<(), TableStoreError> {
        for spec in CATALOG_SCHEMA.iter() {
            self.ensure(store, sheet, spec)?;
        }
        Ok(())
    }
}
