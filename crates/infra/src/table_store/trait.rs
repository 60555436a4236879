use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use stockbook_core::InventoryError;

/// Address of one worksheet tab inside a table (spreadsheet).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SheetRef {
    pub table: String,
    pub worksheet: String,
}

impl SheetRef {
    pub fn new(table: impl Into<String>, worksheet: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            worksheet: worksheet.into(),
        }
    }
}

impl core::fmt::Display for SheetRef {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}/{}", self.table, self.worksheet)
    }
}

/// Table store operation error.
///
/// These are infrastructure errors; they are mapped into
/// [`InventoryError`] at the boundary so callers can report them and keep
/// going.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TableStoreError {
    #[error("authentication failed: {0}")]
    Authentication(String),

    #[error("store unreachable: {0}")]
    Unreachable(String),

    #[error("worksheet not found: {0}")]
    WorksheetNotFound(SheetRef),

    #[error("row {row} is out of range for {sheet}")]
    RowOutOfRange { sheet: SheetRef, row: u32 },

    #[error("column {column} is out of range for {sheet}")]
    ColumnOutOfRange { sheet: SheetRef, column: u32 },
}

impl From<TableStoreError> for InventoryError {
    fn from(value: TableStoreError) -> Self {
        match value {
            TableStoreError::Authentication(msg) => InventoryError::Authentication(msg),
            TableStoreError::Unreachable(msg) => InventoryError::StoreUnreachable(msg),
            TableStoreError::WorksheetNotFound(sheet) => {
                InventoryError::StoreUnreachable(format!("worksheet not found: {sheet}"))
            }
            TableStoreError::RowOutOfRange { sheet, row } => {
                InventoryError::RowNotFound(format!("row {row} in {sheet}"))
            }
            TableStoreError::ColumnOutOfRange { sheet, column } => {
                InventoryError::StoreUnreachable(format!("column {column} in {sheet}"))
            }
        }
    }
}

/// Row/column table addressable by table name and worksheet tab.
///
/// Rows and columns are 1-based, the way spreadsheets number them; row 1 is
/// the header. Every write is a blind last-writer-wins update.
///
/// ## Implementation requirements
///
/// - `read_all` returns rows in sheet order, header first.
/// - `find_row` returns the first data row (row >= 2) whose cell in `column`
///   equals `value`, ignoring surrounding whitespace.
/// - `update_cell` extends the row and the sheet with blank cells as needed.
/// - `append_row` creates the worksheet when it does not exist yet.
/// - `delete_row` shifts later rows up by one.
pub trait TableStore: Send + Sync {
    fn read_all(&self, sheet: &SheetRef) -> Result<Vec<Vec<String>>, TableStoreError>;

    fn find_row(
        &self,
        sheet: &SheetRef,
        column: u32,
        value: &str,
    ) -> Result<Option<u32>, TableStoreError>;

    fn update_cell(
        &self,
        sheet: &SheetRef,
        row: u32,
        column: u32,
        value: &str,
    ) -> Result<(), TableStoreError>;

    /// Append one row; returns its row number.
    fn append_row(&self, sheet: &SheetRef, values: &[String]) -> Result<u32, TableStoreError>;

    fn delete_row(&self, sheet: &SheetRef, row: u32) -> Result<(), TableStoreError>;
}

impl<S> TableStore for Arc<S>
where
    S: TableStore + ?Sized,
{
    fn read_all(&self, sheet: &SheetRef) -> Result<Vec<Vec<String>>, TableStoreError> {
        (**self).read_all(sheet)
    }

    fn find_row(
        &self,
        sheet: &SheetRef,
        column: u32,
        value: &str,
    ) -> Result<Option<u32>, TableStoreError> {
        (**self).find_row(sheet, column, value)
    }

    fn update_cell(
        &self,
        sheet: &SheetRef,
        row: u32,
        column: u32,
        value: &str,
    ) -> Result<(), TableStoreError> {
        (**self).update_cell(sheet, row, column, value)
    }

    fn append_row(&self, sheet: &SheetRef, values: &[String]) -> Result<u32, TableStoreError> {
        (**self).append_row(sheet, values)
    }

    fn delete_row(&self, sheet: &SheetRef, row: u32) -> Result<(), TableStoreError> {
        (**self).delete_row(sheet, row)
    }
}
