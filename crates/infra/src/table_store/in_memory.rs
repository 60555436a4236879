use std::collections::HashMap;
use std::sync::RwLock;

use super::r#trait::{SheetRef, TableStore, TableStoreError};

/// Cell grid of one worksheet, header first.
pub(crate) type Grid = Vec<Vec<String>>;

/// Grid operations shared by every store that keeps worksheets in memory.
pub(crate) mod grid {
    use super::{Grid, SheetRef, TableStoreError};

    pub(crate) fn find_row(grid: &Grid, column: u32, value: &str) -> Option<u32> {
        if column == 0 {
            return None;
        }
        let col = (column - 1) as usize;
        grid.iter()
            .enumerate()
            .skip(1)
            .find(|(_, cells)| cells.get(col).map(|c| c.trim()) == Some(value.trim()))
            .map(|(idx, _)| idx as u32 + 1)
    }

    pub(crate) fn update_cell(
        grid: &mut Grid,
        sheet: &SheetRef,
        row: u32,
        column: u32,
        value: &str,
    ) -> Result<(), TableStoreError> {
        if row == 0 {
            return Err(TableStoreError::RowOutOfRange {
                sheet: sheet.clone(),
                row,
            });
        }
        if column == 0 {
            return Err(TableStoreError::ColumnOutOfRange {
                sheet: sheet.clone(),
                column,
            });
        }

        let r = (row - 1) as usize;
        let c = (column - 1) as usize;
        if grid.len() <= r {
            grid.resize_with(r + 1, Vec::new);
        }
        let cells = &mut grid[r];
        if cells.len() <= c {
            cells.resize(c + 1, String::new());
        }
        cells[c] = value.to_string();
        Ok(())
    }

    pub(crate) fn append_row(grid: &mut Grid, values: &[String]) -> u32 {
        grid.push(values.to_vec());
        grid.len() as u32
    }

    pub(crate) fn delete_row(
        grid: &mut Grid,
        sheet: &SheetRef,
        row: u32,
    ) -> Result<(), TableStoreError> {
        if row == 0 || row as usize > grid.len() {
            return Err(TableStoreError::RowOutOfRange {
                sheet: sheet.clone(),
                row,
            });
        }
        grid.remove((row - 1) as usize);
        Ok(())
    }
}

/// In-memory table store.
///
/// Intended for tests/dev. Not optimized for performance.
#[derive(Debug, Default)]
pub struct InMemoryTableStore {
    sheets: RwLock<HashMap<SheetRef, Grid>>,
}

impl InMemoryTableStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace (or create) a worksheet's contents.
    pub fn seed(&self, sheet: &SheetRef, rows: Vec<Vec<String>>) {
        if let Ok(mut sheets) = self.sheets.write() {
            sheets.insert(sheet.clone(), rows);
        }
    }

    /// Convenience seeding from string slices.
    pub fn seed_str(&self, sheet: &SheetRef, rows: &[&[&str]]) {
        let rows = rows
            .iter()
            .map(|r| r.iter().map(|c| c.to_string()).collect())
            .collect();
        self.seed(sheet, rows);
    }

    fn poisoned() -> TableStoreError {
        TableStoreError::Unreachable("lock poisoned".to_string())
    }
}

impl TableStore for InMemoryTableStore {
    fn read_all(&self, sheet: &SheetRef) -> Result<Vec<Vec<String>>, TableStoreError> {
        let sheets = self.sheets.read().map_err(|_| Self::poisoned())?;
        sheets
            .get(sheet)
            .cloned()
            .ok_or_else(|| TableStoreError::WorksheetNotFound(sheet.clone()))
    }

    fn find_row(
        &self,
        sheet: &SheetRef,
        column: u32,
        value: &str,
    ) -> Result<Option<u32>, TableStoreError> {
        let sheets = self.sheets.read().map_err(|_| Self::poisoned())?;
        let grid = sheets
            .get(sheet)
            .ok_or_else(|| TableStoreError::WorksheetNotFound(sheet.clone()))?;
        Ok(grid::find_row(grid, column, value))
    }

    fn update_cell(
        &self,
        sheet: &SheetRef,
        row: u32,
        column: u32,
        value: &str,
    ) -> Result<(), TableStoreError> {
        let mut sheets = self.sheets.write().map_err(|_| Self::poisoned())?;
        let grid = sheets
            .get_mut(sheet)
            .ok_or_else(|| TableStoreError::WorksheetNotFound(sheet.clone()))?;
        grid::update_cell(grid, sheet, row, column, value)
    }

    fn append_row(&self, sheet: &SheetRef, values: &[String]) -> Result<u32, TableStoreError> {
        let mut sheets = self.sheets.write().map_err(|_| Self::poisoned())?;
        let grid = sheets.entry(sheet.clone()).or_default();
        Ok(grid::append_row(grid, values))
    }

    fn delete_row(&self, sheet: &SheetRef, row: u32) -> Result<(), TableStoreError> {
        let mut sheets = self.sheets.write().map_err(|_| Self::poisoned())?;
        let grid = sheets
            .get_mut(sheet)
            .ok_or_else(|| TableStoreError::WorksheetNotFound(sheet.clone()))?;
        grid::delete_row(grid, sheet, row)
    }
}
