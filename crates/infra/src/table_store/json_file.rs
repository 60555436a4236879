use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use serde::{Deserialize, Serialize};

use super::in_memory::{Grid, grid};
use super::r#trait::{SheetRef, TableStore, TableStoreError};
use crate::credentials::CredentialBundle;

/// On-disk shape of one table: worksheets by tab name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Workbook {
    /// Client identities allowed to open this workbook. `None` admits any
    /// valid credential bundle.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub authorized_clients: Option<Vec<String>>,
    #[serde(default)]
    pub worksheets: BTreeMap<String, Grid>,
}

/// Table store backed by one JSON workbook file per table.
///
/// Stands in for the hosted spreadsheet service: same row/column contract,
/// same per-call authentication, whole-file rewrite after every write.
#[derive(Debug)]
pub struct JsonFileTableStore {
    data_dir: PathBuf,
    client_email: String,
    workbooks: RwLock<HashMap<String, Workbook>>,
}

impl JsonFileTableStore {
    /// Validate the credential bundle and bind it to a data directory.
    pub fn connect(
        data_dir: impl Into<PathBuf>,
        credentials: &CredentialBundle,
    ) -> Result<Self, TableStoreError> {
        credentials.validate()?;
        Ok(Self {
            data_dir: data_dir.into(),
            client_email: credentials.client_email.clone(),
            workbooks: RwLock::new(HashMap::new()),
        })
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    fn workbook_path(&self, table: &str) -> Result<PathBuf, TableStoreError> {
        if table.is_empty() || table.contains(['/', '\\']) || table.contains("..") {
            return Err(TableStoreError::Unreachable(format!(
                "invalid table name '{table}'"
            )));
        }
        Ok(self.data_dir.join(format!("{table}.json")))
    }

    fn load_from_disk(&self, table: &str) -> Result<Workbook, TableStoreError> {
        let path = self.workbook_path(table)?;
        match fs::read_to_string(&path) {
            Ok(raw) => serde_json::from_str(&raw).map_err(|e| {
                TableStoreError::Unreachable(format!("corrupt workbook {}: {e}", path.display()))
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Workbook::default()),
            Err(e) => Err(TableStoreError::Unreachable(format!(
                "failed to read {}: {e}",
                path.display()
            ))),
        }
    }

    fn persist(&self, table: &str, workbook: &Workbook) -> Result<(), TableStoreError> {
        let path = self.workbook_path(table)?;
        let io_err = |e: std::io::Error| {
            TableStoreError::Unreachable(format!("failed to write {}: {e}", path.display()))
        };

        fs::create_dir_all(&self.data_dir).map_err(io_err)?;
        let raw = serde_json::to_string_pretty(workbook)
            .map_err(|e| TableStoreError::Unreachable(format!("failed to encode workbook: {e}")))?;

        // Write-then-rename so a crash never leaves a half-written workbook.
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, raw).map_err(io_err)?;
        fs::rename(&tmp, &path).map_err(io_err)?;
        Ok(())
    }

    fn authorize(&self, table: &str, workbook: &Workbook) -> Result<(), TableStoreError> {
        match &workbook.authorized_clients {
            Some(clients) if !clients.iter().any(|c| *c == self.client_email) => {
                Err(TableStoreError::Authentication(format!(
                    "client '{}' is not authorized for table '{table}'",
                    self.client_email
                )))
            }
            _ => Ok(()),
        }
    }

    /// Run `f` against the table's workbook, persisting afterwards when
    /// `write` is set.
    fn with_workbook<R>(
        &self,
        table: &str,
        write: bool,
        f: impl FnOnce(&mut Workbook) -> Result<R, TableStoreError>,
    ) -> Result<R, TableStoreError> {
        let mut books = self
            .workbooks
            .write()
            .map_err(|_| TableStoreError::Unreachable("lock poisoned".to_string()))?;

        if !books.contains_key(table) {
            let loaded = self.load_from_disk(table)?;
            books.insert(table.to_string(), loaded);
        }
        let Some(workbook) = books.get_mut(table) else {
            return Err(TableStoreError::Unreachable(format!("table '{table}' not loaded")));
        };

        self.authorize(table, workbook)?;

        if !write {
            return f(workbook);
        }

        // Mutate a copy so a failed persist leaves the cache matching disk.
        let mut staged = workbook.clone();
        let out = f(&mut staged)?;
        self.persist(table, &staged)?;
        *workbook = staged;
        Ok(out)
    }
}

impl TableStore for JsonFileTableStore {
    fn read_all(&self, sheet: &SheetRef) -> Result<Vec<Vec<String>>, TableStoreError> {
        self.with_workbook(&sheet.table, false, |wb| {
            wb.worksheets
                .get(&sheet.worksheet)
                .cloned()
                .ok_or_else(|| TableStoreError::WorksheetNotFound(sheet.clone()))
        })
    }

    fn find_row(
        &self,
        sheet: &SheetRef,
        column: u32,
        value: &str,
    ) -> Result<Option<u32>, TableStoreError> {
        self.with_workbook(&sheet.table, false, |wb| {
            let grid = wb
                .worksheets
                .get(&sheet.worksheet)
                .ok_or_else(|| TableStoreError::WorksheetNotFound(sheet.clone()))?;
            Ok(grid::find_row(grid, column, value))
        })
    }

    fn update_cell(
        &self,
        sheet: &SheetRef,
        row: u32,
        column: u32,
        value: &str,
    ) -> Result<(), TableStoreError> {
        self.with_workbook(&sheet.table, true, |wb| {
            let grid = wb
                .worksheets
                .get_mut(&sheet.worksheet)
                .ok_or_else(|| TableStoreError::WorksheetNotFound(sheet.clone()))?;
            grid::update_cell(grid, sheet, row, column, value)
        })
    }

    fn append_row(&self, sheet: &SheetRef, values: &[String]) -> Result<u32, TableStoreError> {
        self.with_workbook(&sheet.table, true, |wb| {
            let grid = wb.worksheets.entry(sheet.worksheet.clone()).or_default();
            Ok(grid::append_row(grid, values))
        })
    }

    fn delete_row(&self, sheet: &SheetRef, row: u32) -> Result<(), TableStoreError> {
        self.with_workbook(&sheet.table, true, |wb| {
            let grid = wb
                .worksheets
                .get_mut(&sheet.worksheet)
                .ok_or_else(|| TableStoreError::WorksheetNotFound(sheet.clone()))?;
            grid::delete_row(grid, sheet, row)
        })
    }
}
