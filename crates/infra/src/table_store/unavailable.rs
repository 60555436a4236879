use super::r#trait::{SheetRef, TableStore, TableStoreError};

/// Store used when no connection could be made at startup.
///
/// Every call fails with the original reason, so the service keeps running
/// and shows an empty catalog plus the error instead of refusing to start.
#[derive(Debug, Clone)]
pub struct UnavailableTableStore {
    reason: TableStoreError,
}

impl UnavailableTableStore {
    pub fn new(reason: TableStoreError) -> Self {
        Self { reason }
    }
}

impl TableStore for UnavailableTableStore {
    fn read_all(&self, _sheet: &SheetRef) -> Result<Vec<Vec<String>>, TableStoreError> {
        Err(self.reason.clone())
    }

    fn find_row(
        &self,
        _sheet: &SheetRef,
        _column: u32,
        _value: &str,
    ) -> Result<Option<u32>, TableStoreError> {
        Err(self.reason.clone())
    }

    fn update_cell(
        &self,
        _sheet: &SheetRef,
        _row: u32,
        _column: u32,
        _value: &str,
    ) -> Result<(), TableStoreError> {
        Err(self.reason.clone())
    }

    fn append_row(&self, _sheet: &SheetRef, _values: &[String]) -> Result<u32, TableStoreError> {
        Err(self.reason.clone())
    }

    fn delete_row(&self, _sheet: &SheetRef, _row: u32) -> Result<(), TableStoreError> {
        Err(self.reason.clone())
    }
}
