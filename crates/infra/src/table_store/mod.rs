//! Table store boundary.
//!
//! The spreadsheet-backed store is the only persistent state. This module
//! defines the row/column contract the rest of the crate consumes, plus the
//! implementations that ship with it.

pub mod in_memory;
pub mod json_file;
pub mod r#trait;
pub mod unavailable;

pub use in_memory::InMemoryTableStore;
pub use json_file::{JsonFileTableStore, Workbook};
pub use r#trait::{SheetRef, TableStore, TableStoreError};
pub use unavailable::UnavailableTableStore;
