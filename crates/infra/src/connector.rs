//! Opens the configured table store.

use crate::config::{AppConfig, DEFAULT_TABLE};
use crate::credentials::CredentialBundle;
use crate::table_store::{JsonFileTableStore, TableStoreError};

/// A connected store plus the table every worksheet lives in.
#[derive(Debug)]
pub struct Connection {
    pub store: JsonFileTableStore,
    pub table: String,
}

/// Load the credential bundle and open the workbook store.
///
/// The table name comes from config first, then the bundle, then
/// [`DEFAULT_TABLE`].
pub fn connect(config: &AppConfig) -> Result<Connection, TableStoreError> {
    let path = config.credentials_path.as_ref().ok_or_else(|| {
        TableStoreError::Authentication("STOCKBOOK_CREDENTIALS is not set".to_string())
    })?;
    let bundle = CredentialBundle::from_file(path)?;
    let table = config
        .table
        .clone()
        .or_else(|| bundle.table.clone())
        .unwrap_or_else(|| DEFAULT_TABLE.to_string());

    let store = JsonFileTableStore::connect(&config.data_dir, &bundle)?;
    tracing::info!(
        data_dir = %config.data_dir.display(),
        table = %table,
        client = %bundle.client_email,
        "table store connected"
    );
    Ok(Connection { store, table })
}
