//! Credential bundle for the table store.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::table_store::TableStoreError;

/// Service-account style credentials.
///
/// The private key is frequently pasted into config with literal `\n`
/// escapes; [`CredentialBundle::from_json`] turns those back into newlines.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CredentialBundle {
    pub client_email: String,
    pub private_key: String,
    /// Table to open when none is configured explicitly.
    #[serde(default)]
    pub table: Option<String>,
}

impl CredentialBundle {
    pub fn from_json(raw: &str) -> Result<Self, TableStoreError> {
        let mut bundle: CredentialBundle = serde_json::from_str(raw).map_err(|e| {
            TableStoreError::Authentication(format!("credential bundle is not valid JSON: {e}"))
        })?;
        bundle.private_key = bundle.private_key.replace("\\n", "\n");
        bundle.validate()?;
        Ok(bundle)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, TableStoreError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|e| {
            TableStoreError::Authentication(format!(
                "failed to read credential bundle {}: {e}",
                path.display()
            ))
        })?;
        Self::from_json(&raw)
    }

    pub fn validate(&self) -> Result<(), TableStoreError> {
        if self.client_email.trim().is_empty() {
            return Err(TableStoreError::Authentication(
                "credential bundle has no client_email".to_string(),
            ));
        }
        if self.private_key.trim().is_empty() {
            return Err(TableStoreError::Authentication(
                "credential bundle has no private_key".to_string(),
            ));
        }
        Ok(())
    }
}

impl core::fmt::Debug for CredentialBundle {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("CredentialBundle")
            .field("client_email", &self.client_email)
            .field("private_key", &"<redacted>")
            .field("table", &self.table)
            .finish()
    }
}
