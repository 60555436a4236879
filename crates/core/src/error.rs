//! Error taxonomy shared by every layer.

use thiserror::Error;

/// Result type used across the stock tracker.
pub type InventoryResult<T> = Result<T, InventoryError>;

/// Failures a user can be told about.
///
/// None of these are fatal: callers report them and keep serving the last
/// (or an empty) snapshot. Malformed numeric cells are not in this list; they
/// are coerced to zero and only counted.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum InventoryError {
    /// The credential bundle was missing, malformed, or refused by the store.
    #[error("authentication failed: {0}")]
    Authentication(String),

    /// The table store could not be read or written.
    #[error("store unreachable: {0}")]
    StoreUnreachable(String),

    /// No catalog row matched the requested item.
    #[error("row not found: {0}")]
    RowNotFound(String),

    /// Input was rejected before touching the store.
    #[error("validation failed: {0}")]
    Validation(String),

    /// The admin passphrase was missing or did not match.
    #[error("unauthorized")]
    Unauthorized,
}

impl InventoryError {
    pub fn authentication(msg: impl Into<String>) -> Self {
        Self::Authentication(msg.into())
    }

    pub fn store(msg: impl Into<String>) -> Self {
        Self::StoreUnreachable(msg.into())
    }

    pub fn row_not_found(item: impl Into<String>) -> Self {
        Self::RowNotFound(item.into())
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Stable machine-readable code (used in API payloads and logs).
    pub fn code(&self) -> &'static str {
        match self {
            InventoryError::Authentication(_) => "authentication_failure",
            InventoryError::StoreUnreachable(_) => "store_unreachable",
            InventoryError::RowNotFound(_) => "row_not_found",
            InventoryError::Validation(_) => "validation_failure",
            InventoryError::Unauthorized => "unauthorized",
        }
    }

    /// True for failures that happened before any store call was made.
    pub fn is_rejected_before_store(&self) -> bool {
        matches!(self, InventoryError::Validation(_) | InventoryError::Unauthorized)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_are_stable() {
        assert_eq!(InventoryError::validation("x").code(), "validation_failure");
        assert_eq!(InventoryError::row_not_found("Resin").code(), "row_not_found");
        assert_eq!(InventoryError::Unauthorized.code(), "unauthorized");
    }

    #[test]
    fn display_includes_detail() {
        let err = InventoryError::store("connection reset");
        assert_eq!(err.to_string(), "store unreachable: connection reset");
    }

    #[test]
    fn validation_and_unauthorized_never_reach_the_store() {
        assert!(InventoryError::validation("blank name").is_rejected_before_store());
        assert!(InventoryError::Unauthorized.is_rejected_before_store());
        assert!(!InventoryError::row_not_found("Resin").is_rejected_before_store());
    }
}
