use thiserror::Error;

use stockbook_core::InventoryError;

use crate::{AdminPassphrase, AdminSession};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthzError {
    #[error("admin passphrase not configured")]
    NotConfigured,

    #[error("admin passphrase required")]
    MissingPassphrase,

    #[error("admin passphrase does not match")]
    Mismatch,
}

impl From<AuthzError> for InventoryError {
    fn from(_: AuthzError) -> Self {
        InventoryError::Unauthorized
    }
}

/// Proof that a session passed the gate for one call.
///
/// Only [`AdminGate::authorize`] can build one, so an operation that takes
/// `&AdminGrant` cannot be reached without a fresh check.
#[derive(Debug)]
pub struct AdminGrant {
    _private: (),
}

/// Checks admin sessions against the configured passphrase.
///
/// - No IO
/// - No caching: each call compares again
#[derive(Debug, Clone, Default)]
pub struct AdminGate {
    passphrase: Option<AdminPassphrase>,
}

impl AdminGate {
    pub fn new(passphrase: Option<AdminPassphrase>) -> Self {
        Self { passphrase }
    }

    /// Gate that refuses everyone (no passphrase configured).
    pub fn locked() -> Self {
        Self { passphrase: None }
    }

    pub fn is_configured(&self) -> bool {
        self.passphrase.is_some()
    }

    pub fn authorize(&self, session: &AdminSession) -> Result<AdminGrant, AuthzError> {
        let Some(expected) = &self.passphrase else {
            return Err(AuthzError::NotConfigured);
        };

        let presented = match session.presented() {
            Some(p) if !p.is_empty() => p,
            _ => return Err(AuthzError::MissingPassphrase),
        };

        if expected.matches(presented) {
            Ok(AdminGrant { _private: () })
        } else {
            tracing::warn!("admin passphrase mismatch");
            Err(AuthzError::Mismatch)
        }
    }
}
