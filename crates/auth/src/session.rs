/// What the current user presented for admin access.
///
/// Carries the raw attempt, never a cached "is admin" flag: every gated call
/// re-checks it against the configured passphrase.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct AdminSession {
    presented: Option<String>,
}

impl AdminSession {
    /// Session without an admin attempt (read and quantity updates only).
    pub fn anonymous() -> Self {
        Self { presented: None }
    }

    pub fn with_passphrase(presented: impl Into<String>) -> Self {
        Self {
            presented: Some(presented.into()),
        }
    }

    pub fn presented(&self) -> Option<&str> {
        self.presented.as_deref()
    }
}

impl core::fmt::Debug for AdminSession {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("AdminSession")
            .field("presented", &self.presented.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}
