/// Configured admin passphrase.
///
/// `Debug` never prints the secret.
#[derive(Clone, PartialEq, Eq)]
pub struct AdminPassphrase(String);

impl AdminPassphrase {
    /// Returns `None` for an empty passphrase; an empty secret would let a
    /// blank form field unlock admin mode.
    pub fn new(secret: impl Into<String>) -> Option<Self> {
        let secret = secret.into();
        if secret.is_empty() {
            None
        } else {
            Some(Self(secret))
        }
    }

    /// Exact string comparison.
    pub fn matches(&self, presented: &str) -> bool {
        self.0 == presented
    }
}

impl core::fmt::Debug for AdminPassphrase {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str("AdminPassphrase(<redacted>)")
    }
}
