//! `stockbook-auth`: admin gate for catalog-changing operations.
//!
//! Decoupled from HTTP and storage: callers build an [`AdminSession`] from
//! whatever the user presented and hand it to every gated operation.

pub mod authorize;
pub mod passphrase;
pub mod session;

pub use authorize::{AdminGate, AdminGrant, AuthzError};
pub use passphrase::AdminPassphrase;
pub use session::AdminSession;
