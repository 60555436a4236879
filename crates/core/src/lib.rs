//! `stockbook-core`: shared building blocks for the stock tracker.
//!
//! This crate contains **pure** primitives (no storage, no transport).

pub mod clock;
pub mod error;
pub mod id;
pub mod value_object;

pub use clock::{Clock, FixedClock, SystemClock};
pub use error::{InventoryError, InventoryResult};
pub use id::EntryId;
pub use value_object::{ItemName, ValueObject};
