//! Inventory domain module.
//!
//! Business rules for the stock catalog and its movement ledger, implemented
//! purely as deterministic logic (no IO, no HTTP, no storage). Infra loads
//! rows into a [`Snapshot`], asks this crate what a mutation means, and
//! writes the answer back.

pub mod item;
pub mod movement;
pub mod mutation;
pub mod policy;
pub mod snapshot;
pub mod status;
pub mod usage;

pub use item::{DEFAULT_GENRE, ItemRecord, NewItem};
pub use movement::{LedgerEntry, MovementKind};
pub use mutation::{Adjustment, QuantityChange, check_new_item, plan_adjust, plan_set_absolute};
pub use policy::{DuplicateNamePolicy, InventoryPolicies, NumericPolicy, RecountKindPolicy};
pub use snapshot::{GenreFilter, RowId, Snapshot, SnapshotRow};
pub use status::{StockStatus, classify};
pub use usage::{DEFAULT_WINDOW_DAYS, UsageWindow, fold_usage, write_back_plan};
