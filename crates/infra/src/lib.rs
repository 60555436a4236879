//! Infrastructure layer: table store adapters, catalog loading, movement
//! ledger, mutation dispatch, usage aggregation and configuration.

pub mod aggregator;
pub mod config;
pub mod connector;
pub mod credentials;
pub mod ledger;
pub mod loader;
pub mod mutation_dispatcher;
pub mod schema;
pub mod table_store;

mod integration_tests;

pub use aggregator::{UsageAggregator, UsageReport};
pub use config::{AppConfig, ConfigError};
pub use connector::{Connection, connect};
pub use credentials::CredentialBundle;
pub use ledger::{LEDGER_HEADER, MovementLedger};
pub use loader::{Catalog, LoadStats, SnapshotLoader, build_catalog};
pub use mutation_dispatcher::{AddOutcome, MutationDispatcher, QuantityOutcome, RemoveOutcome};
pub use table_store::{
    InMemoryTableStore, JsonFileTableStore, SheetRef, TableStore, TableStoreError,
    UnavailableTableStore,
};
