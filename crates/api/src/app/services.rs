use std::sync::Arc;

use stockbook_auth::{AdminGate, AdminSession};
use stockbook_core::{Clock, InventoryError, SystemClock};
use stockbook_infra::config::{CATALOG_WORKSHEET, DEFAULT_TABLE, LEDGER_WORKSHEET};
use stockbook_infra::{
    AddOutcome, AppConfig, Catalog, MovementLedger, MutationDispatcher, QuantityOutcome,
    RemoveOutcome, SheetRef, SnapshotLoader, TableStore, UnavailableTableStore, UsageAggregator,
    UsageReport,
};
use stockbook_inventory::{Adjustment, InventoryPolicies, LedgerEntry, NewItem, UsageWindow};

/// Type-erased store so one set of services serves every backend.
pub type SharedStore = Arc<dyn TableStore>;

/// Run a store-backed call on the blocking pool.
///
/// Every table store call is synchronous file or network IO.
pub async fn run_blocking<T, F>(services: Arc<AppServices>, f: F) -> Result<T, InventoryError>
where
    T: Send + 'static,
    F: FnOnce(&AppServices) -> Result<T, InventoryError> + Send + 'static,
{
    tokio::task::spawn_blocking(move || f(&services))
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "store task failed");
            InventoryError::store(format!("store task failed: {e}"))
        })?
}

/// Everything the handlers need, built once at startup.
pub struct AppServices {
    loader: SnapshotLoader<SharedStore>,
    ledger: MovementLedger<SharedStore>,
    dispatcher: MutationDispatcher<SharedStore>,
    aggregator: UsageAggregator<SharedStore>,
    default_window: UsageWindow,
}

impl AppServices {
    pub fn new(
        store: SharedStore,
        table: &str,
        gate: AdminGate,
        policies: InventoryPolicies,
        clock: Arc<dyn Clock>,
        default_window: UsageWindow,
    ) -> Self {
        let items = SheetRef::new(table, CATALOG_WORKSHEET);
        let movements = SheetRef::new(table, LEDGER_WORKSHEET);

        let loader = SnapshotLoader::new(store.clone(), items.clone(), policies.numeric);
        let ledger = MovementLedger::new(store.clone(), movements, clock);
        let dispatcher = MutationDispatcher::new(
            store.clone(),
            items,
            ledger.clone(),
            gate.clone(),
            policies,
        );
        let aggregator = UsageAggregator::new(store, loader.clone(), ledger.clone(), gate);

        Self {
            loader,
            ledger,
            dispatcher,
            aggregator,
            default_window,
        }
    }

    /// Wire services from configuration.
    ///
    /// A failed connection does not stop the service: it runs against a store
    /// that reports the failure, so every page shows an empty catalog and the
    /// reason.
    pub fn from_config(config: &AppConfig) -> Self {
        let (store, table) = match stockbook_infra::connect(config) {
            Ok(conn) => {
                let store: SharedStore = Arc::new(conn.store);
                (store, conn.table)
            }
            Err(e) => {
                tracing::error!(error = %e, "table store connection failed; catalog will be unavailable");
                let store: SharedStore = Arc::new(UnavailableTableStore::new(e));
                let table = config.table.clone().unwrap_or_else(|| DEFAULT_TABLE.to_string());
                (store, table)
            }
        };

        let gate = AdminGate::new(config.admin_passphrase.clone());
        if !gate.is_configured() {
            tracing::warn!("STOCKBOOK_ADMIN_PASSPHRASE not set; admin operations are disabled");
        }

        Self::new(
            store,
            &table,
            gate,
            config.policies,
            Arc::new(SystemClock),
            config.usage_window,
        )
    }

    /// Fresh snapshot for every request.
    pub fn catalog(&self) -> Catalog {
        self.loader.load()
    }

    pub fn set_quantity(&self, name: &str, quantity: i64) -> Result<QuantityOutcome, InventoryError> {
        self.dispatcher.set_absolute(&self.catalog(), name, quantity)
    }

    pub fn adjust(&self, name: &str, adjustment: Adjustment) -> Result<QuantityOutcome, InventoryError> {
        self.dispatcher.relative_adjust(&self.catalog(), name, adjustment)
    }

    /// The form is checked before the catalog is read, so a bad form never
    /// reaches the store.
    pub fn add_item(&self, session: &AdminSession, form: &NewItem) -> Result<AddOutcome, InventoryError> {
        form.validate()?;
        self.dispatcher.add_item(session, &self.catalog(), form)
    }

    pub fn remove_item(&self, session: &AdminSession, name: &str) -> Result<RemoveOutcome, InventoryError> {
        self.dispatcher.remove_item(session, &self.catalog(), name)
    }

    pub fn aggregate(
        &self,
        session: &AdminSession,
        window_days: Option<u32>,
    ) -> Result<UsageReport, InventoryError> {
        let window = match window_days {
            Some(days) => UsageWindow::new(days)?,
            None => self.default_window,
        };
        self.aggregator.aggregate(session, window)
    }

    pub fn recent_movements(&self, limit: usize) -> Result<Vec<LedgerEntry>, InventoryError> {
        self.ledger.recent(limit)
    }
}
