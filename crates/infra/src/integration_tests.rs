//! Pipeline tests: loader → dispatcher → ledger → aggregator, over the
//! in-memory table store.
//!
//! Verifies:
//! - Mutations write exactly one catalog cell/row and log the real delta
//! - Validation and authorization reject before the store is touched
//! - Usage aggregation is correct, idempotent and tolerant of orphan entries

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use chrono::{DateTime, Duration, TimeZone, Utc};

    use stockbook_auth::{AdminGate, AdminPassphrase, AdminSession};
    use stockbook_core::{FixedClock, InventoryError};
    use stockbook_inventory::{
        Adjustment, InventoryPolicies, MovementKind, NewItem, NumericPolicy, UsageWindow,
    };

    use crate::aggregator::UsageAggregator;
    use crate::ledger::{LEDGER_HEADER, MovementLedger};
    use crate::loader::{Catalog, SnapshotLoader};
    use crate::mutation_dispatcher::MutationDispatcher;
    use crate::table_store::{
        InMemoryTableStore, SheetRef, TableStore, TableStoreError, UnavailableTableStore,
    };

    const PASS: &str = "lab-admin";

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 19, 12, 0, 0).unwrap()
    }

    fn items() -> SheetRef {
        SheetRef::new("inventory_data", "items")
    }

    fn movements() -> SheetRef {
        SheetRef::new("inventory_data", "movements")
    }

    /// Counts every call that reaches the wrapped store.
    #[derive(Debug, Default)]
    struct CountingStore {
        inner: InMemoryTableStore,
        calls: AtomicUsize,
    }

    impl CountingStore {
        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }

        fn hit(&self) {
            self.calls.fetch_add(1, Ordering::SeqCst);
        }
    }

    impl TableStore for CountingStore {
        fn read_all(&self, sheet: &SheetRef) -> Result<Vec<Vec<String>>, TableStoreError> {
            self.hit();
            self.inner.read_all(sheet)
        }

        fn find_row(
            &self,
            sheet: &SheetRef,
            column: u32,
            value: &str,
        ) -> Result<Option<u32>, TableStoreError> {
            self.hit();
            self.inner.find_row(sheet, column, value)
        }

        fn update_cell(
            &self,
            sheet: &SheetRef,
            row: u32,
            column: u32,
            value: &str,
        ) -> Result<(), TableStoreError> {
            self.hit();
            self.inner.update_cell(sheet, row, column, value)
        }

        fn append_row(&self, sheet: &SheetRef, values: &[String]) -> Result<u32, TableStoreError> {
            self.hit();
            self.inner.append_row(sheet, values)
        }

        fn delete_row(&self, sheet: &SheetRef, row: u32) -> Result<(), TableStoreError> {
            self.hit();
            self.inner.delete_row(sheet, row)
        }
    }

    struct Harness {
        store: Arc<CountingStore>,
        loader: SnapshotLoader<Arc<CountingStore>>,
        ledger: MovementLedger<Arc<CountingStore>>,
        dispatcher: MutationDispatcher<Arc<CountingStore>>,
        aggregator: UsageAggregator<Arc<CountingStore>>,
    }

    impl Harness {
        fn new(policies: InventoryPolicies) -> Self {
            let store = Arc::new(CountingStore::default());
            store.inner.seed_str(
                &items(),
                &[
                    &["name", "quantity", "genre", "required_quantity", "monthly_usage"],
                    &["Resin", "10", "Chemicals", "5", "0"],
                    &["Glue", "4", "Adhesives", "2", "0"],
                    &["Tape", "12", "Adhesives", "3", "9"],
                ],
            );
            let clock = Arc::new(FixedClock(now()));
            let gate = AdminGate::new(AdminPassphrase::new(PASS));
            let loader = SnapshotLoader::new(store.clone(), items(), policies.numeric);
            let ledger = MovementLedger::new(store.clone(), movements(), clock);
            let dispatcher = MutationDispatcher::new(
                store.clone(),
                items(),
                ledger.clone(),
                gate.clone(),
                policies,
            );
            let aggregator =
                UsageAggregator::new(store.clone(), loader.clone(), ledger.clone(), gate);
            Self {
                store,
                loader,
                ledger,
                dispatcher,
                aggregator,
            }
        }

        fn catalog(&self) -> Catalog {
            self.loader.load()
        }

        fn quantity(&self, name: &str) -> i64 {
            self.catalog().snapshot.find(name).unwrap().item.quantity
        }

        fn usage(&self, name: &str) -> i64 {
            self.catalog().snapshot.find(name).unwrap().item.monthly_usage
        }

        fn seed_ledger(&self, rows: &[(i64, &str, i64)]) {
            let mut grid: Vec<Vec<String>> =
                vec![LEDGER_HEADER.iter().map(|h| h.to_string()).collect()];
            for (days_ago, item, delta) in rows {
                let kind = if *delta < 0 { "consume" } else { "restock" };
                grid.push(vec![
                    (now() - Duration::days(*days_ago)).to_rfc3339(),
                    item.to_string(),
                    delta.to_string(),
                    kind.to_string(),
                    String::new(),
                ]);
            }
            self.store.inner.seed(&movements(), grid);
        }
    }

    fn admin() -> AdminSession {
        AdminSession::with_passphrase(PASS)
    }

    #[test]
    fn consuming_more_than_stock_logs_actual_change() {
        let h = Harness::new(InventoryPolicies::default());
        let catalog = h.catalog();

        let outcome = h
            .dispatcher
            .relative_adjust(&catalog, "Resin", Adjustment::Consume(15))
            .unwrap();
        assert_eq!(outcome.change.new, 0);
        assert_eq!(outcome.change.delta, -10);
        assert_eq!(h.quantity("Resin"), 0);

        let entries = h.ledger.entries().unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].item_name, "Resin");
        assert_eq!(entries[0].delta, -10);
        assert_eq!(entries[0].kind, MovementKind::Consume);
        assert_eq!(entries[0].occurred_at, now());
    }

    #[test]
    fn set_absolute_logs_recount_and_skips_zero_delta() {
        let h = Harness::new(InventoryPolicies::default());

        let outcome = h.dispatcher.set_absolute(&h.catalog(), "Glue", 9).unwrap();
        assert_eq!(outcome.change.delta, 5);
        assert_eq!(h.quantity("Glue"), 9);

        let outcome = h.dispatcher.set_absolute(&h.catalog(), "Glue", 9).unwrap();
        assert!(outcome.entry.is_none());

        let entries = h.ledger.entries().unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].kind, MovementKind::Recount);
    }

    #[test]
    fn unknown_item_is_row_not_found() {
        let h = Harness::new(InventoryPolicies::default());
        let err = h
            .dispatcher
            .relative_adjust(&h.catalog(), "Solder", Adjustment::Restock(1))
            .unwrap_err();
        assert!(matches!(err, InventoryError::RowNotFound(_)));
    }

    #[test]
    fn stale_snapshot_uses_the_store_row() {
        let h = Harness::new(InventoryPolicies::default());
        let stale = h.catalog();
        // Someone else removes Resin; Glue moves up to row 2.
        h.store.inner.delete_row(&items(), 2).unwrap();

        h.dispatcher
            .relative_adjust(&stale, "Glue", Adjustment::Restock(1))
            .unwrap();
        assert_eq!(h.quantity("Glue"), 5);
        assert_eq!(h.quantity("Tape"), 12);

        let err = h
            .dispatcher
            .relative_adjust(&stale, "Resin", Adjustment::Restock(1))
            .unwrap_err();
        assert!(matches!(err, InventoryError::RowNotFound(_)));
    }

    #[test]
    fn add_item_with_blank_name_never_touches_the_store() {
        let h = Harness::new(InventoryPolicies::default());
        let catalog = h.catalog();
        let before = h.store.calls();

        let form = NewItem {
            name: "  ".to_string(),
            genre: "GenreA".to_string(),
            quantity: 1,
            required_quantity: 0,
        };
        let err = h.dispatcher.add_item(&admin(), &catalog, &form).unwrap_err();
        assert!(matches!(err, InventoryError::Validation(_)));
        assert_eq!(h.store.calls(), before);
    }

    #[test]
    fn negative_set_is_rejected_before_the_store() {
        let h = Harness::new(InventoryPolicies::default());
        let catalog = h.catalog();
        let before = h.store.calls();

        let err = h.dispatcher.set_absolute(&catalog, "Resin", -1).unwrap_err();
        assert!(err.is_rejected_before_store());
        assert_eq!(h.store.calls(), before);
    }

    #[test]
    fn add_and_remove_items() {
        let h = Harness::new(InventoryPolicies::default());
        let form = NewItem {
            name: "Solder".to_string(),
            genre: "Electronics".to_string(),
            quantity: 3,
            required_quantity: 1,
        };
        let added = h.dispatcher.add_item(&admin(), &h.catalog(), &form).unwrap();
        assert_eq!(added.row, 5);

        let catalog = h.catalog();
        let solder = catalog.snapshot.find("Solder").unwrap();
        assert_eq!(solder.item.quantity, 3);
        assert_eq!(solder.item.genre, "Electronics");
        assert_eq!(solder.item.monthly_usage, 0);

        let err = h.dispatcher.add_item(&admin(), &catalog, &form).unwrap_err();
        assert!(matches!(err, InventoryError::Validation(msg) if msg.contains("already exists")));

        h.dispatcher.remove_item(&admin(), &catalog, "Glue").unwrap();
        let catalog = h.catalog();
        assert!(!catalog.snapshot.contains("Glue"));
        assert_eq!(catalog.snapshot.len(), 3);
    }

    #[test]
    fn remove_deletes_the_first_duplicate() {
        let mut policies = InventoryPolicies::default();
        policies.duplicate_names = stockbook_inventory::DuplicateNamePolicy::Allow;
        let h = Harness::new(policies);
        let form = NewItem {
            name: "Resin".to_string(),
            genre: "Spare".to_string(),
            quantity: 1,
            required_quantity: 0,
        };
        h.dispatcher.add_item(&admin(), &h.catalog(), &form).unwrap();
        assert_eq!(h.catalog().snapshot.rows_named("Resin").len(), 2);

        h.dispatcher.remove_item(&admin(), &h.catalog(), "Resin").unwrap();
        let remaining = h.catalog();
        let resin = remaining.snapshot.find("Resin").unwrap();
        assert_eq!(resin.item.genre, "Spare");
    }

    #[test]
    fn admin_operations_require_the_passphrase() {
        let h = Harness::new(InventoryPolicies::default());
        let catalog = h.catalog();
        let before = h.store.calls();

        let anonymous = AdminSession::anonymous();
        let wrong = AdminSession::with_passphrase("guess");
        for session in [&anonymous, &wrong] {
            assert_eq!(
                h.dispatcher.remove_item(session, &catalog, "Resin").unwrap_err(),
                InventoryError::Unauthorized
            );
            assert_eq!(
                h.aggregator.aggregate(session, UsageWindow::default()).unwrap_err(),
                InventoryError::Unauthorized
            );
        }
        assert_eq!(h.store.calls(), before);
    }

    #[test]
    fn resin_usage_is_seven() {
        let h = Harness::new(InventoryPolicies::default());
        h.seed_ledger(&[(1, "Resin", -3), (2, "Resin", -4), (3, "Resin", 2), (45, "Resin", -50)]);

        let report = h.aggregator.aggregate(&admin(), UsageWindow::default()).unwrap();
        assert_eq!(report.usage.get("Resin"), Some(&7));
        assert_eq!(report.rows_written, 3);
        assert_eq!(h.usage("Resin"), 7);
        // Stale figures without recent consumption are cleared.
        assert_eq!(h.usage("Tape"), 0);
    }

    #[test]
    fn aggregation_is_idempotent() {
        let h = Harness::new(InventoryPolicies::default());
        h.seed_ledger(&[(1, "Resin", -3), (4, "Glue", -1), (10, "Glue", -2)]);

        let first = h.aggregator.aggregate(&admin(), UsageWindow::default()).unwrap();
        let grid_after_first = h.store.inner.read_all(&items()).unwrap();
        let second = h.aggregator.aggregate(&admin(), UsageWindow::default()).unwrap();

        assert_eq!(first, second);
        assert_eq!(h.store.inner.read_all(&items()).unwrap(), grid_after_first);
        assert_eq!(h.usage("Glue"), 3);
    }

    #[test]
    fn ledger_items_missing_from_catalog_are_not_written() {
        let h = Harness::new(InventoryPolicies::default());
        h.seed_ledger(&[(1, "Discontinued", -8), (2, "Resin", -1)]);

        let report = h.aggregator.aggregate(&admin(), UsageWindow::default()).unwrap();
        assert_eq!(report.unmatched_items, vec!["Discontinued".to_string()]);
        assert_eq!(report.rows_written, 3);

        let catalog = h.catalog();
        assert_eq!(catalog.snapshot.len(), 3);
        assert!(!catalog.snapshot.contains("Discontinued"));
    }

    #[test]
    fn aggregation_creates_missing_usage_column() {
        let store = Arc::new(InMemoryTableStore::new());
        store.seed_str(&items(), &[&["name", "quantity"], &["Resin", "10"]]);
        let clock = Arc::new(FixedClock(now()));
        let gate = AdminGate::new(AdminPassphrase::new(PASS));
        let ledger = MovementLedger::new(store.clone(), movements(), clock);
        ledger.append("Resin", -2, MovementKind::Consume).unwrap();
        let loader = SnapshotLoader::new(store.clone(), items(), NumericPolicy::default());
        let aggregator = UsageAggregator::new(store.clone(), loader, ledger, gate);

        aggregator.aggregate(&admin(), UsageWindow::default()).unwrap();
        let rows = store.read_all(&items()).unwrap();
        assert_eq!(rows[0], vec!["name", "quantity", "monthly_usage"]);
        assert_eq!(rows[1], vec!["Resin", "10", "2"]);
    }

    #[test]
    fn unreachable_store_degrades_to_empty_catalog() {
        let store = Arc::new(UnavailableTableStore::new(TableStoreError::Unreachable(
            "connection refused".to_string(),
        )));
        let loader = SnapshotLoader::new(store.clone(), items(), NumericPolicy::default());
        let catalog = loader.load();
        assert!(catalog.snapshot.is_empty());
        assert!(matches!(catalog.notice, Some(InventoryError::StoreUnreachable(_))));

        let ledger = MovementLedger::new(store.clone(), movements(), Arc::new(FixedClock(now())));
        let dispatcher = MutationDispatcher::new(
            store,
            items(),
            ledger,
            AdminGate::new(AdminPassphrase::new(PASS)),
            InventoryPolicies::default(),
        );
        let form = NewItem {
            name: "Resin".to_string(),
            genre: "Chemicals".to_string(),
            quantity: 1,
            required_quantity: 0,
        };
        let err = dispatcher.add_item(&admin(), &catalog, &form).unwrap_err();
        assert!(matches!(err, InventoryError::StoreUnreachable(_)));
    }

    #[test]
    fn quantity_and_remove_report_the_load_failure() {
        let store = Arc::new(UnavailableTableStore::new(TableStoreError::Unreachable(
            "connection refused".to_string(),
        )));
        let catalog = SnapshotLoader::new(store.clone(), items(), NumericPolicy::default()).load();
        let ledger = MovementLedger::new(store.clone(), movements(), Arc::new(FixedClock(now())));
        let dispatcher = MutationDispatcher::new(
            store,
            items(),
            ledger,
            AdminGate::new(AdminPassphrase::new(PASS)),
            InventoryPolicies::default(),
        );

        let err = dispatcher.set_absolute(&catalog, "Resin", 3).unwrap_err();
        assert!(matches!(err, InventoryError::StoreUnreachable(_)));
        let err = dispatcher
            .relative_adjust(&catalog, "Resin", Adjustment::Consume(1))
            .unwrap_err();
        assert!(matches!(err, InventoryError::StoreUnreachable(_)));
        let err = dispatcher.remove_item(&admin(), &catalog, "Resin").unwrap_err();
        assert!(matches!(err, InventoryError::StoreUnreachable(_)));
    }

    #[test]
    fn strict_load_failure_is_reported_on_update() {
        let mut policies = InventoryPolicies::default();
        policies.numeric = NumericPolicy::Strict;
        let h = Harness::new(policies);
        h.store.inner.update_cell(&items(), 3, 2, "plenty").unwrap();

        let catalog = h.catalog();
        assert!(catalog.snapshot.is_empty());
        let err = h.dispatcher.set_absolute(&catalog, "Resin", 3).unwrap_err();
        assert!(matches!(err, InventoryError::Validation(msg) if msg.contains("not a number")));
    }
}
