use chrono::{Duration, TimeZone, Utc};
use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};

use stockbook_inventory::{LedgerEntry, MovementKind, UsageWindow, fold_usage};

fn ledger(len: usize, items: usize) -> Vec<LedgerEntry> {
    let now = Utc.with_ymd_and_hms(2026, 10, 19, 0, 0, 0).unwrap();
    (0..len)
        .map(|i| {
            let delta = if i % 3 == 0 { 5 } else { -((i % 7) as i64 + 1) };
            let kind = if delta < 0 { MovementKind::Consume } else { MovementKind::Restock };
            let at = now - Duration::hours((i % (24 * 60)) as i64);
            LedgerEntry::new(at, format!("item-{}", i % items), delta, kind)
                .expect("non-zero delta")
        })
        .collect()
}

fn bench_fold(c: &mut Criterion) {
    let now = Utc.with_ymd_and_hms(2026, 10, 19, 0, 0, 0).unwrap();
    let mut group = c.benchmark_group("usage_fold");

    for len in [1_000usize, 10_000, 100_000] {
        let entries = ledger(len, 200);
        group.throughput(Throughput::Elements(len as u64));
        group.bench_with_input(BenchmarkId::from_parameter(len), &entries, |b, entries| {
            b.iter(|| fold_usage(black_box(entries), now, UsageWindow::default()))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_fold);
criterion_main!(benches);
