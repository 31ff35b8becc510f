//! Benchmarks for SoberStats analytics and export
//!
//! Run with: cargo bench

use chrono::{Duration, NaiveDate};
use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use soberstats::analytics::{dashboard_summary, rolling_load, substance_trends};
use soberstats::export::encode_csv;
use soberstats::storage::*;
use tempfile::tempdir;

fn create_test_entries(count: usize) -> Vec<DailyLogEntry> {
    let today = NaiveDate::from_ymd_opt(2024, 6, 30).unwrap();
    (0..count)
        .map(|i| {
            DailyLogEntry::new(today - Duration::days(i as i64))
                .alcohol(i % 3 == 0, 2.0)
                .medication(TakenMedicationEntry::new("diazepam", 10.0 + (i % 5) as f64))
                .medication(TakenMedicationEntry::new("clonazepam", 0.5))
                .mood((i % 10 + 1) as u8)
                .notes("bench")
        })
        .collect()
}

fn bench_analytics(c: &mut Criterion) {
    let mut group = c.benchmark_group("analytics");
    let today = NaiveDate::from_ymd_opt(2024, 6, 30).unwrap();

    for size in [14, 365, 3650] {
        let entries = create_test_entries(size);

        group.bench_function(format!("rolling_load_{}", size), |b| {
            b.iter(|| rolling_load(black_box(&entries)))
        });

        group.bench_function(format!("trends_{}", size), |b| {
            b.iter(|| substance_trends(black_box(&entries)))
        });

        group.bench_function(format!("dashboard_{}", size), |b| {
            b.iter(|| dashboard_summary(black_box(&entries), today))
        });
    }

    group.finish();
}

fn bench_export(c: &mut Criterion) {
    let mut group = c.benchmark_group("export");

    for size in [100, 1000] {
        let entries = create_test_entries(size);
        group.throughput(Throughput::Elements(size as u64));

        group.bench_function(format!("csv_{}", size), |b| {
            b.iter(|| encode_csv(black_box(&entries)).unwrap())
        });
    }

    group.finish();
}

fn bench_repository(c: &mut Criterion) {
    let mut group = c.benchmark_group("repository");

    group.bench_function("upsert_file_365", |b| {
        let dir = tempdir().unwrap();
        let repo = LogRepository::new(FileStore::open(dir.path()).unwrap());
        for entry in create_test_entries(365) {
            repo.upsert(entry).unwrap();
        }
        let today = NaiveDate::from_ymd_opt(2024, 6, 30).unwrap();

        b.iter(|| {
            repo.upsert(black_box(DailyLogEntry::with_id("bench", today).mood(5)))
                .unwrap()
        });
    });

    group.bench_function("list_memory_365", |b| {
        let repo = LogRepository::new(MemoryStore::new());
        for entry in create_test_entries(365) {
            repo.upsert(entry).unwrap();
        }

        b.iter(|| repo.list().unwrap());
    });

    group.finish();
}

criterion_group!(benches, bench_analytics, bench_export, bench_repository);
criterion_main!(benches);
