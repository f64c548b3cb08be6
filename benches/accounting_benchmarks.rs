//! Performance benchmarks for the attendance engine.
//!
//! - Totals over a typical day and over long punch ledgers
//! - Recording a punch through the service, including persistence
//!
//! Run with: `cargo bench`
//! HTML reports are generated in `target/criterion/`

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};

use chrono::{Duration, NaiveDate, NaiveDateTime};

use attendance_engine::calculation::{compute_totals, extract_sessions};
use attendance_engine::config::ConfigLoader;
use attendance_engine::models::{Punch, PunchKind, PunchType};
use attendance_engine::service::{AttendanceService, FixedClock, InMemoryStore, PunchOptions};

fn day_start() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2026, 1, 15)
        .unwrap()
        .and_hms_opt(9, 0, 0)
        .unwrap()
}

/// Builds `cycles` IN → BREAK_START → BREAK_END → OUT sequences, five
/// minutes apart.
fn create_punches(cycles: usize) -> Vec<Punch> {
    let kinds = [
        PunchKind::In,
        PunchKind::BreakStart {
            reason: "tea".to_string(),
        },
        PunchKind::BreakEnd,
        PunchKind::Out,
    ];
    kinds
        .iter()
        .cycle()
        .take(cycles * kinds.len())
        .enumerate()
        .map(|(i, kind)| Punch::new(kind.clone(), day_start() + Duration::seconds(i as i64 * 5)))
        .collect()
}

fn create_service() -> AttendanceService<InMemoryStore, FixedClock> {
    let config = ConfigLoader::load("./config/store").expect("Failed to load config");
    AttendanceService::with_clock(
        config.into_timings(),
        InMemoryStore::new(),
        FixedClock::new(day_start()),
    )
}

/// Benchmark: Totals for a typical day (IN, lunch break, OUT).
fn bench_typical_day(c: &mut Criterion) {
    let punches = create_punches(1);
    let as_of = day_start() + Duration::hours(9);

    c.bench_function("typical_day_totals", |b| {
        b.iter(|| black_box(compute_totals(black_box(&punches), as_of)))
    });
}

/// Benchmark: Totals and sessions as the ledger grows.
fn bench_scaling(c: &mut Criterion) {
    let mut group = c.benchmark_group("ledger_scaling");

    for cycles in [1usize, 10, 100, 1000].iter() {
        let punches = create_punches(*cycles);
        let as_of = punches.last().map(|p| p.at).unwrap_or_else(day_start);

        group.throughput(Throughput::Elements(punches.len() as u64));
        group.bench_with_input(BenchmarkId::new("totals", cycles), &punches, |b, punches| {
            b.iter(|| black_box(compute_totals(punches, as_of)))
        });
        group.bench_with_input(BenchmarkId::new("sessions", cycles), &punches, |b, punches| {
            b.iter(|| black_box(extract_sessions(punches, as_of)))
        });
    }

    group.finish();
}

/// Benchmark: Recording a punch pair through the service.
fn bench_record_punch(c: &mut Criterion) {
    let service = create_service();
    let mut n = 0u64;

    c.bench_function("record_punch_pair", |b| {
        b.iter(|| {
            n += 1;
            let user_id = format!("emp_{}", n);
            service
                .record_punch(&user_id, PunchType::In, PunchOptions::default())
                .unwrap();
            black_box(
                service
                    .record_punch(&user_id, PunchType::Out, PunchOptions::default())
                    .unwrap(),
            )
        })
    });
}

/// Benchmark: A manual backdated insert into a busy ledger.
fn bench_manual_insert(c: &mut Criterion) {
    let service = create_service();
    service.clock().set(day_start() + Duration::hours(10));
    service
        .record_punch("emp_busy", PunchType::Out, PunchOptions::default())
        .unwrap();

    c.bench_function("manual_insert_validation", |b| {
        b.iter(|| {
            let result = service.record_punch(
                "emp_busy",
                PunchType::Out,
                PunchOptions::manual("admin_1", "2026-01-15 09:30"),
            );
            black_box(result.is_err())
        })
    });
}

criterion_group!(
    benches,
    bench_typical_day,
    bench_scaling,
    bench_record_punch,
    bench_manual_insert,
);
criterion_main!(benches);
