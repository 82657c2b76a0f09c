//! Benchmarks for report selection and marker diffing.

use clearway_geo::Coordinate;
use clearway_traffic::{select_nearby, MarkerLayer, TrafficReport, ViewportReconciler};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

const NOW: i64 = 1_709_294_400_000;
const MAX_AGE: i64 = 2 * 60 * 60 * 1000;

fn create_reports(count: usize) -> Vec<TrafficReport> {
    (0..count)
        .map(|i| {
            // Scatter across Metro Vancouver
            let lat = 49.0 + (i as f64 * 0.0137) % 0.6;
            let lng = -123.4 + (i as f64 * 0.0071) % 0.7;
            TrafficReport::new(i.to_string(), lat, lng).with_created_at(NOW - (i as i64 % 240) * 60_000)
        })
        .collect()
}

/// Layer that draws nothing.
struct NullLayer;

impl MarkerLayer for NullLayer {
    type Handle = ();

    fn add_marker(&mut self, _report: &TrafficReport) {}

    fn remove_marker(&mut self, _handle: ()) {}
}

fn bench_select_nearby(c: &mut Criterion) {
    let mut group = c.benchmark_group("select_nearby");
    let origin = Coordinate::new(49.2827, -123.1207);

    for size in [100, 1000, 10000].iter() {
        let reports = create_reports(*size);

        group.bench_with_input(BenchmarkId::new("radius_5km", size), size, |b, _| {
            b.iter(|| select_nearby(black_box(&reports), &origin, 5.0, NOW, MAX_AGE))
        });
    }

    group.finish();
}

fn bench_viewport_reconcile(c: &mut Criterion) {
    let mut group = c.benchmark_group("viewport");

    for size in [100, 1000].iter() {
        let reports = create_reports(*size);
        let empty: ViewportReconciler<()> = ViewportReconciler::new();
        group.bench_with_input(BenchmarkId::new("diff_from_empty", size), size, |b, _| {
            b.iter(|| empty.reconcile(black_box(&reports)))
        });

        // Half the batch already drawn: the diff keeps those and adds the rest
        let mut half_drawn: ViewportReconciler<()> = ViewportReconciler::new();
        half_drawn.sync(&mut NullLayer, &reports[..size / 2]);
        group.bench_with_input(BenchmarkId::new("diff_half", size), size, |b, _| {
            b.iter(|| half_drawn.reconcile(black_box(&reports)))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_select_nearby, bench_viewport_reconcile);
criterion_main!(benches);
