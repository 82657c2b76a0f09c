//! Benchmarks for geo crate distance calculations.

use clearway_geo::{decode_polyline, distance_km, Coordinate, PositionKey};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

fn create_test_points(count: usize) -> Vec<Coordinate> {
    (0..count)
        .map(|i| {
            // Grid around Vancouver
            let lat = 49.0 + (i as f64 * 0.01) % 1.0;
            let lng = -123.5 + (i as f64 * 0.01) % 1.0;
            Coordinate::new(lat, lng)
        })
        .collect()
}

fn bench_single_distance(c: &mut Criterion) {
    let vancouver = Coordinate::new(49.2827, -123.1207);
    let seattle = Coordinate::new(47.6062, -122.3321);

    c.bench_function("haversine_single", |b| {
        b.iter(|| distance_km(black_box(&vancouver), black_box(&seattle)))
    });
}

fn bench_distance_scan(c: &mut Criterion) {
    let mut group = c.benchmark_group("distance_scan");
    let origin = Coordinate::new(49.2827, -123.1207);

    for size in [10, 100, 1000, 10000].iter() {
        let points = create_test_points(*size);

        group.bench_with_input(BenchmarkId::new("within_5km", size), size, |b, _| {
            b.iter(|| {
                points
                    .iter()
                    .filter(|p| distance_km(black_box(&origin), p) <= 5.0)
                    .count()
            })
        });
    }

    group.finish();
}

fn bench_keys_and_polylines(c: &mut Criterion) {
    let point = Coordinate::new(49.28271, -123.12069);
    let encoded = "_p~iF~ps|U_ulLnnqC_mqNvxq`@";

    let mut group = c.benchmark_group("parsing");

    group.bench_function("marker_key", |b| {
        b.iter(|| PositionKey::marker(black_box(&point)))
    });

    group.bench_function("polyline", |b| {
        b.iter(|| decode_polyline(black_box(encoded)))
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_single_distance,
    bench_distance_scan,
    bench_keys_and_polylines
);
criterion_main!(benches);
