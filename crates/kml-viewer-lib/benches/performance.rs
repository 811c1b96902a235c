//! Performance benchmarks for kml-viewer-lib
//!
//! Run with: cargo bench --package kml-viewer-lib

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use kml_viewer_lib::{
    Config, Coordinate, Feature, FeatureCollection, Geometry, Metric, extent, measure_lengths,
    summarize,
};

/// Generate a wiggly path with the specified number of points
fn generate_path(num_points: usize, base_lat: f64, base_lon: f64) -> Vec<Coordinate> {
    (0..num_points)
        .map(|i| {
            let t = i as f64 / num_points as f64;
            let lat = base_lat + t * 0.1 + (t * 50.0).sin() * 0.001;
            let lon = base_lon + t * 0.1 + (t * 30.0).cos() * 0.001;
            Coordinate::xy(lon, lat)
        })
        .collect()
}

/// Generate a collection mixing lines, multi-lines and points, like a typical KML export
fn generate_collection(num_features: usize, points_per_line: usize) -> FeatureCollection {
    (0..num_features)
        .map(|i| {
            let lat = 51.5 + (i % 10) as f64 * 0.1;
            let lon = -0.1 + (i / 10) as f64 * 0.1;
            match i % 3 {
                0 => Feature::new(Geometry::LineString(generate_path(points_per_line, lat, lon))),
                1 => Feature::new(Geometry::MultiLineString(vec![
                    generate_path(points_per_line / 2, lat, lon),
                    generate_path(points_per_line / 2, lat + 0.05, lon),
                ])),
                _ => Feature::new(Geometry::Point(Coordinate::xy(lon, lat))),
            }
        })
        .collect()
}

fn bench_summarize(c: &mut Criterion) {
    let mut group = c.benchmark_group("summarize");

    for num_features in [1_000, 100_000] {
        let collection = generate_collection(num_features, 2);
        group.throughput(Throughput::Elements(num_features as u64));
        group.bench_with_input(
            BenchmarkId::from_parameter(num_features),
            &collection,
            |b, collection| b.iter(|| summarize(collection)),
        );
    }

    group.finish();
}

fn bench_measure_lengths(c: &mut Criterion) {
    let mut group = c.benchmark_group("measure_lengths");
    group.sample_size(20);

    // 300 features with 10k points per line - a large upload
    let collection = generate_collection(300, 10_000);
    let total_points: usize = 200 * 10_000;
    group.throughput(Throughput::Elements(total_points as u64));

    for metric in [Metric::Geodesic, Metric::Planar] {
        let config = Config {
            metric,
            ..Config::default()
        };
        group.bench_with_input(
            BenchmarkId::from_parameter(metric),
            &collection,
            |b, collection| b.iter(|| measure_lengths(collection, &config)),
        );
    }

    group.finish();
}

fn bench_extent(c: &mut Criterion) {
    let collection = generate_collection(300, 10_000);
    c.bench_function("extent", |b| b.iter(|| extent(&collection)));
}

criterion_group!(benches, bench_summarize, bench_measure_lengths, bench_extent);
criterion_main!(benches);
