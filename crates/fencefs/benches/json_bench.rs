//! JSON parsing performance benchmarks
//!
//! Measures parsing performance for typical request message sizes.

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use fencefs::io::FenceRequest;
use std::hint::black_box;
use std::time::Duration;

/// Generate a realistic request message of specified size
fn generate_request_message(size_bytes: usize) -> String {
    let padding_size = size_bytes.saturating_sub(200);
    let padding = "x".repeat(padding_size);

    serde_json::json!({
        "agent_id": "agent-12345678",
        "path": "/workspace/project/file.txt",
        "query": padding,
    })
    .to_string()
}

/// Benchmark JSON parsing at different message sizes
fn bench_json_parsing(c: &mut Criterion) {
    let mut group = c.benchmark_group("json_parsing");
    group.measurement_time(Duration::from_secs(10));

    let sizes = vec![
        (1024, "1KB"),
        (5120, "5KB"),
        (10240, "10KB"),
        (102400, "100KB"),
    ];

    for (size, label) in sizes {
        let input = generate_request_message(size);
        group.throughput(Throughput::Bytes(input.len() as u64));

        group.bench_function(BenchmarkId::new("parse", label), |b| {
            b.iter(|| {
                let parsed: FenceRequest =
                    serde_json::from_str(black_box(&input)).expect("failed to parse JSON");
                black_box(parsed);
            });
        });
    }

    group.finish();
}

/// Benchmark deserialization with a pre-allocated buffer
fn bench_json_with_buffer(c: &mut Criterion) {
    let mut group = c.benchmark_group("json_parsing");

    let input_1k = generate_request_message(1024);
    let input_10k = generate_request_message(10240);
    let mut buffer = Vec::with_capacity(102400);

    group.bench_function("buffered/1KB", |b| {
        b.iter(|| {
            buffer.clear();
            buffer.extend_from_slice(input_1k.as_bytes());

            let parsed: FenceRequest =
                serde_json::from_slice(black_box(&buffer)).expect("failed to parse JSON");
            black_box(parsed);
        });
    });

    group.bench_function("buffered/10KB", |b| {
        b.iter(|| {
            buffer.clear();
            buffer.extend_from_slice(input_10k.as_bytes());

            let parsed: FenceRequest =
                serde_json::from_slice(black_box(&buffer)).expect("failed to parse JSON");
            black_box(parsed);
        });
    });

    group.finish();
}

/// Benchmark specific field access patterns
fn bench_field_access(c: &mut Criterion) {
    let mut group = c.benchmark_group("json_parsing");

    let input = generate_request_message(1024);
    let parsed: FenceRequest = serde_json::from_str(&input).unwrap();

    group.bench_function("field_access/agent_id", |b| {
        b.iter(|| {
            black_box(&parsed.agent_id);
        });
    });

    group.bench_function("field_access/require_path", |b| {
        b.iter(|| {
            black_box(parsed.require_path().unwrap());
        });
    });

    group.finish();
}

/// Benchmark zero-copy potential with serde_json::Value
fn bench_json_value(c: &mut Criterion) {
    let mut group = c.benchmark_group("json_parsing");

    let input_1k = generate_request_message(1024);

    group.bench_function("value/1KB", |b| {
        b.iter(|| {
            let parsed: serde_json::Value =
                serde_json::from_str(black_box(&input_1k)).expect("failed to parse JSON");
            black_box(parsed);
        });
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_json_parsing,
    bench_json_with_buffer,
    bench_field_access,
    bench_json_value
);
criterion_main!(benches);
