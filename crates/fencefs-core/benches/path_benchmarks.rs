//! Performance benchmarks for path utilities
//!
//! Measures the cost of path normalization, comparison, and the full
//! resolver pipeline to ensure they stay cheap enough for high-frequency
//! use on every agent request.

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use fencefs_core::config::PolicyConfig;
use fencefs_core::path::resolver::PathResolver;
use fencefs_core::path::{normalize_path, paths_equal, relative_path};
use fencefs_core::types::path::OperationKind;
use std::path::{Path, PathBuf};

fn bench_normalize_path(c: &mut Criterion) {
    let mut group = c.benchmark_group("normalize_path");

    let test_cases = vec![
        ("simple", "file.txt"),
        ("current_dir", "./file.txt"),
        ("parent_dir", "../file.txt"),
        ("nested", "dir1/dir2/dir3/file.txt"),
        ("complex_traversal", "./dir1/../dir2/./dir3/../file.txt"),
        ("deep_traversal", "a/b/c/d/e/../../../f/g/h/../i.txt"),
        ("windows_separators", "dir1\\dir2\\file.txt"),
        ("mixed_separators", "dir1/dir2\\dir3/file.txt"),
        ("unicode_path", "测试/файл/📁/file.txt"),
    ];

    for (name, path_str) in test_cases {
        group.bench_with_input(BenchmarkId::new("path", name), &path_str, |b, &path_str| {
            let path = Path::new(path_str);
            b.iter(|| normalize_path(black_box(path)))
        });
    }

    let long_path = format!("{}file.txt", "very_long_directory_name/".repeat(20));
    group.bench_with_input(
        BenchmarkId::new("path", "long_path"),
        &long_path,
        |b, path_str| {
            let path = Path::new(path_str);
            b.iter(|| normalize_path(black_box(path)))
        },
    );

    group.finish();
}

fn bench_paths_equal(c: &mut Criterion) {
    let mut group = c.benchmark_group("paths_equal");

    let test_cases = vec![
        ("identical", ("file.txt", "file.txt")),
        ("normalized_vs_raw", ("./file.txt", "file.txt")),
        ("traversal_comparison", ("dir/../file.txt", "file.txt")),
        ("different_separators", ("dir\\file.txt", "dir/file.txt")),
        (
            "complex_paths",
            ("./a/b/../c/./d/file.txt", "a/c/d/file.txt"),
        ),
        ("absolute_vs_relative", ("/tmp/file.txt", "tmp/file.txt")),
    ];

    for (name, (path1_str, path2_str)) in test_cases {
        group.bench_with_input(
            BenchmarkId::new("comparison", name),
            &(path1_str, path2_str),
            |b, &(path1_str, path2_str)| {
                let path1 = Path::new(path1_str);
                let path2 = Path::new(path2_str);
                b.iter(|| paths_equal(black_box(path1), black_box(path2)))
            },
        );
    }

    let long_path = format!("{}file.txt", "long_dir/".repeat(50));
    group.bench_with_input(
        BenchmarkId::new("comparison", "long_paths"),
        &long_path,
        |b, path_str| {
            let path1 = Path::new(path_str);
            let path2 = Path::new(path_str);
            b.iter(|| paths_equal(black_box(path1), black_box(path2)))
        },
    );

    group.finish();
}

fn bench_relative_path(c: &mut Criterion) {
    let mut group = c.benchmark_group("relative_path");

    let test_cases = vec![
        ("same_dir", ("/base", "/base")),
        ("direct_child", ("/base", "/base/child")),
        ("parent", ("/base/child", "/base")),
        ("sibling", ("/base/dir1", "/base/dir2")),
        ("deep_nested", ("/a/b/c/d", "/a/b/e/f/g")),
        ("different_roots", ("/usr/local", "/var/log")),
        (
            "complex_paths",
            (
                "/home/user/projects/fencefs/src",
                "/home/user/documents/data/file.txt",
            ),
        ),
    ];

    for (name, (base_str, target_str)) in test_cases {
        group.bench_with_input(
            BenchmarkId::new("relative", name),
            &(base_str, target_str),
            |b, &(base_str, target_str)| {
                let base = Path::new(base_str);
                let target = Path::new(target_str);
                b.iter(|| relative_path(black_box(base), black_box(target)))
            },
        );
    }

    group.finish();
}

/// Benchmark the full resolver pipeline against a plain workspace-relative
/// path with no policy restrictions beyond the default.
fn bench_resolver_plain_path(c: &mut Criterion) {
    let mut group = c.benchmark_group("path_resolver");

    let temp_dir = tempfile::tempdir().unwrap();
    std::fs::write(temp_dir.path().join("file.txt"), b"hi").unwrap();
    let policy = PolicyConfig::for_workspace(temp_dir.path().to_path_buf());
    let resolver = PathResolver::new();

    group.bench_function("resolve/plain_relative", |b| {
        b.iter(|| {
            resolver.resolve(
                black_box(Path::new("file.txt")),
                OperationKind::Read,
                black_box(&policy),
            )
        })
    });

    group.finish();
}

/// Benchmark the resolver's fixed rejection layers, which should fail fast
/// before touching the filesystem.
fn bench_resolver_rejection_layers(c: &mut Criterion) {
    let mut group = c.benchmark_group("path_resolver");

    let temp_dir = tempfile::tempdir().unwrap();
    let policy = PolicyConfig::for_workspace(temp_dir.path().to_path_buf());
    let resolver = PathResolver::new();

    let rejection_scenarios = vec![
        ("lexical_traversal", "../../../etc/passwd"),
        ("system_path", "/etc/passwd"),
        ("sensitive_pattern", "configs/secret-token.txt"),
        ("deep_traversal", "a/b/c/d/e/../../../../../../etc/passwd"),
    ];

    for (name, path_str) in rejection_scenarios {
        group.bench_with_input(
            BenchmarkId::new("reject", name),
            &path_str,
            |b, &path_str| {
                let path = PathBuf::from(path_str);
                b.iter(|| resolver.resolve(black_box(&path), OperationKind::Read, black_box(&policy)))
            },
        );
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_normalize_path,
    bench_paths_equal,
    bench_relative_path,
    bench_resolver_plain_path,
    bench_resolver_rejection_layers
);

criterion_main!(benches);
