//! Performance benchmarks for the kernel's wire-facing data types
//!
//! Run with: cargo bench -p fencefs-core

use chrono::Utc;
use criterion::{Criterion, black_box, criterion_group, criterion_main};
use fencefs_core::types::batch::{BatchOp, BatchOpKind};
use fencefs_core::types::watch::{FsEvent, FsEventKind};
use fencefs_core::search::{FileMatch, SearchQuery, SearchType};
use serde_json::json;
use std::path::PathBuf;

fn bench_batch_op_round_trip(c: &mut Criterion) {
    let copy_json = json!({
        "kind": "copy",
        "source": "/workspace/src/main.rs",
        "destination": "/workspace/backup/main.rs",
    });
    let delete_json = json!({
        "kind": "delete",
        "source": "/workspace/tmp/scratch.log",
    });

    c.bench_function("parse_batch_op_copy", |b| {
        b.iter(|| {
            let _op: BatchOp = serde_json::from_value(black_box(copy_json.clone())).unwrap();
        })
    });

    c.bench_function("parse_batch_op_delete", |b| {
        b.iter(|| {
            let _op: BatchOp = serde_json::from_value(black_box(delete_json.clone())).unwrap();
        })
    });

    let op = BatchOp::new(
        BatchOpKind::Move,
        PathBuf::from("/workspace/a.txt"),
        Some(PathBuf::from("/workspace/b.txt")),
    )
    .unwrap();

    c.bench_function("serialize_batch_op", |b| {
        b.iter(|| {
            let _ = serde_json::to_string(black_box(&op)).unwrap();
        })
    });
}

fn bench_batch_construction(c: &mut Criterion) {
    c.bench_function("batch_op_new_validates_invariant", |b| {
        b.iter(|| {
            black_box(BatchOp::new(
                BatchOpKind::Copy,
                PathBuf::from("src.txt"),
                Some(PathBuf::from("dst.txt")),
            ))
        })
    });
}

fn bench_fs_event_serialization(c: &mut Criterion) {
    let event = FsEvent::new(
        FsEventKind::Modify,
        PathBuf::from("/workspace/watched/file.txt"),
        Utc::now(),
    );

    c.bench_function("serialize_fs_event", |b| {
        b.iter(|| {
            let _ = serde_json::to_string(black_box(&event)).unwrap();
        })
    });

    let batch: Vec<FsEvent> = (0..100)
        .map(|i| {
            FsEvent::new(
                FsEventKind::Create,
                PathBuf::from(format!("/workspace/file_{i}.txt")),
                Utc::now(),
            )
        })
        .collect();

    c.bench_function("serialize_fs_event_batch_100", |b| {
        b.iter(|| {
            let _ = serde_json::to_string(black_box(&batch)).unwrap();
        })
    });
}

fn bench_search_query_parsing(c: &mut Criterion) {
    let query_json = json!({
        "query": "*.rs",
        "search_type": "name",
        "file_types": ["rs", "toml"],
        "min_size": 0,
        "max_size": 1_048_576,
        "modified_after": null,
    });

    c.bench_function("parse_search_query", |b| {
        b.iter(|| {
            let _query: SearchQuery = serde_json::from_value(black_box(query_json.clone())).unwrap();
        })
    });

    let query = SearchQuery {
        query: "config".to_string(),
        search_type: SearchType::Both,
        file_types: vec!["toml".to_string(), "json".to_string()],
        min_size: None,
        max_size: None,
        modified_after: None,
    };

    c.bench_function("serialize_search_query", |b| {
        b.iter(|| {
            let _ = serde_json::to_string(black_box(&query)).unwrap();
        })
    });
}

fn bench_file_match_serialization(c: &mut Criterion) {
    let matches: Vec<FileMatch> = (0..200)
        .map(|i| FileMatch {
            path: PathBuf::from(format!("/workspace/src/module_{i}.rs")),
            size: 4096 + i as u64,
            modified_ms: 1_700_000_000_000 + i as i64,
            matched_content: i % 3 == 0,
        })
        .collect();

    c.bench_function("serialize_file_match_results_200", |b| {
        b.iter(|| {
            let _ = serde_json::to_string(black_box(&matches)).unwrap();
        })
    });
}

criterion_group!(
    benches,
    bench_batch_op_round_trip,
    bench_batch_construction,
    bench_fs_event_serialization,
    bench_search_query_parsing,
    bench_file_match_serialization
);
criterion_main!(benches);
