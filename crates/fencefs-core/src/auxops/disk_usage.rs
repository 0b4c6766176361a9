//! Bounded-depth disk usage walker (§4.G).
//!
//! Walks with `walkdir`, skipping (and logging) entries that fail
//! re-validation rather than aborting the whole report.

use std::collections::HashMap;
use std::path::PathBuf;

use crate::constants::DISK_USAGE_TOP_N;
use crate::error::{FsError, Result};
use crate::types::path::VettedPath;

/// A single large-file or large-subdirectory entry in the report.
#[derive(Debug, Clone, serde::Serialize)]
pub struct UsageEntry {
    pub path: PathBuf,
    pub bytes: u64,
}

/// The full `analyze_disk_usage` result.
#[derive(Debug, Clone, Default, serde::Serialize)]
pub struct DiskUsageReport {
    pub total_bytes: u64,
    pub file_count: u64,
    pub top_files: Vec<UsageEntry>,
    pub top_subdirectories: Vec<UsageEntry>,
    pub by_extension: Option<HashMap<String, u64>>,
}

/// Walk `root` up to `max_depth`, symlinks counted by their own byte size
/// (never the target's). `group_by_type` adds a by-extension byte
/// histogram to the report.
pub fn analyze_disk_usage(
    root: &VettedPath,
    max_depth: usize,
    group_by_type: bool,
) -> Result<DiskUsageReport> {
    if !root.as_path().is_dir() {
        return Err(FsError::NotADirectory {
            path: root.as_path().display().to_string(),
        }
        .into());
    }

    let mut report = DiskUsageReport::default();
    let mut extension_bytes: HashMap<String, u64> = HashMap::new();
    let mut subdir_bytes: HashMap<PathBuf, u64> = HashMap::new();
    let mut files: Vec<UsageEntry> = Vec::new();

    let walker = walkdir::WalkDir::new(root.as_path())
        .max_depth(max_depth)
        .into_iter();

    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                tracing::warn!(error = %e, "skipping disk usage entry that failed re-validation");
                continue;
            }
        };

        let metadata = match entry.metadata() {
            Ok(m) => m,
            Err(e) => {
                tracing::warn!(path = %entry.path().display(), error = %e, "skipping unreadable entry");
                continue;
            }
        };

        if metadata.is_dir() {
            continue;
        }

        let size = metadata.len();
        report.total_bytes += size;
        report.file_count += 1;
        files.push(UsageEntry {
            path: entry.path().to_path_buf(),
            bytes: size,
        });

        if group_by_type {
            let ext = entry
                .path()
                .extension()
                .map(|e| e.to_string_lossy().to_lowercase())
                .unwrap_or_else(|| "(none)".to_string());
            *extension_bytes.entry(ext).or_insert(0) += size;
        }

        if let Ok(rel) = entry.path().strip_prefix(root.as_path()) {
            if let Some(top_component) = rel.components().next() {
                let subdir = root.as_path().join(top_component);
                if subdir != entry.path() {
                    *subdir_bytes.entry(subdir).or_insert(0) += size;
                }
            }
        }
    }

    files.sort_by(|a, b| b.bytes.cmp(&a.bytes));
    files.truncate(DISK_USAGE_TOP_N);
    report.top_files = files;

    let mut subdirs: Vec<UsageEntry> = subdir_bytes
        .into_iter()
        .map(|(path, bytes)| UsageEntry { path, bytes })
        .collect();
    subdirs.sort_by(|a, b| b.bytes.cmp(&a.bytes));
    subdirs.truncate(DISK_USAGE_TOP_N);
    report.top_subdirectories = subdirs;

    if group_by_type {
        report.by_extension = Some(extension_bytes);
    }

    Ok(report)
}
