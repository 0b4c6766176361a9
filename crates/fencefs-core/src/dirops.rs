//! Recursive copy, sync, and atomic-replace directory operations (§4.E).
//!
//! Every entry point here takes [`VettedPath`]s already produced by
//! `PolicyEngine::vet` — this module never resolves a raw path itself.

use std::fs;
use std::path::Path;

use rand::Rng;

use crate::constants::ATOMIC_REPLACE_TMP_PREFIX;
use crate::error::{FsError, Result};
use crate::types::path::VettedPath;

/// Outcome of a recursive copy or sync call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CopyStats {
    pub files_copied: usize,
    pub files_skipped: usize,
    pub bytes_transferred: u64,
}

/// Recursively copy `source` (a directory) into `destination`.
///
/// Exclusion globs are tested against the path of each child *relative to
/// `source`* — never against the destination side. Directories are
/// created as needed; only regular files count toward `files_copied` and
/// `bytes_transferred`.
pub fn copy_recursive(
    source: &VettedPath,
    destination: &VettedPath,
    preserve_metadata: bool,
    exclusions: &[globset::GlobMatcher],
) -> Result<CopyStats> {
    let mut stats = CopyStats::default();
    copy_dir(
        source.as_path(),
        destination.as_path(),
        source.as_path(),
        preserve_metadata,
        exclusions,
        &mut stats,
    )?;
    Ok(stats)
}

fn copy_dir(
    src: &Path,
    dst: &Path,
    src_root: &Path,
    preserve: bool,
    exclusions: &[globset::GlobMatcher],
    stats: &mut CopyStats,
) -> Result<()> {
    fs::create_dir_all(dst).map_err(|e| FsError::from_io(&e, dst.display().to_string()))?;
    if preserve {
        copy_metadata(src, dst)?;
    }

    for entry in fs::read_dir(src).map_err(|e| FsError::from_io(&e, src.display().to_string()))? {
        let entry = entry.map_err(|e| FsError::from_io(&e, src.display().to_string()))?;
        let child_src = entry.path();
        let rel = child_src.strip_prefix(src_root).unwrap_or(&child_src);
        if exclusions.iter().any(|glob| glob.is_match(rel)) {
            continue;
        }

        let child_dst = dst.join(entry.file_name());
        let file_type = entry
            .file_type()
            .map_err(|e| FsError::from_io(&e, child_src.display().to_string()))?;

        if file_type.is_dir() {
            copy_dir(&child_src, &child_dst, src_root, preserve, exclusions, stats)?;
        } else if file_type.is_file() {
            fs::copy(&child_src, &child_dst)
                .map_err(|e| FsError::from_io(&e, child_src.display().to_string()))?;
            let size = entry
                .metadata()
                .map_err(|e| FsError::from_io(&e, child_src.display().to_string()))?
                .len();
            stats.files_copied += 1;
            stats.bytes_transferred += size;
            if preserve {
                copy_metadata(&child_src, &child_dst)?;
            }
        }
    }
    Ok(())
}

fn copy_metadata(src: &Path, dst: &Path) -> Result<()> {
    let metadata =
        fs::metadata(src).map_err(|e| FsError::from_io(&e, src.display().to_string()))?;
    fs::set_permissions(dst, metadata.permissions())
        .map_err(|e| FsError::from_io(&e, dst.display().to_string()))?;
    let mtime = filetime::FileTime::from_last_modification_time(&metadata);
    filetime::set_file_mtime(dst, mtime)
        .map_err(|e| FsError::from_io(&e, dst.display().to_string()))?;
    Ok(())
}

/// Copy only files that are missing or older at the destination.
///
/// Unlike [`copy_recursive`], directories are always created unconditionally
/// and metadata is never preserved — sync only cares about content freshness.
pub fn sync_recursive(
    source: &VettedPath,
    destination: &VettedPath,
    exclusions: &[globset::GlobMatcher],
) -> Result<CopyStats> {
    let mut stats = CopyStats::default();
    sync_dir(
        source.as_path(),
        destination.as_path(),
        source.as_path(),
        exclusions,
        &mut stats,
    )?;
    Ok(stats)
}

fn sync_dir(
    src: &Path,
    dst: &Path,
    src_root: &Path,
    exclusions: &[globset::GlobMatcher],
    stats: &mut CopyStats,
) -> Result<()> {
    fs::create_dir_all(dst).map_err(|e| FsError::from_io(&e, dst.display().to_string()))?;

    for entry in fs::read_dir(src).map_err(|e| FsError::from_io(&e, src.display().to_string()))? {
        let entry = entry.map_err(|e| FsError::from_io(&e, src.display().to_string()))?;
        let child_src = entry.path();
        let rel = child_src.strip_prefix(src_root).unwrap_or(&child_src);
        if exclusions.iter().any(|glob| glob.is_match(rel)) {
            continue;
        }

        let child_dst = dst.join(entry.file_name());
        let file_type = entry
            .file_type()
            .map_err(|e| FsError::from_io(&e, child_src.display().to_string()))?;

        if file_type.is_dir() {
            sync_dir(&child_src, &child_dst, src_root, exclusions, stats)?;
            continue;
        }
        if !file_type.is_file() {
            continue;
        }

        let src_meta = entry
            .metadata()
            .map_err(|e| FsError::from_io(&e, child_src.display().to_string()))?;
        let src_mtime = filetime::FileTime::from_last_modification_time(&src_meta);

        if let Ok(dst_meta) = fs::metadata(&child_dst) {
            let dst_mtime = filetime::FileTime::from_last_modification_time(&dst_meta);
            if dst_mtime >= src_mtime {
                stats.files_skipped += 1;
                continue;
            }
        }

        fs::copy(&child_src, &child_dst)
            .map_err(|e| FsError::from_io(&e, child_src.display().to_string()))?;
        stats.files_copied += 1;
        stats.bytes_transferred += src_meta.len();
    }
    Ok(())
}

/// Write `content` to a temp file beside `target` and rename it into place,
/// so readers never observe a partially written file.
pub fn atomic_replace(target: &VettedPath, content: &[u8]) -> Result<()> {
    let target_path = target.as_path();
    let parent = target_path.parent().ok_or_else(|| FsError::AtomicReplaceFailed {
        path: target_path.display().to_string(),
        reason: "target has no parent directory".to_string(),
    })?;

    let suffix: String = {
        let mut bytes = [0u8; 8];
        rand::thread_rng().fill(&mut bytes);
        hex::encode(bytes)
    };
    let tmp_path = parent.join(format!("{ATOMIC_REPLACE_TMP_PREFIX}{suffix}"));

    let write_result = fs::write(&tmp_path, content)
        .map_err(|e| FsError::from_io(&e, tmp_path.display().to_string()))
        .and_then(|_| {
            fs::rename(&tmp_path, target_path)
                .map_err(|e| FsError::from_io(&e, target_path.display().to_string()))
        });

    if let Err(err) = write_result {
        let _ = fs::remove_file(&tmp_path);
        return Err(FsError::AtomicReplaceFailed {
            path: target_path.display().to_string(),
            reason: err.to_string(),
        }
        .into());
    }
    Ok(())
}
