//! Pluggable name/content search over a vetted subtree (§6 `search_files`,
//! `build_index`).
//!
//! The specification treats the search engine as a black box external to
//! the kernel. [`SearchIndex`] is the seam: [`WalkdirSearchIndex`] is a
//! `walkdir`-based default sufficient to satisfy the operation's contract
//! without claiming to be a production index. A transport layer that wants
//! a real inverted index can supply its own `SearchIndex` impl.

use std::fs;
use std::path::PathBuf;

use filetime::FileTime;

use crate::error::{FsError, Result};
use crate::types::path::VettedPath;

/// Which fields `search_files` matches `query` against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchType {
    Name,
    Content,
    Both,
}

/// Parameters for [`SearchIndex::search`].
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct SearchQuery {
    pub query: String,
    pub search_type: SearchType,
    pub file_types: Vec<String>,
    pub min_size: Option<u64>,
    pub max_size: Option<u64>,
    /// Milliseconds since the epoch; only files modified at or after this
    /// instant match.
    pub modified_after: Option<i64>,
}

/// One matching file, as returned by [`SearchIndex::search`].
#[derive(Debug, Clone, serde::Serialize)]
pub struct FileMatch {
    pub path: PathBuf,
    pub size: u64,
    pub modified_ms: i64,
    pub matched_content: bool,
}

/// Result of [`SearchIndex::build_index`].
#[derive(Debug, Clone, Default, serde::Serialize)]
pub struct IndexStats {
    pub files_indexed: u64,
    pub bytes_indexed: u64,
}

/// A pluggable search/index engine over a vetted subtree.
pub trait SearchIndex: Send + Sync {
    fn search(&self, root: &VettedPath, query: &SearchQuery) -> Result<Vec<FileMatch>>;
    fn build_index(&self, root: &VettedPath, include_content: bool) -> Result<IndexStats>;
}

/// Default [`SearchIndex`]: a single `walkdir` pass with no persisted state.
/// `build_index` just re-walks and reports totals — there is no on-disk
/// index to warm.
#[derive(Debug, Default)]
pub struct WalkdirSearchIndex;

impl WalkdirSearchIndex {
    pub fn new() -> Self {
        Self
    }
}

impl SearchIndex for WalkdirSearchIndex {
    fn search(&self, root: &VettedPath, query: &SearchQuery) -> Result<Vec<FileMatch>> {
        if !root.as_path().is_dir() {
            return Err(FsError::NotADirectory {
                path: root.as_path().display().to_string(),
            }
            .into());
        }

        let needle = query.query.to_lowercase();
        let mut matches = Vec::new();

        for entry in walkdir::WalkDir::new(root.as_path())
            .into_iter()
            .filter_map(|e| e.ok())
        {
            let metadata = match entry.metadata() {
                Ok(m) if m.is_file() => m,
                _ => continue,
            };

            if !file_type_allowed(entry.path(), &query.file_types) {
                continue;
            }
            let size = metadata.len();
            if query.min_size.is_some_and(|min| size < min) || query.max_size.is_some_and(|max| size > max) {
                continue;
            }
            let modified_ms = FileTime::from_last_modification_time(&metadata).seconds() * 1000;
            if query.modified_after.is_some_and(|after| modified_ms < after) {
                continue;
            }

            let name_matches = entry
                .file_name()
                .to_string_lossy()
                .to_lowercase()
                .contains(&needle);

            let mut content_matches = false;
            let check_content = matches!(query.search_type, SearchType::Content | SearchType::Both);
            if check_content && !needle.is_empty() {
                if let Ok(bytes) = fs::read(entry.path()) {
                    content_matches = String::from_utf8_lossy(&bytes)
                        .to_lowercase()
                        .contains(&needle);
                }
            }

            let hit = match query.search_type {
                SearchType::Name => name_matches,
                SearchType::Content => content_matches,
                SearchType::Both => name_matches || content_matches,
            };

            if hit {
                matches.push(FileMatch {
                    path: entry.path().to_path_buf(),
                    size,
                    modified_ms,
                    matched_content: content_matches,
                });
            }
        }

        Ok(matches)
    }

    fn build_index(&self, root: &VettedPath, include_content: bool) -> Result<IndexStats> {
        if !root.as_path().is_dir() {
            return Err(FsError::NotADirectory {
                path: root.as_path().display().to_string(),
            }
            .into());
        }

        let mut stats = IndexStats::default();
        for entry in walkdir::WalkDir::new(root.as_path())
            .into_iter()
            .filter_map(|e| e.ok())
        {
            let metadata = match entry.metadata() {
                Ok(m) if m.is_file() => m,
                _ => continue,
            };
            stats.files_indexed += 1;
            if include_content {
                stats.bytes_indexed += metadata.len();
            }
        }
        Ok(stats)
    }
}

fn file_type_allowed(path: &std::path::Path, file_types: &[String]) -> bool {
    if file_types.is_empty() {
        return true;
    }
    let Some(ext) = path.extension().map(|e| e.to_string_lossy().to_lowercase()) else {
        return false;
    };
    file_types.iter().any(|t| t.trim_start_matches('.').eq_ignore_ascii_case(&ext))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::path::OperationKind;
    use std::fs;

    fn vetted(path: PathBuf) -> VettedPath {
        VettedPath::new(path, OperationKind::Read)
    }

    #[test]
    fn name_search_matches_case_insensitively() {
        let tmp = tempfile::tempdir().unwrap();
        fs::write(tmp.path().join("Report.TXT"), b"x").unwrap();
        fs::write(tmp.path().join("other.log"), b"x").unwrap();

        let index = WalkdirSearchIndex::new();
        let query = SearchQuery {
            query: "report".to_string(),
            search_type: SearchType::Name,
            file_types: vec![],
            min_size: None,
            max_size: None,
            modified_after: None,
        };
        let hits = index.search(&vetted(tmp.path().to_path_buf()), &query).unwrap();
        assert_eq!(hits.len(), 1);
    }

    #[test]
    fn content_search_finds_substring() {
        let tmp = tempfile::tempdir().unwrap();
        fs::write(tmp.path().join("a.txt"), b"the quick brown fox").unwrap();
        fs::write(tmp.path().join("b.txt"), b"nothing relevant").unwrap();

        let index = WalkdirSearchIndex::new();
        let query = SearchQuery {
            query: "quick".to_string(),
            search_type: SearchType::Content,
            file_types: vec![],
            min_size: None,
            max_size: None,
            modified_after: None,
        };
        let hits = index.search(&vetted(tmp.path().to_path_buf()), &query).unwrap();
        assert_eq!(hits.len(), 1);
        assert!(hits[0].path.ends_with("a.txt"));
    }

    #[test]
    fn file_type_filter_excludes_other_extensions() {
        let tmp = tempfile::tempdir().unwrap();
        fs::write(tmp.path().join("keep.rs"), b"fn main() {}").unwrap();
        fs::write(tmp.path().join("skip.md"), b"fn main() {}").unwrap();

        let index = WalkdirSearchIndex::new();
        let query = SearchQuery {
            query: "fn".to_string(),
            search_type: SearchType::Content,
            file_types: vec!["rs".to_string()],
            min_size: None,
            max_size: None,
            modified_after: None,
        };
        let hits = index.search(&vetted(tmp.path().to_path_buf()), &query).unwrap();
        assert_eq!(hits.len(), 1);
        assert!(hits[0].path.ends_with("keep.rs"));
    }

    #[test]
    fn build_index_counts_files_and_bytes() {
        let tmp = tempfile::tempdir().unwrap();
        fs::write(tmp.path().join("a.txt"), vec![0u8; 50]).unwrap();
        fs::write(tmp.path().join("b.txt"), vec![0u8; 25]).unwrap();

        let index = WalkdirSearchIndex::new();
        let stats = index.build_index(&vetted(tmp.path().to_path_buf()), true).unwrap();
        assert_eq!(stats.files_indexed, 2);
        assert_eq!(stats.bytes_indexed, 75);
    }
}
