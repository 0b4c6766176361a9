//! The path validation pipeline: `resolve()` is the only way a raw,
//! caller-supplied path becomes a [`VettedPath`].
//!
//! Every layer runs in a fixed order and the first matching layer rejects
//! (§4.A). Layers 1–5 are non-overridable: they fire even when a policy's
//! own configuration would otherwise permit the path.

use std::path::{Path, PathBuf};

use crate::config::PolicyConfig;
use crate::constants::{
    HARDCODED_SENSITIVE_PATTERNS, HARDCODED_SENSITIVE_PATTERNS_CI, HARDCODED_SYSTEM_PATHS,
    SYMLINK_MAX_DEPTH,
};
use crate::error::{Result, SecurityError};
use crate::path::utils::normalize_path;
use crate::types::path::{OperationKind, VettedPath};

/// Stateless path validator: every method takes the policy it is vetting
/// against, so one resolver instance can serve any number of policies.
#[derive(Debug, Default, Clone, Copy)]
pub struct PathResolver;

impl PathResolver {
    pub fn new() -> Self {
        Self
    }

    /// Run the full pipeline against `input_path` for the given operation.
    ///
    /// `input_path` may be relative (joined against `policy.workspace_root`)
    /// or absolute. On success, returns a [`VettedPath`] that downstream
    /// filesystem effects may act on.
    pub fn resolve(
        &self,
        input_path: &Path,
        operation: OperationKind,
        policy: &PolicyConfig,
    ) -> Result<VettedPath> {
        self.resolve_depth(input_path, operation, policy, 0)
    }

    fn resolve_depth(
        &self,
        input_path: &Path,
        operation: OperationKind,
        policy: &PolicyConfig,
        depth: u32,
    ) -> Result<VettedPath> {
        let raw_input = input_path.to_string_lossy().into_owned();

        // 1. Lexical traversal screen — syntactic, before any resolution.
        if contains_lexical_traversal(&raw_input) {
            return Err(SecurityError::PathTraversal { raw_input }.into());
        }

        // 2. Resolution: join against workspace_root if relative, normalize.
        let joined = if input_path.is_absolute() {
            input_path.to_path_buf()
        } else {
            policy.workspace_root.join(input_path)
        };
        let resolved = normalize_path(&joined);
        let resolved_str = resolved.to_string_lossy().into_owned();

        // 3. Workspace boundary.
        if !is_within(&resolved, &policy.workspace_root) {
            return Err(SecurityError::WorkspaceEscape {
                raw_input,
                resolved: resolved_str,
            }
            .into());
        }

        // 4. Hardcoded system path screen.
        if let Some(_prefix) = matching_prefix(&resolved_str, HARDCODED_SYSTEM_PATHS) {
            return Err(SecurityError::SystemPath {
                raw_input,
                resolved: resolved_str,
            }
            .into());
        }

        // 5. Hardcoded sensitive pattern screen.
        if matches_sensitive_pattern(&resolved_str) {
            return Err(SecurityError::SensitiveFile {
                raw_input,
                resolved: resolved_str,
            }
            .into());
        }

        // 6. Allowed subdirectory screen.
        if !policy.allowed_subdirs.is_empty()
            && !policy
                .allowed_subdirs
                .iter()
                .any(|dir| is_within(&resolved, dir))
        {
            return Err(SecurityError::SubdirRestriction {
                raw_input,
                resolved: resolved_str,
            }
            .into());
        }

        // 7. User blocklist.
        if let Some(_prefix) = policy
            .blocked_paths
            .iter()
            .find(|blocked| is_within(&resolved, blocked))
        {
            return Err(SecurityError::BlockedPath {
                raw_input,
                resolved: resolved_str,
            }
            .into());
        }

        // 8. User pattern (compiled glob-derived regexes, §3).
        if policy
            .blocked_patterns
            .iter()
            .any(|pattern| pattern.is_match(&resolved_str))
        {
            return Err(SecurityError::BlockedPattern {
                raw_input,
                resolved: resolved_str,
            }
            .into());
        }

        // 9. Read-only guard.
        if policy.read_only && operation.is_mutating() {
            return Err(SecurityError::ReadOnly {
                raw_input,
                resolved: resolved_str,
            }
            .into());
        }

        // 10. Symlink target recursion.
        if let Ok(metadata) = std::fs::symlink_metadata(&resolved) {
            if metadata.file_type().is_symlink() {
                if depth >= SYMLINK_MAX_DEPTH {
                    return Err(SecurityError::SymlinkEscape {
                        raw_input,
                        resolved: resolved_str.clone(),
                        target: resolved_str,
                    }
                    .into());
                }
                let link_target = std::fs::read_link(&resolved).map_err(|e| {
                    crate::error::FsError::from_io(&e, resolved_str.clone())
                })?;
                let parent = resolved.parent().unwrap_or(&resolved);
                let target_abs = if link_target.is_absolute() {
                    link_target.clone()
                } else {
                    parent.join(&link_target)
                };
                return self
                    .resolve_depth(&target_abs, operation, policy, depth + 1)
                    .map_err(|_| {
                        SecurityError::SymlinkEscape {
                            raw_input: raw_input.clone(),
                            resolved: resolved_str.clone(),
                            target: link_target.to_string_lossy().into_owned(),
                        }
                        .into()
                    });
            }
        }

        Ok(VettedPath::new(resolved, operation))
    }
}

/// Substrings that mark an input as a traversal attempt before resolution.
fn contains_lexical_traversal(raw: &str) -> bool {
    raw.contains("..") || raw.contains("./") || raw.contains(".\\")
}

/// Case-sensitive prefix match against a fixed list of absolute-ish prefixes.
fn matching_prefix<'a>(resolved: &str, prefixes: &'a [&'a str]) -> Option<&'a str> {
    prefixes.iter().copied().find(|p| resolved.starts_with(p))
}

/// `hardcoded_sensitive_patterns`: glob-ish fragments matched anywhere in the
/// resolved path; `password`/`secret`/`token` match case-insensitively.
fn matches_sensitive_pattern(resolved: &str) -> bool {
    let lower = resolved.to_lowercase();
    if HARDCODED_SENSITIVE_PATTERNS_CI
        .iter()
        .any(|needle| lower.contains(needle))
    {
        return true;
    }
    HARDCODED_SENSITIVE_PATTERNS.iter().any(|pattern| {
        if let Some(suffix) = pattern.strip_prefix('*') {
            resolved.ends_with(suffix)
        } else {
            resolved.contains(pattern)
        }
    })
}

/// Whether `path` equals `root` or sits under it, after normalization.
fn is_within(path: &Path, root: &Path) -> bool {
    let path = normalize_path(path);
    let root = normalize_path(root);
    path == root || path.starts_with(&root)
}
