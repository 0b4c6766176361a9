//! In-workspace symlink creation (§4.G).
//!
//! The link is written with a target relative to the link's parent, so the
//! workspace stays portable if it is ever moved or copied elsewhere.

use crate::error::{FsError, Result};
use crate::path::relative_path;
use crate::types::path::VettedPath;

/// Create `link` pointing at `target`. Both paths must already be
/// [`VettedPath`]s produced by `PolicyEngine::vet_symlink`, which has
/// already confirmed `target` resolves under the workspace root.
pub fn create_symlink(link: &VettedPath, target: &VettedPath) -> Result<()> {
    let link_path = link.as_path();
    if link_path.exists() || link_path.symlink_metadata().is_ok() {
        return Err(FsError::AlreadyExists {
            path: link_path.display().to_string(),
        }
        .into());
    }

    let parent = link_path.parent().ok_or_else(|| FsError::Other(format!(
        "symlink target {} has no parent directory",
        link_path.display()
    )))?;
    let relative_target = relative_path(parent, target.as_path()).ok_or_else(|| {
        FsError::Other(format!(
            "could not compute a relative path from {} to {}",
            parent.display(),
            target.as_path().display()
        ))
    })?;

    create_symlink_os(&relative_target, link_path)
        .map_err(|e| FsError::from_io(&e, link_path.display().to_string()).into())
}

#[cfg(unix)]
fn create_symlink_os(target: &std::path::Path, link: &std::path::Path) -> std::io::Result<()> {
    std::os::unix::fs::symlink(target, link)
}

#[cfg(windows)]
fn create_symlink_os(target: &std::path::Path, link: &std::path::Path) -> std::io::Result<()> {
    if target.is_dir() {
        std::os::windows::fs::symlink_dir(target, link)
    } else {
        std::os::windows::fs::symlink_file(target, link)
    }
}
