//! The concrete, literal-input scenarios from the testable-properties
//! section: each test asserts the exact rejection or exact output named
//! for a specific input, rather than a general property.

use fencefs_core::auxops::checksum::{compute_checksum, ChecksumAlgorithm};
use fencefs_core::config::PolicyConfig;
use fencefs_core::error::{FenceError, OperationError, SecurityError};
use fencefs_core::path::PathResolver;
use fencefs_core::policy::PolicyEngine;
use fencefs_core::types::agent::AgentId;
use fencefs_core::types::batch::{BatchOp, BatchOpKind};
use fencefs_core::types::path::OperationKind;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

#[test]
fn scenario_1_dot_dot_traversal_is_rejected() {
    let workspace = TempDir::new().unwrap();
    let policy = PolicyConfig::for_workspace(workspace.path().to_path_buf());
    let resolver = PathResolver::new();

    let err = resolver
        .resolve(&PathBuf::from("../etc/passwd"), OperationKind::Read, &policy)
        .unwrap_err();
    assert!(matches!(
        err,
        FenceError::Security(SecurityError::PathTraversal { .. })
    ));
}

#[test]
fn scenario_2_lexical_traversal_fires_before_resolution() {
    let workspace = TempDir::new().unwrap();
    let policy = PolicyConfig::for_workspace(workspace.path().to_path_buf());
    let resolver = PathResolver::new();

    // a/b/../c resolves to a/c, which would be perfectly fine under the
    // workspace, but the lexical screen must reject it before resolution
    // ever runs.
    let err = resolver
        .resolve(&PathBuf::from("a/b/../c"), OperationKind::Read, &policy)
        .unwrap_err();
    assert!(matches!(
        err,
        FenceError::Security(SecurityError::PathTraversal { .. })
    ));
}

#[test]
fn scenario_3_outside_allowed_subdir_is_rejected() {
    let workspace = TempDir::new().unwrap();
    std::fs::create_dir(workspace.path().join("src")).unwrap();
    std::fs::create_dir(workspace.path().join("tests")).unwrap();
    std::fs::write(workspace.path().join("tests/x.ts"), b"x").unwrap();

    let mut policy = PolicyConfig::for_workspace(workspace.path().to_path_buf());
    policy.allowed_subdirs = vec![workspace.path().join("src")];
    let resolver = PathResolver::new();

    let err = resolver
        .resolve(&PathBuf::from("tests/x.ts"), OperationKind::Read, &policy)
        .unwrap_err();
    assert!(matches!(
        err,
        FenceError::Security(SecurityError::SubdirRestriction { .. })
    ));
}

#[test]
fn scenario_4_atomic_batch_with_missing_source_rolls_back_and_leaves_others_untouched() {
    let workspace = TempDir::new().unwrap();
    std::fs::write(workspace.path().join("a.txt"), b"source a").unwrap();
    std::fs::write(workspace.path().join("d.txt"), b"pre-existing d").unwrap();

    let policy = PolicyEngine::new(PolicyConfig::for_workspace(workspace.path().to_path_buf()));
    let agent = AgentId::generate();
    let executor = fencefs_core::batch::BatchExecutor::new(&policy);

    let ops = vec![
        BatchOp::new(
            BatchOpKind::Copy,
            workspace.path().join("a.txt"),
            Some(workspace.path().join("b.txt")),
        )
        .unwrap(),
        BatchOp::new(
            BatchOpKind::Copy,
            workspace.path().join("c.txt"),
            Some(workspace.path().join("d.txt")),
        )
        .unwrap(),
    ];

    let err = executor.execute_batch(&ops, true, &agent).unwrap_err();
    assert!(matches!(
        err,
        FenceError::Operation(OperationError::BatchFailed { .. })
    ));

    assert!(!workspace.path().join("b.txt").exists());
    assert_eq!(
        std::fs::read(workspace.path().join("a.txt")).unwrap(),
        b"source a"
    );
    assert_eq!(
        std::fs::read(workspace.path().join("d.txt")).unwrap(),
        b"pre-existing d"
    );
}

#[test]
fn scenario_5_sha256_of_empty_file_matches_the_known_digest() {
    let workspace = TempDir::new().unwrap();
    std::fs::write(workspace.path().join("empty.txt"), b"").unwrap();
    let policy = PolicyConfig::for_workspace(workspace.path().to_path_buf());
    let resolver = PathResolver::new();
    let vetted = resolver
        .resolve(&PathBuf::from("empty.txt"), OperationKind::Read, &policy)
        .unwrap();

    let digest = compute_checksum(&vetted, ChecksumAlgorithm::Sha256).unwrap();
    assert_eq!(
        digest,
        "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
    );
}

#[test]
fn scenario_6_symlink_targeting_a_system_path_is_rejected_and_never_created() {
    let workspace = TempDir::new().unwrap();
    let policy = PolicyEngine::new(PolicyConfig::for_workspace(workspace.path().to_path_buf()));
    let agent = AgentId::generate();

    let err = policy
        .vet_symlink(Path::new("link"), Path::new("/etc/passwd"), &agent)
        .unwrap_err();
    assert!(matches!(
        err,
        FenceError::Security(SecurityError::SymlinkEscape { .. })
    ));
    assert!(!workspace.path().join("link").exists());
}
