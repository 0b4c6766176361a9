use assert_cmd::Command;
use predicates::prelude::*;

#[test]
fn binary_fails_without_a_subcommand() {
    Command::cargo_bin("fencefs").unwrap().assert().failure();
}

#[test]
fn help_output_lists_every_operation() {
    Command::cargo_bin("fencefs")
        .unwrap()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("batch-operations"))
        .stdout(predicate::str::contains("watch-directory"))
        .stdout(predicate::str::contains("get-watch-events"))
        .stdout(predicate::str::contains("stop-watch"))
        .stdout(predicate::str::contains("search-files"))
        .stdout(predicate::str::contains("build-index"))
        .stdout(predicate::str::contains("create-symlink"))
        .stdout(predicate::str::contains("compute-checksum"))
        .stdout(predicate::str::contains("verify-checksum"))
        .stdout(predicate::str::contains("analyze-disk-usage"))
        .stdout(predicate::str::contains("copy-directory"))
        .stdout(predicate::str::contains("sync-directory"));
}

#[test]
fn version_output_names_the_binary() {
    Command::cargo_bin("fencefs")
        .unwrap()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("fencefs"));
}

#[test]
fn every_operation_subcommand_has_help() {
    let commands = [
        "batch-operations",
        "watch-directory",
        "get-watch-events",
        "stop-watch",
        "search-files",
        "build-index",
        "create-symlink",
        "compute-checksum",
        "verify-checksum",
        "analyze-disk-usage",
        "copy-directory",
        "sync-directory",
    ];

    for cmd in &commands {
        Command::cargo_bin("fencefs")
            .unwrap()
            .args([cmd, "--help"])
            .assert()
            .success();
    }
}

#[test]
fn admin_subcommand_has_emergency_stop_and_sweep_backups() {
    Command::cargo_bin("fencefs")
        .unwrap()
        .args(["admin", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("emergency-stop"))
        .stdout(predicate::str::contains("sweep-backups"));
}

#[test]
fn invalid_command_shows_error() {
    Command::cargo_bin("fencefs")
        .unwrap()
        .arg("invalid-command")
        .assert()
        .failure()
        .stderr(predicate::str::contains("error"));
}
