#![allow(clippy::unwrap_used)]
#![allow(missing_docs)]

use assert_cmd::cargo_bin_cmd;
use predicates::prelude::predicate;

#[test]
fn test_help_lists_subcommands() {
    // Arrange & Act & Assert
    let mut cmd = cargo_bin_cmd!("moviever");
    cmd.arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("fetch"))
        .stdout(predicate::str::contains("top"))
        .stdout(predicate::str::contains("export"));
}

#[test]
fn test_fetch_help() {
    // Arrange & Act & Assert
    let mut cmd = cargo_bin_cmd!("moviever");
    cmd.args(["fetch", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--pages"));
}

#[test]
fn test_top_help() {
    // Arrange & Act & Assert
    let mut cmd = cargo_bin_cmd!("moviever");
    cmd.args(["top", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--count"))
        .stdout(predicate::str::contains("--previous-month"));
}

#[test]
fn test_list_help_shows_filter_flags() {
    // Arrange & Act & Assert
    let mut cmd = cargo_bin_cmd!("moviever");
    cmd.args(["list", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--min-rating"))
        .stdout(predicate::str::contains("--genre"))
        .stdout(predicate::str::contains("--include-missing-dates"));
}

#[test]
fn test_fetch_without_token_fails() {
    // Arrange
    let dir = tempfile::tempdir().unwrap();

    // Act & Assert
    let mut cmd = cargo_bin_cmd!("moviever");
    cmd.env_remove("TMDB_API_TOKEN")
        .args(["--dir", dir.path().to_str().unwrap(), "fetch"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("TMDB_API_TOKEN"));
}

#[test]
fn test_unknown_subcommand_fails() {
    // Arrange & Act & Assert
    let mut cmd = cargo_bin_cmd!("moviever");
    cmd.arg("browse").assert().failure();
}
