//! CLI smoke tests for kobuild.
//!
//! These tests verify that the CLI commands run without panicking and
//! return appropriate exit codes. Nothing here invokes a cross toolchain:
//! failures come from the checkout tree, not from real builds.

use assert_cmd::Command;
use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use tempfile::TempDir;

/// Get a Command for the kobuild binary.
fn kobuild_cmd() -> Command {
  cargo_bin_cmd!("kobuild")
}

// =============================================================================
// Help & Version
// =============================================================================

#[test]
fn help_flag_works() {
  kobuild_cmd()
    .arg("--help")
    .assert()
    .success()
    .stdout(predicate::str::contains("Usage"));
}

#[test]
fn subcommand_help_works() {
  for cmd in &["build", "chain"] {
    kobuild_cmd()
      .arg(cmd)
      .arg("--help")
      .assert()
      .success()
      .stdout(predicate::str::contains("Usage"));
  }
}

// =============================================================================
// chain
// =============================================================================

#[test]
fn chain_lists_packages_in_dependency_order() {
  let temp = TempDir::new().unwrap();

  let assert = kobuild_cmd()
    .arg("chain")
    .arg("--root")
    .arg(temp.path())
    .assert()
    .success()
    .stdout(predicate::str::contains("zlib"))
    .stdout(predicate::str::contains("mupdf"));

  let stdout = String::from_utf8_lossy(&assert.get_output().stdout).to_string();
  let zlib_pos = stdout.find("zlib").unwrap();
  let mupdf_pos = stdout.find("mupdf").unwrap();
  assert!(zlib_pos < mupdf_pos);
}

#[test]
fn chain_marks_patched_packages() {
  let temp = TempDir::new().unwrap();
  let dir = temp.path().join("freetype");
  std::fs::create_dir(&dir).unwrap();
  std::fs::write(dir.join("kobo.patch"), "--- a/x\n+++ b/x\n").unwrap();

  kobuild_cmd()
    .arg("chain")
    .arg("--root")
    .arg(temp.path())
    .assert()
    .success()
    .stdout(predicate::str::contains("freetype  [kobo.patch]"));
}

#[test]
fn chain_json_is_parseable() {
  let temp = TempDir::new().unwrap();

  let assert = kobuild_cmd()
    .arg("chain")
    .arg("--root")
    .arg(temp.path())
    .arg("--format")
    .arg("json")
    .assert()
    .success();

  let stdout = String::from_utf8_lossy(&assert.get_output().stdout).to_string();
  let value: serde_json::Value = serde_json::from_str(&stdout).unwrap();
  assert_eq!(value[0]["name"], "zlib");
}

// =============================================================================
// build
// =============================================================================

#[test]
fn build_unknown_package_fails() {
  let temp = TempDir::new().unwrap();

  kobuild_cmd()
    .arg("build")
    .arg("djvulibre")
    .arg("--root")
    .arg(temp.path())
    .assert()
    .failure()
    .stderr(predicate::str::contains("unknown package"));
}

#[test]
fn build_in_empty_checkout_fails_naming_the_first_package() {
  // No package directories exist, so the very first build step fails.
  let temp = TempDir::new().unwrap();

  kobuild_cmd()
    .arg("build")
    .arg("--root")
    .arg(temp.path())
    .assert()
    .failure()
    .stderr(predicate::str::contains("zlib"));
}

#[test]
fn build_rejects_bad_timeout() {
  kobuild_cmd()
    .arg("build")
    .arg("--timeout")
    .arg("not-a-duration")
    .assert()
    .failure();
}
