//! Target patch application for one package.
//!
//! Patches are unified diffs applied with one leading path component
//! stripped (`-p1`), named by the fixed convention in [`crate::consts`].
//! Application is idempotent across re-runs: before applying, the patch is
//! probed with a reverse dry-run, and a tree that already contains the
//! patch is left untouched.

use std::path::Path;

use thiserror::Error;
use tracing::{debug, info};

use crate::package::Package;
use crate::runner::{CommandRunner, CommandSpec};

/// What the patch step did for a package.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatchOutcome {
  /// No patch file exists for this package.
  Missing,
  /// The tree already contains the patch; nothing was touched.
  AlreadyApplied,
  /// The patch was applied to the source tree.
  Applied,
}

/// Errors applying a package's target patch.
#[derive(Debug, Error)]
pub enum PatchError {
  /// `patch` exited non-zero; the tree is neither clean nor fully patched.
  /// The operator must restore a clean checkout.
  #[error("patch failed for {package}: {stderr}")]
  ApplyFailed { package: String, stderr: String },

  /// The `patch` tool could not be spawned.
  #[error("io error: {0}")]
  Io(#[from] std::io::Error),
}

fn patch_spec(dir: &Path, patch_file: &Path, reverse_probe: bool) -> CommandSpec {
  let mut args = vec!["-p1".to_string(), "--force".to_string()];
  if reverse_probe {
    args.push("-R".to_string());
    args.push("--dry-run".to_string());
  }
  args.push("-i".to_string());
  args.push(patch_file.display().to_string());
  CommandSpec {
    program: "patch".to_string(),
    args,
    cwd: dir.to_path_buf(),
  }
}

/// Apply `pkg`'s target patch to its source tree, if it has one.
pub async fn apply_patch<R: CommandRunner>(runner: &R, pkg: &Package) -> Result<PatchOutcome, PatchError> {
  let Some(patch_file) = &pkg.patch else {
    debug!(package = %pkg.name, "no target patch");
    return Ok(PatchOutcome::Missing);
  };

  // A clean reverse dry-run means every hunk is already present.
  let probe = runner.run(&patch_spec(&pkg.dir, patch_file, true)).await?;
  if probe.success() {
    info!(package = %pkg.name, "patch already applied, skipping");
    return Ok(PatchOutcome::AlreadyApplied);
  }

  info!(package = %pkg.name, patch = %patch_file.display(), "applying target patch");
  let outcome = runner.run(&patch_spec(&pkg.dir, patch_file, false)).await?;
  if !outcome.success() {
    return Err(PatchError::ApplyFailed {
      package: pkg.name.clone(),
      stderr: outcome.stderr_tail(),
    });
  }

  Ok(PatchOutcome::Applied)
}
