//! Fail-fast ordered sequencing of patch + build across the package chain.
//!
//! Packages build strictly one at a time, in the order given: later
//! packages consume headers and libraries produced by earlier ones, and
//! the underlying toolchain gives no safe-to-parallelize guarantee across
//! sibling directories. The first failing step aborts the whole sequence;
//! a renderer built against a partially-broken chain is worse than no
//! artifact at all. Artifacts of packages that already built stay on disk,
//! so a re-run can pass a reduced subset.

use std::time::Duration;

use serde::Serialize;
use thiserror::Error;
use tracing::{error, info};

use crate::builder::{BuildError, build_package};
use crate::config::BuildConfig;
use crate::package::Package;
use crate::patch::{PatchError, PatchOutcome, apply_patch};
use crate::runner::CommandRunner;

/// Errors aborting the sequence, naming the failing package.
#[derive(Debug, Error)]
pub enum SequenceError {
  #[error("patch step failed for {package}: {source}")]
  Patch {
    package: String,
    #[source]
    source: PatchError,
  },

  #[error("build step failed for {package}: {source}")]
  Build {
    package: String,
    #[source]
    source: BuildError,
  },

  /// The per-package wall-clock limit elapsed.
  #[error("package {package} exceeded the {limit:?} time limit")]
  Timeout { package: String, limit: Duration },
}

/// What a completed sequence did.
#[derive(Debug, Default, Serialize)]
pub struct SequenceReport {
  /// Packages built, in order.
  pub built: Vec<String>,

  /// Packages whose patch was applied during this run (not ones already
  /// patched or without a patch).
  pub patched: Vec<String>,
}

async fn run_step<R: CommandRunner>(
  runner: &R,
  pkg: &Package,
  config: &BuildConfig,
) -> Result<PatchOutcome, SequenceError> {
  let patch_outcome = apply_patch(runner, pkg).await.map_err(|source| SequenceError::Patch {
    package: pkg.name.clone(),
    source,
  })?;

  build_package(runner, pkg, config)
    .await
    .map_err(|source| SequenceError::Build {
      package: pkg.name.clone(),
      source,
    })?;

  Ok(patch_outcome)
}

/// Patch and build every package in `packages`, in order, failing fast.
pub async fn run_sequence<R: CommandRunner>(
  runner: &R,
  packages: &[Package],
  config: &BuildConfig,
) -> Result<SequenceReport, SequenceError> {
  info!(count = packages.len(), kind = %config.kind, "starting build sequence");

  let mut report = SequenceReport::default();

  for pkg in packages {
    let step = run_step(runner, pkg, config);

    let patch_outcome = match config.timeout {
      Some(limit) => match tokio::time::timeout(limit, step).await {
        Ok(result) => result,
        Err(_) => {
          error!(package = %pkg.name, ?limit, "package step timed out");
          return Err(SequenceError::Timeout {
            package: pkg.name.clone(),
            limit,
          });
        }
      },
      None => step.await,
    }?;

    if patch_outcome == PatchOutcome::Applied {
      report.patched.push(pkg.name.clone());
    }
    report.built.push(pkg.name.clone());
    info!(package = %pkg.name, "package built");
  }

  info!(built = report.built.len(), "build sequence complete");
  Ok(report)
}
