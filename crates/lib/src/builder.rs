//! Invoking a package's own build procedure.
//!
//! Each package in the chain exposes a make-driven build accepting the
//! platform identifier and system-libraries policy as variables and the
//! build-kind as the target. The orchestrator never interprets the
//! package's build tree; it only cares about the exit status.

use thiserror::Error;
use tracing::info;

use crate::config::BuildConfig;
use crate::package::Package;
use crate::runner::{CommandRunner, CommandSpec};

/// Errors from a package build.
#[derive(Debug, Error)]
pub enum BuildError {
  /// The package's build exited non-zero.
  #[error("build failed for {package} (exit code {code:?}): {stderr}")]
  BuildFailed {
    package: String,
    code: Option<i32>,
    stderr: String,
  },

  /// The build tool could not be spawned.
  #[error("io error: {0}")]
  Io(#[from] std::io::Error),
}

fn build_spec(pkg: &Package, config: &BuildConfig) -> CommandSpec {
  CommandSpec {
    program: "make".to_string(),
    args: vec![
      format!("OS={}", config.platform),
      format!("USE_SYSTEM_LIBS={}", if config.use_system_libs { "yes" } else { "no" }),
      config.kind.clone(),
    ],
    cwd: pkg.dir.clone(),
  }
}

/// Run `pkg`'s build for the given configuration.
pub async fn build_package<R: CommandRunner>(
  runner: &R,
  pkg: &Package,
  config: &BuildConfig,
) -> Result<(), BuildError> {
  info!(package = %pkg.name, kind = %config.kind, platform = %config.platform, "building package");

  let outcome = runner.run(&build_spec(pkg, config)).await?;
  if !outcome.success() {
    return Err(BuildError::BuildFailed {
      package: pkg.name.clone(),
      code: outcome.code,
      stderr: outcome.stderr_tail(),
    });
  }

  Ok(())
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::util::testutil::ScriptedRunner;
  use std::path::PathBuf;

  fn package(name: &str) -> Package {
    Package {
      name: name.to_string(),
      dir: PathBuf::from("/src").join(name),
      patch: None,
    }
  }

  #[tokio::test]
  async fn forwards_platform_syslibs_and_kind() {
    let runner = ScriptedRunner::new();
    build_package(&runner, &package("zlib"), &BuildConfig::default())
      .await
      .unwrap();

    let calls = runner.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].program, "make");
    assert_eq!(calls[0].args, vec!["OS=kobo", "USE_SYSTEM_LIBS=no", "release"]);
    assert_eq!(calls[0].cwd, PathBuf::from("/src/zlib"));
  }

  #[tokio::test]
  async fn debug_kind_is_the_make_target() {
    let runner = ScriptedRunner::new();
    let mut config = BuildConfig::with_kind("debug");
    config.use_system_libs = true;
    build_package(&runner, &package("mupdf"), &config).await.unwrap();

    assert_eq!(
      runner.calls()[0].args,
      vec!["OS=kobo", "USE_SYSTEM_LIBS=yes", "debug"]
    );
  }

  #[tokio::test]
  async fn nonzero_exit_is_a_build_error() {
    let runner = ScriptedRunner::new().fail_if(|_| true, 2, "cc: not found");
    let err = build_package(&runner, &package("freetype"), &BuildConfig::default())
      .await
      .unwrap_err();
    assert!(matches!(
      err,
      BuildError::BuildFailed { package, code: Some(2), .. } if package == "freetype"
    ));
  }
}
