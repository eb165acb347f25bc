//! Top-level orchestration: sequence the chain, then link the artifact.

use std::path::{Path, PathBuf};

use serde::Serialize;
use thiserror::Error;
use tracing::info;

use crate::config::BuildConfig;
use crate::exclude::ExcludeSet;
use crate::link::{LinkError, LinkSpec, link_artifact};
use crate::package::{PackageError, default_chain, select};
use crate::runner::CommandRunner;
use crate::sequence::{SequenceError, SequenceReport, run_sequence};

/// Errors aborting an orchestration run.
#[derive(Debug, Error)]
pub enum OrchestrateError {
  #[error(transparent)]
  Package(#[from] PackageError),

  #[error(transparent)]
  Sequence(#[from] SequenceError),

  #[error(transparent)]
  Link(#[from] LinkError),
}

/// Result of a full orchestration run.
#[derive(Debug, Serialize)]
pub struct BuildReport {
  /// What the sequencer did.
  pub sequence: SequenceReport,

  /// Path of the linked artifact, when the run included the renderer.
  pub artifact: Option<PathBuf>,
}

/// Build the chain rooted at `root` and link the artifact.
///
/// With `only` set, the run is restricted to those packages in the
/// caller's order. The link step runs only when the selection includes
/// the renderer package; a failed sequence never reaches the link step,
/// so a failed run leaves no fresh artifact behind.
pub async fn orchestrate<R: CommandRunner>(
  runner: &R,
  root: &Path,
  config: &BuildConfig,
  only: Option<&[String]>,
) -> Result<BuildReport, OrchestrateError> {
  let chain = default_chain(root);
  let packages = match only {
    Some(names) => select(&chain, names)?,
    None => chain,
  };

  let sequence = run_sequence(runner, &packages, config).await?;

  let artifact = match packages.iter().find(|pkg| pkg.is_renderer()) {
    Some(renderer) => {
      let spec = LinkSpec::renderer_default();
      let excludes = ExcludeSet::renderer_default();
      Some(link_artifact(runner, renderer, config, &spec, &excludes).await?)
    }
    None => {
      info!("renderer not in selection, skipping link step");
      None
    }
  };

  Ok(BuildReport { sequence, artifact })
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::util::testutil::ScriptedRunner;

  #[tokio::test]
  async fn unknown_subset_name_fails_before_any_command() {
    let runner = ScriptedRunner::new();
    let names = vec!["gumbo".to_string()];
    let err = orchestrate(&runner, Path::new("/src"), &BuildConfig::default(), Some(&names))
      .await
      .unwrap_err();

    assert!(matches!(err, OrchestrateError::Package(PackageError::Unknown(_))));
    assert!(runner.calls().is_empty());
  }

  #[tokio::test]
  async fn subset_without_renderer_builds_but_never_links() {
    let runner = ScriptedRunner::new();
    let names = vec!["zlib".to_string(), "freetype".to_string()];
    let report = orchestrate(&runner, Path::new("/src"), &BuildConfig::default(), Some(&names))
      .await
      .unwrap();

    assert_eq!(report.sequence.built, vec!["zlib", "freetype"]);
    assert!(report.artifact.is_none());
    assert!(runner.calls().iter().all(|spec| spec.program == "make"));
  }

  #[tokio::test]
  async fn failed_sequence_never_reaches_the_link_step() {
    let runner = ScriptedRunner::new().fail_if(|spec| spec.cwd.ends_with("mupdf"), 2, "boom");
    let err = orchestrate(&runner, Path::new("/src"), &BuildConfig::default(), None)
      .await
      .unwrap_err();

    assert!(matches!(err, OrchestrateError::Sequence(_)));
    assert!(runner.calls().iter().all(|spec| spec.program == "make"));
  }
}
