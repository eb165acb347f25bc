//! The final link step: one shared library from the renderer's objects.
//!
//! After the last package in the chain has built, its object tree is
//! enumerated, filtered through the exclusion set, and linked together
//! with the sibling packages' libraries into `libmupdf.so`. Undefined
//! symbols are a hard link failure: an artifact that loads but cannot
//! resolve is worse than a failed build.

use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, info};
use walkdir::WalkDir;

use crate::config::BuildConfig;
use crate::consts;
use crate::exclude::ExcludeSet;
use crate::package::Package;
use crate::runner::{CommandRunner, CommandSpec};

/// One external library resolved against a sibling package's build tree.
#[derive(Debug, Clone)]
pub struct LinkLibrary {
  /// Library name, as passed to `-l`.
  pub name: String,

  /// Search path relative to the renderer package directory.
  pub search_path: PathBuf,
}

/// Everything the linker invocation needs besides the object list.
#[derive(Debug, Clone)]
pub struct LinkSpec {
  /// Linker driver, e.g. `arm-linux-gnueabihf-gcc`.
  pub linker: String,

  /// Soname and output file name of the artifact.
  pub soname: String,

  /// External libraries in link order.
  pub libraries: Vec<LinkLibrary>,
}

impl LinkSpec {
  /// The fixed device link: cross gcc, pinned soname, sibling libraries.
  /// Honors a `CROSS_COMPILE` toolchain prefix from the environment.
  pub fn renderer_default() -> Self {
    let prefix =
      std::env::var("CROSS_COMPILE").unwrap_or_else(|_| consts::DEFAULT_CROSS_PREFIX.to_string());
    Self {
      linker: format!("{prefix}gcc"),
      soname: consts::RENDERER_SONAME.to_string(),
      libraries: consts::LINK_LIBRARIES
        .iter()
        .map(|(name, path)| LinkLibrary {
          name: name.to_string(),
          search_path: PathBuf::from(path),
        })
        .collect(),
    }
  }
}

/// Errors from the link step. All are fatal; the operator must fix the
/// underlying package build and re-run.
#[derive(Debug, Error)]
pub enum LinkError {
  /// The build-kind output directory does not exist; the renderer was not
  /// built, or was built with a different build-kind.
  #[error("no object tree at {0} (package not built for this build-kind?)")]
  MissingObjectTree(PathBuf),

  /// Exclusion filtering left nothing to link.
  #[error("no object files left to link under {0}")]
  NoObjects(PathBuf),

  /// A sibling library search path is missing; the dependency was not
  /// built, or was built with a different build-kind.
  #[error("missing search path for {library}: {path}")]
  MissingSearchPath { library: String, path: PathBuf },

  /// The linker exited non-zero; its diagnostics are passed through.
  #[error("link failed (exit code {code:?}): {stderr}")]
  LinkFailed { code: Option<i32>, stderr: String },

  /// Object enumeration failed.
  #[error("object enumeration error: {0}")]
  Walk(#[from] walkdir::Error),

  /// The linker could not be spawned.
  #[error("io error: {0}")]
  Io(#[from] std::io::Error),
}

/// The renderer's object output directory for this build-kind.
pub fn objects_dir(renderer_dir: &Path, kind: &str) -> PathBuf {
  renderer_dir.join(consts::BUILD_DIR_NAME).join(kind)
}

/// Recursively enumerate `*.o` under `dir`, sorted by path.
///
/// Sorting makes the link input independent of directory iteration order,
/// so two runs over the same tree feed the linker identical object lists.
pub fn collect_objects(dir: &Path) -> Result<Vec<PathBuf>, LinkError> {
  if !dir.is_dir() {
    return Err(LinkError::MissingObjectTree(dir.to_path_buf()));
  }

  let mut objects = Vec::new();
  for entry in WalkDir::new(dir).sort_by_file_name() {
    let entry = entry?;
    if entry.file_type().is_file() && entry.path().extension().is_some_and(|ext| ext == "o") {
      objects.push(entry.path().to_path_buf());
    }
  }
  objects.sort();
  Ok(objects)
}

/// Drop every object whose file name matches the exclusion set.
pub fn filter_objects(objects: Vec<PathBuf>, excludes: &ExcludeSet) -> Vec<PathBuf> {
  objects
    .into_iter()
    .filter(|path| {
      let name = path.file_name().and_then(|n| n.to_str()).unwrap_or_default();
      let keep = !excludes.is_excluded(name);
      if !keep {
        debug!(object = %path.display(), "excluded from link");
      }
      keep
    })
    .collect()
}

/// Link the renderer's filtered objects into the shared library artifact.
///
/// Returns the artifact path `<renderer>/build/<kind>/<soname>`.
pub async fn link_artifact<R: CommandRunner>(
  runner: &R,
  renderer: &Package,
  config: &BuildConfig,
  spec: &LinkSpec,
  excludes: &ExcludeSet,
) -> Result<PathBuf, LinkError> {
  let out_dir = objects_dir(&renderer.dir, &config.kind);
  let objects = filter_objects(collect_objects(&out_dir)?, excludes);
  if objects.is_empty() {
    return Err(LinkError::NoObjects(out_dir));
  }

  // Every search path must exist before the linker runs: a missing one
  // means a dependency was never built for this build-kind, and the
  // linker's own "cannot find -l..." is a worse diagnostic.
  for lib in &spec.libraries {
    let path = renderer.dir.join(&lib.search_path);
    if !path.is_dir() {
      return Err(LinkError::MissingSearchPath {
        library: lib.name.clone(),
        path,
      });
    }
  }

  let artifact = out_dir.join(&spec.soname);
  info!(
    objects = objects.len(),
    artifact = %artifact.display(),
    "linking shared library"
  );

  let mut args = vec![
    "-shared".to_string(),
    "-Wl,--gc-sections".to_string(),
    format!("-Wl,-soname,{}", spec.soname),
    "-Wl,--no-undefined".to_string(),
    "-o".to_string(),
    artifact.display().to_string(),
  ];
  args.extend(objects.iter().map(|o| o.display().to_string()));
  for lib in &spec.libraries {
    args.push(format!("-L{}", renderer.dir.join(&lib.search_path).display()));
  }
  for lib in &spec.libraries {
    args.push(format!("-l{}", lib.name));
  }

  let outcome = runner
    .run(&CommandSpec {
      program: spec.linker.clone(),
      args,
      cwd: renderer.dir.clone(),
    })
    .await?;

  if !outcome.success() {
    return Err(LinkError::LinkFailed {
      code: outcome.code,
      stderr: outcome.stderr_tail(),
    });
  }

  Ok(artifact)
}
