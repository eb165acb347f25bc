//! Package descriptors and the fixed dependency chain.

use std::path::{Path, PathBuf};

use serde::Serialize;
use thiserror::Error;

use crate::consts;

/// One third-party package in the build chain.
///
/// The position of a package in a chain is its ordinal in the dependency
/// sequence; the chain is declared in dependency order rather than solved,
/// so a package must be listed after everything it depends on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Package {
  /// Package name, also the directory name under the source root.
  pub name: String,

  /// Checkout directory of the package.
  pub dir: PathBuf,

  /// Target patch file, if the checkout carries one.
  pub patch: Option<PathBuf>,
}

impl Package {
  /// Describe the package at `<root>/<name>`, picking up the conventional
  /// patch file if it exists on disk.
  pub fn at_root(root: &Path, name: &str) -> Self {
    let dir = root.join(name);
    let patch_path = dir.join(consts::PATCH_FILE_NAME);
    let patch = patch_path.exists().then_some(patch_path);
    Self {
      name: name.to_string(),
      dir,
      patch,
    }
  }

  /// Whether this package's object tree feeds the final link.
  pub fn is_renderer(&self) -> bool {
    self.name == consts::RENDERER_PACKAGE
  }
}

/// Errors resolving a caller-requested package subset.
#[derive(Debug, Error)]
pub enum PackageError {
  /// A requested name is not part of the chain.
  #[error("unknown package: {0}")]
  Unknown(String),
}

/// The full fixed chain rooted at `root`, in dependency order.
pub fn default_chain(root: &Path) -> Vec<Package> {
  consts::PACKAGE_CHAIN
    .iter()
    .map(|name| Package::at_root(root, name))
    .collect()
}

/// Restrict `chain` to the requested names, preserving the caller's order.
///
/// The caller's order is honored as given, not re-sorted against the chain;
/// a caller asking for an order that violates the dependency sequence gets
/// exactly that order.
pub fn select(chain: &[Package], names: &[String]) -> Result<Vec<Package>, PackageError> {
  names
    .iter()
    .map(|name| {
      chain
        .iter()
        .find(|pkg| &pkg.name == name)
        .cloned()
        .ok_or_else(|| PackageError::Unknown(name.clone()))
    })
    .collect()
}
