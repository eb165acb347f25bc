//! Build configuration for one orchestration run.

use std::time::Duration;

use crate::consts;

/// Immutable configuration threaded through every patch, build, and link
/// step of a run.
///
/// The build-kind is a free-form string (conventionally `release` or
/// `debug`); it selects the make target and the output subdirectory, so a
/// run with `debug` must reference `debug` everywhere and never fall back
/// to `release`.
#[derive(Debug, Clone)]
pub struct BuildConfig {
  /// Build variant selector, e.g. `release` or `debug`.
  pub kind: String,

  /// Platform identifier forwarded to each package build as `OS=<platform>`.
  pub platform: String,

  /// Forwarded as `USE_SYSTEM_LIBS=yes|no`.
  pub use_system_libs: bool,

  /// Optional wall-clock limit per package step. `None` means a hung
  /// underlying build blocks the run indefinitely.
  pub timeout: Option<Duration>,
}

impl Default for BuildConfig {
  fn default() -> Self {
    Self {
      kind: consts::DEFAULT_BUILD_KIND.to_string(),
      platform: consts::DEFAULT_PLATFORM.to_string(),
      use_system_libs: false,
      timeout: None,
    }
  }
}

impl BuildConfig {
  /// Config for the given build-kind, defaults for everything else.
  pub fn with_kind(kind: impl Into<String>) -> Self {
    Self {
      kind: kind.into(),
      ..Self::default()
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn default_kind_is_release() {
    let config = BuildConfig::default();
    assert_eq!(config.kind, "release");
    assert_eq!(config.platform, "kobo");
    assert!(!config.use_system_libs);
    assert!(config.timeout.is_none());
  }

  #[test]
  fn with_kind_overrides_only_kind() {
    let config = BuildConfig::with_kind("debug");
    assert_eq!(config.kind, "debug");
    assert_eq!(config.platform, "kobo");
  }
}
