//! Object file exclusion rules for the final link.
//!
//! A generic build of the renderer emits object files the device artifact
//! must not carry (bundled font glyph tables, color-profile data). These
//! cannot be avoided at build time, so they are filtered out of the link
//! input by file name. Rules match the file name only, never the contents.

use regex::Regex;
use thiserror::Error;

use crate::consts;

/// A single file name match rule.
#[derive(Debug, Clone)]
pub enum MatchRule {
  /// The entire file name equals the string.
  Exact(String),
  /// The file name contains the string.
  Substring(String),
  /// The file name matches the compiled pattern.
  Pattern(Regex),
}

impl MatchRule {
  pub fn matches(&self, file_name: &str) -> bool {
    match self {
      MatchRule::Exact(name) => file_name == name,
      MatchRule::Substring(fragment) => file_name.contains(fragment),
      MatchRule::Pattern(regex) => regex.is_match(file_name),
    }
  }
}

/// Errors building an exclusion set.
#[derive(Debug, Error)]
pub enum ExcludeError {
  #[error("invalid exclusion pattern: {0}")]
  InvalidPattern(#[from] regex::Error),
}

/// An ordered set of exclusion rules.
#[derive(Debug, Clone, Default)]
pub struct ExcludeSet {
  rules: Vec<MatchRule>,
}

impl ExcludeSet {
  pub fn new(rules: Vec<MatchRule>) -> Self {
    Self { rules }
  }

  /// Substring rules for each fragment.
  pub fn from_substrings(fragments: &[&str]) -> Self {
    Self {
      rules: fragments
        .iter()
        .map(|f| MatchRule::Substring(f.to_string()))
        .collect(),
    }
  }

  /// Compile `pattern` and add it as a rule.
  pub fn with_pattern(mut self, pattern: &str) -> Result<Self, ExcludeError> {
    self.rules.push(MatchRule::Pattern(Regex::new(pattern)?));
    Ok(self)
  }

  /// The fixed exclusions for the renderer's device link.
  pub fn renderer_default() -> Self {
    Self::from_substrings(consts::RENDERER_EXCLUDES)
  }

  pub fn is_empty(&self) -> bool {
    self.rules.is_empty()
  }

  /// Whether `file_name` matches any rule.
  pub fn is_excluded(&self, file_name: &str) -> bool {
    self.rules.iter().any(|rule| rule.matches(file_name))
  }
}
