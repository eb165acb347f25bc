//! Process invocation behind a narrow, fakeable interface.
//!
//! Every external tool the orchestrator touches (patch, make, the cross
//! linker) goes through [`CommandRunner`], so sequencing and link logic can
//! be exercised against scripted outcomes without a toolchain installed.

use std::path::{Path, PathBuf};

use tracing::debug;

/// A single external command: program, arguments, working directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
  pub program: String,
  pub args: Vec<String>,
  pub cwd: PathBuf,
}

impl CommandSpec {
  pub fn new(program: impl Into<String>, args: &[&str], cwd: &Path) -> Self {
    Self {
      program: program.into(),
      args: args.iter().map(|a| a.to_string()).collect(),
      cwd: cwd.to_path_buf(),
    }
  }

  /// One-line rendering for logs and error messages.
  pub fn display(&self) -> String {
    let mut line = self.program.clone();
    for arg in &self.args {
      line.push(' ');
      line.push_str(arg);
    }
    line
  }
}

/// Outcome of a completed command, with captured output.
#[derive(Debug, Clone)]
pub struct CommandOutcome {
  /// Exit code, if the process exited normally.
  pub code: Option<i32>,
  pub stdout: String,
  pub stderr: String,
}

impl CommandOutcome {
  pub fn success(&self) -> bool {
    self.code == Some(0)
  }

  /// The last few stderr lines, for error messages that should stay short.
  pub fn stderr_tail(&self) -> String {
    const TAIL_LINES: usize = 8;
    let lines: Vec<&str> = self.stderr.lines().collect();
    let start = lines.len().saturating_sub(TAIL_LINES);
    lines[start..].join("\n")
  }
}

/// Runs external commands. Implemented by [`SystemRunner`] for real builds
/// and by `util::testutil::ScriptedRunner` in tests.
pub trait CommandRunner {
  fn run(&self, spec: &CommandSpec) -> impl Future<Output = std::io::Result<CommandOutcome>>;
}

/// Runs commands via `tokio::process`, capturing output.
#[derive(Debug, Default)]
pub struct SystemRunner;

impl CommandRunner for SystemRunner {
  async fn run(&self, spec: &CommandSpec) -> std::io::Result<CommandOutcome> {
    debug!(cmd = %spec.display(), cwd = %spec.cwd.display(), "spawning process");

    // The sequencer may drop this future on timeout; the child must die
    // with it, or an orphaned build keeps writing into the package tree
    // while the operator acts on the failure.
    let output = tokio::process::Command::new(&spec.program)
      .args(&spec.args)
      .current_dir(&spec.cwd)
      .kill_on_drop(true)
      .output()
      .await?;

    let outcome = CommandOutcome {
      code: output.status.code(),
      stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
      stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
    };

    if !outcome.success() && !outcome.stderr.is_empty() {
      debug!(stderr = %outcome.stderr, "command stderr");
    }

    Ok(outcome)
  }
}
