//! Test utilities for kobuild-lib.
//!
//! [`ScriptedRunner`] stands in for the real process runner in unit and
//! integration tests: it records every command it is asked to run and
//! returns scripted outcomes instead of spawning anything.

use std::sync::Mutex;
use std::time::Duration;

use crate::runner::{CommandOutcome, CommandRunner, CommandSpec};

type Predicate = Box<dyn Fn(&CommandSpec) -> bool + Send + Sync>;

struct Rule {
  predicate: Predicate,
  outcome: CommandOutcome,
  delay: Option<Duration>,
}

/// A fake [`CommandRunner`] with scripted outcomes.
///
/// Rules are checked in registration order; the first match wins. Commands
/// matching no rule succeed with empty output.
#[derive(Default)]
pub struct ScriptedRunner {
  rules: Vec<Rule>,
  calls: Mutex<Vec<CommandSpec>>,
}

impl ScriptedRunner {
  pub fn new() -> Self {
    Self::default()
  }

  /// Fail with `code` and the given stderr for any command matching `predicate`.
  pub fn fail_if(
    mut self,
    predicate: impl Fn(&CommandSpec) -> bool + Send + Sync + 'static,
    code: i32,
    stderr: &str,
  ) -> Self {
    self.rules.push(Rule {
      predicate: Box::new(predicate),
      outcome: CommandOutcome {
        code: Some(code),
        stdout: String::new(),
        stderr: stderr.to_string(),
      },
      delay: None,
    });
    self
  }

  /// Succeed for any command matching `predicate` only after `delay`.
  /// Useful with a paused tokio clock to exercise timeout handling.
  pub fn delay_if(
    mut self,
    predicate: impl Fn(&CommandSpec) -> bool + Send + Sync + 'static,
    delay: Duration,
  ) -> Self {
    self.rules.push(Rule {
      predicate: Box::new(predicate),
      outcome: CommandOutcome {
        code: Some(0),
        stdout: String::new(),
        stderr: String::new(),
      },
      delay: Some(delay),
    });
    self
  }

  /// Every command run so far, in order.
  pub fn calls(&self) -> Vec<CommandSpec> {
    self.calls.lock().unwrap().clone()
  }

  /// Commands run in the given directory, rendered as single lines.
  pub fn calls_in_dir(&self, dir_suffix: &str) -> Vec<String> {
    self
      .calls()
      .iter()
      .filter(|spec| spec.cwd.ends_with(dir_suffix))
      .map(|spec| spec.display())
      .collect()
  }
}

impl CommandRunner for ScriptedRunner {
  async fn run(&self, spec: &CommandSpec) -> std::io::Result<CommandOutcome> {
    self.calls.lock().unwrap().push(spec.clone());

    for rule in &self.rules {
      if (rule.predicate)(spec) {
        if let Some(delay) = rule.delay {
          tokio::time::sleep(delay).await;
        }
        return Ok(rule.outcome.clone());
      }
    }

    Ok(CommandOutcome {
      code: Some(0),
      stdout: String::new(),
      stderr: String::new(),
    })
  }
}
