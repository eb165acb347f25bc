//! Implementation of the `kobuild build` command.
//!
//! Patches and builds the package chain in dependency order, then links
//! the renderer's objects into the device artifact. Fails fast on the
//! first broken package; artifacts of packages that already built are
//! left in place so a re-run can pass a reduced subset.

use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::Args;
use tracing::info;

use kobuild_lib::config::BuildConfig;
use kobuild_lib::consts;
use kobuild_lib::orchestrate::orchestrate;
use kobuild_lib::runner::SystemRunner;

use crate::output::{self, OutputFormat};

#[derive(Args)]
pub struct BuildArgs {
  /// Packages to build, in the given order (default: the full chain)
  pub packages: Vec<String>,

  /// Build-kind, conventionally "release" or "debug"
  #[arg(long, default_value = consts::DEFAULT_BUILD_KIND)]
  pub kind: String,

  /// Platform identifier forwarded to each package build
  #[arg(long, default_value = consts::DEFAULT_PLATFORM)]
  pub platform: String,

  /// Build against system libraries instead of the sibling checkouts
  #[arg(long)]
  pub system_libs: bool,

  /// Wall-clock limit per package, e.g. "30m" (default: none)
  #[arg(long, value_parser = humantime::parse_duration)]
  pub timeout: Option<Duration>,

  /// Checkout root containing the package directories
  #[arg(long, default_value = ".")]
  pub root: PathBuf,

  /// Output format
  #[arg(long, value_enum, default_value_t)]
  pub format: OutputFormat,
}

/// Execute the build command.
pub fn cmd_build(args: BuildArgs) -> Result<()> {
  let config = BuildConfig {
    kind: args.kind,
    platform: args.platform,
    use_system_libs: args.system_libs,
    timeout: args.timeout,
  };
  let only = (!args.packages.is_empty()).then_some(args.packages.as_slice());

  if !args.format.is_json() {
    output::print_info(&format!(
      "Building {} for {} ({})",
      if only.is_some() { "selected packages" } else { "the full chain" },
      config.platform,
      config.kind
    ));
  }

  let started = Instant::now();
  let rt = tokio::runtime::Runtime::new().context("Failed to create async runtime")?;
  let report = rt
    .block_on(orchestrate(&SystemRunner, &args.root, &config, only))
    .context("Build failed")?;
  let elapsed = started.elapsed();

  info!(built = report.sequence.built.len(), ?elapsed, "build complete");

  if args.format.is_json() {
    return output::print_json(&report);
  }

  output::print_success("Build complete");
  output::print_stat("Packages built", &report.sequence.built.join(", "));
  if !report.sequence.patched.is_empty() {
    output::print_stat("Patches applied", &report.sequence.patched.join(", "));
  }
  if let Some(artifact) = &report.artifact {
    output::print_stat("Artifact", &artifact.display().to_string());
  }
  output::print_stat("Elapsed", &output::format_duration(elapsed));

  Ok(())
}
