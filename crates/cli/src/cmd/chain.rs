//! Implementation of the `kobuild chain` command.
//!
//! Prints the fixed package chain in dependency order, marking packages
//! whose checkout currently carries a target patch.

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;

use kobuild_lib::consts;
use kobuild_lib::package::default_chain;

use crate::output::{self, OutputFormat};

#[derive(Args)]
pub struct ChainArgs {
  /// Checkout root containing the package directories
  #[arg(long, default_value = ".")]
  pub root: PathBuf,

  /// Output format
  #[arg(long, value_enum, default_value_t)]
  pub format: OutputFormat,
}

/// Execute the chain command.
pub fn cmd_chain(args: ChainArgs) -> Result<()> {
  let chain = default_chain(&args.root);

  if args.format.is_json() {
    return output::print_json(&chain);
  }

  for (position, pkg) in chain.iter().enumerate() {
    let marker = if pkg.patch.is_some() {
      format!("  [{}]", consts::PATCH_FILE_NAME)
    } else {
      String::new()
    };
    println!("{:>2}. {}{}", position + 1, pkg.name, marker);
  }

  Ok(())
}
