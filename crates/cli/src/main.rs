//! kobuild: cross-build orchestrator for the Kobo renderer chain.

mod cmd;
mod output;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

/// Cross-build orchestrator for the Kobo document renderer chain
#[derive(Parser)]
#[command(name = "kobuild")]
#[command(author, version, about, long_about = None)]
struct Cli {
  #[command(subcommand)]
  command: Commands,
}

#[derive(Subcommand)]
enum Commands {
  /// Patch, build, and link the package chain
  Build(cmd::BuildArgs),

  /// Show the fixed package chain in dependency order
  Chain(cmd::ChainArgs),
}

fn main() {
  tracing_subscriber::fmt()
    .with_env_filter(EnvFilter::from_default_env())
    .without_time()
    .init();

  let cli = Cli::parse();

  let result = match cli.command {
    Commands::Build(args) => cmd::cmd_build(args),
    Commands::Chain(args) => cmd::cmd_chain(args),
  };

  if let Err(err) = result {
    output::print_error(&format!("{:#}", err));
    std::process::exit(1);
  }
}
