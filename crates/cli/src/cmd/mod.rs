mod build;
mod chain;

pub use build::{BuildArgs, cmd_build};
pub use chain::{ChainArgs, cmd_chain};
