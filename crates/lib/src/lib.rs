//! kobuild-lib: orchestration logic for the Kobo renderer build chain
//!
//! This crate provides the pieces that turn a tree of third-party library
//! checkouts into a single `libmupdf.so` for the device:
//! - `package`: the fixed dependency-ordered chain of packages
//! - `patch`: target patch application per package
//! - `builder`: invoking each package's own build
//! - `sequence`: fail-fast ordered sequencing of patch + build
//! - `link`: object collection, exclusion filtering, and the final link

pub mod builder;
pub mod config;
pub mod consts;
pub mod exclude;
pub mod link;
pub mod orchestrate;
pub mod package;
pub mod patch;
pub mod runner;
pub mod sequence;
pub mod util;
