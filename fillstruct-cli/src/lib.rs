//! The `fillstruct` command: completes Go struct literals across a module.
//!
//! Loads the packages selected by a pattern, resolves `--type` and
//! `--default` specifiers, then completes every selected file on a pool of
//! worker threads. Changed files are written in place, or shown as a diff,
//! a file list, or JSON.

pub mod cli;
pub mod config;
pub mod output;
mod run;
mod workers;

pub use cli::{Cli, OutputMode};
pub use run::{run, RunSummary};
