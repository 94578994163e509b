//! Library exports for yacman-cli.
//!
//! This module exports the CLI structure so integration tests and
//! documentation tooling can inspect it.

pub mod cli;
pub mod commands;
pub mod error;
pub mod utils;

pub use cli::Cli;
