//! CLI structure and command definitions.
//!
//! This module defines the main CLI structure using clap's derive macros,
//! including global options and subcommands.

use crate::commands::{
    CompletionsCommand, GetCommand, LockStatusCommand, SetCommand, ShowCommand, UnlockCommand,
    UnsetCommand, ValidateCommand,
};
use clap::{Parser, Subcommand};

/// Command-line tool for inspecting and editing lock-protected YAML files.
#[derive(Parser)]
#[command(name = "yacman")]
#[command(version, about = "Inspect and edit lock-protected YAML configuration files", long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(long, global = true)]
    pub verbose: bool,

    /// Suppress non-essential output
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Maximum time to wait for a locked file (in seconds)
    #[arg(long, value_name = "SECONDS", global = true, env = "YACMAN_WAIT_MAX")]
    pub wait_max: Option<f64>,

    /// Read files without taking the read lock
    #[arg(long, global = true)]
    pub skip_read_lock: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Available CLI commands.
#[derive(Subcommand)]
pub enum Command {
    /// Print a configuration file
    Show(ShowCommand),

    /// Print the value under a key
    Get(GetCommand),

    /// Set a key and write the file
    Set(SetCommand),

    /// Remove a key and write the file
    Unset(UnsetCommand),

    /// Validate a configuration file against a schema
    Validate(ValidateCommand),

    /// Report whether a file is locked
    LockStatus(LockStatusCommand),

    /// Remove a stale lock left behind by a crashed process
    Unlock(UnlockCommand),

    /// Generate shell completion scripts
    Completions(CompletionsCommand),
}
