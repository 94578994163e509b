//! Main entry point for the yacman CLI.
//!
//! This is the command-line interface for lock-protected YAML configuration
//! files. It provides commands for:
//! - `show` / `get`: reading files and values
//! - `set` / `unset`: editing values under the file's write lock
//! - `validate`: checking a file against a schema
//! - `lock-status` / `unlock`: inspecting and clearing lock sentinels

mod cli;
mod commands;
mod error;
mod utils;

use clap::Parser;
use cli::Cli;
use utils::GlobalOptions;

fn main() {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Initialize logging based on verbosity
    let _level = yacman::init_logger(cli.verbose, cli.quiet);

    let global = GlobalOptions {
        verbose: cli.verbose,
        quiet: cli.quiet,
        wait_max: cli.wait_max,
        skip_read_lock: cli.skip_read_lock,
    };

    let result = match cli.command {
        cli::Command::Show(cmd) => cmd.execute(&global),
        cli::Command::Get(cmd) => cmd.execute(&global),
        cli::Command::Set(cmd) => cmd.execute(&global),
        cli::Command::Unset(cmd) => cmd.execute(&global),
        cli::Command::Validate(cmd) => cmd.execute(&global),
        cli::Command::LockStatus(cmd) => cmd.execute(&global),
        cli::Command::Unlock(cmd) => cmd.execute(&global),
        cli::Command::Completions(cmd) => cmd.execute(&global),
    };

    // Handle errors and set exit code
    match result {
        Ok(()) => std::process::exit(0),
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(e.exit_code());
        }
    }
}
