//! Command to report the lock state of a file.

use crate::error::CliError;
use crate::utils::GlobalOptions;
use clap::Args;
use std::path::PathBuf;
use yacman::lock;
use yacman::path::absolutize;

/// Report whether a file is locked.
#[derive(Args)]
pub struct LockStatusCommand {
    /// Configuration file to check
    #[arg(value_name = "FILE")]
    pub file: PathBuf,
}

impl LockStatusCommand {
    pub fn execute(self, _global: &GlobalOptions) -> Result<(), CliError> {
        let path = absolutize(&self.file)?;
        if !lock::is_locked(&path) {
            println!("unlocked");
            return Ok(());
        }

        println!("locked: {}", lock::lock_path_for(&path).display());
        match lock::read_lock_info(&path) {
            Some(info) => println!("holder: pid {} since {}", info.pid, info.created_at),
            None => println!("holder: unknown"),
        }
        Ok(())
    }
}
