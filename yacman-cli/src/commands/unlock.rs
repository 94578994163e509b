//! Command to remove a stale lock sentinel.

use crate::error::CliError;
use crate::utils::GlobalOptions;
use clap::Args;
use std::path::PathBuf;
use yacman::lock;
use yacman::path::absolutize;

/// Remove a stale lock left behind by a crashed process.
///
/// Only use this when the holder is known to be gone: removing a live lock
/// lets two writers race.
#[derive(Args)]
pub struct UnlockCommand {
    /// Configuration file whose lock should be removed
    #[arg(value_name = "FILE")]
    pub file: PathBuf,
}

impl UnlockCommand {
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        let path = absolutize(&self.file)?;
        if let Some(info) = lock::read_lock_info(&path) {
            log::warn!("Removing lock held by pid {} since {}", info.pid, info.created_at);
        }
        if lock::release(&path)? {
            global.status(&format!("Removed {}", lock::lock_path_for(&path).display()));
        } else {
            global.status(&format!("{} is not locked", path.display()));
        }
        Ok(())
    }
}
