//! Command to remove a value and write the file.

use crate::error::CliError;
use crate::utils::{parse_key_path, remove_at, GlobalOptions};
use clap::Args;
use std::path::PathBuf;

/// Remove a key and write the file.
#[derive(Args)]
pub struct UnsetCommand {
    /// Configuration file to edit
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Key to remove; dots address nested mappings
    #[arg(value_name = "KEY")]
    pub key: String,
}

impl UnsetCommand {
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        let path = parse_key_path(&self.key)?;
        let mut cfg = global.open(&self.file)?;

        let mut scope = cfg.writable_scope()?;
        if remove_at(scope.data_mut(), &path).is_none() {
            return Err(yacman::Error::KeyNotFound {
                key: self.key.clone(),
            }
            .into());
        }
        let written = scope.write()?;
        scope.close()?;

        global.status(&format!("Removed '{}' from {}", self.key, written.display()));
        Ok(())
    }
}
