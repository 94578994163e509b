//! Command to set a value and write the file.

use crate::error::CliError;
use crate::utils::{insert_at, parse_key_path, parse_value, GlobalOptions};
use clap::Args;
use std::path::PathBuf;

/// Set a key and write the file.
#[derive(Args)]
pub struct SetCommand {
    /// Configuration file to edit
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Key to set; dots address nested mappings, created as needed
    #[arg(value_name = "KEY")]
    pub key: String,

    /// New value, parsed as YAML (`5`, `true`, `[a, b]`, or plain text)
    #[arg(value_name = "VALUE")]
    pub value: String,

    /// Create the file if it does not exist
    #[arg(long)]
    pub create: bool,
}

impl SetCommand {
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        let path = parse_key_path(&self.key)?;
        let value = parse_value(&self.value)?;

        let mut cfg = global.builder(&self.file)?.create_file(self.create).build()?;
        let mut scope = cfg.writable_scope()?;
        insert_at(scope.data_mut(), &path, value)?;
        let written = scope.write()?;
        scope.close()?;

        global.status(&format!("Set '{}' in {}", self.key, written.display()));
        Ok(())
    }
}
