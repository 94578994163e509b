//! Command to print a single value.

use crate::error::CliError;
use crate::utils::{lookup, parse_key_path, render, GlobalOptions, OutputFormat};
use clap::Args;
use std::path::PathBuf;

/// Print the value under a key.
#[derive(Args)]
pub struct GetCommand {
    /// Configuration file to read
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Key to look up; dots address nested mappings (`a.b.c`)
    #[arg(value_name = "KEY")]
    pub key: String,

    /// Expand `~` and environment variables in string values
    #[arg(long)]
    pub expand: bool,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Yaml)]
    pub format: OutputFormat,
}

impl GetCommand {
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        let path = parse_key_path(&self.key)?;
        let cfg = global.open(&self.file)?;
        let data = if self.expand {
            cfg.exp()
        } else {
            cfg.data().clone()
        };

        let value = lookup(&data, &path).ok_or_else(|| yacman::Error::KeyNotFound {
            key: self.key.clone(),
        })?;
        println!("{}", render(value, self.format)?);
        Ok(())
    }
}
