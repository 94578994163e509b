//! Command to print a configuration file.

use crate::error::CliError;
use crate::utils::{render, GlobalOptions, OutputFormat};
use clap::Args;
use serde_yaml::Value;
use std::path::PathBuf;

/// Print a configuration file.
#[derive(Args)]
pub struct ShowCommand {
    /// Configuration file to print
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Expand `~` and environment variables in string values
    #[arg(long)]
    pub expand: bool,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Yaml)]
    pub format: OutputFormat,
}

impl ShowCommand {
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        let cfg = global.open(&self.file)?;
        let data = if self.expand {
            cfg.exp()
        } else {
            cfg.data().clone()
        };
        println!("{}", render(&Value::Mapping(data), self.format)?);
        Ok(())
    }
}
