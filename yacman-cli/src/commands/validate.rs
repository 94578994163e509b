//! Command to validate a configuration file against a schema.

use crate::error::CliError;
use crate::utils::GlobalOptions;
use clap::Args;
use std::path::PathBuf;

/// Validate a configuration file against a schema.
#[derive(Args)]
pub struct ValidateCommand {
    /// Configuration file to validate
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Schema file path or URL
    #[arg(long, value_name = "SOURCE")]
    pub schema: String,
}

impl ValidateCommand {
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        // Construction validates once a schema is configured
        global
            .builder(&self.file)?
            .schema_source(self.schema)
            .build()?;
        println!("Configuration is valid");
        Ok(())
    }
}
