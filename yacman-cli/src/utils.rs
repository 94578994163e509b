//! Utility functions for CLI operations.
//!
//! This module provides helpers shared across commands: opening
//! configuration files with the global options applied, addressing nested
//! values by dotted key, and rendering output.

use crate::error::CliError;
use clap::ValueEnum;
use serde_yaml::{Mapping, Value};
use std::path::Path;
use std::time::Duration;
use yacman::{ConfigManagerBuilder, YamlConfigManager, DEFAULT_WAIT_MAX};

/// Global CLI options shared across all commands.
#[derive(Debug, Clone, Default)]
pub struct GlobalOptions {
    /// Enable verbose output.
    #[allow(dead_code)] // Mirrors the flag handed to the logger
    pub verbose: bool,

    /// Suppress non-essential output.
    pub quiet: bool,

    /// Maximum seconds to wait for a contended lock.
    pub wait_max: Option<f64>,

    /// Read files without taking the read lock.
    pub skip_read_lock: bool,
}

impl GlobalOptions {
    /// The lock wait to use, validated.
    pub fn wait_max(&self) -> Result<Duration, CliError> {
        match self.wait_max {
            None => Ok(DEFAULT_WAIT_MAX),
            Some(secs) => Duration::try_from_secs_f64(secs).map_err(|_| {
                CliError::InvalidArguments(format!(
                    "--wait-max must be a non-negative number of seconds, got {secs}"
                ))
            }),
        }
    }

    /// A builder for `file` with the global lock options applied.
    pub fn builder(&self, file: &Path) -> Result<ConfigManagerBuilder, CliError> {
        Ok(YamlConfigManager::builder()
            .filepath(file)
            .wait_max(self.wait_max()?)
            .skip_read_lock(self.skip_read_lock))
    }

    /// Open `file` read-only.
    pub fn open(&self, file: &Path) -> Result<YamlConfigManager, CliError> {
        Ok(self.builder(file)?.build()?)
    }

    /// Print a status line unless `--quiet` was given.
    pub fn status(&self, message: &str) {
        if !self.quiet {
            eprintln!("{message}");
        }
    }
}

/// Output format for printed values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// YAML text
    #[default]
    Yaml,
    /// Pretty-printed JSON
    Json,
}

/// Split a dotted key into its segments.
///
/// `a.b.c` addresses `c` inside `b` inside `a`. Empty segments are
/// rejected.
pub fn parse_key_path(key: &str) -> Result<Vec<&str>, CliError> {
    let segments: Vec<&str> = key.split('.').collect();
    if segments.iter().any(|s| s.is_empty()) {
        return Err(CliError::InvalidArguments(format!(
            "invalid key '{key}': empty segment"
        )));
    }
    Ok(segments)
}

/// Follow `path` through nested mappings.
pub fn lookup<'a>(data: &'a Mapping, path: &[&str]) -> Option<&'a Value> {
    let (first, rest) = path.split_first()?;
    let mut current = data.get(*first)?;
    for segment in rest {
        current = current.as_mapping()?.get(*segment)?;
    }
    Some(current)
}

/// Set the value at `path`, creating intermediate mappings as needed.
///
/// Returns the previous value. Fails if an intermediate value exists and
/// is not a mapping.
pub fn insert_at(
    data: &mut Mapping,
    path: &[&str],
    value: Value,
) -> Result<Option<Value>, CliError> {
    let Some((last, parents)) = path.split_last() else {
        return Err(CliError::InvalidArguments("empty key".to_string()));
    };

    let mut current = data;
    for (depth, segment) in parents.iter().enumerate() {
        let entry = current
            .entry(Value::from(*segment))
            .or_insert_with(|| Value::Mapping(Mapping::new()));
        current = entry.as_mapping_mut().ok_or_else(|| {
            CliError::InvalidArguments(format!(
                "'{}' is not a mapping",
                path[..=depth].join(".")
            ))
        })?;
    }
    Ok(current.insert(Value::from(*last), value))
}

/// Remove the value at `path`, returning it.
pub fn remove_at(data: &mut Mapping, path: &[&str]) -> Option<Value> {
    let (last, parents) = path.split_last()?;
    let mut current = data;
    for segment in parents {
        current = current.get_mut(*segment)?.as_mapping_mut()?;
    }
    current.shift_remove(*last)
}

/// Interpret command-line text as a YAML value.
///
/// `5` becomes a number, `true` a boolean, `[a, b]` a sequence. Text
/// that does not parse is kept as a plain string.
pub fn parse_value(text: &str) -> Result<Value, CliError> {
    match serde_yaml::from_str::<Value>(text) {
        Ok(value) => Ok(yacman::codec::normalize_keys(value)?),
        Err(_) => Ok(Value::String(text.to_string())),
    }
}

/// Render a value for printing.
///
/// Plain strings in YAML format are printed bare so shell callers get the
/// value without quoting.
pub fn render(value: &Value, format: OutputFormat) -> Result<String, CliError> {
    match format {
        OutputFormat::Yaml => match value {
            Value::String(s) => Ok(s.clone()),
            other => serde_yaml::to_string(other)
                .map(|s| s.trim_end().to_string())
                .map_err(|e| CliError::Output(e.to_string())),
        },
        OutputFormat::Json => {
            serde_json::to_string_pretty(value).map_err(|e| CliError::Output(e.to_string()))
        }
    }
}
