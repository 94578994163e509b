//! Choosing which configuration file to use.
//!
//! Tools built on this crate usually accept a config path on the command
//! line, fall back to one or more environment variables, and finally to a
//! default location. [`ConfigSelector`] encodes that precedence.

use std::env;
use std::path::PathBuf;

use crate::error::{Error, Result};
use crate::expand::expand_str;
use crate::path::absolutize;

/// The first of `names` that is set in the environment, with its value.
///
/// # Examples
///
/// ```
/// use yacman::select::first_env_var;
///
/// std::env::set_var("YACMAN_DOC_SECOND", "/etc/app.yaml");
/// let found = first_env_var(["YACMAN_DOC_FIRST_UNSET", "YACMAN_DOC_SECOND"]);
/// assert_eq!(
///     found,
///     Some(("YACMAN_DOC_SECOND".to_string(), "/etc/app.yaml".to_string()))
/// );
/// ```
pub fn first_env_var<I, S>(names: I) -> Option<(String, String)>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    names.into_iter().find_map(|name| {
        let name = name.as_ref();
        env::var(name).ok().map(|value| (name.to_string(), value))
    })
}

/// Pick a configuration file from an explicit path, environment variables
/// or a default, in that order.
///
/// # Examples
///
/// ```
/// use yacman::select::ConfigSelector;
///
/// let chosen = ConfigSelector::new()
///     .env_vars(["YACMAN_DOC_UNSET_CONFIG"])
///     .default_path("/etc/app/default.yaml")
///     .select()
///     .unwrap();
/// assert_eq!(chosen.unwrap().to_str(), Some("/etc/app/default.yaml"));
/// ```
#[derive(Debug, Clone)]
pub struct ConfigSelector {
    filepath: Option<String>,
    env_vars: Vec<String>,
    default_path: Option<PathBuf>,
    check_exist: bool,
    strict_env: bool,
}

impl Default for ConfigSelector {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigSelector {
    /// A selector with no candidates that requires chosen files to exist.
    #[must_use]
    pub fn new() -> Self {
        Self {
            filepath: None,
            env_vars: Vec::new(),
            default_path: None,
            check_exist: true,
            strict_env: false,
        }
    }

    /// An explicitly requested path; takes priority over everything else.
    #[must_use]
    pub fn filepath(mut self, path: impl Into<String>) -> Self {
        self.filepath = Some(path.into());
        self
    }

    /// Environment variables to consult, in priority order.
    #[must_use]
    pub fn env_vars<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.env_vars = names.into_iter().map(Into::into).collect();
        self
    }

    /// Fallback returned as given when nothing else applies.
    #[must_use]
    pub fn default_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.default_path = Some(path.into());
        self
    }

    /// Whether candidates must name an existing file.
    #[must_use]
    pub fn check_exist(mut self, check: bool) -> Self {
        self.check_exist = check;
        self
    }

    /// Fail instead of falling through when an environment variable is set
    /// but points at no file.
    #[must_use]
    pub fn strict_env(mut self, strict: bool) -> Self {
        self.strict_env = strict;
        self
    }

    /// Run the selection.
    ///
    /// Returns `None` when no candidate applies and no default was given.
    ///
    /// # Errors
    ///
    /// - [`Error::FileNotFound`] if an explicit path does not exist (with
    ///   `check_exist`), or a set environment variable points at no file
    ///   under `strict_env`
    pub fn select(&self) -> Result<Option<PathBuf>> {
        if let Some(requested) = &self.filepath {
            let path = PathBuf::from(expand_str(requested));
            if self.check_exist && !path.is_file() {
                return Err(Error::FileNotFound { path });
            }
            log::debug!("Using explicitly requested config: {}", path.display());
            return absolutize(&path).map(Some);
        }

        if let Some((name, value)) = first_env_var(&self.env_vars) {
            let path = PathBuf::from(expand_str(&value));
            if !self.check_exist || path.is_file() {
                log::debug!("Using config from ${name}: {}", path.display());
                return absolutize(&path).map(Some);
            }
            if self.strict_env && !value.is_empty() {
                log::error!("Environment variable ${name} does not point to any existing file");
                return Err(Error::FileNotFound { path });
            }
            log::debug!("${name} is set but {} is not a file", path.display());
        }

        if self.default_path.is_some() {
            log::debug!("No config found; using default");
        }
        Ok(self.default_path.clone())
    }
}

/// Shorthand for [`ConfigSelector`] with the common arguments.
///
/// # Errors
///
/// See [`ConfigSelector::select`].
pub fn select_config<S: AsRef<str>>(
    filepath: Option<&str>,
    env_vars: &[S],
    default_path: Option<PathBuf>,
) -> Result<Option<PathBuf>> {
    let mut selector =
        ConfigSelector::new().env_vars(env_vars.iter().map(|name| name.as_ref().to_string()));
    if let Some(path) = filepath {
        selector = selector.filepath(path);
    }
    if let Some(path) = default_path {
        selector = selector.default_path(path);
    }
    selector.select()
}
