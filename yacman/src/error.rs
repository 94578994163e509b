//! Error types for the yacman library.
//!
//! Every fallible operation in the crate returns [`Result`], whose error
//! side is the single [`Error`] enum defined here, using `thiserror` for
//! ergonomic error handling.

use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use thiserror::Error;

/// Result type alias for operations that may fail with a yacman error.
///
/// # Examples
///
/// ```
/// use yacman::{Error, Result};
///
/// fn example_operation() -> Result<usize> {
///     Ok(3)
/// }
/// ```
pub type Result<T> = std::result::Result<T, Error>;

/// The main error type for the yacman library.
#[derive(Debug, Error)]
pub enum Error {
    /// A file that was required to exist does not.
    #[error("no such file: {}", path.display())]
    FileNotFound {
        /// The missing file.
        path: PathBuf,
    },

    /// A contended lock was not released in time.
    #[error("lock timeout after {waited:?}: {} is held by another process", lock_path.display())]
    LockTimeout {
        /// The lock sentinel that stayed in place.
        lock_path: PathBuf,
        /// How long acquisition waited before giving up.
        waited: Duration,
    },

    /// A write was attempted without holding the lock, or against a file
    /// locked by someone else.
    #[error("write denied for {}: {reason}", path.display())]
    WriteDenied {
        /// The file that was not written.
        path: PathBuf,
        /// Why the write was refused.
        reason: String,
    },

    /// The YAML text could not be parsed or rendered.
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// The document parsed, but its top level is not a mapping.
    #[error("{origin} does not contain a YAML mapping (found {found})")]
    NotAMapping {
        /// Where the document came from.
        origin: String,
        /// The kind of value that was found instead.
        found: String,
    },

    /// A mapping key could not be represented as a string.
    #[error("unsupported mapping key: {key}")]
    UnsupportedKey {
        /// Rendering of the offending key.
        key: String,
    },

    /// The configuration did not pass schema validation.
    #[error("schema validation failed at '{path}': {message}")]
    SchemaValidation {
        /// Location of the failing value inside the document.
        path: String,
        /// What was wrong with it.
        message: String,
    },

    /// The schema document itself is not a valid JSON Schema.
    #[error("invalid schema: {message}")]
    InvalidSchema {
        /// What the schema compiler rejected.
        message: String,
    },

    /// Validation was requested but no schema is available.
    #[error("no schema available for validation")]
    NoSchema,

    /// An operation needing a backing file was called on a memory-only object.
    #[error("no valid file path set on this object")]
    NoFilepath,

    /// The requested key is not present.
    #[error("key not found: {key}")]
    KeyNotFound {
        /// The key that was looked up.
        key: String,
    },

    /// The filesystem refused access.
    #[error("permission denied: {}", path.display())]
    PermissionDenied {
        /// The path that could not be accessed.
        path: PathBuf,
    },

    /// Fetching a remote document failed.
    #[error("failed to fetch {url}: {message}")]
    Network {
        /// The URL that was requested.
        url: String,
        /// Description of the failure.
        message: String,
    },

    /// An I/O error occurred.
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        /// The path being accessed.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: io::Error,
    },

    /// No alias or key is defined for the given name.
    #[error("undefined alias: {name}")]
    UndefinedAlias {
        /// The name that could not be resolved.
        name: String,
    },

    /// An alias table or alias argument was malformed.
    #[error("alias error: {0}")]
    Alias(String),
}

impl Error {
    /// Classify an I/O error raised while touching `path`.
    ///
    /// Missing files and permission failures get their own variants so
    /// callers can match on them; everything else is wrapped in
    /// [`Error::Io`].
    ///
    /// # Examples
    ///
    /// ```
    /// use std::io;
    /// use std::path::Path;
    /// use yacman::Error;
    ///
    /// let err = Error::io(Path::new("/x"), io::Error::from(io::ErrorKind::NotFound));
    /// assert!(err.is_not_found());
    /// ```
    #[must_use]
    pub fn io(path: &Path, err: io::Error) -> Self {
        match err.kind() {
            io::ErrorKind::NotFound => Self::FileNotFound {
                path: path.to_path_buf(),
            },
            io::ErrorKind::PermissionDenied => Self::PermissionDenied {
                path: path.to_path_buf(),
            },
            _ => Self::Io {
                path: path.to_path_buf(),
                source: err,
            },
        }
    }

    /// Check if error indicates a file does not exist.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::FileNotFound { .. })
    }

    /// Check if error is permission-related.
    #[must_use]
    pub fn is_permission_denied(&self) -> bool {
        matches!(self, Self::PermissionDenied { .. })
    }

    /// Check if error is a lock timeout, which callers may retry.
    #[must_use]
    pub fn is_lock_timeout(&self) -> bool {
        matches!(self, Self::LockTimeout { .. })
    }
}
