#![deny(missing_docs, unsafe_code)]
#![warn(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

//! # yacman
//!
//! YAML configuration files shared safely between processes.
//!
//! A [`YamlConfigManager`] loads a YAML mapping from disk, keeps it in
//! memory in document order, and writes it back only while holding an
//! advisory lock on the file. Cooperating processes see each other's locks
//! as `lock.<filename>` sentinels next to the configuration file.
//!
//! ## Core Types
//!
//! - [`YamlConfigManager`] and [`ConfigManagerBuilder`]: the configuration
//!   object and how to construct it
//! - [`WritableScope`]: guard that holds the write lock for a scope
//! - [`AliasedConfigManager`]: lookups through alternative key names
//! - [`Schema`]: structural validation of configuration data
//! - [`Error`] and [`Result`]: error handling types
//! - [`Logger`] and [`LogLevel`]: logging infrastructure
//!
//! ## Examples
//!
//! ```
//! use yacman::YamlConfigManager;
//!
//! let dir = tempfile::tempdir().unwrap();
//! let path = dir.path().join("conf.yaml");
//! std::fs::write(&path, "x: 15\n").unwrap();
//!
//! let mut cfg = YamlConfigManager::from_file(&path).unwrap();
//! cfg.with_writable(|cfg| {
//!     cfg.set("y", "added");
//!     cfg.write()
//! })
//! .unwrap();
//!
//! let reread = YamlConfigManager::from_file(&path).unwrap();
//! assert_eq!(reread.get("y").unwrap().as_str(), Some("added"));
//! ```

pub mod alias;
pub mod codec;
pub mod error;
pub mod expand;
pub mod lock;
pub mod logging;
pub mod manager;
pub mod path;
pub mod schema;
pub mod select;

#[cfg(all(test, feature = "property-tests"))]
mod proptests;

// Re-export key types at crate root for convenience
pub use alias::{AliasSource, AliasStrictness, AliasedConfigManager};
pub use error::{Error, Result};
pub use lock::LockInfo;
pub use logging::{init_logger, LogLevel, Logger};
pub use manager::{
    deep_merge, ConfigManagerBuilder, WritableScope, YacAttMap, YamlConfigManager,
    DEFAULT_WAIT_MAX,
};
pub use schema::Schema;
pub use select::{select_config, ConfigSelector};
