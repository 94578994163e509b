//! CLI command implementations.
//!
//! This module contains the implementations of all CLI commands:
//! - `show`: Print a configuration file
//! - `get`: Print the value under a (dotted) key
//! - `set`: Set a key inside a writable scope and write the file
//! - `unset`: Remove a key inside a writable scope and write the file
//! - `validate`: Validate a file against a schema
//! - `lock_status`: Report whether a file is locked and by whom
//! - `unlock`: Remove a stale lock sentinel
//! - `completions`: Generate shell completion scripts

pub mod completions;
pub mod get;
pub mod lock_status;
pub mod set;
pub mod show;
pub mod unlock;
pub mod unset;
pub mod validate;

pub use completions::CompletionsCommand;
pub use get::GetCommand;
pub use lock_status::LockStatusCommand;
pub use set::SetCommand;
pub use show::ShowCommand;
pub use unlock::UnlockCommand;
pub use unset::UnsetCommand;
pub use validate::ValidateCommand;
