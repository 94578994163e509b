//! Sentinel-file locking for shared configuration files.
//!
//! A file `conf.yaml` is locked by the existence of `lock.conf.yaml` in
//! the same directory. Creation is atomic (`create_new`), so two
//! cooperating processes can never both believe they hold the lock.
//! Processes that ignore the convention are not stopped.

use std::ffi::OsString;
use std::fs::{self, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};
use std::thread;
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Prefix prepended to the base file name to form the sentinel name.
pub const LOCK_PREFIX: &str = "lock.";

/// How often a contended lock is re-checked.
pub const POLL_INTERVAL: Duration = Duration::from_millis(250);

/// Diagnostic record written into a lock sentinel.
///
/// The lock is the file's existence; this body only helps a human decide
/// whether a leftover sentinel is stale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LockInfo {
    /// Process ID of the lock holder.
    pub pid: u32,
    /// RFC 3339 timestamp when the lock was created.
    pub created_at: String,
}

impl LockInfo {
    fn current() -> Self {
        Self {
            pid: std::process::id(),
            created_at: chrono::Utc::now().to_rfc3339(),
        }
    }
}

/// Derive the sentinel path for `path`. Pure; touches no files.
///
/// # Examples
///
/// ```
/// use std::path::Path;
/// use yacman::lock::lock_path_for;
///
/// assert_eq!(
///     lock_path_for(Path::new("/etc/app/conf.yaml")),
///     Path::new("/etc/app/lock.conf.yaml")
/// );
/// ```
#[must_use]
pub fn lock_path_for(path: &Path) -> PathBuf {
    let mut name = OsString::from(LOCK_PREFIX);
    if let Some(base) = path.file_name() {
        name.push(base);
    }
    match path.parent() {
        Some(dir) => dir.join(name),
        None => PathBuf::from(name),
    }
}

/// Whether a sentinel currently exists for `path`.
#[must_use]
pub fn is_locked(path: &Path) -> bool {
    lock_path_for(path).exists()
}

/// Acquire the lock for `path`, polling for at most `wait_max`.
///
/// Returns the sentinel path on success.
///
/// # Errors
///
/// - [`Error::LockTimeout`] if the sentinel is still present after `wait_max`
/// - [`Error::PermissionDenied`] if the directory refuses the sentinel
/// - [`Error::FileNotFound`] if the target directory does not exist
pub fn acquire(path: &Path, wait_max: Duration) -> Result<PathBuf> {
    let lock_path = lock_path_for(path);
    let start = Instant::now();
    let mut announced = false;

    loop {
        match OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&lock_path)
        {
            Ok(mut file) => {
                if let Err(e) = serde_yaml::to_writer(&mut file, &LockInfo::current()) {
                    // An empty sentinel is still a valid lock.
                    log::debug!("Could not record lock info in {}: {e}", lock_path.display());
                }
                log::debug!("Acquired lock: {}", lock_path.display());
                return Ok(lock_path);
            }
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists => {
                let waited = start.elapsed();
                if waited >= wait_max {
                    return Err(Error::LockTimeout { lock_path, waited });
                }
                if !announced {
                    log::info!(
                        "Waiting up to {wait_max:?} for lock {} to be released",
                        lock_path.display()
                    );
                    announced = true;
                }
                thread::sleep(POLL_INTERVAL.min(wait_max - waited));
            }
            Err(e) => return Err(Error::io(&lock_path, e)),
        }
    }
}

/// Remove the sentinel for `path`.
///
/// Returns `true` if a sentinel was removed and `false` if there was none.
///
/// # Errors
///
/// Returns [`Error::PermissionDenied`] or [`Error::Io`] if the sentinel
/// exists but cannot be removed.
pub fn release(path: &Path) -> Result<bool> {
    let lock_path = lock_path_for(path);
    match fs::remove_file(&lock_path) {
        Ok(()) => {
            log::debug!("Released lock: {}", lock_path.display());
            Ok(true)
        }
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            log::debug!("No lock to release: {}", lock_path.display());
            Ok(false)
        }
        Err(e) => Err(Error::io(&lock_path, e)),
    }
}

/// Read the diagnostic record of the lock for `path`, if any.
///
/// Returns `None` when the file is unlocked or its sentinel carries no
/// readable record (for example one created by another tool).
#[must_use]
pub fn read_lock_info(path: &Path) -> Option<LockInfo> {
    let contents = fs::read_to_string(lock_path_for(path)).ok()?;
    serde_yaml::from_str(&contents).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_lock_path_for_relative_name() {
        assert_eq!(
            lock_path_for(Path::new("conf.yaml")),
            PathBuf::from("lock.conf.yaml")
        );
    }

    #[test]
    fn test_lock_path_for_nested() {
        assert_eq!(
            lock_path_for(Path::new("a/b/c.yml")),
            PathBuf::from("a/b/lock.c.yml")
        );
    }

    #[test]
    fn test_acquire_and_release() {
        let dir = TempDir::new().unwrap();
        let target = dir.path().join("conf.yaml");

        let lock = acquire(&target, Duration::from_secs(1)).unwrap();
        assert_eq!(lock, dir.path().join("lock.conf.yaml"));
        assert!(is_locked(&target));

        assert!(release(&target).unwrap());
        assert!(!is_locked(&target));
    }

    #[test]
    fn test_release_absent_lock_is_not_an_error() {
        let dir = TempDir::new().unwrap();
        let target = dir.path().join("conf.yaml");
        assert!(!release(&target).unwrap());
    }

    #[test]
    fn test_contended_lock_times_out() {
        let dir = TempDir::new().unwrap();
        let target = dir.path().join("conf.yaml");
        acquire(&target, Duration::ZERO).unwrap();

        let started = Instant::now();
        let err = acquire(&target, Duration::from_millis(300)).unwrap_err();
        assert!(err.is_lock_timeout());
        assert!(started.elapsed() >= Duration::from_millis(300));
    }

    #[test]
    fn test_zero_wait_fails_immediately_when_locked() {
        let dir = TempDir::new().unwrap();
        let target = dir.path().join("conf.yaml");
        acquire(&target, Duration::ZERO).unwrap();

        let err = acquire(&target, Duration::ZERO).unwrap_err();
        assert!(matches!(err, Error::LockTimeout { .. }));
    }

    #[test]
    fn test_acquire_waits_for_release() {
        let dir = TempDir::new().unwrap();
        let target = dir.path().join("conf.yaml");
        acquire(&target, Duration::ZERO).unwrap();

        let releaser = {
            let target = target.clone();
            thread::spawn(move || {
                thread::sleep(Duration::from_millis(300));
                release(&target).unwrap();
            })
        };

        acquire(&target, Duration::from_secs(5)).unwrap();
        releaser.join().unwrap();
        assert!(is_locked(&target));
    }

    #[test]
    fn test_lock_info_recorded() {
        let dir = TempDir::new().unwrap();
        let target = dir.path().join("conf.yaml");
        assert!(read_lock_info(&target).is_none());

        acquire(&target, Duration::ZERO).unwrap();
        let info = read_lock_info(&target).unwrap();
        assert_eq!(info.pid, std::process::id());
        assert!(!info.created_at.is_empty());
    }

    #[test]
    fn test_acquire_in_missing_directory() {
        let dir = TempDir::new().unwrap();
        let target = dir.path().join("missing").join("conf.yaml");
        let err = acquire(&target, Duration::ZERO).unwrap_err();
        assert!(err.is_not_found());
    }
}
