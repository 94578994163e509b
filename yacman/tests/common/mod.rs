//! Common test utilities for integration tests.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use tempfile::TempDir;
use yacman::YamlConfigManager;

/// Short lock wait so contention tests finish quickly.
#[allow(dead_code)]
pub const SHORT_WAIT: Duration = Duration::from_millis(300);

/// A temporary directory holding configuration files.
pub struct ConfigDir {
    dir: TempDir,
}

#[allow(dead_code)]
impl ConfigDir {
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().unwrap(),
        }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Write `contents` to `name` and return its full path.
    pub fn file(&self, name: &str, contents: &str) -> PathBuf {
        let path = self.dir.path().join(name);
        fs::write(&path, contents).unwrap();
        path
    }

    /// Path of the lock sentinel for `name`.
    pub fn sentinel(&self, name: &str) -> PathBuf {
        self.dir.path().join(format!("lock.{name}"))
    }
}

/// Open a read-only object on `path` with a short lock wait.
#[allow(dead_code)]
pub fn open(path: &Path) -> YamlConfigManager {
    YamlConfigManager::builder()
        .filepath(path)
        .wait_max(SHORT_WAIT)
        .build()
        .unwrap()
}

/// Whether files can be created in `dir`; false for read-only directories
/// unless running with elevated privileges.
#[allow(dead_code)]
pub fn can_create_in(dir: &Path) -> bool {
    let probe = dir.join(".probe");
    match fs::File::create(&probe) {
        Ok(_) => {
            let _ = fs::remove_file(&probe);
            true
        }
        Err(_) => false,
    }
}
