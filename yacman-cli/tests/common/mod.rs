//! Common test utilities for CLI integration tests.
//!
//! This module provides an isolated temporary directory and helpers for
//! running the `yacman` binary against files inside it.

use assert_cmd::Command;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Test environment with an isolated directory for configuration files.
pub struct TestEnv {
    /// Temporary directory (kept alive for the duration of the test)
    #[allow(dead_code)]
    temp_dir: TempDir,
    /// Path to the temporary directory
    pub temp_path: PathBuf,
}

#[allow(dead_code)]
impl TestEnv {
    /// Create a new test environment.
    pub fn new() -> Self {
        let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
        let temp_path = temp_dir.path().to_path_buf();
        Self {
            temp_dir,
            temp_path,
        }
    }

    /// Get a bare command builder without pre-configured flags.
    pub fn command_bare(&self) -> Command {
        let mut cmd = Command::cargo_bin("yacman").expect("Failed to find yacman binary");
        cmd.env_remove("YACMAN_WAIT_MAX").env_remove("YACMAN_LOG_MODE");
        cmd
    }

    /// A command with a short lock wait pre-configured.
    pub fn command(&self) -> Command {
        let mut cmd = self.command_bare();
        cmd.arg("--wait-max").arg("0.5");
        cmd
    }

    /// Get the temp path.
    pub fn path(&self) -> &Path {
        &self.temp_path
    }

    /// Write a file into the environment and return its path.
    pub fn write_file(&self, name: &str, contents: &str) -> PathBuf {
        let path = self.temp_path.join(name);
        std::fs::write(&path, contents).expect("Failed to write test file");
        path
    }

    /// Read a file back as text.
    pub fn read_file(&self, name: &str) -> String {
        std::fs::read_to_string(self.temp_path.join(name)).expect("Failed to read test file")
    }

    /// Path of the lock sentinel for `name`.
    pub fn sentinel(&self, name: &str) -> PathBuf {
        self.temp_path.join(format!("lock.{name}"))
    }

    /// Run `get` and return trimmed stdout.
    pub fn get(&self, file: &Path, key: &str) -> String {
        let output = self
            .command()
            .arg("get")
            .arg(file)
            .arg(key)
            .output()
            .expect("Failed to run get command");

        assert!(
            output.status.success(),
            "get failed: {}",
            String::from_utf8_lossy(&output.stderr)
        );
        String::from_utf8(output.stdout)
            .expect("Invalid UTF-8 in output")
            .trim()
            .to_string()
    }
}

impl Default for TestEnv {
    fn default() -> Self {
        Self::new()
    }
}
