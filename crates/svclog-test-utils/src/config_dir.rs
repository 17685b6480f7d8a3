//! [`TestConfigDir`] builder for configuration-resolution scenarios.

use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

const DEFAULT_FILE: &str = "config.logger.yml";
const OVERRIDE_FILE: &str = "config.logger.override.yml";

/// A temporary configuration directory with helpers for writing the logger
/// configuration files and reading back the logs they produce.
///
/// # Example
///
/// ```rust,no_run
/// use svclog_test_utils::TestConfigDir;
///
/// let dir = TestConfigDir::new();
/// dir.write_default("engine:\n  level: info\n");
/// dir.write_override("engine:\n  level: debug\n");
/// let hint = dir.hint();
/// ```
pub struct TestConfigDir {
    temp_dir: TempDir,
}

impl Default for TestConfigDir {
    fn default() -> Self {
        Self::new()
    }
}

impl TestConfigDir {
    /// Create an empty temporary directory.
    pub fn new() -> Self {
        Self {
            temp_dir: TempDir::new().unwrap(),
        }
    }

    /// Return the directory path.
    pub fn root(&self) -> &Path {
        self.temp_dir.path()
    }

    /// A path hint inside the directory, standing in for a service config file.
    ///
    /// The file itself is never created.
    pub fn hint(&self) -> PathBuf {
        self.root().join("service.yml")
    }

    /// Absolute path of `name` inside the directory.
    pub fn path(&self, name: &str) -> PathBuf {
        self.root().join(name)
    }

    /// Same as [`path`](Self::path), as a string for `output_paths`.
    pub fn path_str(&self, name: &str) -> String {
        self.path(name).to_string_lossy().into_owned()
    }

    /// Write `config.logger.yml`.
    pub fn write_default(&self, content: &str) {
        fs::write(self.path(DEFAULT_FILE), content).unwrap();
    }

    /// Write `config.logger.override.yml`.
    pub fn write_override(&self, content: &str) {
        fs::write(self.path(OVERRIDE_FILE), content).unwrap();
    }

    /// Write a default file that logs JSON at `level` into `log_name`.
    pub fn write_file_logger(&self, level: &str, log_name: &str) {
        self.write_default(&format!(
            "engine:\n  level: {level}\n  output_paths: [\"{}\"]\n  error_output_paths: [stderr]\n",
            self.path_str(log_name)
        ));
    }

    /// Read the log file `name`.
    ///
    /// # Panics
    /// Panics if the file cannot be read.
    pub fn read_log(&self, name: &str) -> String {
        let path = self.path(name);
        fs::read_to_string(&path)
            .unwrap_or_else(|e| panic!("Could not read log {}: {e}", path.display()))
    }

    /// Parse every line of the log file `name` as a JSON record.
    ///
    /// # Panics
    /// Panics if a line is not a complete JSON object.
    pub fn read_records(&self, name: &str) -> Vec<Value> {
        self.read_log(name)
            .lines()
            .map(|line| {
                serde_json::from_str(line)
                    .unwrap_or_else(|e| panic!("Malformed record {line:?}: {e}"))
            })
            .collect()
    }
}
