//! Two-stage configuration resolution
//!
//! The `ConfigResolver` reads the mandatory default file, then merges the
//! override file on top of it when one exists.

use std::path::Path;

use serde::Serialize;
use svclog_fs::{ConfigDir, ConfigPath, load_document};

use super::descriptor::ConfigDescriptor;
use super::overlay::ConfigOverlay;
use crate::Result;

/// A resolved configuration together with the files it was read from.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolvedConfig {
    /// The merged configuration
    pub descriptor: ConfigDescriptor,

    /// Files read, in merge order
    pub sources: Vec<ConfigPath>,
}

/// Resolves logger configuration from the directory of a path hint.
///
/// Configuration is loaded from two sources:
/// 1. `config.logger.yml` - required, fully populated with defaults
/// 2. `config.logger.override.yml` - optional, only the fields it names apply
pub struct ConfigResolver {
    paths: ConfigDir,
}

impl ConfigResolver {
    /// Create a resolver for the directory containing `hint`.
    ///
    /// # Arguments
    ///
    /// * `hint` - Any path inside the configuration directory; its file name is ignored
    pub fn new(hint: impl AsRef<Path>) -> Self {
        Self {
            paths: ConfigDir::from_hint(hint),
        }
    }

    /// Create a resolver that reads directly from `dir`.
    pub fn with_dir(dir: impl AsRef<Path>) -> Self {
        Self {
            paths: ConfigDir::new(dir),
        }
    }

    /// The configuration file locations this resolver reads.
    pub fn paths(&self) -> &ConfigDir {
        &self.paths
    }

    /// Check if the default configuration exists
    pub fn has_default(&self) -> bool {
        self.paths.default_file().is_file()
    }

    /// Check if an override configuration exists
    pub fn has_override(&self) -> bool {
        self.paths.override_file().exists()
    }

    /// Resolve the merged configuration.
    ///
    /// A missing or malformed default file is an error. A missing override
    /// file is not: the default configuration is then returned as parsed.
    pub fn resolve(&self) -> Result<ConfigDescriptor> {
        Ok(self.resolve_with_sources()?.descriptor)
    }

    /// Resolve the merged configuration and report which files were read.
    pub fn resolve_with_sources(&self) -> Result<ResolvedConfig> {
        let default_path = self.paths.default_file();
        tracing::debug!(path = %default_path, "loading default logger config");
        let descriptor: ConfigDescriptor = load_document(&default_path)?;

        let override_path = self.paths.override_file();
        if !override_path.exists() {
            tracing::debug!(path = %override_path, "no override logger config, skipping");
            return Ok(ResolvedConfig {
                descriptor,
                sources: vec![default_path],
            });
        }

        tracing::debug!(path = %override_path, "loading override logger config");
        let overlay: Option<ConfigOverlay> = load_document(&override_path)?;
        let descriptor = descriptor.merged(&overlay.unwrap_or_default());

        Ok(ResolvedConfig {
            descriptor,
            sources: vec![default_path, override_path],
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ErrorKind;
    use tempfile::TempDir;

    #[test]
    fn resolve_fails_when_default_missing() {
        let temp_dir = TempDir::new().unwrap();
        let resolver = ConfigResolver::with_dir(temp_dir.path());

        assert!(!resolver.has_default());

        let err = resolver.resolve().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Read);
        assert!(err.to_string().contains("config.logger.yml"));
    }

    #[test]
    fn resolve_fails_when_default_malformed() {
        let temp_dir = TempDir::new().unwrap();
        std::fs::write(
            temp_dir.path().join("config.logger.yml"),
            "engine: [level: info\n",
        )
        .unwrap();

        let err = ConfigResolver::with_dir(temp_dir.path()).resolve().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Parse);
    }

    #[test]
    fn override_directory_is_a_read_error() {
        let temp_dir = TempDir::new().unwrap();
        std::fs::write(temp_dir.path().join("config.logger.yml"), "engine: {}\n").unwrap();
        std::fs::create_dir(temp_dir.path().join("config.logger.override.yml")).unwrap();

        let resolver = ConfigResolver::with_dir(temp_dir.path());
        assert!(resolver.has_override());

        let err = resolver.resolve().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Read);
    }

    #[test]
    fn override_with_unknown_key_is_a_parse_error() {
        let temp_dir = TempDir::new().unwrap();
        std::fs::write(temp_dir.path().join("config.logger.yml"), "engine: {}\n").unwrap();
        std::fs::write(
            temp_dir.path().join("config.logger.override.yml"),
            "engine:\n  lvl: debug\n",
        )
        .unwrap();

        let err = ConfigResolver::with_dir(temp_dir.path()).resolve().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Parse);
        assert!(err.to_string().contains("config.logger.override.yml"));
    }
}
