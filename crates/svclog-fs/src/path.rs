//! Path hint handling
//!
//! Callers hand svclog any path that lives next to the logger configuration,
//! typically the service's own config file. Only its directory is used.

use serde::Serialize;
use std::fmt;
use std::path::Path;

use crate::ConfigFile;

/// A configuration location, stored with `/` separators.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct ConfigPath(String);

impl ConfigPath {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self(path.as_ref().to_string_lossy().replace('\\', "/"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The entry `name` inside this directory.
    pub fn child(&self, name: &str) -> Self {
        let base = self.0.trim_end_matches('/');
        Self(format!("{base}/{name}"))
    }

    /// The directory this path lives in.
    ///
    /// A bare file name lives in `.`, a path directly under the root in `/`.
    /// A path ending in `/` already names a directory and is kept, minus the
    /// trailing separators.
    pub fn parent_dir(&self) -> Self {
        let Some(idx) = self.0.rfind('/') else {
            return Self(".".to_string());
        };
        match self.0[..idx].trim_end_matches('/') {
            "" => Self("/".to_string()),
            head => Self(head.to_string()),
        }
    }

    /// Whether anything is reachable at this path. Dangling links are not.
    pub fn exists(&self) -> bool {
        self.as_ref().exists()
    }

    pub fn is_file(&self) -> bool {
        self.as_ref().is_file()
    }
}

impl AsRef<Path> for ConfigPath {
    fn as_ref(&self) -> &Path {
        Path::new(&self.0)
    }
}

impl fmt::Display for ConfigPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The directory holding the logger configuration files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigDir {
    dir: ConfigPath,
}

impl ConfigDir {
    /// The directory of `hint`. The hint's file name is ignored:
    /// `/etc/app/service.yml` and `/etc/app/anything` both give `/etc/app`.
    pub fn from_hint(hint: impl AsRef<Path>) -> Self {
        Self {
            dir: ConfigPath::new(hint).parent_dir(),
        }
    }

    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self {
            dir: ConfigPath::new(dir),
        }
    }

    pub fn dir(&self) -> &ConfigPath {
        &self.dir
    }

    pub fn file(&self, file: ConfigFile) -> ConfigPath {
        self.dir.child(file.as_str())
    }

    /// Location of the mandatory `config.logger.yml`.
    pub fn default_file(&self) -> ConfigPath {
        self.file(ConfigFile::Default)
    }

    /// Location of the optional `config.logger.override.yml`.
    pub fn override_file(&self) -> ConfigPath {
        self.file(ConfigFile::Override)
    }
}
