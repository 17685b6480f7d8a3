//! Fixed configuration file names.

use std::fmt;

/// The two configuration files looked up next to a path hint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFile {
    /// `config.logger.yml`, must exist
    Default,
    /// `config.logger.override.yml`, applied on top of the default when present
    Override,
}

impl ConfigFile {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Default => "config.logger.yml",
            Self::Override => "config.logger.override.yml",
        }
    }
}

impl fmt::Display for ConfigFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_matches_file_name() {
        assert_eq!(ConfigFile::Default.to_string(), "config.logger.yml");
        assert_eq!(ConfigFile::Override.to_string(), "config.logger.override.yml");
    }
}
