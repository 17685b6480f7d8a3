//! Error types for svclog

/// Result type for svclog operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while resolving configuration or building a logger
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Reading or parsing a configuration file failed
    #[error(transparent)]
    Fs(#[from] svclog_fs::Error),

    /// Level name is not one of the known levels
    #[error("invalid level {level:?}: expected one of debug, info, warn, error, dpanic, panic, fatal")]
    InvalidLevel { level: String },

    /// Encoding name is not `json` or `console`
    #[error("invalid encoding {encoding:?}: expected json or console")]
    InvalidEncoding { encoding: String },

    /// An encoder option has an unknown value
    #[error("invalid {option} {value:?}: expected one of {expected}")]
    InvalidFormat {
        option: &'static str,
        value: String,
        expected: &'static str,
    },

    /// No output paths are configured
    #[error("no output paths configured")]
    NoOutputs,

    /// An output path is malformed
    #[error("invalid output path {path:?}: {reason}")]
    InvalidOutput { path: String, reason: String },

    /// An output file could not be opened
    #[error("cannot open output {path}: {source}")]
    OpenOutput {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Which stage of logger initialization failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// A configuration file could not be read
    Read,
    /// A configuration file is not a valid document
    Parse,
    /// The merged configuration was rejected while building the logger
    Build,
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Fs(svclog_fs::Error::Io { .. }) => ErrorKind::Read,
            Self::Fs(svclog_fs::Error::ConfigParse { .. }) => ErrorKind::Parse,
            _ => ErrorKind::Build,
        }
    }

    pub(crate) fn invalid_format(
        option: &'static str,
        value: &str,
        expected: &'static str,
    ) -> Self {
        Self::InvalidFormat {
            option,
            value: value.to_string(),
            expected,
        }
    }
}
