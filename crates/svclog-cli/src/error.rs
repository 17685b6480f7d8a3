//! Error types for svclog-cli

/// Result type for CLI operations
pub type Result<T> = std::result::Result<T, CliError>;

/// Errors that can occur in CLI operations
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// Configuration could not be resolved or the logger could not be built
    #[error(transparent)]
    Config(#[from] svclog::Error),

    /// Outputs could not be flushed
    #[error(transparent)]
    Flush(#[from] svclog::FlushError),

    /// Serializing the resolved configuration failed
    #[error("Failed to render configuration: {0}")]
    Render(String),

    /// User-facing error with a message
    #[error("{message}")]
    User { message: String },
}

impl CliError {
    /// Create a new user error with the given message
    pub fn user(message: impl Into<String>) -> Self {
        Self::User {
            message: message.into(),
        }
    }

    /// Process exit status for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Config(_) => svclog::CONFIG_EXIT_CODE,
            _ => 1,
        }
    }
}

impl From<serde_json::Error> for CliError {
    fn from(e: serde_json::Error) -> Self {
        Self::Render(e.to_string())
    }
}

impl From<serde_yaml::Error> for CliError {
    fn from(e: serde_yaml::Error) -> Self {
        Self::Render(e.to_string())
    }
}
