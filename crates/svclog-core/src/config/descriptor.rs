//! The resolved logger configuration
//!
//! A [`ConfigDescriptor`] is parsed from `config.logger.yml`. Every field has a
//! default so a default file only needs to name what it changes; values are
//! kept as written and validated when the logger is built.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Megabytes a log file may grow to before it is rotated, when unset.
pub const DEFAULT_MAX_SIZE_MB: u64 = 100;

/// Logger configuration: record engine settings plus file rotation policy.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigDescriptor {
    /// Level, encoding and output settings
    #[serde(default)]
    pub engine: EngineConfig,

    /// Rotation policy for file outputs
    #[serde(default)]
    pub rotation: RotationConfig,
}

/// Settings of the structured record engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EngineConfig {
    /// Minimum enabled level: debug, info, warn, error, dpanic, panic or fatal
    pub level: String,

    /// Development mode makes `dpanic` records panic
    pub development: bool,

    /// Record encoding: `json` or `console`
    pub encoding: String,

    /// Omit the call site from records
    pub disable_caller: bool,

    /// Omit stack traces, otherwise attached to `error` records and above, or
    /// `warn` and above in development mode
    pub disable_stacktrace: bool,

    /// Record layout
    pub encoder: EncoderConfig,

    /// Where records are written: `stdout`, `stderr` or a file path
    pub output_paths: Vec<String>,

    /// Where write failures of the outputs above are reported
    pub error_output_paths: Vec<String>,

    /// Fields attached to every record
    pub initial_fields: BTreeMap<String, Value>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            development: false,
            encoding: "json".to_string(),
            disable_caller: false,
            disable_stacktrace: false,
            encoder: EncoderConfig::default(),
            output_paths: vec!["stderr".to_string()],
            error_output_paths: vec!["stderr".to_string()],
            initial_fields: BTreeMap::new(),
        }
    }
}

/// Keys and value formats used when encoding a record.
///
/// An empty key leaves that entry out of the record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EncoderConfig {
    pub message_key: String,
    pub level_key: String,
    pub time_key: String,
    pub name_key: String,
    pub caller_key: String,
    pub stacktrace_key: String,
    pub line_ending: String,

    /// `lowercase`, `capital`, `capital_color` or `color`
    pub level_format: String,

    /// `rfc3339`, `rfc3339_nanos`, `epoch`, `epoch_millis` or `epoch_nanos`
    pub time_format: String,
}

impl Default for EncoderConfig {
    fn default() -> Self {
        Self {
            message_key: "msg".to_string(),
            level_key: "level".to_string(),
            time_key: "ts".to_string(),
            name_key: "logger".to_string(),
            caller_key: "caller".to_string(),
            stacktrace_key: "stacktrace".to_string(),
            line_ending: "\n".to_string(),
            level_format: "lowercase".to_string(),
            time_format: "rfc3339".to_string(),
        }
    }
}

/// Size-based rotation policy for file outputs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RotationConfig {
    /// Megabytes before the file is rotated; 0 means [`DEFAULT_MAX_SIZE_MB`]
    pub max_size: u64,

    /// Days to keep rotated files; 0 keeps them regardless of age
    pub max_age: u32,

    /// Rotated files to keep; 0 keeps all of them. Takes precedence over
    /// `max_age` when both are set
    pub max_backups: usize,

    /// Gzip rotated files
    pub compress: bool,
}

impl Default for RotationConfig {
    fn default() -> Self {
        Self {
            max_size: DEFAULT_MAX_SIZE_MB,
            max_age: 0,
            max_backups: 0,
            compress: false,
        }
    }
}

impl RotationConfig {
    /// Rotation threshold in bytes.
    pub fn max_bytes(&self) -> u64 {
        let megabytes = if self.max_size == 0 {
            DEFAULT_MAX_SIZE_MB
        } else {
            self.max_size
        };
        megabytes.saturating_mul(1024 * 1024)
    }
}
