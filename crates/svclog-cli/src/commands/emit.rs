//! Emit command implementation

use std::path::Path;

use serde_json::Value;
use svclog::{Field, Level};

use crate::error::{CliError, Result};

/// Run the emit command
pub fn run_emit(
    hint: &Path,
    level: &str,
    name: Option<&str>,
    fields: &[String],
    message: &str,
) -> Result<()> {
    let level: Level = level.parse().map_err(|e: svclog::Error| CliError::user(e.to_string()))?;
    let fields = fields
        .iter()
        .map(|field| parse_field(field))
        .collect::<Result<Vec<_>>>()?;

    // Bootstraps like a service: configuration failures exit with status 2
    let logger = svclog::init_or_exit(hint);
    let logger = match name {
        Some(name) => logger.named(name),
        None => logger,
    };
    tracing::debug!(%level, fields = fields.len(), "emitting record");

    logger.log(level, message, &fields);
    logger.flush()?;
    Ok(())
}

/// Parse `key=value`. The value is read as JSON when it is valid JSON, so
/// `3` and `true` keep their types; anything else is a string.
fn parse_field(field: &str) -> Result<Field> {
    let (key, raw) = field
        .split_once('=')
        .ok_or_else(|| CliError::user(format!("Invalid field '{field}': expected key=value")))?;
    if key.is_empty() {
        return Err(CliError::user(format!("Invalid field '{field}': empty key")));
    }
    let value = serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()));
    Ok(Field::from((key, value)))
}
