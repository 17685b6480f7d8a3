//! File reads used during configuration resolution

use std::fs;

use crate::{Error, ConfigPath, Result};

/// Read the full text content of a file.
pub fn read_text(path: &ConfigPath) -> Result<String> {
    let content = fs::read_to_string(path).map_err(|e| Error::io(path.as_ref(), e))?;
    tracing::debug!(path = %path, bytes = content.len(), "read config file");
    Ok(content)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn read_text_reports_path_on_missing_file() {
        let dir = tempdir().unwrap();
        let path = ConfigPath::new(dir.path().join("missing.yml"));

        let err = read_text(&path).unwrap_err();

        assert!(matches!(err, Error::Io { .. }));
        assert!(err.to_string().contains("missing.yml"));
    }

    #[test]
    fn read_text_fails_on_directory() {
        let dir = tempdir().unwrap();
        let path = ConfigPath::new(dir.path());

        assert!(read_text(&path).is_err());
    }
}
