//! YAML document loading

use serde::de::DeserializeOwned;

use crate::{Error, ConfigPath, Result, io};

/// Read and parse a YAML document into `T`.
pub fn load_document<T: DeserializeOwned>(path: &ConfigPath) -> Result<T> {
    let content = io::read_text(path)?;
    parse_document(&content, path)
}

/// Parse YAML `content` that was read from `path`.
///
/// `path` is only used to annotate errors.
pub fn parse_document<T: DeserializeOwned>(content: &str, path: &ConfigPath) -> Result<T> {
    serde_yaml::from_str(content).map_err(|e| Error::ConfigParse {
        path: path.as_ref().to_path_buf(),
        format: "YAML".into(),
        message: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use std::fs;
    use tempfile::TempDir;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Sample {
        name: String,
        count: i32,
    }

    #[test]
    fn load_yaml_document() {
        let temp = TempDir::new().unwrap();
        let file_path = temp.path().join("sample.yml");
        fs::write(&file_path, "name: test\ncount: 42\n").unwrap();

        let sample: Sample = load_document(&ConfigPath::new(&file_path)).unwrap();

        assert_eq!(
            sample,
            Sample {
                name: "test".into(),
                count: 42
            }
        );
    }

    #[test]
    fn parse_error_names_format_and_path() {
        let path = ConfigPath::new("/conf/config.logger.yml");

        let err = parse_document::<Sample>("name: [unclosed", &path).unwrap_err();

        let message = err.to_string();
        assert!(message.contains("YAML"), "got: {message}");
        assert!(message.contains("/conf/config.logger.yml"), "got: {message}");
    }

    #[test]
    fn type_mismatch_is_a_parse_error() {
        let path = ConfigPath::new("sample.yml");

        let err = parse_document::<Sample>("name: test\ncount: many\n", &path).unwrap_err();

        assert!(matches!(err, Error::ConfigParse { .. }));
    }
}
