//! Key/value pairs attached to records

use serde::Serialize;
use serde_json::Value;

/// A structured field.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Field {
    pub key: String,
    pub value: Value,
}

impl Field {
    /// Create a field from any serializable value.
    ///
    /// A value that fails to serialize is recorded as the error text.
    pub fn new(key: impl Into<String>, value: impl Serialize) -> Self {
        let value = serde_json::to_value(value)
            .unwrap_or_else(|e| Value::String(format!("<unserializable: {e}>")));
        Self {
            key: key.into(),
            value,
        }
    }
}

impl<K: Into<String>> From<(K, Value)> for Field {
    fn from((key, value): (K, Value)) -> Self {
        Self {
            key: key.into(),
            value,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn new_serializes_value() {
        let field = Field::new("attempt", 3);
        assert_eq!(field.value, Value::from(3));

        let field = Field::new("tags", vec!["a", "b"]);
        assert_eq!(field.value, serde_json::json!(["a", "b"]));
    }

    #[test]
    fn unserializable_value_becomes_text() {
        // JSON object keys must be strings
        let mut map = HashMap::new();
        map.insert(vec![1u8], "x");

        let field = Field::new("bad", &map);
        assert!(field.value.as_str().unwrap().starts_with("<unserializable"));
    }
}
