//! Partial configuration parsed from `config.logger.override.yml`
//!
//! Every field is optional. Merging an overlay into a [`ConfigDescriptor`]
//! replaces only the fields the override file actually names:
//!
//! - a missing key or an explicit `null` keeps the default value
//! - any other value, including `""` and `[]`, replaces it
//! - `initial_fields` is merged key by key, override keys win; a key set to
//!   `null` keeps the default's value
//! - `encoder` is merged field by field

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

use super::descriptor::{ConfigDescriptor, EncoderConfig, EngineConfig, RotationConfig};

/// Override document with every field optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConfigOverlay {
    pub engine: Option<EngineOverlay>,
    pub rotation: Option<RotationOverlay>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EngineOverlay {
    pub level: Option<String>,
    pub development: Option<bool>,
    pub encoding: Option<String>,
    pub disable_caller: Option<bool>,
    pub disable_stacktrace: Option<bool>,
    pub encoder: Option<EncoderOverlay>,
    pub output_paths: Option<Vec<String>>,
    pub error_output_paths: Option<Vec<String>>,
    pub initial_fields: Option<BTreeMap<String, Value>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EncoderOverlay {
    pub message_key: Option<String>,
    pub level_key: Option<String>,
    pub time_key: Option<String>,
    pub name_key: Option<String>,
    pub caller_key: Option<String>,
    pub stacktrace_key: Option<String>,
    pub line_ending: Option<String>,
    pub level_format: Option<String>,
    pub time_format: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RotationOverlay {
    pub max_size: Option<u64>,
    pub max_age: Option<u32>,
    pub max_backups: Option<usize>,
    pub compress: Option<bool>,
}

impl ConfigOverlay {
    /// True when merging this overlay changes nothing.
    pub fn is_empty(&self) -> bool {
        self.engine.is_none() && self.rotation.is_none()
    }
}

fn overwrite<T: Clone>(slot: &mut T, value: &Option<T>) {
    if let Some(value) = value {
        *slot = value.clone();
    }
}

impl ConfigDescriptor {
    /// Merge an override on top of this configuration.
    ///
    /// Fields absent from `overlay` keep their current value.
    pub fn merge(&mut self, overlay: &ConfigOverlay) {
        if let Some(engine) = &overlay.engine {
            self.engine.merge(engine);
        }
        if let Some(rotation) = &overlay.rotation {
            self.rotation.merge(rotation);
        }
    }

    /// Return a copy of this configuration with `overlay` merged on top.
    pub fn merged(mut self, overlay: &ConfigOverlay) -> Self {
        self.merge(overlay);
        self
    }
}

impl EngineConfig {
    fn merge(&mut self, other: &EngineOverlay) {
        overwrite(&mut self.level, &other.level);
        overwrite(&mut self.development, &other.development);
        overwrite(&mut self.encoding, &other.encoding);
        overwrite(&mut self.disable_caller, &other.disable_caller);
        overwrite(&mut self.disable_stacktrace, &other.disable_stacktrace);
        if let Some(encoder) = &other.encoder {
            self.encoder.merge(encoder);
        }
        overwrite(&mut self.output_paths, &other.output_paths);
        overwrite(&mut self.error_output_paths, &other.error_output_paths);
        if let Some(fields) = &other.initial_fields {
            for (key, value) in fields.iter().filter(|(_, value)| !value.is_null()) {
                self.initial_fields.insert(key.clone(), value.clone());
            }
        }
    }
}

impl EncoderConfig {
    fn merge(&mut self, other: &EncoderOverlay) {
        overwrite(&mut self.message_key, &other.message_key);
        overwrite(&mut self.level_key, &other.level_key);
        overwrite(&mut self.time_key, &other.time_key);
        overwrite(&mut self.name_key, &other.name_key);
        overwrite(&mut self.caller_key, &other.caller_key);
        overwrite(&mut self.stacktrace_key, &other.stacktrace_key);
        overwrite(&mut self.line_ending, &other.line_ending);
        overwrite(&mut self.level_format, &other.level_format);
        overwrite(&mut self.time_format, &other.time_format);
    }
}

impl RotationConfig {
    fn merge(&mut self, other: &RotationOverlay) {
        overwrite(&mut self.max_size, &other.max_size);
        overwrite(&mut self.max_age, &other.max_age);
        overwrite(&mut self.max_backups, &other.max_backups);
        overwrite(&mut self.compress, &other.compress);
    }
}
