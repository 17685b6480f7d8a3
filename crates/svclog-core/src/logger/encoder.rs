//! Record encoding
//!
//! [`Encoder`] is the event format of the record layer. Two layouts are
//! supported:
//!
//! - `json`: one object per line, keys in the order time, level, name, caller,
//!   message, then bound fields and call fields, then the stack trace
//! - `console`: the same entries separated by tabs, with the fields rendered
//!   as a trailing JSON object and the stack trace on the following lines

use chrono::{DateTime, SecondsFormat, Utc};
use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;
use serde_json::Value;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use tracing::field::{Field as TracingField, Visit};
use tracing::{Event, Subscriber};
use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::{FmtContext, FormatEvent, FormatFields};
use tracing_subscriber::registry::LookupSpan;

use super::field::Field;
use super::handle::RECORD_TARGET;
use super::level::Level;
use crate::config::EncoderConfig;
use crate::{Error, Result};

const COLOR_RESET: &str = "\x1b[0m";

/// Record layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Encoding {
    Json,
    Console,
}

impl FromStr for Encoding {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "json" => Ok(Self::Json),
            "console" => Ok(Self::Console),
            _ => Err(Error::InvalidEncoding {
                encoding: s.to_string(),
            }),
        }
    }
}

/// How the level is rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LevelFormat {
    Lowercase,
    Capital,
    CapitalColor,
    Color,
}

impl FromStr for LevelFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "lowercase" => Ok(Self::Lowercase),
            "capital" => Ok(Self::Capital),
            "capital_color" => Ok(Self::CapitalColor),
            "color" => Ok(Self::Color),
            _ => Err(Error::invalid_format(
                "level_format",
                s,
                "lowercase, capital, capital_color, color",
            )),
        }
    }
}

/// How the timestamp is rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeFormat {
    /// RFC 3339 with millisecond precision
    Rfc3339,
    /// RFC 3339 with nanosecond precision
    Rfc3339Nanos,
    /// Floating point seconds since the Unix epoch
    Epoch,
    EpochMillis,
    EpochNanos,
}

impl FromStr for TimeFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "rfc3339" => Ok(Self::Rfc3339),
            "rfc3339_nanos" => Ok(Self::Rfc3339Nanos),
            "epoch" => Ok(Self::Epoch),
            "epoch_millis" => Ok(Self::EpochMillis),
            "epoch_nanos" => Ok(Self::EpochNanos),
            _ => Err(Error::invalid_format(
                "time_format",
                s,
                "rfc3339, rfc3339_nanos, epoch, epoch_millis, epoch_nanos",
            )),
        }
    }
}

/// A record ready to be encoded.
#[derive(Debug)]
pub(crate) struct Record<'a> {
    pub time: DateTime<Utc>,
    pub level: Level,
    pub name: Option<&'a str>,
    pub caller: Option<&'a str>,
    pub message: &'a str,
    /// Bound fields followed by call fields
    pub fields: &'a [Field],
    pub stacktrace: Option<&'a str>,
}

/// Name scope and bound fields applied to `tracing` events that did not come
/// from a [`Logger`](crate::Logger) call.
#[derive(Debug, Clone, Default)]
pub(crate) struct Scope {
    pub name: Option<Arc<str>>,
    pub fields: Arc<[Field]>,
    pub add_caller: bool,
}

/// Turns records into bytes according to the configured layout.
#[derive(Debug, Clone)]
pub struct Encoder {
    encoding: Encoding,
    level_format: LevelFormat,
    time_format: TimeFormat,
    keys: EncoderConfig,
    scope: Scope,
}

impl Encoder {
    /// Validate `encoding` and the encoder options.
    pub fn new(encoding: &str, config: &EncoderConfig) -> Result<Self> {
        Ok(Self {
            encoding: encoding.parse()?,
            level_format: config.level_format.parse()?,
            time_format: config.time_format.parse()?,
            keys: config.clone(),
            scope: Scope::default(),
        })
    }

    /// The same layout, applying `scope` to foreign events.
    pub(crate) fn scoped(&self, scope: Scope) -> Self {
        Self {
            scope,
            ..self.clone()
        }
    }

    pub fn encoding(&self) -> Encoding {
        self.encoding
    }

    /// Append the encoded record, including its line ending, to `buf`.
    pub(crate) fn encode(&self, record: &Record<'_>, buf: &mut Vec<u8>) -> serde_json::Result<()> {
        match self.encoding {
            Encoding::Json => serde_json::to_writer(&mut *buf, &JsonRecord {
                encoder: self,
                record,
            })?,
            Encoding::Console => self.encode_console(record, buf)?,
        }
        if let Some(trace) = record.stacktrace.filter(|_| self.has_stacktrace_console()) {
            buf.push(b'\n');
            buf.extend_from_slice(trace.trim_end().as_bytes());
        }
        buf.extend_from_slice(self.keys.line_ending.as_bytes());
        Ok(())
    }

    fn encode_console(&self, record: &Record<'_>, buf: &mut Vec<u8>) -> serde_json::Result<()> {
        let keys = &self.keys;
        let mut columns: Vec<String> = Vec::with_capacity(5);

        if !keys.time_key.is_empty() {
            columns.push(match self.time_value(record.time) {
                Value::String(text) => text,
                other => other.to_string(),
            });
        }
        if !keys.level_key.is_empty() {
            columns.push(self.level_text(record.level));
        }
        if !keys.name_key.is_empty() {
            columns.extend(record.name.map(str::to_string));
        }
        if !keys.caller_key.is_empty() {
            columns.extend(record.caller.map(str::to_string));
        }
        if !keys.message_key.is_empty() {
            columns.push(record.message.to_string());
        }

        buf.extend_from_slice(columns.join("\t").as_bytes());
        if !record.fields.is_empty() {
            buf.push(b'\t');
            serde_json::to_writer(&mut *buf, &FieldObject(record))?;
        }
        Ok(())
    }

    fn has_stacktrace_console(&self) -> bool {
        self.encoding == Encoding::Console && !self.keys.stacktrace_key.is_empty()
    }

    fn level_text(&self, level: Level) -> String {
        match self.level_format {
            LevelFormat::Lowercase => level.as_str().to_string(),
            LevelFormat::Capital => level.as_capital_str().to_string(),
            LevelFormat::CapitalColor => {
                format!("{}{}{}", level.color(), level.as_capital_str(), COLOR_RESET)
            }
            LevelFormat::Color => format!("{}{}{}", level.color(), level.as_str(), COLOR_RESET),
        }
    }

    fn time_value(&self, time: DateTime<Utc>) -> Value {
        match self.time_format {
            TimeFormat::Rfc3339 => Value::from(time.to_rfc3339_opts(SecondsFormat::Millis, true)),
            TimeFormat::Rfc3339Nanos => {
                Value::from(time.to_rfc3339_opts(SecondsFormat::Nanos, true))
            }
            TimeFormat::Epoch => Value::from(
                time.timestamp() as f64 + f64::from(time.timestamp_subsec_nanos()) / 1e9,
            ),
            TimeFormat::EpochMillis => Value::from(time.timestamp_millis()),
            TimeFormat::EpochNanos => Value::from(time.timestamp_nanos_opt().unwrap_or(i64::MAX)),
        }
    }
}

struct JsonRecord<'a> {
    encoder: &'a Encoder,
    record: &'a Record<'a>,
}

impl Serialize for JsonRecord<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let keys = &self.encoder.keys;
        let record = self.record;
        let mut map = serializer.serialize_map(None)?;

        if !keys.time_key.is_empty() {
            map.serialize_entry(&keys.time_key, &self.encoder.time_value(record.time))?;
        }
        if !keys.level_key.is_empty() {
            map.serialize_entry(&keys.level_key, &self.encoder.level_text(record.level))?;
        }
        if !keys.name_key.is_empty() {
            if let Some(name) = record.name {
                map.serialize_entry(&keys.name_key, name)?;
            }
        }
        if !keys.caller_key.is_empty() {
            if let Some(caller) = record.caller {
                map.serialize_entry(&keys.caller_key, caller)?;
            }
        }
        if !keys.message_key.is_empty() {
            map.serialize_entry(&keys.message_key, record.message)?;
        }
        for field in record.fields {
            map.serialize_entry(&field.key, &field.value)?;
        }
        if !keys.stacktrace_key.is_empty() {
            if let Some(trace) = record.stacktrace {
                map.serialize_entry(&keys.stacktrace_key, trace)?;
            }
        }
        map.end()
    }
}

struct FieldObject<'a>(&'a Record<'a>);

impl Serialize for FieldObject<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        for field in self.0.fields {
            map.serialize_entry(&field.key, &field.value)?;
        }
        map.end()
    }
}

impl<S, N> FormatEvent<S, N> for Encoder
where
    S: Subscriber + for<'span> LookupSpan<'span>,
    N: for<'w> FormatFields<'w> + 'static,
{
    fn format_event(
        &self,
        _ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &Event<'_>,
    ) -> fmt::Result {
        let metadata = event.metadata();
        let own = metadata.target() == RECORD_TARGET;
        let mut visitor = EventVisitor::new(own);
        event.record(&mut visitor);

        let level = visitor
            .level
            .unwrap_or_else(|| Level::from(*metadata.level()));
        let (name, caller, fields) = if own {
            (visitor.name, visitor.caller, visitor.fields)
        } else {
            let caller = metadata
                .file()
                .zip(metadata.line())
                .filter(|_| self.scope.add_caller)
                .map(|(file, line)| format!("{}:{line}", super::handle::short_path(file)));
            let fields = self.scope.fields.iter().cloned().chain(visitor.fields).collect();
            (self.scoped_name(metadata.target()), caller, fields)
        };

        let record = Record {
            time: Utc::now(),
            level,
            name: name.as_deref(),
            caller: caller.as_deref(),
            message: &visitor.message,
            fields: &fields,
            stacktrace: visitor.stacktrace.as_deref(),
        };
        let mut buf = Vec::with_capacity(256);
        self.encode(&record, &mut buf).map_err(|_| fmt::Error)?;
        writer.write_str(std::str::from_utf8(&buf).map_err(|_| fmt::Error)?)
    }
}

impl Encoder {
    /// `target` nested under the scope name, like [`Logger::named`](crate::Logger::named).
    fn scoped_name(&self, target: &str) -> Option<String> {
        match (self.scope.name.as_deref(), target) {
            (parent, "") => parent.map(str::to_string),
            (Some(parent), target) => Some(format!("{parent}.{target}")),
            (None, target) => Some(target.to_string()),
        }
    }
}

/// Collects the message and fields of an event.
///
/// For events emitted by a `Logger`, the `svclog.*` fields carry the record's
/// level, scope name, caller, packed fields and stack trace.
#[derive(Default)]
struct EventVisitor {
    own: bool,
    message: String,
    level: Option<Level>,
    name: Option<String>,
    caller: Option<String>,
    fields: Vec<Field>,
    stacktrace: Option<String>,
}

impl EventVisitor {
    fn new(own: bool) -> Self {
        Self {
            own,
            ..Self::default()
        }
    }

    fn push(&mut self, field: &TracingField, value: Value) {
        if field.name() == "message" {
            self.message = match value {
                Value::String(s) => s,
                other => other.to_string(),
            };
        } else {
            self.fields.push(Field::from((field.name(), value)));
        }
    }
}

impl Visit for EventVisitor {
    fn record_str(&mut self, field: &TracingField, value: &str) {
        if !self.own {
            self.push(field, Value::from(value));
            return;
        }
        match field.name() {
            "svclog.level" => self.level = value.parse().ok(),
            "svclog.logger" => self.name = Some(value.to_string()),
            "svclog.caller" => self.caller = Some(value.to_string()),
            "svclog.stacktrace" => self.stacktrace = Some(value.to_string()),
            "svclog.fields" => {
                let pairs: Vec<(String, Value)> = serde_json::from_str(value).unwrap_or_default();
                self.fields.extend(pairs.into_iter().map(Field::from));
            }
            _ => self.push(field, Value::from(value)),
        }
    }

    fn record_f64(&mut self, field: &TracingField, value: f64) {
        self.push(field, Value::from(value));
    }

    fn record_i64(&mut self, field: &TracingField, value: i64) {
        self.push(field, Value::from(value));
    }

    fn record_u64(&mut self, field: &TracingField, value: u64) {
        self.push(field, Value::from(value));
    }

    fn record_bool(&mut self, field: &TracingField, value: bool) {
        self.push(field, Value::from(value));
    }

    fn record_error(&mut self, field: &TracingField, value: &(dyn std::error::Error + 'static)) {
        self.push(field, Value::String(value.to_string()));
    }

    fn record_debug(&mut self, field: &TracingField, value: &dyn fmt::Debug) {
        self.push(field, Value::String(format!("{value:?}")));
    }
}
