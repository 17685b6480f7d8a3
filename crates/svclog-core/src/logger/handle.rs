//! The `Logger` handle
//!
//! Everything funnels through three primitives: [`Logger::log`],
//! [`Logger::derive`] and [`Logger::flush`]. The per-level methods and the
//! crate's macros are conveniences over `log`.
//!
//! A record is emitted as a `tracing` event into the logger's own
//! [`Dispatch`], whose only layer formats it with the configured
//! [`Encoder`] and writes it to the [`Outputs`].

use std::backtrace::Backtrace;
use std::fmt;
use std::panic::Location;
use std::sync::Arc;

use tracing::{Dispatch, Subscriber};
use tracing_subscriber::fmt::Layer as FmtLayer;
use tracing_subscriber::fmt::format::DefaultFields;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::registry::LookupSpan;

use super::encoder::{Encoder, Scope};
use super::field::Field;
use super::level::Level;
use super::sink::{FlushError, Outputs};

/// Exit status used after a `fatal` record.
pub const FATAL_EXIT_CODE: i32 = 1;

/// Target of the events [`Logger`] calls emit.
pub(crate) const RECORD_TARGET: &str = "svclog::record";

/// State shared by a logger and every handle derived from it.
pub(crate) struct Core {
    pub level: Level,
    pub development: bool,
    pub add_caller: bool,
    /// Lowest level whose records carry a stack trace
    pub stacktrace: Option<Level>,
    pub encoder: Encoder,
    pub outputs: Outputs,
    dispatch: Dispatch,
}

impl Core {
    pub fn new(level: Level, development: bool, encoder: Encoder, outputs: Outputs) -> Self {
        let layer = record_layer(encoder.clone(), outputs.clone());
        Self {
            level,
            development,
            add_caller: true,
            stacktrace: None,
            dispatch: Dispatch::new(tracing_subscriber::registry().with(layer)),
            encoder,
            outputs,
        }
    }
}

/// The `fmt` layer that encodes events and writes them to `outputs`.
pub(crate) fn record_layer<S>(
    encoder: Encoder,
    outputs: Outputs,
) -> FmtLayer<S, DefaultFields, Encoder, Outputs>
where
    S: Subscriber + for<'span> LookupSpan<'span>,
{
    tracing_subscriber::fmt::layer()
        .with_ansi(false)
        .log_internal_errors(false)
        .event_format(encoder)
        .with_writer(outputs)
}

/// A structured logger.
///
/// Cloning is cheap and every clone writes to the same outputs. The handle is
/// `Send + Sync`; concurrent calls each produce one complete record.
#[derive(Clone)]
pub struct Logger {
    core: Arc<Core>,
    name: Option<Arc<str>>,
    fields: Arc<[Field]>,
}

impl fmt::Debug for Logger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Logger")
            .field("level", &self.core.level)
            .field("name", &self.name)
            .field("fields", &self.fields)
            .field("encoding", &self.core.encoder.encoding())
            .finish()
    }
}

impl Logger {
    pub(crate) fn from_core(core: Core, fields: Vec<Field>) -> Self {
        Self {
            core: Arc::new(core),
            name: None,
            fields: fields.into(),
        }
    }

    /// Minimum enabled level.
    pub fn level(&self) -> Level {
        self.core.level
    }

    /// Scope name, if any.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Fields attached to every record of this handle.
    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    pub fn enabled(&self, level: Level) -> bool {
        level >= self.core.level
    }

    /// Whether a call at `level` has any effect.
    ///
    /// True when the level is enabled, and always for levels that panic or
    /// exit, which act even when filtered out.
    pub fn should_log(&self, level: Level) -> bool {
        self.enabled(level)
            || matches!(level, Level::Panic | Level::Fatal)
            || (level == Level::DPanic && self.core.development)
    }

    /// Write a record at `level`.
    ///
    /// `Panic` records panic with `message` after being written, `DPanic` does
    /// the same in development mode, and `Fatal` exits the process with
    /// [`FATAL_EXIT_CODE`]. Outputs are flushed before either happens.
    #[track_caller]
    pub fn log(&self, level: Level, message: &str, fields: &[Field]) {
        self.write(level, message, fields, Location::caller());
        self.settle(level, message);
    }

    /// Derive a handle with an extra name scope and extra bound fields.
    ///
    /// Name scopes nest with `.`; an empty name adds no scope. The original
    /// handle is unaffected.
    pub fn derive(&self, name: Option<&str>, fields: &[Field]) -> Logger {
        let name = match (name.filter(|n| !n.is_empty()), &self.name) {
            (Some(name), Some(parent)) => Some(Arc::from(format!("{parent}.{name}"))),
            (Some(name), None) => Some(Arc::from(name)),
            (None, parent) => parent.clone(),
        };
        let fields = if fields.is_empty() {
            Arc::clone(&self.fields)
        } else {
            self.fields.iter().chain(fields).cloned().collect()
        };
        Logger {
            core: Arc::clone(&self.core),
            name,
            fields,
        }
    }

    /// Derive a handle whose records carry `name` as (part of) their scope.
    pub fn named(&self, name: &str) -> Logger {
        self.derive(Some(name), &[])
    }

    /// Derive a handle that attaches `fields` to every record.
    pub fn with(&self, fields: &[Field]) -> Logger {
        self.derive(None, fields)
    }

    /// Commit buffered output of every sink.
    pub fn flush(&self) -> Result<(), FlushError> {
        self.core.outputs.flush()
    }

    /// The scope `tracing` events are written with by [`Logger::layer`].
    pub(crate) fn scope(&self) -> Scope {
        Scope {
            name: self.name.clone(),
            fields: Arc::clone(&self.fields),
            add_caller: self.core.add_caller,
        }
    }

    pub(crate) fn core(&self) -> &Core {
        &self.core
    }

    #[track_caller]
    pub fn debug(&self, message: impl fmt::Display) {
        self.log_display(Level::Debug, message, &[]);
    }

    #[track_caller]
    pub fn info(&self, message: impl fmt::Display) {
        self.log_display(Level::Info, message, &[]);
    }

    #[track_caller]
    pub fn warn(&self, message: impl fmt::Display) {
        self.log_display(Level::Warn, message, &[]);
    }

    #[track_caller]
    pub fn error(&self, message: impl fmt::Display) {
        self.log_display(Level::Error, message, &[]);
    }

    #[track_caller]
    pub fn dpanic(&self, message: impl fmt::Display) {
        self.log_display(Level::DPanic, message, &[]);
    }

    #[track_caller]
    pub fn panic(&self, message: impl fmt::Display) -> ! {
        self.panic_with(message, &[])
    }

    #[track_caller]
    pub fn fatal(&self, message: impl fmt::Display) -> ! {
        self.fatal_with(message, &[])
    }

    #[track_caller]
    pub fn debug_with(&self, message: impl fmt::Display, fields: &[Field]) {
        self.log_display(Level::Debug, message, fields);
    }

    #[track_caller]
    pub fn info_with(&self, message: impl fmt::Display, fields: &[Field]) {
        self.log_display(Level::Info, message, fields);
    }

    #[track_caller]
    pub fn warn_with(&self, message: impl fmt::Display, fields: &[Field]) {
        self.log_display(Level::Warn, message, fields);
    }

    #[track_caller]
    pub fn error_with(&self, message: impl fmt::Display, fields: &[Field]) {
        self.log_display(Level::Error, message, fields);
    }

    #[track_caller]
    pub fn dpanic_with(&self, message: impl fmt::Display, fields: &[Field]) {
        self.log_display(Level::DPanic, message, fields);
    }

    #[track_caller]
    pub fn panic_with(&self, message: impl fmt::Display, fields: &[Field]) -> ! {
        let message = message.to_string();
        self.write(Level::Panic, &message, fields, Location::caller());
        self.raise(&message)
    }

    #[track_caller]
    pub fn fatal_with(&self, message: impl fmt::Display, fields: &[Field]) -> ! {
        let message = message.to_string();
        self.write(Level::Fatal, &message, fields, Location::caller());
        self.exit()
    }

    #[track_caller]
    fn log_display(&self, level: Level, message: impl fmt::Display, fields: &[Field]) {
        if self.should_log(level) {
            self.log(level, &message.to_string(), fields);
        }
    }

    #[track_caller]
    fn settle(&self, level: Level, message: &str) {
        match level {
            Level::Fatal => self.exit(),
            Level::Panic => self.raise(message),
            Level::DPanic if self.core.development => self.raise(message),
            _ => {}
        }
    }

    #[track_caller]
    fn raise(&self, message: &str) -> ! {
        let _ = self.flush();
        panic!("{message}")
    }

    fn exit(&self) -> ! {
        let _ = self.flush();
        std::process::exit(FATAL_EXIT_CODE)
    }

    /// Emit a record without applying terminal behavior.
    fn write(&self, level: Level, message: &str, fields: &[Field], caller: &Location<'_>) {
        if !self.enabled(level) {
            return;
        }
        let caller = self
            .core
            .add_caller
            .then(|| format!("{}:{}", short_path(caller.file()), caller.line()));
        let fields = pack_fields(self.fields.iter().chain(fields));
        let stacktrace = self
            .core
            .stacktrace
            .filter(|min| level >= *min)
            .map(|_| Backtrace::force_capture().to_string());

        tracing::dispatcher::with_default(&self.core.dispatch, || {
            emit(
                level,
                message,
                self.name.as_deref(),
                caller.as_deref(),
                fields.as_deref(),
                stacktrace.as_deref(),
            );
        });
    }
}

/// Bound and call fields as one JSON array of `[key, value]` pairs.
fn pack_fields<'a>(fields: impl Iterator<Item = &'a Field>) -> Option<String> {
    let pairs: Vec<_> = fields.map(|field| (&field.key, &field.value)).collect();
    if pairs.is_empty() {
        return None;
    }
    serde_json::to_string(&pairs).ok()
}

fn emit(
    level: Level,
    message: &str,
    name: Option<&str>,
    caller: Option<&str>,
    fields: Option<&str>,
    stacktrace: Option<&str>,
) {
    macro_rules! record {
        ($level:expr) => {
            tracing::event!(
                target: RECORD_TARGET,
                $level,
                svclog.level = level.as_str(),
                svclog.logger = name,
                svclog.caller = caller,
                svclog.fields = fields,
                svclog.stacktrace = stacktrace,
                "{message}"
            )
        };
    }

    match level {
        Level::Debug => record!(tracing::Level::DEBUG),
        Level::Info => record!(tracing::Level::INFO),
        Level::Warn => record!(tracing::Level::WARN),
        Level::Error | Level::DPanic | Level::Panic | Level::Fatal => {
            record!(tracing::Level::ERROR)
        }
    }
}

/// Keep the last two components of a source path: `src/auth.rs`.
pub(crate) fn short_path(file: &str) -> &str {
    let mut separators = file.rmatch_indices(['/', '\\']);
    match (separators.next(), separators.next()) {
        (Some(_), Some((idx, _))) => &file[idx + 1..],
        _ => file,
    }
}
