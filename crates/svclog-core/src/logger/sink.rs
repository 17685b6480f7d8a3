//! Output destinations
//!
//! Each sink serializes access to its writer: a record is handed over as one
//! buffer and written with a single `write_all` while the lock is held, so
//! records from concurrent callers never interleave. File sinks rotate through
//! [`FileRotate`].

use chrono::{SecondsFormat, Utc};
use file_rotate::compression::Compression;
use file_rotate::suffix::{AppendTimestamp, FileLimit};
use file_rotate::{ContentLimit, FileRotate};
use std::collections::HashMap;
use std::fmt;
use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::Path;
use std::sync::{Arc, Mutex, PoisonError};
use tracing_subscriber::fmt::MakeWriter;

use crate::config::RotationConfig;
use crate::{Error, Result};

/// Writer behind a sink.
pub(crate) type BoxedWriter = Box<dyn Write + Send>;

/// A named, lock-protected output.
pub(crate) struct Sink {
    name: String,
    writer: Mutex<BoxedWriter>,
}

impl fmt::Debug for Sink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Sink").field("name", &self.name).finish()
    }
}

impl Sink {
    pub fn new(name: impl Into<String>, writer: BoxedWriter) -> Self {
        Self {
            name: name.into(),
            writer: Mutex::new(writer),
        }
    }

    /// Open an output path.
    ///
    /// `stdout` and `stderr` name the standard streams. Anything else is a
    /// file path, optionally written as a `file://` URL.
    pub fn open(path: &str, rotation: &RotationConfig) -> Result<Self> {
        match path {
            "" => Err(invalid_output(path, "path is empty")),
            "stdout" => Ok(Self::new(path, Box::new(io::stdout()))),
            "stderr" => Ok(Self::new(path, Box::new(io::stderr()))),
            _ => {
                let file_path = match path.split_once("://") {
                    Some(("file", rest)) if !rest.is_empty() => rest,
                    Some(("file", _)) => return Err(invalid_output(path, "file URL has no path")),
                    Some((scheme, _)) => {
                        return Err(invalid_output(path, &format!("unsupported scheme {scheme:?}")));
                    }
                    None => path,
                };
                let writer = open_rotating(Path::new(file_path), rotation).map_err(|source| {
                    Error::OpenOutput {
                        path: path.to_string(),
                        source,
                    }
                })?;
                Ok(Self::new(path, writer))
            }
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Write one complete record.
    pub fn write_record(&self, record: &[u8]) -> io::Result<()> {
        let mut writer = self.writer.lock().unwrap_or_else(PoisonError::into_inner);
        writer.write_all(record)
    }

    pub fn flush(&self) -> io::Result<()> {
        let mut writer = self.writer.lock().unwrap_or_else(PoisonError::into_inner);
        writer.flush()
    }
}

fn invalid_output(path: &str, reason: &str) -> Error {
    Error::InvalidOutput {
        path: path.to_string(),
        reason: reason.to_string(),
    }
}

/// Open `path` for appending behind a size-based rotation policy.
///
/// Backups are named `<file>.<timestamp>`, with a counter appended when two
/// rotations fall in the same second. `max_backups` bounds their number; when
/// it is 0, `max_age` bounds their age instead.
fn open_rotating(path: &Path, rotation: &RotationConfig) -> io::Result<BoxedWriter> {
    let path = std::path::absolute(path)?;
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    // Paths that cannot be appended to fail here, not on the first record
    OpenOptions::new().create(true).append(true).open(&path)?;

    let file_limit = match (rotation.max_backups, rotation.max_age) {
        (0, 0) => FileLimit::Unlimited,
        (0, days) => FileLimit::Age(chrono::Duration::days(i64::from(days))),
        (backups, _) => FileLimit::MaxFiles(backups),
    };
    let max_bytes = usize::try_from(rotation.max_bytes()).unwrap_or(usize::MAX);
    let compression = if rotation.compress {
        Compression::OnRotate(0)
    } else {
        Compression::None
    };

    Ok(Box::new(FileRotate::new(
        path,
        AppendTimestamp::default(file_limit),
        ContentLimit::BytesSurpassed(max_bytes),
        compression,
        #[cfg(unix)]
        None,
    )))
}

/// Open every path in `paths`, reusing sinks already opened through `opened`.
///
/// The same file listed twice, or listed both as an output and an error
/// output, shares a single writer.
pub(crate) fn open_all(
    paths: &[String],
    rotation: &RotationConfig,
    opened: &mut HashMap<String, Arc<Sink>>,
) -> Result<Vec<Arc<Sink>>> {
    let mut sinks = Vec::with_capacity(paths.len());
    for path in paths {
        let sink = match opened.get(path) {
            Some(sink) => Arc::clone(sink),
            None => {
                let sink = Arc::new(Sink::open(path, rotation)?);
                opened.insert(path.clone(), Arc::clone(&sink));
                sink
            }
        };
        if !sinks.iter().any(|s| Arc::ptr_eq(s, &sink)) {
            sinks.push(sink);
        }
    }
    Ok(sinks)
}

/// The record outputs of a logger and the error outputs their write failures
/// are reported to.
///
/// Serves as the writer of the record layer: every formatted record goes to
/// each record output in turn.
#[derive(Debug, Clone, Default)]
pub(crate) struct Outputs {
    records: Arc<[Arc<Sink>]>,
    errors: Arc<[Arc<Sink>]>,
}

impl Outputs {
    pub fn new(records: Vec<Arc<Sink>>, errors: Vec<Arc<Sink>>) -> Self {
        Self {
            records: records.into(),
            errors: errors.into(),
        }
    }

    fn write_record(&self, record: &[u8]) {
        for sink in self.records.iter() {
            if let Err(e) = sink.write_record(record) {
                self.report(&format!("write error on {}: {e}", sink.name()));
            }
        }
    }

    /// Send a diagnostic line to the error outputs.
    fn report(&self, problem: &str) {
        let line = format!(
            "{} {problem}\n",
            Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
        );
        for sink in self.errors.iter() {
            let _ = sink.write_record(line.as_bytes());
        }
    }

    pub fn flush(&self) -> std::result::Result<(), FlushError> {
        let failures: Vec<_> = self
            .records
            .iter()
            .chain(self.errors.iter())
            .filter_map(|sink| sink.flush().err().map(|e| (sink.name().to_string(), e)))
            .collect();
        if failures.is_empty() {
            Ok(())
        } else {
            Err(FlushError::new(failures))
        }
    }
}

impl<'a> MakeWriter<'a> for Outputs {
    type Writer = RecordWriter<'a>;

    fn make_writer(&'a self) -> Self::Writer {
        RecordWriter(self)
    }
}

/// Hands one formatted record to every output.
pub(crate) struct RecordWriter<'a>(&'a Outputs);

impl Write for RecordWriter<'_> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.write_record(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Flush failed for one or more sinks.
#[derive(Debug)]
pub struct FlushError {
    failures: Vec<(String, io::Error)>,
}

impl FlushError {
    pub(crate) fn new(failures: Vec<(String, io::Error)>) -> Self {
        Self { failures }
    }

    /// Sink names and the errors they reported.
    pub fn failures(&self) -> &[(String, io::Error)] {
        &self.failures
    }
}

impl fmt::Display for FlushError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "failed to flush")?;
        for (i, (name, error)) in self.failures.iter().enumerate() {
            let sep = if i == 0 { " " } else { "; " };
            write!(f, "{sep}{name}: {error}")?;
        }
        Ok(())
    }
}

impl std::error::Error for FlushError {}
