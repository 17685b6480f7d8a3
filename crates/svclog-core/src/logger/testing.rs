//! In-memory sinks for unit tests

use serde_json::Value;
use std::io::{self, Write};
use std::sync::{Arc, Mutex};

use super::encoder::Encoder;
use super::handle::{Core, Logger};
use super::level::Level;
use super::sink::{Outputs, Sink};
use crate::config::EncoderConfig;

/// A cloneable writer whose clones share one buffer.
#[derive(Clone, Default)]
pub(crate) struct SharedBuffer(Arc<Mutex<Vec<u8>>>);

impl SharedBuffer {
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }

    /// Every line parsed as a JSON record.
    pub fn records(&self) -> Vec<Value> {
        self.text()
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect()
    }

    pub fn sink(&self, name: &str) -> Arc<Sink> {
        Arc::new(Sink::new(name, Box::new(self.clone())))
    }
}

impl Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// A writer that fails every call.
pub(crate) struct BrokenWriter;

impl Write for BrokenWriter {
    fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
        Err(io::Error::other("device gone"))
    }

    fn flush(&mut self) -> io::Result<()> {
        Err(io::Error::other("device gone"))
    }
}

/// A JSON core with default keys.
pub(crate) fn core(level: Level, development: bool, outputs: Outputs) -> Core {
    let encoder = Encoder::new("json", &EncoderConfig::default()).unwrap();
    Core::new(level, development, encoder, outputs)
}

/// A JSON logger writing into a fresh buffer.
pub(crate) fn buffered(level: Level, development: bool) -> (Logger, SharedBuffer) {
    let buffer = SharedBuffer::default();
    let outputs = Outputs::new(vec![buffer.sink("buffer")], Vec::new());
    (Logger::from_core(core(level, development, outputs), Vec::new()), buffer)
}
