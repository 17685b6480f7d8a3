//! Filesystem layer for svclog
//!
//! Turns a caller-supplied path hint into the pair of configuration file
//! locations svclog reads, and loads YAML documents with path-annotated errors.

pub mod constants;
pub mod document;
pub mod error;
pub mod io;
pub mod path;

pub use constants::ConfigFile;
pub use document::{load_document, parse_document};
pub use error::{Error, Result};
pub use path::{ConfigDir, ConfigPath};
