//! Structured logging configured from YAML files next to a service's config
//!
//! A logger is built in two stages:
//!
//! - **Resolution**: [`ConfigResolver`] reads the mandatory
//!   `config.logger.yml` in the directory of a path hint and merges
//!   `config.logger.override.yml` on top of it when that file exists
//! - **Construction**: [`LoggerFactory`] validates the merged
//!   [`ConfigDescriptor`], opens the outputs and returns a [`Logger`]
//!
//! Any failure in either stage is fatal to the bootstrap; there is no
//! fallback logger.
//!
//! # Example
//!
//! ```no_run
//! use svclog::Field;
//!
//! let logger = svclog::init_or_exit("/etc/my-service/service.yml");
//! let db = logger.named("db");
//! db.info_with("connected", &[Field::new("pool", 8)]);
//! svclog::warn!(db, "slow query took {}ms", 950; "table" => "orders");
//! ```

pub mod config;
pub mod error;
pub mod logger;
mod macros;

pub use config::{ConfigDescriptor, ConfigResolver, ResolvedConfig};
pub use error::{Error, ErrorKind, Result};
pub use logger::{Field, FlushError, Level, Logger, LoggerFactory};

use std::path::Path;

/// Exit status of [`init_or_exit`] when the logger cannot be built.
pub const CONFIG_EXIT_CODE: i32 = 2;

/// Resolve the configuration next to `hint` and build a logger from it.
pub fn new_logger(hint: impl AsRef<Path>) -> Result<Logger> {
    let descriptor = ConfigResolver::new(hint).resolve()?;
    LoggerFactory::build(descriptor)
}

/// Like [`new_logger`], but print the error and exit with
/// [`CONFIG_EXIT_CODE`] on failure.
pub fn init_or_exit(hint: impl AsRef<Path>) -> Logger {
    match new_logger(hint) {
        Ok(logger) => logger,
        Err(e) => {
            eprintln!("svclog: failed to initialize logger: {e}");
            std::process::exit(CONFIG_EXIT_CODE)
        }
    }
}
