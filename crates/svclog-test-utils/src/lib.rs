//! Shared test utilities for the svclog workspace.
//!
//! A dev-dependency only, never published.
//!
//! # Modules
//!
//! - [`config_dir`] - [`TestConfigDir`] for laying out logger configuration files

pub mod config_dir;

pub use config_dir::TestConfigDir;
