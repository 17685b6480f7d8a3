//! Logger configuration resolution
//!
//! Configuration lives in up to two YAML files in the directory of a path hint:
//!
//! 1. **Default** - `config.logger.yml`, required
//! 2. **Override** - `config.logger.override.yml`, optional, merged on top
//!
//! # Example
//!
//! ```no_run
//! use svclog::config::ConfigResolver;
//!
//! let descriptor = ConfigResolver::new("/etc/my-service/service.yml").resolve()?;
//! println!("level: {}", descriptor.engine.level);
//! # Ok::<(), svclog::Error>(())
//! ```

mod descriptor;
mod overlay;
mod resolver;

pub use descriptor::{
    ConfigDescriptor, DEFAULT_MAX_SIZE_MB, EncoderConfig, EngineConfig, RotationConfig,
};
pub use overlay::{ConfigOverlay, EncoderOverlay, EngineOverlay, RotationOverlay};
pub use resolver::{ConfigResolver, ResolvedConfig};
