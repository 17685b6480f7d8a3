//! The structured logger
//!
//! [`LoggerFactory::build`] turns a [`ConfigDescriptor`](crate::config::ConfigDescriptor)
//! into a [`Logger`]. Each logger owns a `tracing` dispatcher whose `fmt`
//! layer encodes records with an [`Encoder`] and writes them to the
//! configured outputs; file outputs rotate through `file-rotate`.

mod bridge;
mod encoder;
mod factory;
mod field;
mod handle;
mod level;
mod sink;

#[cfg(test)]
pub(crate) mod testing;

pub use encoder::{Encoder, Encoding, LevelFormat, TimeFormat};
pub use factory::LoggerFactory;
pub use field::Field;
pub use handle::{FATAL_EXIT_CODE, Logger};
pub use level::Level;
pub use sink::FlushError;
