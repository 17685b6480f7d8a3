//! Command implementations for svclog-cli

pub mod check;
pub mod emit;

pub use check::run_check;
pub use emit::run_emit;
