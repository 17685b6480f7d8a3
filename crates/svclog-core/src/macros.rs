//! Formatting macros over [`Logger::log`](crate::Logger::log)
//!
//! Every macro takes the logger, a format string with its arguments and an
//! optional `;`-separated list of `"key" => value` fields:
//!
//! ```no_run
//! # let logger = svclog::new_logger("service.yml")?;
//! let attempt = 3;
//! svclog::info!(logger, "connected");
//! svclog::warn!(logger, "retrying after {}ms", 250; "attempt" => attempt);
//! svclog::error!(logger, "lost connection"; "peer" => "10.0.0.7", "open" => 12);
//! # Ok::<(), svclog::Error>(())
//! ```
//!
//! The message is only formatted, and the fields only built, when the call
//! has an effect. `panic!` and `fatal!` always have one and never return.

/// Log at an explicit [`Level`](crate::Level).
#[macro_export]
macro_rules! log {
    ($logger:expr, $level:expr, $fmt:literal $(, $arg:expr)* ; $($key:literal => $value:expr),+ $(,)?) => {{
        let logger = &$logger;
        let level = $level;
        if logger.should_log(level) {
            logger.log(
                level,
                &::std::format!($fmt $(, $arg)*),
                &[$($crate::Field::new($key, $value)),+],
            );
        }
    }};
    ($logger:expr, $level:expr, $fmt:literal $(, $arg:expr)* $(;)?) => {{
        let logger = &$logger;
        let level = $level;
        if logger.should_log(level) {
            logger.log(level, &::std::format!($fmt $(, $arg)*), &[]);
        }
    }};
}

#[macro_export]
macro_rules! debug {
    ($logger:expr, $($rest:tt)+) => {
        $crate::log!($logger, $crate::Level::Debug, $($rest)+)
    };
}

#[macro_export]
macro_rules! info {
    ($logger:expr, $($rest:tt)+) => {
        $crate::log!($logger, $crate::Level::Info, $($rest)+)
    };
}

#[macro_export]
macro_rules! warn {
    ($logger:expr, $($rest:tt)+) => {
        $crate::log!($logger, $crate::Level::Warn, $($rest)+)
    };
}

#[macro_export]
macro_rules! error {
    ($logger:expr, $($rest:tt)+) => {
        $crate::log!($logger, $crate::Level::Error, $($rest)+)
    };
}

/// Panics after logging when the logger is in development mode.
#[macro_export]
macro_rules! dpanic {
    ($logger:expr, $($rest:tt)+) => {
        $crate::log!($logger, $crate::Level::DPanic, $($rest)+)
    };
}

/// Logs, flushes and panics with the formatted message.
///
/// Evaluates to `!`.
#[macro_export]
macro_rules! panic {
    ($logger:expr, $fmt:literal $(, $arg:expr)* ; $($key:literal => $value:expr),+ $(,)?) => {
        $logger.panic_with(
            ::std::format!($fmt $(, $arg)*),
            &[$($crate::Field::new($key, $value)),+],
        )
    };
    ($logger:expr, $fmt:literal $(, $arg:expr)* $(;)?) => {
        $logger.panic_with(::std::format!($fmt $(, $arg)*), &[])
    };
}

/// Logs, flushes and exits the process with status 1.
///
/// Evaluates to `!`.
#[macro_export]
macro_rules! fatal {
    ($logger:expr, $fmt:literal $(, $arg:expr)* ; $($key:literal => $value:expr),+ $(,)?) => {
        $logger.fatal_with(
            ::std::format!($fmt $(, $arg)*),
            &[$($crate::Field::new($key, $value)),+],
        )
    };
    ($logger:expr, $fmt:literal $(, $arg:expr)* $(;)?) => {
        $logger.fatal_with(::std::format!($fmt $(, $arg)*), &[])
    };
}
