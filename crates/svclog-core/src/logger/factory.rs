//! Logger construction from a resolved configuration

use std::collections::HashMap;

use super::encoder::Encoder;
use super::field::Field;
use super::handle::{Core, Logger};
use super::level::Level;
use super::sink::{Outputs, open_all};
use crate::config::ConfigDescriptor;
use crate::{Error, Result};

/// Builds a [`Logger`] from a [`ConfigDescriptor`].
///
/// Every setting is validated before anything is returned; a descriptor that
/// fails validation produces an error, never a partially configured logger.
pub struct LoggerFactory;

impl LoggerFactory {
    /// Validate `descriptor`, open its outputs and return the logger.
    ///
    /// Outputs are flushed once before the handle is returned.
    pub fn build(descriptor: ConfigDescriptor) -> Result<Logger> {
        let ConfigDescriptor { engine, rotation } = descriptor;

        let level: Level = engine.level.parse()?;
        let encoder = Encoder::new(&engine.encoding, &engine.encoder)?;
        if engine.output_paths.is_empty() {
            return Err(Error::NoOutputs);
        }

        let mut opened = HashMap::new();
        let outputs = open_all(&engine.output_paths, &rotation, &mut opened)?;
        let error_outputs = open_all(&engine.error_output_paths, &rotation, &mut opened)?;
        tracing::debug!(
            level = %level,
            encoding = %engine.encoding,
            outputs = ?engine.output_paths,
            "built logger"
        );

        let fields = engine
            .initial_fields
            .into_iter()
            .map(Field::from)
            .collect();
        let mut core = Core::new(
            level,
            engine.development,
            encoder,
            Outputs::new(outputs, error_outputs),
        );
        core.add_caller = !engine.disable_caller;
        core.stacktrace = match (engine.disable_stacktrace, engine.development) {
            (true, _) => None,
            (false, true) => Some(Level::Warn),
            (false, false) => Some(Level::Error),
        };
        let logger = Logger::from_core(core, fields);

        if let Err(e) = logger.flush() {
            tracing::debug!(error = %e, "initial flush failed");
        }
        Ok(logger)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ErrorKind;
    use tempfile::TempDir;

    fn with_engine(edit: impl FnOnce(&mut crate::config::EngineConfig)) -> ConfigDescriptor {
        let mut descriptor = ConfigDescriptor::default();
        edit(&mut descriptor.engine);
        descriptor
    }

    #[test]
    fn default_descriptor_builds() {
        let logger = LoggerFactory::build(ConfigDescriptor::default()).unwrap();
        assert_eq!(logger.level(), Level::Info);
    }

    #[test]
    fn invalid_settings_are_build_errors() {
        let cases = [
            with_engine(|e| e.level = "verbose".into()),
            with_engine(|e| e.level = String::new()),
            with_engine(|e| e.encoding = "xml".into()),
            with_engine(|e| e.encoder.time_format = "iso".into()),
            with_engine(|e| e.encoder.level_format = "upper".into()),
            with_engine(|e| e.output_paths.clear()),
            with_engine(|e| e.output_paths = vec!["s3://logs".into()]),
        ];

        for descriptor in cases {
            let err = LoggerFactory::build(descriptor.clone()).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::Build, "{descriptor:?}: {err}");
        }
    }

    #[test]
    fn initial_fields_are_bound() {
        let temp = TempDir::new().unwrap();
        let file = temp.path().join("app.log");
        let descriptor = with_engine(|e| {
            e.output_paths = vec![file.to_string_lossy().into_owned()];
            e.initial_fields.insert("service".into(), "billing".into());
        });

        let logger = LoggerFactory::build(descriptor).unwrap();
        logger.info("started");
        logger.flush().unwrap();

        let line = std::fs::read_to_string(&file).unwrap();
        let record: serde_json::Value = serde_json::from_str(line.trim_end()).unwrap();
        assert_eq!(record["service"], "billing");
        assert_eq!(record["msg"], "started");
    }

    #[test]
    fn stacktraces_follow_mode_and_switch() {
        let temp = TempDir::new().unwrap();
        let file = temp.path().join("app.log");
        let output = file.to_string_lossy().into_owned();

        let production = LoggerFactory::build(with_engine(|e| e.output_paths = vec![output.clone()]));
        let development = LoggerFactory::build(with_engine(|e| {
            e.output_paths = vec![output.clone()];
            e.development = true;
        }));
        let disabled = LoggerFactory::build(with_engine(|e| {
            e.output_paths = vec![output.clone()];
            e.disable_stacktrace = true;
        }));

        assert_eq!(production.unwrap().core().stacktrace, Some(Level::Error));
        assert_eq!(development.unwrap().core().stacktrace, Some(Level::Warn));
        assert_eq!(disabled.unwrap().core().stacktrace, None);
    }

    #[test]
    fn disable_caller_omits_call_site() {
        let temp = TempDir::new().unwrap();
        let file = temp.path().join("app.log");
        let descriptor = with_engine(|e| {
            e.output_paths = vec![file.to_string_lossy().into_owned()];
            e.disable_caller = true;
        });

        let logger = LoggerFactory::build(descriptor).unwrap();
        logger.warn("no caller");
        logger.flush().unwrap();

        let line = std::fs::read_to_string(&file).unwrap();
        assert!(!line.contains("\"caller\""), "got: {line}");
    }
}
