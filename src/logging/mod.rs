//! Logger bootstrap.
//!
//! Builds the process-wide `tracing` subscriber from the `Logging` section
//! of the merged settings, installs it, and emits a session banner. The
//! returned [`LoggerGuard`] owns the non-blocking writer guards; dropping it
//! flushes and closes the sinks.

use std::path::PathBuf;

use thiserror::Error;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{
    EnvFilter, Layer, Registry, fmt, layer::SubscriberExt, util::SubscriberInitExt,
};

use crate::config::Settings;
use crate::constants;

/// Errors during logger bootstrap.
#[derive(Error, Debug)]
pub enum LoggingError {
    #[error("settings contain no `Logging` section")]
    MissingSection,

    #[error("invalid log level directive {directive:?}: {source}")]
    InvalidLevel {
        directive: String,
        source: tracing_subscriber::filter::ParseError,
    },

    #[error("unrecognized log format {value:?} (expected full, compact, or json)")]
    InvalidFormat { value: String },

    #[error("invalid boolean {value:?} for `{key}`")]
    InvalidBool { key: String, value: String },

    #[error("failed to open log file {path}: {source}")]
    OpenLogFile {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("a process-wide logger is already installed")]
    AlreadyInitialized,
}

/// Record formatting for the installed subscriber.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Full,
    Compact,
    Json,
}

impl LogFormat {
    fn parse(raw: &str) -> Result<Self, LoggingError> {
        match raw.to_lowercase().as_str() {
            "full" => Ok(Self::Full),
            "compact" => Ok(Self::Compact),
            "json" => Ok(Self::Json),
            _ => Err(LoggingError::InvalidFormat {
                value: raw.to_string(),
            }),
        }
    }
}

/// Parsed form of the `Logging` settings section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggingSettings {
    /// Filter directives, e.g. `"info"` or `"warn,appstrap=debug"`.
    pub level: String,
    pub format: LogFormat,
    /// Emit records to stderr.
    pub console: bool,
    /// Also append records to this file.
    pub file: Option<PathBuf>,
}

impl LoggingSettings {
    /// Parse the `Logging` section from the merged settings.
    ///
    /// The section must exist; individual keys fall back to defaults
    /// (level `info`, full format, console on, no file).
    pub fn from_settings(settings: &Settings) -> Result<Self, LoggingError> {
        let section = settings.section(constants::LOGGING_SECTION);
        if section.is_empty() {
            return Err(LoggingError::MissingSection);
        }

        let level = section
            .get(constants::KEY_LEVEL)
            .unwrap_or("info")
            .to_string();
        let format = match section.get(constants::KEY_FORMAT) {
            Some(raw) => LogFormat::parse(raw)?,
            None => LogFormat::Full,
        };
        let console = match section.get(constants::KEY_CONSOLE) {
            Some(raw) => parse_bool(constants::KEY_CONSOLE, raw)?,
            None => true,
        };
        let file = section
            .get(constants::KEY_FILE)
            .filter(|value| !value.is_empty())
            .map(PathBuf::from);

        Ok(Self {
            level,
            format,
            console,
            file,
        })
    }
}

fn parse_bool(key: &str, raw: &str) -> Result<bool, LoggingError> {
    match raw.to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Ok(true),
        "false" | "0" | "no" | "off" => Ok(false),
        _ => Err(LoggingError::InvalidBool {
            key: key.to_string(),
            value: raw.to_string(),
        }),
    }
}

/// Handle to the logging session's buffered sinks.
///
/// Dropping the guard flushes and closes the sinks; the lifecycle controller
/// holds it for the life of the program.
pub struct LoggerGuard {
    _guards: Vec<WorkerGuard>,
}

/// Install the process-wide logger from the `Logging` settings section and
/// emit the "logging started" banner.
pub fn init(settings: &Settings) -> Result<LoggerGuard, LoggingError> {
    let parsed = LoggingSettings::from_settings(settings)?;
    init_with(&parsed)
}

/// Install the process-wide logger from an already-parsed section.
///
/// Fails without installing anything if the settings are invalid or a
/// logger is already installed.
pub fn init_with(settings: &LoggingSettings) -> Result<LoggerGuard, LoggingError> {
    let (layers, guard) = build_layers(settings)?;

    tracing_subscriber::registry()
        .with(layers)
        .try_init()
        .map_err(|_| LoggingError::AlreadyInitialized)?;

    emit_banner();
    Ok(guard)
}

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync>;

fn build_layers(settings: &LoggingSettings) -> Result<(Vec<BoxedLayer>, LoggerGuard), LoggingError> {
    let filter = EnvFilter::try_new(&settings.level).map_err(|e| LoggingError::InvalidLevel {
        directive: settings.level.clone(),
        source: e,
    })?;

    let mut layers: Vec<BoxedLayer> = vec![filter.boxed()];
    let mut workers = Vec::new();

    if settings.console {
        let (writer, worker) = tracing_appender::non_blocking(std::io::stderr());
        workers.push(worker);
        let layer = fmt::layer().with_writer(writer);
        layers.push(match settings.format {
            LogFormat::Full => layer.boxed(),
            LogFormat::Compact => layer.compact().boxed(),
            LogFormat::Json => layer.json().boxed(),
        });
    }

    if let Some(path) = &settings.file {
        let file = std::fs::OpenOptions::new()
            .append(true)
            .create(true)
            .open(path)
            .map_err(|e| LoggingError::OpenLogFile {
                path: path.clone(),
                source: e,
            })?;
        let (writer, worker) = tracing_appender::non_blocking(file);
        workers.push(worker);
        let layer = fmt::layer().with_writer(writer).with_ansi(false);
        layers.push(match settings.format {
            LogFormat::Full => layer.boxed(),
            LogFormat::Compact => layer.compact().boxed(),
            LogFormat::Json => layer.json().boxed(),
        });
    }

    Ok((layers, LoggerGuard { _guards: workers }))
}

/// One informational entry marking the start of a logging session.
fn emit_banner() {
    let separator = "*".repeat(constants::BANNER_WIDTH);
    let now = chrono::Local::now().format("%Y-%b-%d %H:%M:%S%.3f");
    tracing::info!("\n\n{separator}\nLogging started at {now}\n");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::Env;
    use std::path::Path;

    fn settings_from_env(pairs: &[(&str, &str)]) -> Settings {
        let dir = tempfile::tempdir().unwrap();
        let env = Env::mock(pairs.iter().copied());
        Settings::load_in(dir.path(), None, &env).unwrap()
    }

    #[test]
    fn missing_section_is_an_error() {
        let settings = settings_from_env(&[("Other__Key", "x")]);
        let result = LoggingSettings::from_settings(&settings);
        assert!(matches!(result, Err(LoggingError::MissingSection)));
    }

    #[test]
    fn section_with_any_key_gets_defaults() {
        let settings = settings_from_env(&[("Logging__Level", "info")]);
        let parsed = LoggingSettings::from_settings(&settings).unwrap();
        assert_eq!(parsed.level, "info");
        assert_eq!(parsed.format, LogFormat::Full);
        assert!(parsed.console);
        assert!(parsed.file.is_none());
    }

    #[test]
    fn all_keys_parse() {
        let settings = settings_from_env(&[
            ("Logging__Level", "warn,appstrap=debug"),
            ("Logging__Format", "json"),
            ("Logging__Console", "no"),
            ("Logging__File", "/tmp/app.log"),
        ]);
        let parsed = LoggingSettings::from_settings(&settings).unwrap();
        assert_eq!(parsed.level, "warn,appstrap=debug");
        assert_eq!(parsed.format, LogFormat::Json);
        assert!(!parsed.console);
        assert_eq!(parsed.file.as_deref(), Some(Path::new("/tmp/app.log")));
    }

    #[test]
    fn empty_file_value_means_no_file_sink() {
        let settings = settings_from_env(&[("Logging__Level", "info"), ("Logging__File", "")]);
        let parsed = LoggingSettings::from_settings(&settings).unwrap();
        assert!(parsed.file.is_none());
    }

    #[test]
    fn format_is_case_insensitive() {
        for (raw, expected) in [
            ("Full", LogFormat::Full),
            ("COMPACT", LogFormat::Compact),
            ("Json", LogFormat::Json),
        ] {
            assert_eq!(LogFormat::parse(raw).unwrap(), expected);
        }
    }

    #[test]
    fn unknown_format_is_rejected() {
        let settings = settings_from_env(&[("Logging__Format", "xml")]);
        let result = LoggingSettings::from_settings(&settings);
        assert!(matches!(
            result,
            Err(LoggingError::InvalidFormat { value }) if value == "xml"
        ));
    }

    #[test]
    fn bool_values_accept_common_spellings() {
        for raw in ["true", "1", "YES", "On"] {
            assert!(parse_bool("Console", raw).unwrap());
        }
        for raw in ["false", "0", "No", "OFF"] {
            assert!(!parse_bool("Console", raw).unwrap());
        }
    }

    #[test]
    fn bad_bool_is_rejected() {
        let result = parse_bool("Console", "maybe");
        assert!(matches!(
            result,
            Err(LoggingError::InvalidBool { key, value }) if key == "Console" && value == "maybe"
        ));
    }

    #[test]
    fn invalid_level_directive_fails_before_install() {
        let parsed = LoggingSettings {
            level: "app=notalevel".to_string(),
            format: LogFormat::Full,
            console: false,
            file: None,
        };
        let result = init_with(&parsed);
        assert!(matches!(result, Err(LoggingError::InvalidLevel { .. })));
    }

    #[test]
    fn unopenable_log_file_fails_before_install() {
        let parsed = LoggingSettings {
            level: "info".to_string(),
            format: LogFormat::Full,
            console: false,
            file: Some(PathBuf::from("/nonexistent-dir/app.log")),
        };
        let result = init_with(&parsed);
        assert!(matches!(result, Err(LoggingError::OpenLogFile { .. })));
    }
}
