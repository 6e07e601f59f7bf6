//! Program lifecycle bracket.
//!
//! [`Startup`] ties the settings loader and the logger bootstrap together:
//! construction loads the merged settings and (optionally) installs the
//! process-wide logger, the instance exposes the settings for the rest of
//! the program, and dropping it ends the logging session and flushes the
//! sinks.
//!
//! ```no_run
//! use appstrap::startup::{Startup, StartupOptions};
//!
//! fn main() -> Result<(), appstrap::startup::StartupError> {
//!     let startup = Startup::init(StartupOptions::default())?;
//!     let greeting = startup.settings().get("App:Greeting");
//!     tracing::info!(?greeting, "up and running");
//!     Ok(())
//!     // dropping `startup` ends the session and flushes the sinks
//! }
//! ```

use std::path::PathBuf;

use thiserror::Error;

use crate::config::{ConfigError, Settings};
use crate::env::Env;
use crate::logging::{self, LoggerGuard, LoggingError};

/// Errors during startup.
#[derive(Error, Debug)]
pub enum StartupError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("logger configuration error: {0}")]
    Logging(#[from] LoggingError),
}

/// Recognized startup options.
#[derive(Debug, Clone)]
pub struct StartupOptions {
    /// Install the process-wide logger from the `Logging` settings section.
    pub enable_logging: bool,
    /// Additional settings file applied on top of `appsettings.json`.
    pub settings_path: Option<PathBuf>,
}

impl Default for StartupOptions {
    fn default() -> Self {
        Self {
            enable_logging: true,
            settings_path: None,
        }
    }
}

impl StartupOptions {
    /// Skip the logger bootstrap; only load settings.
    pub fn without_logging(mut self) -> Self {
        self.enable_logging = false;
        self
    }

    /// Apply an additional settings file on top of the conventional one.
    pub fn with_settings_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.settings_path = Some(path.into());
        self
    }
}

/// Scoped bootstrap handle.
///
/// Owns the merged settings for its lifetime and, when logging is enabled,
/// the guard that flushes the log sinks at teardown.
pub struct Startup {
    settings: Settings,
    logger: Option<LoggerGuard>,
}

impl Startup {
    /// Load settings and, if enabled, install the process-wide logger.
    ///
    /// Fails with a typed error if a settings source cannot be parsed or the
    /// `Logging` section is missing or malformed; nothing is retried or
    /// swallowed. If settings loading fails, the logger bootstrap never
    /// runs.
    pub fn init(options: StartupOptions) -> Result<Self, StartupError> {
        let settings = Settings::load(options.settings_path.as_deref(), &Env::real())?;
        Self::from_settings(settings, options.enable_logging)
    }

    fn from_settings(settings: Settings, enable_logging: bool) -> Result<Self, StartupError> {
        let logger = if enable_logging {
            Some(logging::init(&settings)?)
        } else {
            None
        };
        Ok(Self { settings, logger })
    }

    /// The merged settings view, valid for the lifetime of this instance.
    pub fn settings(&self) -> &Settings {
        &self.settings
    }
}

impl Drop for Startup {
    fn drop(&mut self) {
        // Runs exactly once per constructed instance, on every exit path.
        if let Some(guard) = self.logger.take() {
            tracing::info!("*** Logging ended ***");
            drop(guard);
        }
    }
}
