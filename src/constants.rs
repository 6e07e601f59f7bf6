//! App-wide constants.
//!
//! Centralises the tool name, the conventional settings filename, the
//! logging section keys, and environment variable names so a rename only
//! requires changing this file.

/// Display name of the tool (lowercase).
pub const APP_NAME: &str = "appstrap";

/// Conventional settings filename, looked up in the current working directory.
pub const SETTINGS_FILENAME: &str = "appsettings.json";

/// Name of the settings section consumed by the logger bootstrap.
pub const LOGGING_SECTION: &str = "Logging";

/// Width of the separator line in the session banner.
pub const BANNER_WIDTH: usize = 80;

// ── Logging section keys ────────────────────────────────────────────

/// Filter directives for the subscriber (e.g. `"info"`, `"warn,appstrap=debug"`).
pub const KEY_LEVEL: &str = "Level";

/// Output format: `full`, `compact`, or `json`.
pub const KEY_FORMAT: &str = "Format";

/// Whether to emit log records to stderr.
pub const KEY_CONSOLE: &str = "Console";

/// Optional path of a log file to append records to.
pub const KEY_FILE: &str = "File";

// ── Environment variable names ──────────────────────────────────────

/// Fallback for the `--settings` flag of the demo binary.
pub const ENV_SETTINGS: &str = "APPSTRAP_SETTINGS";
