//! Settings view and loading logic.
//!
//! Layering (lowest to highest):
//! 1. Process environment variables (`__` maps to the `:` separator)
//! 2. `appsettings.json` in the current working directory
//! 3. An optional caller-supplied settings file
//!
//! Later layers override earlier ones for identical keys.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::config::flatten;
use crate::constants;
use crate::env::Env;

/// Errors during settings loading.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read settings file {path}: {source}")]
    ReadFile {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse settings file {path}: {source}")]
    ParseFile {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("settings file {path} must contain a top-level JSON object")]
    NotAnObject { path: PathBuf },
}

/// Immutable merged settings view.
///
/// Keys are hierarchical colon-delimited paths (`"TestSection:TestString"`),
/// values are strings. Built once at startup; queries for missing keys
/// return `None` rather than failing.
#[derive(Debug, Clone, Default)]
pub struct Settings {
    values: BTreeMap<String, String>,
}

impl Settings {
    /// Load settings with proper layering.
    ///
    /// Applies the environment layer, then `appsettings.json` from the
    /// current working directory if present, then the override file if
    /// present. An override path is silently skipped when it does not exist
    /// or case-insensitively matches the conventional filename (the same
    /// file would be loaded twice otherwise).
    pub fn load(override_path: Option<&Path>, env: &Env) -> Result<Self, ConfigError> {
        Self::load_in(Path::new("."), override_path, env)
    }

    /// Like [`Settings::load`], but resolves the conventional filename
    /// against `base_dir` instead of the current working directory.
    pub fn load_in(
        base_dir: &Path,
        override_path: Option<&Path>,
        env: &Env,
    ) -> Result<Self, ConfigError> {
        let conventional = base_dir.join(constants::SETTINGS_FILENAME);
        let have_conventional = conventional.is_file();

        let override_path = override_path.filter(|p| is_distinct_override(p));

        let mut settings = Settings::default();
        settings.apply_env(env);

        if have_conventional {
            settings.apply_file(&conventional)?;
        }
        if let Some(path) = override_path {
            settings.apply_file(path)?;
        }

        Ok(settings)
    }

    /// Look up a value by hierarchical key.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    /// Sub-view under a section prefix, with the prefix stripped.
    ///
    /// `section("Logging")` maps `"Logging:Level"` to `"Level"`. A name that
    /// prefixes no keys yields an empty view.
    pub fn section(&self, name: &str) -> Settings {
        let prefix = format!("{name}:");
        let values = self
            .values
            .iter()
            .filter_map(|(key, value)| {
                key.strip_prefix(&prefix)
                    .map(|rest| (rest.to_string(), value.clone()))
            })
            .collect();
        Settings { values }
    }

    /// Whether the view holds any values.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Iterate merged pairs in sorted key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.values
            .iter()
            .map(|(key, value)| (key.as_str(), value.as_str()))
    }

    /// Apply the environment layer. `__` maps to the `:` hierarchy
    /// separator, so `TestSection__TestString` addresses
    /// `"TestSection:TestString"`.
    fn apply_env(&mut self, env: &Env) {
        for (key, value) in env.vars() {
            self.values.insert(key.replace("__", ":"), value);
        }
    }

    /// Apply one file layer on top of the current values.
    fn apply_file(&mut self, path: &Path) -> Result<(), ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadFile {
            path: path.to_path_buf(),
            source: e,
        })?;
        let document: serde_json::Value =
            serde_json::from_str(&content).map_err(|e| ConfigError::ParseFile {
                path: path.to_path_buf(),
                source: e,
            })?;
        let root = document.as_object().ok_or_else(|| ConfigError::NotAnObject {
            path: path.to_path_buf(),
        })?;
        for (key, value) in flatten::flatten(root) {
            self.values.insert(key, value);
        }
        Ok(())
    }
}

/// Whether an override path should contribute a layer: non-empty, existing,
/// and not (case-insensitively) the conventional filename itself.
fn is_distinct_override(path: &Path) -> bool {
    let text = path.as_os_str().to_string_lossy();
    if text.is_empty() || text.eq_ignore_ascii_case(constants::SETTINGS_FILENAME) {
        return false;
    }
    path.is_file()
}
