//! Settings loading and layering.
//!
//! Handles environment variable resolution, `appsettings.json` loading,
//! and override-file merging with proper precedence ordering.

mod flatten;
pub mod loader;

pub use loader::{ConfigError, Settings};
