//! Clap argument types for the demo binary.

use clap::Parser;
use std::path::PathBuf;

/// Layered settings and logging bootstrap for command-line programs.
#[derive(Parser, Debug)]
#[command(name = "appstrap", version)]
pub struct Cli {
    /// Additional settings file applied on top of appsettings.json
    /// (falls back to the APPSTRAP_SETTINGS environment variable).
    #[arg(long, global = true)]
    pub settings: Option<PathBuf>,

    /// Skip installing the process-wide logger.
    #[arg(long, global = true, default_value_t = false)]
    pub no_logging: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Available commands.
#[derive(clap::Subcommand, Debug)]
pub enum Command {
    /// Print the value of a hierarchical settings key.
    Get {
        /// Colon-delimited key, e.g. "TestSection:TestString".
        key: String,
    },

    /// Print every merged key-value pair in sorted order.
    Dump,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_get_with_global_flags() {
        let cli = Cli::try_parse_from([
            "appstrap",
            "--settings",
            "mysettings.json",
            "--no-logging",
            "get",
            "TestSection:TestString",
        ])
        .unwrap();
        assert_eq!(
            cli.settings.as_deref(),
            Some(std::path::Path::new("mysettings.json"))
        );
        assert!(cli.no_logging);
        assert!(matches!(cli.command, Command::Get { ref key } if key == "TestSection:TestString"));
    }

    #[test]
    fn parses_dump_without_flags() {
        let cli = Cli::try_parse_from(["appstrap", "dump"]).unwrap();
        assert!(cli.settings.is_none());
        assert!(!cli.no_logging);
        assert!(matches!(cli.command, Command::Dump));
    }

    #[test]
    fn global_flags_may_follow_the_subcommand() {
        let cli = Cli::try_parse_from(["appstrap", "dump", "--no-logging"]).unwrap();
        assert!(cli.no_logging);
    }
}
