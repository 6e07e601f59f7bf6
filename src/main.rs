//! appstrap — bootstrap demo binary.
//!
//! Entry point and error handling boundary. Uses `anyhow` for
//! ergonomic error propagation and user-facing messages.

mod cli;

use std::path::PathBuf;
use std::process;

use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;

use appstrap::constants;
use appstrap::env::Env;
use appstrap::startup::{Startup, StartupOptions};

use cli::args::{Cli, Command};

fn main() {
    if let Err(err) = run() {
        eprintln!("Error: {err:#}");
        process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    let mut options = StartupOptions::default();
    if cli.no_logging {
        options = options.without_logging();
    }
    if let Some(path) = resolve_settings_path(&cli, &Env::real()) {
        options = options.with_settings_path(path);
    }

    let startup = Startup::init(options).context("startup failed")?;

    match cli.command {
        Command::Get { key } => run_get(&startup, &key),
        Command::Dump => run_dump(&startup),
    }
}

/// The `--settings` flag wins over the `APPSTRAP_SETTINGS` variable.
fn resolve_settings_path(cli: &Cli, env: &Env) -> Option<PathBuf> {
    cli.settings
        .clone()
        .or_else(|| env.var(constants::ENV_SETTINGS).ok().map(PathBuf::from))
}

/// Print a single key lookup result.
fn run_get(startup: &Startup, key: &str) -> Result<()> {
    match startup.settings().get(key) {
        Some(value) => println!("{} {value}", format!("{key}:").bold()),
        None => println!("{} {}", format!("{key}:").bold(), "(not set)".dimmed()),
    }
    Ok(())
}

/// Print every merged key-value pair.
fn run_dump(startup: &Startup) -> Result<()> {
    for (key, value) in startup.settings().iter() {
        println!("{} {value}", format!("{key}:").bold());
    }
    Ok(())
}
