//! CLI for flakebump.

use anyhow::Result;
use clap::Parser;
use flakebump_core::config;
use flakebump_core::updater::{self, Outcome, RunOptions};
use std::path::PathBuf;

/// Bump the pinned release version and checksum in a flake file.
///
/// With no arguments, updates `flake.nix` in the current directory.
#[derive(Debug, Parser)]
#[command(name = "flakebump", version)]
#[command(about = "Sync a flake's pinned version and sha256 with the latest GitHub release", long_about = None)]
pub struct Cli {
    /// File to update (overrides `flake_file` from the config).
    #[arg(long, value_name = "PATH")]
    pub file: Option<PathBuf>,

    /// Config file to use instead of ~/.config/flakebump/config.toml.
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Fetch the latest release and checksum but do not write the file.
    #[arg(long)]
    pub dry_run: bool,
}

pub fn run_from_args() -> Result<()> {
    run(Cli::parse())
}

fn run(cli: Cli) -> Result<()> {
    let mut cfg = config::load(cli.config.as_deref())?;
    if let Some(file) = cli.file {
        cfg.flake_file = file;
    }
    tracing::debug!("effective config: {:?}", cfg);

    let outcome = updater::run(&cfg, &RunOptions::from_env(cli.dry_run))?;
    println!("Current: {}, Latest: {}", outcome.current(), outcome.latest());
    match outcome {
        Outcome::UpToDate { .. } => println!("Already up to date"),
        Outcome::Updated { to, .. } => println!("Updated to version {}", to),
        Outcome::WouldUpdate { to, checksum, .. } => {
            println!("Would update to version {} ({} = \"{}\")", to, cfg.checksum_key, checksum)
        }
    }
    Ok(())
}
