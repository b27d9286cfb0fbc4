// ABOUTME: Main application entry point.
// ABOUTME: Parses flags, loads config, and runs the designer command loop.

mod command;
mod host;

use std::fs::File;
use std::io::{self, BufReader};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use cw_core::Config;
use host::Host;

#[derive(Debug, Parser)]
#[command(
    name = "cw-designer",
    about = "Curtain-wall panel grid designer",
    version
)]
struct Cli {
    /// Config file (defaults to ~/.config/curtain-wall/config.toml)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Read commands from this file instead of stdin
    #[arg(long)]
    script: Option<PathBuf>,

    /// Project file to restore before running commands (bare flag uses the
    /// default project location)
    #[arg(long, value_name = "PATH")]
    load: Option<Option<PathBuf>>,

    /// Project file to write after the last command (bare flag uses the
    /// default project location)
    #[arg(long, value_name = "PATH")]
    save: Option<Option<PathBuf>>,

    /// Project name stored in saved files
    #[arg(long, default_value = "Untitled")]
    name: String,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    tracing::info!("Starting cw-designer");

    let config = match &cli.config {
        Some(path) => Config::load(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => Config::load_or_default(),
    };
    tracing::info!(
        "Default grid {}x{} at {} x {} m",
        config.grid.cols,
        config.grid.rows,
        config.grid.width,
        config.grid.height
    );

    let mut host = Host::new(config, cli.name)?;
    if let Some(path) = &cli.load {
        host.load(path.as_deref())?;
    }

    let stdout = io::stdout();
    let mut out = stdout.lock();
    match &cli.script {
        Some(path) => {
            let file = File::open(path)
                .with_context(|| format!("Failed to open script {}", path.display()))?;
            host.run(BufReader::new(file), &mut out)?;
        }
        None => host.run(io::stdin().lock(), &mut out)?,
    }

    if let Some(path) = &cli.save {
        let path = host.save(path.as_deref())?;
        tracing::info!("Project written to {}", path.display());
    }

    tracing::info!("Session finished");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_flags() {
        let cli = Cli::try_parse_from([
            "cw-designer",
            "--script",
            "wall.txt",
            "--save",
            "wall.bin",
            "--name",
            "Lobby",
        ])
        .unwrap();
        assert_eq!(cli.script, Some(PathBuf::from("wall.txt")));
        assert_eq!(cli.save, Some(Some(PathBuf::from("wall.bin"))));
        assert_eq!(cli.name, "Lobby");
        assert!(cli.config.is_none());
    }

    #[test]
    fn bare_project_flags_select_default_location() {
        let cli = Cli::try_parse_from(["cw-designer", "--load", "--save"]).unwrap();
        assert_eq!(cli.load, Some(None));
        assert_eq!(cli.save, Some(None));
        assert!(Cli::try_parse_from(["cw-designer"]).unwrap().save.is_none());
    }

    #[test]
    fn name_defaults_to_untitled() {
        let cli = Cli::try_parse_from(["cw-designer"]).unwrap();
        assert_eq!(cli.name, "Untitled");
    }
}
