//! project-init
//!
//! Scaffolds the project layout (default) or checks an existing project's
//! layered env configuration.

use anyhow::{Context, Result};
use clap::Parser;
use project_init::cli::check::run_check;
use project_init::cli::init::{InitArgs, run_init};
use project_init::cli::{Cli, Command};
use project_init::config::ProjectConfig;
use project_init::logging::{RootLoggerOptions, Severity, setup_root_logger};
use project_init::paths::PathRegistry;
use std::path::PathBuf;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command.unwrap_or_else(|| Command::Init(InitArgs::default())) {
        Command::Init(args) => {
            let level = if cli.verbose {
                Level::DEBUG
            } else {
                Level::WARN
            };
            let subscriber = FmtSubscriber::builder()
                .with_max_level(level)
                .with_writer(std::io::stderr)
                .finish();
            tracing::subscriber::set_global_default(subscriber)?;

            // Scaffold exactly where asked; no walking up to a parent project.
            let root = cli.root.unwrap_or_else(|| PathBuf::from("."));
            let paths = PathRegistry::new(root);
            run_init(&paths, &args)?;
        }
        Command::Check(args) => {
            let paths = match cli.root {
                Some(root) => PathRegistry::discover_from(root),
                None => PathRegistry::discover(),
            };
            let config = ProjectConfig::load(paths).context("Failed to load env files")?;
            config.env().apply();

            let level = if cli.verbose {
                Severity::Debug
            } else {
                config.log_level().parse().unwrap_or(Severity::Info)
            };
            setup_root_logger(
                "project-init",
                RootLoggerOptions::default()
                    .with_level(level)
                    .with_log_dir(config.paths().logs()),
            )?;

            config.env().log_sources();

            // Missing keys are reported, not fatal.
            run_check(&config, &args)?;
        }
    }

    Ok(())
}
