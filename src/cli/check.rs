//! `check` command: load the env layers and report what a project would see.

use crate::config::{DatabaseConfig, EnvTier, KeyStatus, ProjectConfig, REQUIRED_ENV_VARS};
use crate::format::{OutputFormat, format_database_text, format_paths_text};
use crate::paths::PathRegistry;
use anyhow::{Context, Result};
use clap::Args;
use serde::Serialize;
use std::path::Path;

/// Arguments for the check command.
#[derive(Args, Debug, Default)]
pub struct CheckArgs {
    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

/// Machine-readable check result.
#[derive(Debug, Serialize)]
pub struct CheckReport<'a> {
    pub paths: &'a PathRegistry,
    pub loaded: Vec<LoadedFile<'a>>,
    pub required: Vec<KeyStatus>,
    pub all_set: bool,
    pub database: &'a DatabaseConfig,
}

#[derive(Debug, Serialize)]
pub struct LoadedFile<'a> {
    pub tier: String,
    pub path: &'a Path,
}

impl<'a> CheckReport<'a> {
    pub fn new(config: &'a ProjectConfig) -> Self {
        let required = config.env().check_keys(&REQUIRED_ENV_VARS);
        Self {
            paths: config.paths(),
            loaded: config
                .env()
                .loaded_files()
                .map(|(tier, path)| LoadedFile {
                    tier: tier.to_string(),
                    path,
                })
                .collect(),
            all_set: required.iter().all(|s| s.present),
            required,
            database: config.database(),
        }
    }
}

/// Run the check command. Returns whether every required key is set.
pub fn run_check(config: &ProjectConfig, args: &CheckArgs) -> Result<bool> {
    match args.format {
        OutputFormat::Json => {
            let report = CheckReport::new(config);
            let json =
                serde_json::to_string_pretty(&report).context("Failed to serialize check report")?;
            println!("{}", json);
            Ok(report.all_set)
        }
        OutputFormat::Text => {
            let paths = config.paths();
            println!("Project root: {}", paths.root().display());
            print!("{}", format_paths_text(paths));
            println!();

            let env = config.env();
            if env.is_loaded(EnvTier::Defaults) {
                println!("Loaded: {}", paths.env_defaults().display());
            } else {
                println!(".env.defaults not found at: {}", paths.env_defaults().display());
            }
            if env.is_loaded(EnvTier::Local) {
                println!("Loaded: {} (override)", paths.env_local().display());
            } else {
                println!(".env.local not found. Using defaults only.");
            }
            println!();

            let all_set = config.verify_env_vars();
            println!();
            println!("{}", format_database_text(config.database()));
            Ok(all_set)
        }
    }
}
