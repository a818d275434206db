//! CLI command definitions for project-init
//!
//! This module defines the CLI structure using clap's derive macros.
//! Running with no subcommand scaffolds the current directory.

pub mod check;
pub mod init;

use check::CheckArgs;
use clap::{Parser, Subcommand};
use init::InitArgs;
use std::path::PathBuf;

/// Scaffold a project layout and check its layered env configuration
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Project root (default: current directory)
    #[arg(short, long, global = true)]
    pub root: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Create the directory layout and template files (default if no subcommand given)
    Init(InitArgs),

    /// Load the env layers, verify required keys and show the database settings
    Check(CheckArgs),
}
