//! `init` command: lay out a project under the root.

use crate::paths::PathRegistry;
use crate::scaffold::{ScaffoldReport, Scaffolder};
use anyhow::{Context, Result};
use clap::Args;

/// Arguments for the init command.
#[derive(Args, Debug, Default)]
pub struct InitArgs {
    /// Only print the summary, not one line per directory and file.
    #[arg(short, long)]
    pub quiet: bool,
}

/// Run the init command.
pub fn run_init(paths: &PathRegistry, args: &InitArgs) -> Result<ScaffoldReport> {
    let report = Scaffolder::new(paths)
        .quiet(args.quiet)
        .run()
        .with_context(|| format!("Failed to scaffold project at {}", paths.root().display()))?;

    println!();
    println!("{}", "=".repeat(50));
    println!(
        "Project structure ready ({} created, {} skipped)",
        report.created(),
        report.skipped()
    );
    println!("{}", "=".repeat(50));
    println!();
    println!("Next steps:");
    println!("  1. cp secrets/.env.local.example secrets/.env.local");
    println!("  2. Edit secrets/.env.local and add your API keys");
    println!("  3. project-init check  # verify setup");

    Ok(report)
}
