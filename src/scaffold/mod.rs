//! Project scaffolding.
//!
//! Creates the fixed directory layout and writes each template file only
//! when it is missing. Every step re-checks the filesystem, so an
//! interrupted run can simply be repeated.

mod templates;

pub use templates::{TEMPLATES, Template};

use crate::error::{Error, Result};
use crate::paths::PathRegistry;
use serde::Serialize;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Directories created under the root, `/`-separated.
pub const DIRECTORIES: [&str; 8] = [
    "src/configs",
    "src/utils",
    "notebooks",
    "data",
    "db",
    "logs",
    "secrets",
    ".vscode",
];

/// What an idempotent step did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WriteOutcome {
    Created,
    /// Already present; left untouched.
    Skipped,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionKind {
    Directory,
    File,
}

/// One directory or file the scaffolder handled.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Action {
    pub kind: ActionKind,
    pub path: PathBuf,
    pub outcome: WriteOutcome,
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match (self.kind, self.outcome) {
            (ActionKind::Directory, WriteOutcome::Created) => {
                write!(f, "Created directory: {}", self.path.display())
            }
            (ActionKind::Directory, WriteOutcome::Skipped) => {
                write!(f, "Directory exists: {}", self.path.display())
            }
            (ActionKind::File, WriteOutcome::Created) => {
                write!(f, "Created: {}", self.path.display())
            }
            (ActionKind::File, WriteOutcome::Skipped) => {
                write!(f, "Skipped (already exists): {}", self.path.display())
            }
        }
    }
}

/// Everything a scaffolder run did, in order.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ScaffoldReport {
    pub actions: Vec<Action>,
}

impl ScaffoldReport {
    pub fn created(&self) -> usize {
        self.count(WriteOutcome::Created)
    }

    pub fn skipped(&self) -> usize {
        self.count(WriteOutcome::Skipped)
    }

    fn count(&self, outcome: WriteOutcome) -> usize {
        self.actions.iter().filter(|a| a.outcome == outcome).count()
    }
}

/// Create `path` and any missing ancestors.
pub fn ensure_dir(path: &Path) -> Result<WriteOutcome> {
    if path.is_dir() {
        return Ok(WriteOutcome::Skipped);
    }
    std::fs::create_dir_all(path).map_err(|e| Error::io(path, e))?;
    Ok(WriteOutcome::Created)
}

/// Write `content` to `path` unless something already exists there.
///
/// An existing file is never opened for writing, so its bytes stay as they were.
pub fn ensure_file(path: &Path, content: &str) -> Result<WriteOutcome> {
    let mut file = match OpenOptions::new().write(true).create_new(true).open(path) {
        Ok(file) => file,
        Err(err) if err.kind() == std::io::ErrorKind::AlreadyExists => {
            return Ok(WriteOutcome::Skipped);
        }
        Err(err) => return Err(Error::io(path, err)),
    };
    file.write_all(content.as_bytes())
        .map_err(|e| Error::io(path, e))?;
    Ok(WriteOutcome::Created)
}

/// Join a `/`-separated relative path onto `root`.
fn under(root: &Path, relative: &str) -> PathBuf {
    relative
        .split('/')
        .fold(root.to_path_buf(), |path, segment| path.join(segment))
}

/// Lays out a project under a registry's root.
#[derive(Debug, Clone)]
pub struct Scaffolder<'a> {
    paths: &'a PathRegistry,
    quiet: bool,
}

impl<'a> Scaffolder<'a> {
    pub fn new(paths: &'a PathRegistry) -> Self {
        Self {
            paths,
            quiet: false,
        }
    }

    /// Suppress the per-action console lines.
    pub fn quiet(mut self, quiet: bool) -> Self {
        self.quiet = quiet;
        self
    }

    /// Create every directory, then every template file.
    ///
    /// Stops at the first filesystem error; whatever was created before it stays.
    pub fn run(&self) -> Result<ScaffoldReport> {
        let root = self.paths.root();
        let mut report = ScaffoldReport::default();

        for dir in DIRECTORIES {
            let path = under(root, dir);
            let outcome = ensure_dir(&path)?;
            self.record(&mut report, ActionKind::Directory, path, outcome);
        }

        for template in TEMPLATES {
            let path = under(root, template.path);
            let outcome = ensure_file(&path, template.content)?;
            self.record(&mut report, ActionKind::File, path, outcome);
        }

        debug!(
            root = %root.display(),
            created = report.created(),
            skipped = report.skipped(),
            "Scaffold finished"
        );
        Ok(report)
    }

    fn record(&self, report: &mut ScaffoldReport, kind: ActionKind, path: PathBuf, outcome: WriteOutcome) {
        let action = Action {
            kind,
            path,
            outcome,
        };
        if !self.quiet {
            println!("{}", action);
        }
        report.actions.push(action);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_ensure_file_creates_then_skips() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("README.md");

        assert_eq!(ensure_file(&path, "first").unwrap(), WriteOutcome::Created);
        assert_eq!(ensure_file(&path, "second").unwrap(), WriteOutcome::Skipped);
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "first");
    }

    #[test]
    fn test_ensure_file_missing_parent_is_an_error() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("no-such-dir").join("settings.json");
        let err = ensure_file(&path, "{}").unwrap_err();
        assert!(err.to_string().contains("settings.json"));
    }

    #[test]
    fn test_ensure_dir_nested_and_existing() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("src").join("configs");

        assert_eq!(ensure_dir(&path).unwrap(), WriteOutcome::Created);
        assert!(path.is_dir());
        assert_eq!(ensure_dir(&path).unwrap(), WriteOutcome::Skipped);
    }

    #[test]
    fn test_under_splits_segments() {
        let path = under(Path::new("/p"), "src/configs/config.rs");
        assert_eq!(path, Path::new("/p").join("src").join("configs").join("config.rs"));
    }

    #[test]
    fn test_action_display() {
        let action = Action {
            kind: ActionKind::File,
            path: PathBuf::from("/p/.gitignore"),
            outcome: WriteOutcome::Skipped,
        };
        assert_eq!(action.to_string(), "Skipped (already exists): /p/.gitignore");
    }
}
