//! Named project paths.
//!
//! This module provides the path registry that:
//! - Derives every well-known directory from a single project root
//! - Normalizes `.` and `..` lexically (pure path manipulation, no filesystem I/O)
//! - Exposes the env file and SQLite locations the config layer reads
//!
//! Only [`detect_root`] and [`PathRegistry::discover`] touch the disk, and
//! only to look for an existing `secrets/.env.defaults` marker.

use serde::Serialize;
use std::path::{Component, Path, PathBuf};

/// Environment variable that pins the project root for `discover()`.
pub const ROOT_ENV_VAR: &str = "PROJECT_INIT_ROOT";

pub const ENV_DEFAULTS_FILE: &str = ".env.defaults";
pub const ENV_LOCAL_FILE: &str = ".env.local";
pub const ENV_LOCAL_EXAMPLE_FILE: &str = ".env.local.example";
pub const SQLITE_FILE: &str = "database.sqlite3";

/// Logical directory names, in registry order.
pub const NAMES: [&str; 9] = [
    "root",
    "src",
    "configs",
    "data",
    "db",
    "logs",
    "utils",
    "secrets",
    "notebooks",
];

/// Absolute project directories, computed once from the root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PathRegistry {
    root: PathBuf,
    src: PathBuf,
    configs: PathBuf,
    data: PathBuf,
    db: PathBuf,
    logs: PathBuf,
    utils: PathBuf,
    secrets: PathBuf,
    notebooks: PathBuf,
}

impl PathRegistry {
    /// Build the registry for `root`.
    ///
    /// A relative root is resolved against the current working directory.
    /// The directories are not required to exist.
    pub fn new(root: impl AsRef<Path>) -> Self {
        let root = resolve_root(root.as_ref());
        Self {
            src: root.join("src"),
            configs: root.join("src").join("configs"),
            data: root.join("data"),
            db: root.join("db"),
            logs: root.join("logs"),
            utils: root.join("src").join("utils"),
            secrets: root.join("secrets"),
            notebooks: root.join("notebooks"),
            root,
        }
    }

    /// Build the registry for the detected project root.
    ///
    /// Starts from `PROJECT_INIT_ROOT` if set, otherwise the current
    /// directory, then walks up with [`detect_root`].
    pub fn discover() -> Self {
        let start = std::env::var_os(ROOT_ENV_VAR)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("."));
        Self::discover_from(start)
    }

    /// Build the registry for the project root at or above `start`.
    pub fn discover_from(start: impl AsRef<Path>) -> Self {
        Self::new(detect_root(&resolve_root(start.as_ref())))
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn src(&self) -> &Path {
        &self.src
    }

    pub fn configs(&self) -> &Path {
        &self.configs
    }

    pub fn data(&self) -> &Path {
        &self.data
    }

    pub fn db(&self) -> &Path {
        &self.db
    }

    pub fn logs(&self) -> &Path {
        &self.logs
    }

    pub fn utils(&self) -> &Path {
        &self.utils
    }

    pub fn secrets(&self) -> &Path {
        &self.secrets
    }

    pub fn notebooks(&self) -> &Path {
        &self.notebooks
    }

    /// Look up a directory by its logical name.
    pub fn get(&self, name: &str) -> Option<&Path> {
        let path = match name {
            "root" => &self.root,
            "src" => &self.src,
            "configs" => &self.configs,
            "data" => &self.data,
            "db" => &self.db,
            "logs" => &self.logs,
            "utils" => &self.utils,
            "secrets" => &self.secrets,
            "notebooks" => &self.notebooks,
            _ => return None,
        };
        Some(path)
    }

    /// All `(name, path)` pairs in registry order.
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &Path)> + '_ {
        NAMES
            .into_iter()
            .filter_map(move |name| self.get(name).map(|path| (name, path)))
    }

    /// Versionable defaults env file.
    pub fn env_defaults(&self) -> PathBuf {
        self.secrets.join(ENV_DEFAULTS_FILE)
    }

    /// Local, never-committed overrides env file.
    pub fn env_local(&self) -> PathBuf {
        self.secrets.join(ENV_LOCAL_FILE)
    }

    /// Template users copy to `.env.local`.
    pub fn env_local_example(&self) -> PathBuf {
        self.secrets.join(ENV_LOCAL_EXAMPLE_FILE)
    }

    /// Default SQLite database file.
    pub fn sqlite_db(&self) -> PathBuf {
        self.db.join(SQLITE_FILE)
    }
}

/// Find the project root at or above `start`.
///
/// Returns the first ancestor (including `start`) that holds
/// `secrets/.env.defaults`, or `start` itself when none does.
pub fn detect_root(start: &Path) -> PathBuf {
    start
        .ancestors()
        .find(|dir| dir.join("secrets").join(ENV_DEFAULTS_FILE).is_file())
        .unwrap_or(start)
        .to_path_buf()
}

/// Make `root` absolute and lexically normalized.
fn resolve_root(root: &Path) -> PathBuf {
    let absolute = if root.as_os_str().is_empty() || root == Path::new(".") {
        std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."))
    } else if root.is_absolute() {
        root.to_path_buf()
    } else {
        std::env::current_dir()
            .unwrap_or_else(|_| PathBuf::from("."))
            .join(root)
    };
    normalize_path_components(&absolute)
}

/// Normalize path components (resolve `.` and `..`) without touching the filesystem.
fn normalize_path_components(path: &Path) -> PathBuf {
    let mut components = Vec::new();

    for component in path.components() {
        match component {
            Component::Prefix(_) | Component::RootDir | Component::Normal(_) => {
                components.push(component);
            }
            Component::CurDir => {}
            Component::ParentDir => {
                if let Some(Component::Normal(_)) = components.last() {
                    components.pop();
                } else if !matches!(
                    components.last(),
                    Some(Component::RootDir | Component::Prefix(_))
                ) {
                    components.push(Component::ParentDir);
                }
            }
        }
    }

    components.iter().collect()
}
