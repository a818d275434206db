//! Environment loader with tier-based merging.
//!
//! Loads the defaults and local env files and merges them key-by-key with
//! the variables the process already had.

use super::dotenv;
use super::merge::{EnvMap, ResolvedVar, merge_layers};
use crate::error::Result;
use crate::paths::PathRegistry;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Environment tier priority (lowest to highest).
///
/// A defaults value never clobbers a variable the process already had;
/// a local value always does.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum EnvTier {
    /// `secrets/.env.defaults`, committed to the repository
    Defaults = 0,
    /// Variables present in the process before loading
    Process = 1,
    /// `secrets/.env.local`, never committed
    Local = 2,
}

impl std::fmt::Display for EnvTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EnvTier::Defaults => write!(f, "defaults"),
            EnvTier::Process => write!(f, "process"),
            EnvTier::Local => write!(f, "local"),
        }
    }
}

/// Locations of the two env files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvFiles {
    pub defaults: PathBuf,
    pub local: PathBuf,
}

impl EnvFiles {
    /// The env files under the registry's `secrets` directory.
    pub fn from_paths(paths: &PathRegistry) -> Self {
        Self {
            defaults: paths.env_defaults(),
            local: paths.env_local(),
        }
    }

    /// Create with explicit file locations.
    pub fn with_files(defaults: impl Into<PathBuf>, local: impl Into<PathBuf>) -> Self {
        Self {
            defaults: defaults.into(),
            local: local.into(),
        }
    }
}

/// Presence of one required key.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct KeyStatus {
    pub key: String,
    pub present: bool,
}

/// Effective environment after layering.
///
/// Built once at startup and read for the rest of the process.
#[derive(Debug, Clone, Default)]
pub struct Environment {
    vars: BTreeMap<String, ResolvedVar>,
    loaded: Vec<(EnvTier, PathBuf)>,
    missing: Vec<(EnvTier, PathBuf)>,
}

impl Environment {
    /// Load both env files on top of the current process environment.
    pub fn load(files: &EnvFiles) -> Result<Self> {
        let process = std::env::vars_os()
            .filter_map(|(k, v)| Some((k.into_string().ok()?, v.into_string().ok()?)));
        Self::load_with_process(files, process)
    }

    /// Load both env files on top of an explicit process environment.
    pub fn load_with_process(
        files: &EnvFiles,
        process: impl IntoIterator<Item = (String, String)>,
    ) -> Result<Self> {
        let mut layers: Vec<(EnvTier, EnvMap)> = Vec::new();
        let mut loaded = Vec::new();
        let mut missing = Vec::new();
        let mut read_tier = |tier: EnvTier, path: &Path| -> Result<Option<EnvMap>> {
            let vars = dotenv::read(path)?;
            match &vars {
                Some(vars) => {
                    debug!(path = %path.display(), tier = %tier, keys = vars.len(), "Read env file");
                    loaded.push((tier, path.to_path_buf()));
                }
                None => missing.push((tier, path.to_path_buf())),
            }
            Ok(vars)
        };

        // Tier 1: defaults
        if let Some(vars) = read_tier(EnvTier::Defaults, &files.defaults)? {
            layers.push((EnvTier::Defaults, vars));
        }

        // Tier 2: process
        layers.push((EnvTier::Process, process.into_iter().collect()));

        // Tier 3: local overrides
        if let Some(vars) = read_tier(EnvTier::Local, &files.local)? {
            layers.push((EnvTier::Local, vars));
        }

        Ok(Self {
            vars: merge_layers(layers),
            loaded,
            missing,
        })
    }

    /// Build directly from layers, without reading files.
    pub fn from_layers(layers: impl IntoIterator<Item = (EnvTier, EnvMap)>) -> Self {
        Self {
            vars: merge_layers(layers),
            loaded: Vec::new(),
            missing: Vec::new(),
        }
    }

    /// Effective value of `key`, if any tier defines it.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.vars.get(key).map(|var| var.value.as_str())
    }

    /// Effective value of `key`, or `fallback` when no tier defines it.
    pub fn get_or<'a>(&'a self, key: &str, fallback: &'a str) -> &'a str {
        self.get(key).unwrap_or(fallback)
    }

    /// Tier that supplied the effective value of `key`.
    pub fn origin(&self, key: &str) -> Option<EnvTier> {
        self.vars.get(key).map(|var| var.tier)
    }

    /// Env files that were found and read, in load order.
    pub fn loaded_files(&self) -> impl Iterator<Item = (EnvTier, &Path)> {
        self.loaded.iter().map(|(tier, path)| (*tier, path.as_path()))
    }

    /// Env files that did not exist, in load order.
    pub fn missing_files(&self) -> impl Iterator<Item = (EnvTier, &Path)> {
        self.missing.iter().map(|(tier, path)| (*tier, path.as_path()))
    }

    /// Log which env files were read and which were missing.
    ///
    /// Loading usually happens before the root logger exists, so call this
    /// once the sinks are installed.
    pub fn log_sources(&self) {
        for (tier, path) in self.loaded_files() {
            match tier {
                EnvTier::Local => info!(path = %path.display(), "Loaded env local (override)"),
                _ => info!(path = %path.display(), "Loaded env defaults"),
            }
        }
        for (tier, path) in self.missing_files() {
            match tier {
                EnvTier::Local => {
                    warn!(path = %path.display(), "Env local not found, using defaults only")
                }
                _ => warn!(
                    path = %path.display(),
                    "Env defaults not found, falling back to built-in values"
                ),
            }
        }
    }

    pub fn is_loaded(&self, tier: EnvTier) -> bool {
        self.loaded.iter().any(|(t, _)| *t == tier)
    }

    /// Export every file-supplied value into the process environment.
    ///
    /// Must be called at startup, before any other thread is spawned.
    pub fn apply(&self) {
        for (key, var) in &self.vars {
            if var.tier == EnvTier::Process {
                continue;
            }
            // SAFETY: called once during single-threaded startup, before any
            // thread that could read the environment concurrently exists.
            unsafe {
                std::env::set_var(key, &var.value);
            }
        }
        debug!(
            count = self.vars.values().filter(|v| v.tier != EnvTier::Process).count(),
            "Exported env file values to process environment"
        );
    }

    /// Presence of each required key. A key set to an empty string counts as missing.
    pub fn check_keys(&self, required: &[&str]) -> Vec<KeyStatus> {
        required
            .iter()
            .map(|key| KeyStatus {
                key: key.to_string(),
                present: self.get(key).is_some_and(|v| !v.is_empty()),
            })
            .collect()
    }

    /// Report each required key on the console and return whether all are set.
    pub fn verify(&self, required: &[&str]) -> bool {
        let statuses = self.check_keys(required);
        for status in &statuses {
            if status.present {
                println!("{} is set.", status.key);
            } else {
                println!("{} is missing!", status.key);
            }
        }

        let all_set = statuses.iter().all(|s| s.present);
        if !all_set {
            println!();
            println!(
                "Tip: copy secrets/.env.local.example to secrets/.env.local and add your keys."
            );
        }
        all_set
    }
}
