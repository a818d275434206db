//! Layered project configuration.
//!
//! Consolidates configuration from three tiers with key-by-key merging:
//! 1. **Defaults** - `secrets/.env.defaults` (committed)
//! 2. **Process** - variables already set when the process started
//! 3. **Local** - `secrets/.env.local` (never committed, always wins)
//!
//! The result is a [`ProjectConfig`] context built once at startup and
//! passed by reference to whatever needs paths, env values, or the
//! database settings.
//!
//! ## Environment Variables
//! - `DB_TYPE` - `sqlite` (default) or `postgresql`
//! - `POSTGRES_HOST`, `POSTGRES_PORT`, `POSTGRES_USER`, `POSTGRES_PASSWORD`, `POSTGRES_DB`
//! - `LOG_LEVEL` - root logger level (default `INFO`)
//! - `OPENAI_API_KEY`, `UPSTAGE_API_KEY` - required, checked by `verify_env_vars`
//! - `HF_TOKEN` - documented in the local template, not verified

mod database;
pub mod dotenv;
mod loader;
mod merge;

pub use database::*;
pub use loader::{EnvFiles, EnvTier, Environment, KeyStatus};
pub use merge::{EnvMap, ResolvedVar, merge_layer, merge_layers};

use crate::error::Result;
use crate::paths::PathRegistry;

/// Keys `verify_env_vars` requires to be set and non-empty.
pub const REQUIRED_ENV_VARS: [&str; 2] = ["OPENAI_API_KEY", "UPSTAGE_API_KEY"];

/// Keys the local template documents but nothing verifies.
pub const OPTIONAL_ENV_VARS: [&str; 1] = ["HF_TOKEN"];

pub const LOG_LEVEL_KEY: &str = "LOG_LEVEL";
pub const DEFAULT_LOG_LEVEL: &str = "INFO";

/// Process-scoped configuration context.
#[derive(Debug, Clone)]
pub struct ProjectConfig {
    paths: PathRegistry,
    env: Environment,
    database: DatabaseConfig,
}

impl ProjectConfig {
    /// Load the env layers for `paths` on top of the process environment.
    pub fn load(paths: PathRegistry) -> Result<Self> {
        let env = Environment::load(&EnvFiles::from_paths(&paths))?;
        Ok(Self::from_parts(paths, env))
    }

    /// Load for the detected project root.
    pub fn discover() -> Result<Self> {
        Self::load(PathRegistry::discover())
    }

    /// Assemble from an already-built environment.
    pub fn from_parts(paths: PathRegistry, env: Environment) -> Self {
        let database = DatabaseConfig::from_env(&env, &paths);
        Self {
            paths,
            env,
            database,
        }
    }

    pub fn paths(&self) -> &PathRegistry {
        &self.paths
    }

    pub fn env(&self) -> &Environment {
        &self.env
    }

    pub fn database(&self) -> &DatabaseConfig {
        &self.database
    }

    /// `LOG_LEVEL` from the merged environment.
    pub fn log_level(&self) -> &str {
        self.env.get_or(LOG_LEVEL_KEY, DEFAULT_LOG_LEVEL)
    }

    /// Print the state of every required key; true when all are set.
    pub fn verify_env_vars(&self) -> bool {
        self.env.verify(&REQUIRED_ENV_VARS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_from_parts_derives_database() {
        let env = Environment::from_layers([(
            EnvTier::Local,
            EnvMap::from([
                ("DB_TYPE".to_string(), "postgresql".to_string()),
                ("LOG_LEVEL".to_string(), "DEBUG".to_string()),
            ]),
        )]);
        let config = ProjectConfig::from_parts(PathRegistry::new("/p"), env);

        assert_eq!(config.database().db_type, DbType::Postgresql);
        assert_eq!(config.log_level(), "DEBUG");
        assert_eq!(config.paths().root(), std::path::Path::new("/p"));
    }

    #[test]
    fn test_load_reads_secrets_dir() {
        let temp = TempDir::new().unwrap();
        let paths = PathRegistry::new(temp.path());
        std::fs::create_dir_all(paths.secrets()).unwrap();
        std::fs::write(paths.env_defaults(), "POSTGRES_DB=from_defaults\n").unwrap();
        std::fs::write(paths.env_local(), "POSTGRES_DB=from_local\n").unwrap();

        let config = ProjectConfig::load(paths).unwrap();
        assert_eq!(config.database().postgresql.database, "from_local");
        assert!(config.env().is_loaded(EnvTier::Defaults));
        assert!(config.env().is_loaded(EnvTier::Local));
    }

    #[test]
    fn test_log_level_fallback() {
        let config = ProjectConfig::from_parts(PathRegistry::new("/p"), Environment::default());
        assert_eq!(config.log_level(), "INFO");
    }
}
