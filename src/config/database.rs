//! Database configuration derived from the effective environment.

use super::loader::Environment;
use crate::paths::PathRegistry;
use serde::Serialize;
use std::path::PathBuf;
use tracing::warn;

pub const DB_TYPE_KEY: &str = "DB_TYPE";
pub const POSTGRES_HOST_KEY: &str = "POSTGRES_HOST";
pub const POSTGRES_PORT_KEY: &str = "POSTGRES_PORT";
pub const POSTGRES_USER_KEY: &str = "POSTGRES_USER";
pub const POSTGRES_PASSWORD_KEY: &str = "POSTGRES_PASSWORD";
pub const POSTGRES_DB_KEY: &str = "POSTGRES_DB";

pub const DEFAULT_POSTGRES_HOST: &str = "localhost";
pub const DEFAULT_POSTGRES_PORT: &str = "5432";
pub const DEFAULT_POSTGRES_USER: &str = "postgres";
pub const DEFAULT_POSTGRES_PASSWORD: &str = "";
pub const DEFAULT_POSTGRES_DB: &str = "project_db";

/// Which database backend is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DbType {
    #[default]
    Sqlite,
    Postgresql,
}

impl DbType {
    pub fn as_str(&self) -> &'static str {
        match self {
            DbType::Sqlite => "sqlite",
            DbType::Postgresql => "postgresql",
        }
    }

    /// Parse a `DB_TYPE` value, case-insensitively.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "sqlite" | "sqlite3" => Some(DbType::Sqlite),
            "postgresql" | "postgres" => Some(DbType::Postgresql),
            _ => None,
        }
    }
}

impl std::fmt::Display for DbType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// SQLite settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SqliteConfig {
    pub path: PathBuf,
}

/// PostgreSQL settings. The port stays a string, exactly as written in the env.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PostgresConfig {
    pub host: String,
    pub port: String,
    pub user: String,
    #[serde(skip_serializing)]
    pub password: String,
    pub database: String,
}

/// Database selector plus both backend configurations.
///
/// Both sub-configurations are always populated so callers can switch the
/// selector without re-deriving anything.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DatabaseConfig {
    #[serde(rename = "type")]
    pub db_type: DbType,
    pub sqlite: SqliteConfig,
    pub postgresql: PostgresConfig,
}

/// Borrowed view of the configuration the selector points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActiveDatabase<'a> {
    Sqlite(&'a SqliteConfig),
    Postgresql(&'a PostgresConfig),
}

impl DatabaseConfig {
    /// Derive the configuration from `env`, falling back to built-in defaults.
    pub fn from_env(env: &Environment, paths: &PathRegistry) -> Self {
        let db_type = match env.get(DB_TYPE_KEY) {
            None => DbType::default(),
            Some(raw) => DbType::parse(raw).unwrap_or_else(|| {
                warn!(value = raw, "Unknown DB_TYPE, using sqlite");
                DbType::default()
            }),
        };

        Self {
            db_type,
            sqlite: SqliteConfig {
                path: paths.sqlite_db(),
            },
            postgresql: PostgresConfig {
                host: env.get_or(POSTGRES_HOST_KEY, DEFAULT_POSTGRES_HOST).to_string(),
                port: env.get_or(POSTGRES_PORT_KEY, DEFAULT_POSTGRES_PORT).to_string(),
                user: env.get_or(POSTGRES_USER_KEY, DEFAULT_POSTGRES_USER).to_string(),
                password: env
                    .get_or(POSTGRES_PASSWORD_KEY, DEFAULT_POSTGRES_PASSWORD)
                    .to_string(),
                database: env.get_or(POSTGRES_DB_KEY, DEFAULT_POSTGRES_DB).to_string(),
            },
        }
    }

    /// The sub-configuration selected by `DB_TYPE`.
    pub fn active(&self) -> ActiveDatabase<'_> {
        match self.db_type {
            DbType::Sqlite => ActiveDatabase::Sqlite(&self.sqlite),
            DbType::Postgresql => ActiveDatabase::Postgresql(&self.postgresql),
        }
    }
}
