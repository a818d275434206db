//! Output formatting for CLI reports.

use crate::config::DatabaseConfig;
use crate::paths::PathRegistry;
use clap::ValueEnum;

/// Output format for the `check` report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Format the path registry as an aligned `name  path` table.
pub fn format_paths_text(paths: &PathRegistry) -> String {
    let width = paths.iter().map(|(name, _)| name.len()).max().unwrap_or(0);
    let mut out = String::new();
    for (name, path) in paths.iter() {
        out.push_str(&format!("  {:<width$}  {}\n", name, path.display(), width = width));
    }
    out
}

/// One-line summary of the active database.
pub fn format_database_text(db: &DatabaseConfig) -> String {
    match db.active() {
        crate::config::ActiveDatabase::Sqlite(sqlite) => {
            format!("Database type: {} ({})", db.db_type, sqlite.path.display())
        }
        crate::config::ActiveDatabase::Postgresql(pg) => format!(
            "Database type: {} ({}@{}:{}/{})",
            db.db_type, pg.user, pg.host, pg.port, pg.database
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{EnvMap, EnvTier, Environment};

    #[test]
    fn test_paths_table_lists_every_name() {
        let text = format_paths_text(&PathRegistry::new("/p"));
        assert_eq!(text.lines().count(), 9);
        assert!(text.contains("  notebooks  /p/notebooks"));
        assert!(text.contains(&format!("  {:<9}  /p\n", "root")));
    }

    #[test]
    fn test_database_summary() {
        let paths = PathRegistry::new("/p");
        let sqlite = DatabaseConfig::from_env(&Environment::default(), &paths);
        assert_eq!(
            format_database_text(&sqlite),
            "Database type: sqlite (/p/db/database.sqlite3)"
        );

        let env = Environment::from_layers([(
            EnvTier::Local,
            EnvMap::from([("DB_TYPE".to_string(), "postgresql".to_string())]),
        )]);
        let pg = DatabaseConfig::from_env(&env, &paths);
        assert_eq!(
            format_database_text(&pg),
            "Database type: postgresql (postgres@localhost:5432/project_db)"
        );
    }
}
