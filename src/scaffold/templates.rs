//! Template files written by the scaffolder.
//!
//! Contents are embedded at compile time using `include_str!`.

/// A file the scaffolder creates when missing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Template {
    /// Location relative to the project root, `/`-separated.
    pub path: &'static str,
    pub content: &'static str,
}

pub const ENV_DEFAULTS: &str = include_str!("templates/env.defaults");

pub const ENV_LOCAL_EXAMPLE: &str = include_str!("templates/env.local.example");

pub const GITIGNORE: &str = include_str!("templates/gitignore");

/// JSON with comments.
pub const VSCODE_SETTINGS: &str = include_str!("templates/vscode_settings.json");

pub const CONFIG_MODULE: &str = include_str!("templates/config.rs.tmpl");

pub const LOGGING_MODULE: &str = include_str!("templates/config_logs.rs.tmpl");

pub const README: &str = include_str!("templates/README.md.tmpl");

/// Every template, in the order the scaffolder writes them.
pub const TEMPLATES: [Template; 7] = [
    Template {
        path: "secrets/.env.defaults",
        content: ENV_DEFAULTS,
    },
    Template {
        path: "secrets/.env.local.example",
        content: ENV_LOCAL_EXAMPLE,
    },
    Template {
        path: ".gitignore",
        content: GITIGNORE,
    },
    Template {
        path: ".vscode/settings.json",
        content: VSCODE_SETTINGS,
    },
    Template {
        path: "src/configs/config.rs",
        content: CONFIG_MODULE,
    },
    Template {
        path: "src/configs/config_logs.rs",
        content: LOGGING_MODULE,
    },
    Template {
        path: "README.md",
        content: README,
    },
];

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{REQUIRED_ENV_VARS, dotenv};

    #[test]
    fn test_env_defaults_blocks() {
        let vars = dotenv::parse(ENV_DEFAULTS);
        assert_eq!(vars["DB_TYPE"], "sqlite");
        assert_eq!(vars["POSTGRES_HOST"], "localhost");
        assert_eq!(vars["POSTGRES_PORT"], "5432");
        assert_eq!(vars["POSTGRES_USER"], "postgres");
        assert_eq!(vars["POSTGRES_DB"], "project_db");
        assert_eq!(vars["LOG_LEVEL"], "INFO");
        assert!(!vars.contains_key("POSTGRES_PASSWORD"));
    }

    #[test]
    fn test_local_example_has_key_placeholders_only() {
        let vars = dotenv::parse(ENV_LOCAL_EXAMPLE);
        for key in REQUIRED_ENV_VARS {
            assert!(vars.contains_key(key), "missing {}", key);
        }
        assert!(vars.contains_key("HF_TOKEN"));
        // Production overrides ship commented out.
        assert!(!vars.contains_key("POSTGRES_PASSWORD"));
        assert!(ENV_LOCAL_EXAMPLE.contains("# POSTGRES_PASSWORD="));
        assert!(ENV_LOCAL_EXAMPLE.contains("# POSTGRES_HOST="));
    }

    #[test]
    fn test_gitignore_reincludes_env_templates() {
        let lines: Vec<&str> = GITIGNORE.lines().collect();
        assert!(lines.contains(&"secrets/.env*"));
        assert!(lines.contains(&"!secrets/.env.defaults"));
        assert!(lines.contains(&"!secrets/.env.local.example"));
        let ignore = lines.iter().position(|l| *l == "secrets/.env*").unwrap();
        let keep = lines.iter().position(|l| *l == "!secrets/.env.defaults").unwrap();
        assert!(keep > ignore, "re-include must follow the ignore rule");
    }

    #[test]
    fn test_vscode_settings_keys() {
        assert!(VSCODE_SETTINGS.contains("\"python.defaultInterpreterPath\": \"\""));
        assert!(VSCODE_SETTINGS.contains("\"python.analysis.typeCheckingMode\""));
        assert!(VSCODE_SETTINGS.contains("\"python.analysis.autoImportCompletions\""));
        assert!(VSCODE_SETTINGS.contains("\"files.exclude\""));
        assert!(VSCODE_SETTINGS.contains("\"liveServer.settings.host\": \"127.0.0.1\""));
        assert!(VSCODE_SETTINGS.contains("\"liveServer.settings.root\": \"app\""));
    }

    #[test]
    fn test_generated_modules_expose_entry_points() {
        assert!(CONFIG_MODULE.contains("pub static CONFIG"));
        assert!(CONFIG_MODULE.contains("pub fn verify_env_vars"));
        assert!(CONFIG_MODULE.contains("pub fn db_config"));
        assert!(CONFIG_MODULE.contains("pub fn paths"));
        for symbol in ["ColorFormatter", "setup_root_logger", "setup_logger"] {
            assert!(LOGGING_MODULE.contains(symbol), "missing {}", symbol);
        }
    }

    #[test]
    fn test_template_paths_are_unique() {
        let mut paths: Vec<&str> = TEMPLATES.iter().map(|t| t.path).collect();
        paths.sort();
        paths.dedup();
        assert_eq!(paths.len(), TEMPLATES.len());
    }
}
