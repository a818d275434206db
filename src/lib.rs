//! # project-init
//!
//! Scaffolds a project layout and provides the runtime pieces the generated
//! support modules rely on:
//! - [`paths`]: named project directories derived from one root
//! - [`config`]: layered env loading (`.env.defaults` then `.env.local`) and
//!   the derived database configuration
//! - [`logging`]: root logger with a colored console sink and a
//!   size-rotated file sink
//! - [`scaffold`]: idempotent creation of directories and template files
//!
//! ## Example
//!
//! ```rust,no_run
//! use project_init::config::ProjectConfig;
//! use project_init::logging::{RootLoggerOptions, setup_logger, setup_root_logger};
//!
//! let config = ProjectConfig::discover().expect("failed to read env files");
//! setup_root_logger(
//!     "myapp",
//!     RootLoggerOptions::default().with_log_dir(config.paths().logs()),
//! )
//! .expect("failed to set up logging");
//!
//! let logger = setup_logger("myapp.main");
//! logger.info(&format!("Database type: {}", config.database().db_type));
//! ```

pub use error::{Error, Result};

pub mod cli;
pub mod config;
pub mod error;
pub mod format;
pub mod logging;
pub mod paths;
pub mod scaffold;
