//! Process-wide logging setup.
//!
//! [`setup_root_logger`] installs a tracing subscriber with two sinks:
//! - a size-rotating file under the logs directory (plain layout)
//! - stderr, with the level token colored by severity
//!
//! Sinks are attached once per process; later calls hand back the existing
//! [`RootLogger`] and only re-apply the requested level. [`setup_logger`] returns a
//! named [`Logger`] with no sinks of its own: its records go through the
//! root logger's sinks carrying its name and the caller's location.

mod format;
mod rotate;

pub use format::{ColorFormatter, EventClock, LogRecord, PlainFormatter, RESET, TIMESTAMP_FORMAT};
pub use rotate::{DEFAULT_BACKUP_COUNT, DEFAULT_MAX_BYTES, RotatingFileWriter};

use crate::error::{Error, Result};
use crate::paths::PathRegistry;
use chrono::{NaiveDate, Utc};
use std::panic::Location;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, OnceLock};
use tracing::Level;
use tracing_subscriber::filter::{EnvFilter, LevelFilter};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{Registry, fmt, reload};

/// The five severities the sinks know how to label and color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Severity {
    Debug,
    Info,
    Warning,
    Error,
    Critical,
}

impl Severity {
    pub const ALL: [Severity; 5] = [
        Severity::Debug,
        Severity::Info,
        Severity::Warning,
        Severity::Error,
        Severity::Critical,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Debug => "DEBUG",
            Severity::Info => "INFO",
            Severity::Warning => "WARNING",
            Severity::Error => "ERROR",
            Severity::Critical => "CRITICAL",
        }
    }

    /// ANSI color that opens the level token on the console.
    pub fn color(&self) -> &'static str {
        match self {
            Severity::Debug => "\x1b[94m",
            Severity::Info => "\x1b[92m",
            Severity::Warning => "\x1b[93m",
            Severity::Error => "\x1b[91m",
            Severity::Critical => "\x1b[95m",
        }
    }

    /// Parse a level name, case-insensitively.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "debug" | "trace" => Some(Severity::Debug),
            "info" => Some(Severity::Info),
            "warning" | "warn" => Some(Severity::Warning),
            "error" => Some(Severity::Error),
            "critical" | "fatal" => Some(Severity::Critical),
            _ => None,
        }
    }

    /// Tracing has no critical level; critical records travel as ERROR.
    pub fn to_tracing(&self) -> Level {
        match self {
            Severity::Debug => Level::DEBUG,
            Severity::Info => Level::INFO,
            Severity::Warning => Level::WARN,
            Severity::Error | Severity::Critical => Level::ERROR,
        }
    }

    /// TRACE folds into DEBUG.
    pub fn from_tracing(level: &Level) -> Self {
        match *level {
            Level::TRACE | Level::DEBUG => Severity::Debug,
            Level::INFO => Severity::Info,
            Level::WARN => Severity::Warning,
            _ => Severity::Error,
        }
    }
}

impl std::str::FromStr for Severity {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s).ok_or_else(|| Error::InvalidLevel(s.to_string()))
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Settings for [`setup_root_logger`].
#[derive(Debug, Clone)]
pub struct RootLoggerOptions {
    /// Minimum severity; `RUST_LOG` overrides it when set.
    pub level: Severity,
    /// Rotate once the file would reach this size (0 disables rotation).
    pub max_bytes: u64,
    /// Rotated files to keep.
    pub backup_count: usize,
    /// Log directory; defaults to `logs/` under the detected project root.
    pub log_dir: Option<PathBuf>,
}

impl Default for RootLoggerOptions {
    fn default() -> Self {
        Self {
            level: Severity::Info,
            max_bytes: DEFAULT_MAX_BYTES,
            backup_count: DEFAULT_BACKUP_COUNT,
            log_dir: None,
        }
    }
}

impl RootLoggerOptions {
    pub fn with_level(mut self, level: Severity) -> Self {
        self.level = level;
        self
    }

    pub fn with_log_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.log_dir = Some(dir.into());
        self
    }

    /// Size threshold in MiB.
    pub fn with_max_size_mb(mut self, mb: u64) -> Self {
        self.max_bytes = mb * 1024 * 1024;
        self
    }

    pub fn with_backup_count(mut self, count: usize) -> Self {
        self.backup_count = count;
        self
    }
}

/// A destination attached to the root logger.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Sink {
    RotatingFile {
        path: PathBuf,
        max_bytes: u64,
        backup_count: usize,
    },
    Console,
}

/// Handle to the configured root logger.
pub struct RootLogger {
    name: String,
    level: Mutex<Severity>,
    filter: reload::Handle<EnvFilter, Registry>,
    log_file: PathBuf,
    sinks: Vec<Sink>,
}

impl std::fmt::Debug for RootLogger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RootLogger")
            .field("name", &self.name)
            .field("level", &self.level())
            .field("filter", &self.filter())
            .field("log_file", &self.log_file)
            .field("sinks", &self.sinks)
            .finish()
    }
}

impl RootLogger {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Level most recently requested through [`setup_root_logger`].
    ///
    /// When `RUST_LOG` is set its directives take precedence over this level;
    /// [`RootLogger::filter`] shows what is actually in effect.
    pub fn level(&self) -> Severity {
        match self.level.lock() {
            Ok(level) => *level,
            Err(poisoned) => *poisoned.into_inner(),
        }
    }

    /// Directives of the active filter, e.g. `info` or the `RUST_LOG` value.
    pub fn filter(&self) -> String {
        self.filter
            .with_current(|filter| filter.to_string())
            .unwrap_or_default()
    }

    /// Swap the active filter for one at `level`. No sinks are touched.
    pub fn set_level(&self, level: Severity) -> Result<()> {
        self.filter
            .reload(level_filter(level))
            .map_err(|e| Error::Logging(e.to_string()))?;
        match self.level.lock() {
            Ok(mut current) => *current = level,
            Err(poisoned) => *poisoned.into_inner() = level,
        }
        Ok(())
    }

    pub fn log_file(&self) -> &Path {
        &self.log_file
    }

    pub fn sinks(&self) -> &[Sink] {
        &self.sinks
    }

    pub fn sink_count(&self) -> usize {
        self.sinks.len()
    }
}

static ROOT_LOGGER: OnceLock<RootLogger> = OnceLock::new();

/// `<YYYYMMDD>-<name>.log`
pub fn log_file_name(name: &str, date: NaiveDate) -> String {
    format!("{}-{}.log", date.format("%Y%m%d"), name)
}

/// Filter at `level` unless `RUST_LOG` says otherwise.
fn level_filter(level: Severity) -> EnvFilter {
    EnvFilter::builder()
        .with_default_directive(LevelFilter::from_level(level.to_tracing()).into())
        .from_env_lossy()
}

/// The root logger, if [`setup_root_logger`] has run.
pub fn root_logger() -> Option<&'static RootLogger> {
    ROOT_LOGGER.get()
}

/// Configure the process-wide logger.
///
/// The first call creates the log directory, opens
/// `<log_dir>/<YYYYMMDD>-<name>.log` (UTC date) and installs the file and
/// console sinks. Every later call re-applies `options.level` to that same
/// logger and attaches nothing; the other options and `name` are ignored.
pub fn setup_root_logger(name: &str, options: RootLoggerOptions) -> Result<&'static RootLogger> {
    if let Some(existing) = ROOT_LOGGER.get() {
        existing.set_level(options.level)?;
        tracing::debug!(
            requested = name,
            active = %existing.name,
            level = %options.level,
            "Root logger already configured, level updated"
        );
        return Ok(existing);
    }

    let log_dir = options
        .log_dir
        .clone()
        .unwrap_or_else(|| PathRegistry::discover().logs().to_path_buf());
    std::fs::create_dir_all(&log_dir).map_err(|e| Error::io(&log_dir, e))?;

    let log_file = log_dir.join(log_file_name(name, Utc::now().date_naive()));
    let writer = RotatingFileWriter::open(&log_file, options.max_bytes, options.backup_count)?;

    let (filter, filter_handle) = reload::Layer::new(level_filter(options.level));

    let file_layer = fmt::layer()
        .event_format(PlainFormatter)
        .with_ansi(false)
        .with_writer(Mutex::new(writer));
    let console_layer = fmt::layer()
        .event_format(ColorFormatter)
        .with_writer(std::io::stderr);

    tracing_subscriber::registry()
        .with(filter)
        .with(EventClock)
        .with(file_layer)
        .with(console_layer)
        .try_init()
        .map_err(|e| Error::Logging(e.to_string()))?;

    let root = ROOT_LOGGER.get_or_init(|| RootLogger {
        name: name.to_string(),
        level: Mutex::new(options.level),
        filter: filter_handle,
        log_file: log_file.clone(),
        sinks: vec![
            Sink::RotatingFile {
                path: log_file,
                max_bytes: options.max_bytes,
                backup_count: options.backup_count,
            },
            Sink::Console,
        ],
    });

    tracing::info!(
        log_file = %root.log_file.display(),
        level = %root.level(),
        filter = %root.filter(),
        "Logging initialized"
    );

    Ok(root)
}

/// A named logger that propagates to the root logger's sinks.
pub fn setup_logger(name: impl Into<String>) -> Logger {
    Logger { name: name.into() }
}

/// Named child logger. Holds no sinks; every record is emitted through
/// tracing and picked up by whatever the root logger installed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Logger {
    name: String,
}

impl Logger {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Log `message` at `severity`, attributed to the caller's file and line.
    #[track_caller]
    pub fn log(&self, severity: Severity, message: &str) {
        let caller = Location::caller();
        let file = caller.file();
        let line = caller.line();
        let name = self.name.as_str();

        match severity {
            Severity::Debug => {
                tracing::debug!(logger = name, caller_file = file, caller_line = line, "{}", message)
            }
            Severity::Info => {
                tracing::info!(logger = name, caller_file = file, caller_line = line, "{}", message)
            }
            Severity::Warning => {
                tracing::warn!(logger = name, caller_file = file, caller_line = line, "{}", message)
            }
            Severity::Error => {
                tracing::error!(logger = name, caller_file = file, caller_line = line, "{}", message)
            }
            Severity::Critical => tracing::error!(
                logger = name,
                severity = "CRITICAL",
                caller_file = file,
                caller_line = line,
                "{}",
                message
            ),
        }
    }

    #[track_caller]
    pub fn debug(&self, message: &str) {
        self.log(Severity::Debug, message);
    }

    #[track_caller]
    pub fn info(&self, message: &str) {
        self.log(Severity::Info, message);
    }

    #[track_caller]
    pub fn warning(&self, message: &str) {
        self.log(Severity::Warning, message);
    }

    #[track_caller]
    pub fn error(&self, message: &str) {
        self.log(Severity::Error, message);
    }

    #[track_caller]
    pub fn critical(&self, message: &str) {
        self.log(Severity::Critical, message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_file_name() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 7).unwrap();
        assert_eq!(log_file_name("etl", date), "20240307-etl.log");
    }

    #[test]
    fn test_parse_levels() {
        assert_eq!(Severity::parse("INFO"), Some(Severity::Info));
        assert_eq!(Severity::parse("warn"), Some(Severity::Warning));
        assert_eq!(Severity::parse(" Critical "), Some(Severity::Critical));
        assert_eq!(Severity::parse("verbose"), None);
        assert!("nope".parse::<Severity>().is_err());
    }

    #[test]
    fn test_tracing_level_mapping() {
        assert_eq!(Severity::Critical.to_tracing(), Level::ERROR);
        assert_eq!(Severity::Warning.to_tracing(), Level::WARN);
        assert_eq!(Severity::from_tracing(&Level::TRACE), Severity::Debug);
        assert_eq!(Severity::from_tracing(&Level::ERROR), Severity::Error);
        for severity in Severity::ALL {
            if severity != Severity::Critical {
                assert_eq!(Severity::from_tracing(&severity.to_tracing()), severity);
            }
        }
    }

    #[test]
    fn test_options_builder() {
        let options = RootLoggerOptions::default()
            .with_max_size_mb(2)
            .with_backup_count(1)
            .with_level(Severity::Debug);
        assert_eq!(options.max_bytes, 2 * 1024 * 1024);
        assert_eq!(options.backup_count, 1);
        assert_eq!(options.level, Severity::Debug);
        assert_eq!(RootLoggerOptions::default().max_bytes, 10 * 1024 * 1024);
    }

    #[test]
    fn test_setup_logger_has_name_only() {
        let logger = setup_logger("app.ingest");
        assert_eq!(logger.name(), "app.ingest");
    }
}
