//! Line layout shared by the file and console sinks.
//!
//! `timestamp - logger_name - LEVEL - [file:line] - message`

use super::Severity;
use chrono::{DateTime, Local};
use std::cell::Cell;
use std::fmt::{self, Write as _};
use std::path::Path;
use tracing::field::{Field, Visit};
use tracing::{Event, Metadata, Subscriber};
use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::{FmtContext, FormatEvent, FormatFields};
use tracing_subscriber::layer::{Context, Layer};
use tracing_subscriber::registry::LookupSpan;

/// ANSI sequence that ends a colored level token.
pub const RESET: &str = "\x1b[0m";

/// `2024-05-01 13:45:10,123`
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S,%3f";

/// One log call, as seen by a sink.
#[derive(Debug, Clone)]
pub struct LogRecord<'a> {
    pub timestamp: DateTime<Local>,
    pub logger: &'a str,
    pub severity: Severity,
    pub file: &'a str,
    pub line: u32,
    pub message: &'a str,
}

fn write_line(record: &LogRecord<'_>, level: &str) -> String {
    let file = Path::new(record.file)
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or(record.file);
    format!(
        "{} - {} - {} - [{}:{}] - {}",
        record.timestamp.format(TIMESTAMP_FORMAT),
        record.logger,
        level,
        file,
        record.line,
        record.message
    )
}

thread_local! {
    static EVENT_TIME: Cell<Option<DateTime<Local>>> = const { Cell::new(None) };
}

/// Stamps each event once, before the sink layers format it.
///
/// Must sit below the formatting layers so every sink renders the same
/// timestamp for one record.
#[derive(Debug, Clone, Copy, Default)]
pub struct EventClock;

impl<S: Subscriber> Layer<S> for EventClock {
    fn on_event(&self, _event: &Event<'_>, _ctx: Context<'_, S>) {
        EVENT_TIME.with(|time| time.set(Some(Local::now())));
    }
}

/// Timestamp of the event being dispatched on this thread.
fn event_time() -> DateTime<Local> {
    EVENT_TIME.with(Cell::get).unwrap_or_else(Local::now)
}

/// Uncolored layout used by the rotating file sink.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlainFormatter;

impl PlainFormatter {
    pub fn format(&self, record: &LogRecord<'_>) -> String {
        write_line(record, record.severity.as_str())
    }
}

/// Console layout: only the level token is colored, reset right after it.
#[derive(Debug, Clone, Copy, Default)]
pub struct ColorFormatter;

impl ColorFormatter {
    pub fn format(&self, record: &LogRecord<'_>) -> String {
        write_line(record, &Self::colorize_level(record.severity))
    }

    pub fn colorize_level(severity: Severity) -> String {
        format!("{}{}{}", severity.color(), severity.as_str(), RESET)
    }
}

impl<S, N> FormatEvent<S, N> for PlainFormatter
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        _ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &Event<'_>,
    ) -> fmt::Result {
        let fields = EventFields::collect(event);
        writeln!(writer, "{}", self.format(&fields.record(event.metadata())))
    }
}

impl<S, N> FormatEvent<S, N> for ColorFormatter
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        _ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &Event<'_>,
    ) -> fmt::Result {
        let fields = EventFields::collect(event);
        writeln!(writer, "{}", self.format(&fields.record(event.metadata())))
    }
}

/// Fields pulled off a tracing event.
///
/// `logger`, `severity`, `caller_file` and `caller_line` are set by
/// [`super::Logger`]; any other field is appended to the message as `key=value`.
#[derive(Debug, Default)]
struct EventFields {
    message: String,
    logger: Option<String>,
    severity: Option<Severity>,
    caller_file: Option<String>,
    caller_line: Option<u32>,
}

impl EventFields {
    fn collect(event: &Event<'_>) -> Self {
        let mut fields = Self::default();
        event.record(&mut fields);
        fields
    }

    fn record<'a>(&'a self, metadata: &'a Metadata<'_>) -> LogRecord<'a> {
        LogRecord {
            timestamp: event_time(),
            logger: self.logger.as_deref().unwrap_or_else(|| metadata.target()),
            severity: self
                .severity
                .unwrap_or_else(|| Severity::from_tracing(metadata.level())),
            file: self
                .caller_file
                .as_deref()
                .or_else(|| metadata.file())
                .unwrap_or("unknown"),
            line: self.caller_line.or_else(|| metadata.line()).unwrap_or(0),
            message: &self.message,
        }
    }

    fn record_value(&mut self, field: &Field, value: String) {
        match field.name() {
            "message" => {
                // Structured fields may arrive before the message.
                self.message.insert_str(0, &value);
            }
            "logger" => self.logger = Some(value),
            "severity" => self.severity = Severity::parse(&value),
            "caller_file" => self.caller_file = Some(value),
            "caller_line" => self.caller_line = value.parse().ok(),
            name => {
                let _ = write!(self.message, " {}={}", name, value);
            }
        }
    }
}

impl Visit for EventFields {
    fn record_str(&mut self, field: &Field, value: &str) {
        self.record_value(field, value.to_string());
    }

    fn record_u64(&mut self, field: &Field, value: u64) {
        self.record_value(field, value.to_string());
    }

    fn record_i64(&mut self, field: &Field, value: i64) {
        self.record_value(field, value.to_string());
    }

    fn record_bool(&mut self, field: &Field, value: bool) {
        self.record_value(field, value.to_string());
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        self.record_value(field, format!("{:?}", value));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn record(severity: Severity) -> LogRecord<'static> {
        LogRecord {
            timestamp: Local.with_ymd_and_hms(2024, 5, 1, 13, 45, 10).unwrap(),
            logger: "app.ingest",
            severity,
            file: "src/ingest/loader.rs",
            line: 42,
            message: "loaded 3 rows",
        }
    }

    #[test]
    fn test_plain_layout() {
        let line = PlainFormatter.format(&record(Severity::Warning));
        assert_eq!(
            line,
            "2024-05-01 13:45:10,000 - app.ingest - WARNING - [loader.rs:42] - loaded 3 rows"
        );
    }

    #[test]
    fn test_color_resets_right_after_level() {
        let line = ColorFormatter.format(&record(Severity::Error));
        assert!(line.contains(" - \x1b[91mERROR\x1b[0m - [loader.rs:42] - loaded 3 rows"));
        let token_end = line.find("ERROR").unwrap() + "ERROR".len();
        assert_eq!(&line[token_end..token_end + RESET.len()], RESET);
    }

    /// Captures everything a layer writes.
    #[derive(Clone, Default)]
    struct Captured(std::sync::Arc<std::sync::Mutex<Vec<u8>>>);

    impl std::io::Write for Captured {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    impl Captured {
        fn text(&self) -> String {
            String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
        }
    }

    /// Delays every event so the sinks after it run in a later millisecond.
    struct Stall;

    impl<S: Subscriber> Layer<S> for Stall {
        fn on_event(&self, _event: &Event<'_>, _ctx: Context<'_, S>) {
            std::thread::sleep(std::time::Duration::from_millis(5));
        }
    }

    #[test]
    fn test_sinks_share_one_timestamp() {
        use tracing_subscriber::layer::SubscriberExt;

        let file = Captured::default();
        let console = Captured::default();
        let (file_out, console_out) = (file.clone(), console.clone());
        let subscriber = tracing_subscriber::registry()
            .with(EventClock)
            .with(
                tracing_subscriber::fmt::layer()
                    .event_format(PlainFormatter)
                    .with_writer(move || file_out.clone()),
            )
            .with(Stall)
            .with(
                tracing_subscriber::fmt::layer()
                    .event_format(ColorFormatter)
                    .with_writer(move || console_out.clone()),
            );

        tracing::subscriber::with_default(subscriber, || {
            tracing::info!(logger = "app", "first");
            tracing::warn!(logger = "app", "second");
        });

        let file_lines: Vec<String> = file.text().lines().map(str::to_string).collect();
        let console_lines: Vec<String> = console.text().lines().map(str::to_string).collect();
        assert_eq!(file_lines.len(), 2);
        assert_eq!(console_lines.len(), 2);
        for (plain, colored) in file_lines.iter().zip(&console_lines) {
            let stamp_len = "2024-05-01 13:45:10,000".len();
            assert_eq!(&plain[..stamp_len], &colored[..stamp_len]);
        }
        assert!(file_lines[1].ends_with("] - second"));
    }

    #[test]
    fn test_each_severity_has_distinct_color() {
        let colors: std::collections::HashSet<_> = Severity::ALL.iter().map(|s| s.color()).collect();
        assert_eq!(colors.len(), 5);
        for severity in Severity::ALL {
            let token = ColorFormatter::colorize_level(severity);
            assert!(token.starts_with(severity.color()));
            assert!(token.ends_with(RESET));
        }
    }
}
