//! Logging backend for the `log` facade.
//!
//! The library only emits records; binaries pick a backend. [`DetectLogger`]
//! writes one line per record:
//!
//! ```text
//! 2026-10-14 09:30:12 DEBUG    color_detect::palette palette built with 20 entries
//! ```
//!
//! Optional tracing integration is available via `DetectTracingLayer` when the
//! `tracing` feature is enabled.

use std::io::Write;
use std::sync::{Arc, Mutex};

use log::{Level, LevelFilter, Log, Metadata, Record, SetLoggerError};
use time::{OffsetDateTime, format_description::OwnedFormatItem};

use crate::sync::lock_recover;

type SharedWriter = Arc<Mutex<Box<dyn Write + Send>>>;

/// Line-oriented logger for the `log` crate.
///
/// # Thread Safety
///
/// The writer is guarded by a mutex with poison recovery, so lines from
/// concurrent threads never interleave within a line.
pub struct DetectLogger {
    writer: SharedWriter,
    level: LevelFilter,
    show_time: bool,
    show_level: bool,
    show_target: bool,
    colored: bool,
    time_format: OwnedFormatItem,
}

impl DetectLogger {
    /// Create a logger writing to stderr at `Info` level.
    #[must_use]
    pub fn new() -> Self {
        let time_format = time::format_description::parse_owned::<2>(
            "[year]-[month]-[day] [hour]:[minute]:[second]",
        )
        .unwrap_or_else(|_| OwnedFormatItem::Literal(Vec::<u8>::new().into_boxed_slice()));
        Self {
            writer: Arc::new(Mutex::new(Box::new(std::io::stderr()))),
            level: LevelFilter::Info,
            show_time: true,
            show_level: true,
            show_target: true,
            colored: false,
            time_format,
        }
    }

    /// Send output to `writer` instead of stderr.
    #[must_use]
    pub fn writer(mut self, writer: impl Write + Send + 'static) -> Self {
        self.writer = Arc::new(Mutex::new(Box::new(writer)));
        self
    }

    /// Set the minimum log level.
    #[must_use]
    pub fn level(mut self, level: LevelFilter) -> Self {
        self.level = level;
        self
    }

    /// Enable or disable timestamps.
    #[must_use]
    pub fn show_time(mut self, show: bool) -> Self {
        self.show_time = show;
        self
    }

    /// Enable or disable the level column.
    #[must_use]
    pub fn show_level(mut self, show: bool) -> Self {
        self.show_level = show;
        self
    }

    /// Enable or disable the target column.
    #[must_use]
    pub fn show_target(mut self, show: bool) -> Self {
        self.show_target = show;
        self
    }

    /// Color the level column with ANSI escapes.
    #[must_use]
    pub fn colored(mut self, colored: bool) -> Self {
        self.colored = colored;
        self
    }

    /// Override time format; invalid descriptions keep the current one.
    #[must_use]
    pub fn time_format(mut self, format: &str) -> Self {
        if let Ok(parsed) = time::format_description::parse_owned::<2>(format) {
            self.time_format = parsed;
        }
        self
    }

    /// Install as the global logger.
    ///
    /// # Errors
    ///
    /// Returns [`SetLoggerError`] if a global logger is already installed.
    pub fn init(self) -> Result<(), SetLoggerError> {
        log::set_max_level(self.level);
        log::set_boxed_logger(Box::new(self))
    }

    fn format_time(&self) -> String {
        let now = OffsetDateTime::now_local().unwrap_or_else(|_| OffsetDateTime::now_utc());
        now.format(&self.time_format)
            .unwrap_or_else(|_| now.to_string())
    }

    const fn level_code(level: Level) -> &'static str {
        match level {
            Level::Trace => "2",
            Level::Debug => "34;2",
            Level::Info => "32",
            Level::Warn => "33",
            Level::Error => "1;31",
        }
    }

    fn format_record(&self, record: &Record<'_>) -> String {
        let mut line = String::new();

        if self.show_time {
            line.push_str(&self.format_time());
            line.push(' ');
        }

        if self.show_level {
            let padded = format!("{:<8}", record.level().as_str());
            if self.colored {
                line.push_str(&format!(
                    "\x1b[{}m{padded}\x1b[0m",
                    Self::level_code(record.level())
                ));
            } else {
                line.push_str(&padded);
            }
            line.push(' ');
        }

        if self.show_target && !record.target().is_empty() {
            line.push_str(record.target());
            line.push(' ');
        }

        line.push_str(&record.args().to_string());
        line
    }

    fn write_line(&self, line: &str) {
        let mut writer = lock_recover(&self.writer);
        // A failing log sink must not take the program down.
        let _ = writeln!(writer, "{line}");
    }
}

impl Default for DetectLogger {
    fn default() -> Self {
        Self::new()
    }
}

impl Log for DetectLogger {
    fn enabled(&self, metadata: &Metadata<'_>) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record<'_>) {
        if !self.enabled(record.metadata()) {
            return;
        }
        self.write_line(&self.format_record(record));
    }

    fn flush(&self) {
        let _ = lock_recover(&self.writer).flush();
    }
}

#[cfg(feature = "tracing")]
mod tracing_integration {
    use super::DetectLogger;
    use log::{Level, Log};
    use std::fmt::{self, Write as _};

    use tracing::field::{Field, Visit};
    use tracing::{Event, Subscriber};
    use tracing_subscriber::{Layer, layer::Context};

    /// Tracing layer that writes events as `DetectLogger` lines.
    ///
    /// Structured fields follow the message as `key=value` pairs, in the
    /// order they were recorded. The logger's level filter still applies.
    pub struct DetectTracingLayer {
        logger: DetectLogger,
    }

    impl DetectTracingLayer {
        /// Create a tracing layer backed by a default `DetectLogger`.
        #[must_use]
        pub fn new() -> Self {
            Self::with_logger(DetectLogger::new())
        }

        /// Use an existing logger configuration.
        #[must_use]
        pub fn with_logger(logger: DetectLogger) -> Self {
            Self { logger }
        }

        /// Install as the global tracing subscriber.
        ///
        /// # Errors
        ///
        /// Fails if a global subscriber is already installed.
        pub fn init(self) -> Result<(), tracing::subscriber::SetGlobalDefaultError> {
            use tracing_subscriber::prelude::*;

            tracing::subscriber::set_global_default(tracing_subscriber::registry().with(self))
        }
    }

    impl Default for DetectTracingLayer {
        fn default() -> Self {
            Self::new()
        }
    }

    /// Collects an event into its message and a `key=value` tail.
    #[derive(Default)]
    struct LineVisitor {
        message: String,
        pairs: String,
    }

    impl LineVisitor {
        fn push_pair(&mut self, field: &Field, value: fmt::Arguments<'_>) {
            if !self.pairs.is_empty() {
                self.pairs.push(' ');
            }
            let _ = write!(self.pairs, "{}={value}", field.name());
        }

        fn finish(self) -> String {
            match (self.message.is_empty(), self.pairs.is_empty()) {
                (_, true) => self.message,
                (true, false) => self.pairs,
                (false, false) => format!("{} {}", self.message, self.pairs),
            }
        }
    }

    impl Visit for LineVisitor {
        fn record_str(&mut self, field: &Field, value: &str) {
            if field.name() == "message" {
                self.message = value.to_string();
            } else {
                self.push_pair(field, format_args!("{value}"));
            }
        }

        fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
            if field.name() == "message" {
                self.message = format!("{value:?}");
            } else {
                self.push_pair(field, format_args!("{value:?}"));
            }
        }
    }

    impl<S> Layer<S> for DetectTracingLayer
    where
        S: Subscriber,
    {
        fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
            let metadata = event.metadata();
            let level = to_log_level(*metadata.level());
            if level > self.logger.level {
                return;
            }

            let mut visitor = LineVisitor::default();
            event.record(&mut visitor);
            let line = visitor.finish();

            self.logger.log(
                &log::Record::builder()
                    .args(format_args!("{line}"))
                    .level(level)
                    .target(metadata.target())
                    .file(metadata.file())
                    .line(metadata.line())
                    .module_path(metadata.module_path())
                    .build(),
            );
        }
    }

    fn to_log_level(level: tracing::Level) -> Level {
        match level {
            tracing::Level::TRACE => Level::Trace,
            tracing::Level::DEBUG => Level::Debug,
            tracing::Level::INFO => Level::Info,
            tracing::Level::WARN => Level::Warn,
            tracing::Level::ERROR => Level::Error,
        }
    }

}

#[cfg(feature = "tracing")]
pub use tracing_integration::DetectTracingLayer;
