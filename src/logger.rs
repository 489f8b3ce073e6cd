//! Named logger handles.

use std::fmt::Display;
use std::panic::Location;
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;

use chrono::Local;

use crate::level::Level;
use crate::record::{CallSite, Record};
use crate::sink::Sink;

/// A named logger.
///
/// Obtained from [`Registry::configure_logger`](crate::Registry::configure_logger);
/// one instance exists per name for the process lifetime. Loggers are
/// independent leaves: there is no parent chain and records are never
/// forwarded anywhere but the attached sinks.
///
/// Every emit method takes the message plus an optional override color for
/// the message body:
///
/// ```no_run
/// # use tintlog::{palette, LoggerOptions, Registry};
/// # let registry = Registry::new();
/// let logger = registry.configure_logger("app", LoggerOptions::default());
/// logger.info("plain message", None);
/// logger.error("tinted message", palette::blue());
/// ```
pub struct Logger {
    name: String,
    level: AtomicU8,
    sinks: Vec<Arc<dyn Sink>>,
}

impl Logger {
    pub(crate) fn new(name: String, sinks: Vec<Arc<dyn Sink>>) -> Self {
        Self {
            name,
            level: AtomicU8::new(Level::Debug.index()),
            sinks,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Current threshold; records below it are dropped before construction.
    pub fn level(&self) -> Level {
        Level::from_index(self.level.load(Ordering::Relaxed))
    }

    /// Number of attached sinks. A degraded logger (file output requested
    /// without a usable log directory) has only its console sink.
    pub fn sink_count(&self) -> usize {
        self.sinks.len()
    }

    /// Set the threshold and mirror it onto every attached sink.
    pub fn set_level(&self, level: Level) {
        self.level.store(level.index(), Ordering::Relaxed);
        for sink in &self.sinks {
            sink.set_level(level);
        }
    }

    #[track_caller]
    pub fn debug<'a>(&self, message: impl Display, color: impl Into<Option<&'a str>>) {
        self.emit(Level::Debug, message, color.into(), Location::caller());
    }

    #[track_caller]
    pub fn info<'a>(&self, message: impl Display, color: impl Into<Option<&'a str>>) {
        self.emit(Level::Info, message, color.into(), Location::caller());
    }

    #[track_caller]
    pub fn warning<'a>(&self, message: impl Display, color: impl Into<Option<&'a str>>) {
        self.emit(Level::Warning, message, color.into(), Location::caller());
    }

    #[track_caller]
    pub fn error<'a>(&self, message: impl Display, color: impl Into<Option<&'a str>>) {
        self.emit(Level::Error, message, color.into(), Location::caller());
    }

    #[track_caller]
    pub fn critical<'a>(&self, message: impl Display, color: impl Into<Option<&'a str>>) {
        self.emit(Level::Critical, message, color.into(), Location::caller());
    }

    fn emit(
        &self,
        level: Level,
        message: impl Display,
        color: Option<&str>,
        location: &'static Location<'static>,
    ) {
        if level < self.level() {
            return;
        }

        let record = Record {
            timestamp: Local::now(),
            level,
            logger: &self.name,
            site: CallSite::from_location(location),
            message: message.to_string(),
            color,
        };

        for sink in &self.sinks {
            if record.level >= sink.level() {
                // One sink failing must not block the remaining sinks.
                let _ = sink.write(&record);
            }
        }
    }
}
