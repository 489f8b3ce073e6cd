//! Output sinks.

use std::io::{self, Write};
use std::sync::atomic::{AtomicU8, Ordering};

use crate::error::Result;
use crate::format::LineFormatter;
use crate::level::Level;
use crate::record::Record;

/// A destination for formatted log lines.
///
/// Each sink owns its formatter and its own minimum level. Sinks are
/// independent of each other; the logger keeps dispatching to the rest
/// when one fails.
pub trait Sink: Send + Sync {
    /// Minimum level this sink accepts.
    fn level(&self) -> Level;

    /// Update the minimum level.
    fn set_level(&self, level: Level);

    /// Format and deliver one record.
    fn write(&self, record: &Record<'_>) -> Result<()>;
}

/// Sink writing to standard output. Built fresh for every logger, never
/// shared.
pub struct ConsoleSink {
    formatter: LineFormatter,
    level: AtomicU8,
}

impl ConsoleSink {
    pub fn new(formatter: LineFormatter) -> Self {
        Self {
            formatter,
            level: AtomicU8::new(Level::Debug.index()),
        }
    }

    pub fn formatter(&self) -> &LineFormatter {
        &self.formatter
    }
}

impl Sink for ConsoleSink {
    fn level(&self) -> Level {
        Level::from_index(self.level.load(Ordering::Relaxed))
    }

    fn set_level(&self, level: Level) {
        self.level.store(level.index(), Ordering::Relaxed);
    }

    fn write(&self, record: &Record<'_>) -> Result<()> {
        let line = self.formatter.format(record);
        let mut stdout = io::stdout().lock();
        stdout.write_all(line.as_bytes())?;
        stdout.write_all(b"\n")?;
        stdout.flush()?;
        Ok(())
    }
}
