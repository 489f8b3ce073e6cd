//! Leveled, colorized logging with named loggers, console output, and a
//! shared daily-rotating log file.
//!
//! Loggers come from a [`Registry`], the process-wide context that owns the
//! log directory, the table of configured names, and the single rotating
//! file sink every file-logging logger shares. Each emit call can carry an
//! optional override color for the message body; color degrades to plain
//! text automatically when stdout is not a terminal.
//!
//! ```no_run
//! use tintlog::{palette, Level, LoggerOptions, Registry};
//!
//! let registry = Registry::new();
//! registry.set_log_directory("/var/log/myapp")?;
//!
//! let logger = registry.configure_logger("myapp.worker", LoggerOptions::default());
//! logger.info("starting up", None);
//! logger.warning("low disk space", palette::yellow());
//!
//! registry.set_loggers_level(Level::Debug);
//! # Ok::<(), tintlog::Error>(())
//! ```

pub mod error;
pub mod file_sink;
pub mod format;
pub mod level;
pub mod logger;
pub mod palette;
pub mod record;
pub mod registry;
mod retention;
pub mod sink;

pub use error::{Error, Result};
pub use file_sink::RotatingFileSink;
pub use format::LineFormatter;
pub use level::Level;
pub use logger::Logger;
pub use palette::{supports_color, Palette};
pub use record::{CallSite, Record};
pub use registry::{LoggerOptions, Registry};
pub use sink::{ConsoleSink, Sink};
