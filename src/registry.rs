//! Process-wide logger registry.
//!
//! The registry is an explicit context object owning the log directory,
//! the shared rotating file sink, the table of configured loggers, and the
//! process default level. All state sits behind one mutex, so concurrent
//! first-use races (directory assignment, lazy sink creation) have exactly
//! one winner and everyone else observes the settled value.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Arc, Mutex, MutexGuard};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::file_sink::RotatingFileSink;
use crate::format::LineFormatter;
use crate::level::Level;
use crate::logger::Logger;
use crate::retention;
use crate::sink::{ConsoleSink, Sink};

/// Construction options for a named logger.
///
/// Options bind at first creation; repeat `configure_logger` calls for the
/// same name return the existing logger and ignore them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggerOptions {
    /// Colorize console output. Dropped when the terminal cannot render it.
    pub color: bool,
    /// Dashed rule above each console record.
    pub separator: bool,
    /// Attach the shared rotating file sink.
    pub save_to_file: bool,
}

impl Default for LoggerOptions {
    fn default() -> Self {
        Self {
            color: true,
            separator: true,
            save_to_file: true,
        }
    }
}

#[derive(Default)]
struct RegistryInner {
    directory: Option<PathBuf>,
    file_sink: Option<Arc<RotatingFileSink>>,
    loggers: HashMap<String, Arc<Logger>>,
    default_level: Option<Level>,
}

/// Registry of named loggers and their shared file sink.
#[derive(Default)]
pub struct Registry {
    inner: Mutex<RegistryInner>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, RegistryInner> {
        match self.inner.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    /// Set the log root. The first caller wins; later calls are no-ops.
    ///
    /// When the path already exists as a directory the shared file sink is
    /// built eagerly; otherwise construction is deferred to the first
    /// logger that needs it.
    pub fn set_log_directory(&self, directory: impl Into<PathBuf>) -> Result<()> {
        let mut inner = self.lock();
        if inner.directory.is_some() {
            return Ok(());
        }

        let directory = directory.into();
        inner.directory = Some(directory.clone());
        if directory.is_dir() {
            inner.file_sink = Some(Arc::new(RotatingFileSink::open(&directory)?));
        }
        Ok(())
    }

    /// Directory set via [`set_log_directory`](Self::set_log_directory), if any.
    pub fn log_directory(&self) -> Option<PathBuf> {
        self.lock().directory.clone()
    }

    /// Names registered so far, sorted.
    pub fn configured_loggers(&self) -> Vec<String> {
        let mut names: Vec<String> = self.lock().loggers.keys().cloned().collect();
        names.sort();
        names
    }

    /// Fetch or create the logger registered under `name`.
    ///
    /// File logging is best-effort: when it is requested but the log
    /// directory is unset, missing, or the shared file cannot be opened,
    /// a warning goes to the console and the logger proceeds console-only.
    pub fn configure_logger(&self, name: &str, options: LoggerOptions) -> Arc<Logger> {
        let mut inner = self.lock();

        let mut save_to_file = options.save_to_file;
        if save_to_file {
            match &inner.directory {
                None => {
                    println!(
                        "Warning: Logger '{name}' requested save_to_file but no log directory \
                         is set. Logs will only go to the console. Call set_log_directory() \
                         to enable file logging."
                    );
                    save_to_file = false;
                }
                Some(directory) if !directory.is_dir() => {
                    println!(
                        "Warning: Logger '{name}' requested save_to_file but the log directory \
                         does not exist: '{}'. Logs will only go to the console.",
                        directory.display()
                    );
                    save_to_file = false;
                }
                Some(_) => {}
            }
        }

        if let Some(existing) = inner.loggers.get(name) {
            return Arc::clone(existing);
        }

        let mut sinks: Vec<Arc<dyn Sink>> = Vec::with_capacity(2);
        sinks.push(Arc::new(ConsoleSink::new(LineFormatter::new(
            options.color,
            options.separator,
        ))));

        if save_to_file {
            match shared_file_sink(&mut inner) {
                Ok(sink) => sinks.push(sink),
                Err(err) => {
                    println!(
                        "Warning: Logger '{name}' could not open the shared log file: {err}. \
                         Logs will only go to the console."
                    );
                }
            }
        }

        let logger = Arc::new(Logger::new(name.to_string(), sinks));
        if let Some(level) = inner.default_level {
            logger.set_level(level);
        }
        inner.loggers.insert(name.to_string(), Arc::clone(&logger));
        logger
    }

    /// Set the default level for future loggers and apply it immediately to
    /// every registered logger and every sink attached to each.
    pub fn set_loggers_level(&self, level: Level) {
        let mut inner = self.lock();
        inner.default_level = Some(level);
        for logger in inner.loggers.values() {
            logger.set_level(level);
        }
    }

    /// Delete top-level log files older than `days` days.
    ///
    /// Returns the number of files deleted. Fails when no log directory is
    /// set or the directory is gone.
    pub fn delete_old_logs(&self, days: u64) -> Result<usize> {
        let directory = self.checked_directory()?;
        retention::delete_files_older_than(&directory, days)
    }

    /// Delete every top-level log file. Subdirectories are untouched.
    pub fn clear_logs(&self) -> Result<usize> {
        let directory = self.checked_directory()?;
        retention::delete_all_files(&directory)
    }

    fn checked_directory(&self) -> Result<PathBuf> {
        let inner = self.lock();
        let directory = inner.directory.clone().ok_or(Error::DirectoryNotSet)?;
        if !directory.is_dir() {
            return Err(Error::DirectoryMissing(directory));
        }
        Ok(directory)
    }
}

fn shared_file_sink(inner: &mut RegistryInner) -> Result<Arc<RotatingFileSink>> {
    if let Some(sink) = &inner.file_sink {
        return Ok(Arc::clone(sink));
    }

    let directory = inner.directory.clone().ok_or(Error::DirectoryNotSet)?;
    let sink = Arc::new(RotatingFileSink::open(&directory)?);
    inner.file_sink = Some(Arc::clone(&sink));
    Ok(sink)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::{self, File};
    use std::thread;
    use std::time::Duration;
    use tempfile::TempDir;

    #[test]
    fn test_same_name_returns_same_logger() {
        let registry = Registry::new();
        let first = registry.configure_logger("app.core", LoggerOptions::default());
        let second = registry.configure_logger(
            "app.core",
            LoggerOptions {
                color: false,
                separator: false,
                save_to_file: false,
            },
        );
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn test_log_directory_first_write_wins() {
        let first_dir = TempDir::new().unwrap();
        let second_dir = TempDir::new().unwrap();

        let registry = Registry::new();
        registry.set_log_directory(first_dir.path()).unwrap();
        registry.set_log_directory(second_dir.path()).unwrap();

        assert_eq!(registry.log_directory().unwrap(), first_dir.path());
    }

    #[test]
    fn test_logger_without_directory_degrades_to_console_only() {
        let registry = Registry::new();
        let logger = registry.configure_logger("app", LoggerOptions::default());
        assert_eq!(logger.sink_count(), 1);
    }

    #[test]
    fn test_logger_with_missing_directory_degrades() {
        let temp_dir = TempDir::new().unwrap();
        let missing = temp_dir.path().join("gone");

        let registry = Registry::new();
        registry.set_log_directory(&missing).unwrap();
        let logger = registry.configure_logger("app", LoggerOptions::default());

        assert_eq!(logger.sink_count(), 1);
    }

    #[test]
    fn test_logger_with_directory_gets_file_sink() {
        let temp_dir = TempDir::new().unwrap();

        let registry = Registry::new();
        registry.set_log_directory(temp_dir.path()).unwrap();
        let logger = registry.configure_logger("app", LoggerOptions::default());

        assert_eq!(logger.sink_count(), 2);
    }

    #[test]
    fn test_console_only_when_file_output_not_requested() {
        let temp_dir = TempDir::new().unwrap();

        let registry = Registry::new();
        registry.set_log_directory(temp_dir.path()).unwrap();
        let logger = registry.configure_logger(
            "app",
            LoggerOptions {
                save_to_file: false,
                ..LoggerOptions::default()
            },
        );

        assert_eq!(logger.sink_count(), 1);
    }

    #[test]
    fn test_two_loggers_share_one_file() {
        let temp_dir = TempDir::new().unwrap();

        let registry = Registry::new();
        registry.set_log_directory(temp_dir.path()).unwrap();
        let options = LoggerOptions {
            color: false,
            separator: false,
            save_to_file: true,
        };
        let alpha = registry.configure_logger("alpha", options);
        let beta = registry.configure_logger("beta", options);

        alpha.info("from alpha", None);
        beta.info("from beta", None);

        let sink = registry.lock().file_sink.as_ref().cloned().unwrap();
        let contents = fs::read_to_string(sink.current_path()).unwrap();
        assert!(contents.contains("from alpha"));
        assert!(contents.contains("from beta"));
        // Two records, each a header line plus a message line, no torn lines.
        assert_eq!(contents.lines().count(), 4);
        assert!(contents.ends_with('\n'));
    }

    #[test]
    fn test_concurrent_writers_produce_whole_lines() {
        let temp_dir = TempDir::new().unwrap();
        let registry = Registry::new();
        registry.set_log_directory(temp_dir.path()).unwrap();

        let options = LoggerOptions {
            color: false,
            separator: false,
            save_to_file: true,
        };
        let alpha = registry.configure_logger("alpha", options);
        let beta = registry.configure_logger("beta", options);

        let writers = [alpha, beta].map(|logger| {
            thread::spawn(move || {
                for index in 0..50 {
                    logger.info(format!("message {index}"), None);
                }
            })
        });
        for writer in writers {
            writer.join().unwrap();
        }

        let sink = registry.lock().file_sink.as_ref().cloned().unwrap();
        let contents = fs::read_to_string(sink.current_path()).unwrap();
        // 100 records, each a header line plus an indented message line,
        // none of them torn by the interleaving.
        assert_eq!(contents.lines().count(), 200);
        for line in contents.lines() {
            assert!(line.contains(" INFO ") || line.starts_with("    message "));
        }
    }

    #[test]
    fn test_set_loggers_level_reaches_existing_and_future_loggers() {
        let registry = Registry::new();
        let existing = registry.configure_logger("existing", LoggerOptions::default());
        assert_eq!(existing.level(), Level::Debug);

        registry.set_loggers_level(Level::Error);
        assert_eq!(existing.level(), Level::Error);

        let future = registry.configure_logger("future", LoggerOptions::default());
        assert_eq!(future.level(), Level::Error);
    }

    #[test]
    fn test_delete_old_logs_requires_directory() {
        let registry = Registry::new();
        assert!(matches!(
            registry.delete_old_logs(7),
            Err(Error::DirectoryNotSet)
        ));
    }

    #[test]
    fn test_delete_old_logs_requires_existing_directory() {
        let temp_dir = TempDir::new().unwrap();
        let missing = temp_dir.path().join("gone");

        let registry = Registry::new();
        registry.set_log_directory(&missing).unwrap();

        assert!(matches!(
            registry.delete_old_logs(7),
            Err(Error::DirectoryMissing(_))
        ));
        assert!(matches!(registry.clear_logs(), Err(Error::DirectoryMissing(_))));
    }

    #[test]
    fn test_delete_old_logs_with_zero_days() {
        let temp_dir = TempDir::new().unwrap();
        File::create(temp_dir.path().join("stale.log")).unwrap();

        let registry = Registry::new();
        registry.set_log_directory(temp_dir.path()).unwrap();

        thread::sleep(Duration::from_millis(20));
        let deleted = registry.delete_old_logs(0).unwrap();
        assert_eq!(deleted, 1);
    }

    #[test]
    fn test_clear_logs_spares_subdirectories() {
        let temp_dir = TempDir::new().unwrap();
        File::create(temp_dir.path().join("a.log")).unwrap();
        File::create(temp_dir.path().join("b.log")).unwrap();

        let registry = Registry::new();
        registry.set_log_directory(temp_dir.path()).unwrap();
        // set_log_directory eagerly created host/user subdirectories.
        let deleted = registry.clear_logs().unwrap();

        assert_eq!(deleted, 2);
        let subdirs = fs::read_dir(temp_dir.path())
            .unwrap()
            .flatten()
            .filter(|entry| entry.path().is_dir())
            .count();
        assert_eq!(subdirs, 1);
    }

    #[test]
    fn test_configured_loggers_lists_names() {
        let registry = Registry::new();
        registry.configure_logger("beta", LoggerOptions::default());
        registry.configure_logger("alpha", LoggerOptions::default());

        assert_eq!(registry.configured_loggers(), vec!["alpha", "beta"]);
    }

    #[test]
    fn test_options_default_round_trips_through_serde() {
        let options = LoggerOptions::default();
        let json = serde_json::to_string(&options).unwrap();
        let back: LoggerOptions = serde_json::from_str(&json).unwrap();
        assert_eq!(back, options);

        // Omitted fields fall back to the all-on defaults.
        let sparse: LoggerOptions = serde_json::from_str("{}").unwrap();
        assert_eq!(sparse, LoggerOptions::default());
    }
}
