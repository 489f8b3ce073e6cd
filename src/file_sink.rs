//! Shared rotating file sink.
//!
//! One instance serves every logger that opts into file output. Lines land
//! in `<log_root>/<host>/<user>/<YYYY_MM_DD>.log`, so machines and users
//! sharing a log root never interleave into the same file. The file rolls
//! at local midnight and the 30 most recent rotated files are retained.

use std::env;
use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::mem;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Mutex;
use std::time::SystemTime;

use chrono::{Local, NaiveDate};

use crate::error::Result;
use crate::format::LineFormatter;
use crate::level::Level;
use crate::palette::Palette;
use crate::record::Record;
use crate::sink::Sink;

/// Rotated copies kept per host/user directory.
const RETAINED_FILES: usize = 30;

/// Append-only daily log file, shared by reference across every logger
/// that requests file output.
///
/// The owned formatter is fixed to plain mode: files carry no color codes
/// and no separators. The level starts at the most verbose setting so
/// filtering happens at the logger, not here.
pub struct RotatingFileSink {
    level: AtomicU8,
    formatter: LineFormatter,
    state: Mutex<FileState>,
}

struct FileState {
    directory: PathBuf,
    day: NaiveDate,
    path: PathBuf,
    file: File,
}

impl RotatingFileSink {
    /// Open today's log file under `<root>/<host>/<user>/`, creating the
    /// directories as needed.
    pub fn open(root: &Path) -> Result<Self> {
        let directory = root.join(host_identifier()).join(user_identifier());
        fs::create_dir_all(&directory)?;

        let day = Local::now().date_naive();
        let path = directory.join(file_name(day));
        let file = open_append(&path)?;

        Ok(Self {
            level: AtomicU8::new(Level::Debug.index()),
            formatter: LineFormatter::with_palette(false, false, Palette::with_support(false)),
            state: Mutex::new(FileState {
                directory,
                day,
                path,
                file,
            }),
        })
    }

    /// Path of the file currently receiving lines.
    pub fn current_path(&self) -> PathBuf {
        self.lock_state().path.clone()
    }

    fn lock_state(&self) -> std::sync::MutexGuard<'_, FileState> {
        match self.state.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    /// Switch to the new day's file when local midnight has passed.
    ///
    /// The elapsed file is renamed with its date inserted before the
    /// extension, then retention pruning runs over the rotated files.
    fn roll_if_needed(state: &mut FileState, today: NaiveDate) -> Result<()> {
        if today == state.day {
            return Ok(());
        }

        let elapsed = state.day;
        let new_path = state.directory.join(file_name(today));
        let new_file = open_append(&new_path)?;

        let old_path = mem::replace(&mut state.path, new_path);
        // Dropping the previous handle closes it before the rename.
        state.file = new_file;
        state.day = today;

        let rotated = rotation_file_name(&old_path, &elapsed.format("%Y-%m-%d").to_string());
        // Another process may have rotated this file already.
        let _ = fs::rename(&old_path, &rotated);

        prune_rotated(&state.directory, &state.path);
        Ok(())
    }
}

impl Sink for RotatingFileSink {
    fn level(&self) -> Level {
        Level::from_index(self.level.load(Ordering::Relaxed))
    }

    fn set_level(&self, level: Level) {
        self.level.store(level.index(), Ordering::Relaxed);
    }

    fn write(&self, record: &Record<'_>) -> Result<()> {
        let mut payload = self.formatter.format(record).into_bytes();
        payload.push(b'\n');

        let mut state = self.lock_state();
        Self::roll_if_needed(&mut state, Local::now().date_naive())?;
        // One write per record keeps concurrently appended lines whole.
        state.file.write_all(&payload)?;
        state.file.flush()?;
        Ok(())
    }
}

fn open_append(path: &Path) -> Result<File> {
    Ok(OpenOptions::new().create(true).append(true).open(path)?)
}

fn file_name(day: NaiveDate) -> String {
    format!("{}.log", day.format("%Y_%m_%d"))
}

/// Insert a rotation suffix between the base name and the extension.
fn rotation_file_name(path: &Path, suffix: &str) -> PathBuf {
    let stem = path
        .file_stem()
        .and_then(|stem| stem.to_str())
        .unwrap_or("log");
    let name = match path.extension().and_then(|ext| ext.to_str()) {
        Some(ext) => format!("{stem}.{suffix}.{ext}"),
        None => format!("{stem}.{suffix}"),
    };
    path.with_file_name(name)
}

/// Delete the oldest rotated files beyond the retention window.
///
/// Errors here never block logging; a file that cannot be inspected or
/// removed is simply left for the next rotation.
fn prune_rotated(directory: &Path, active: &Path) {
    let entries = match fs::read_dir(directory) {
        Ok(entries) => entries,
        Err(_) => return,
    };

    let mut rotated: Vec<(SystemTime, PathBuf)> = entries
        .flatten()
        .filter_map(|entry| {
            let path = entry.path();
            if path == active || !path.is_file() {
                return None;
            }
            if path.extension().and_then(|ext| ext.to_str()) != Some("log") {
                return None;
            }
            let modified = entry.metadata().ok()?.modified().ok()?;
            Some((modified, path))
        })
        .collect();

    if rotated.len() <= RETAINED_FILES {
        return;
    }

    // Newest first; everything past the window goes.
    rotated.sort_by(|a, b| b.0.cmp(&a.0));
    for (_, path) in rotated.split_off(RETAINED_FILES) {
        let _ = fs::remove_file(path);
    }
}

fn host_identifier() -> String {
    hostname()
        .filter(|name| !name.is_empty())
        .unwrap_or_else(|| "localhost".to_string())
}

#[cfg(unix)]
fn hostname() -> Option<String> {
    let mut buf = [0u8; 256];
    let rc = unsafe { libc::gethostname(buf.as_mut_ptr() as *mut libc::c_char, buf.len()) };
    if rc != 0 {
        return None;
    }
    let end = buf.iter().position(|&b| b == 0).unwrap_or(buf.len());
    std::str::from_utf8(&buf[..end]).ok().map(str::to_string)
}

#[cfg(not(unix))]
fn hostname() -> Option<String> {
    env::var("COMPUTERNAME").ok()
}

fn user_identifier() -> String {
    env::var("USER")
        .or_else(|_| env::var("USERNAME"))
        .unwrap_or_else(|_| "unknown".to_string())
}
