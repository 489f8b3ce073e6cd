//! Log directory cleanup.
//!
//! Both helpers operate on regular files directly under the given
//! directory; subdirectories (including the per-host/per-user layout the
//! rotating sink writes into) are left alone.

use std::fs;
use std::path::Path;
use std::time::{Duration, SystemTime};

use crate::error::Result;

const SECS_PER_DAY: u64 = 24 * 60 * 60;

/// Delete files whose modification time is older than `days` days.
///
/// Returns the number of files deleted. Files that disappear or resist
/// inspection mid-walk are skipped.
pub(crate) fn delete_files_older_than(directory: &Path, days: u64) -> Result<usize> {
    let cutoff = SystemTime::now()
        .checked_sub(Duration::from_secs(days.saturating_mul(SECS_PER_DAY)))
        .unwrap_or(SystemTime::UNIX_EPOCH);

    let mut deleted = 0;
    for entry in fs::read_dir(directory)? {
        let entry = entry?;
        let path = entry.path();
        if !path.is_file() {
            continue;
        }

        if let Ok(metadata) = entry.metadata() {
            if let Ok(modified) = metadata.modified() {
                if modified < cutoff && fs::remove_file(&path).is_ok() {
                    deleted += 1;
                }
            }
        }
    }

    Ok(deleted)
}

/// Delete every regular file directly under the directory.
///
/// Returns the number of files deleted.
pub(crate) fn delete_all_files(directory: &Path) -> Result<usize> {
    let mut deleted = 0;
    for entry in fs::read_dir(directory)? {
        let entry = entry?;
        let path = entry.path();
        if path.is_file() && fs::remove_file(&path).is_ok() {
            deleted += 1;
        }
    }

    Ok(deleted)
}
