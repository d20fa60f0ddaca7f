//! Backup copies next to the original file.
//!
//! Backup names are either timestamped (`config_20240101_120000.toml.bak`)
//! or numbered (`config.toml.bak`, `config.toml.bak.1`, ...). The free-name
//! search is not race safe against concurrent callers.

use chrono::{DateTime, Local};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

pub const DEFAULT_BACKUP_SUFFIX: &str = ".bak";

const TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

/// `stem_YYYYMMDD_HHMMSS.ext<suffix>`
fn timestamped_name(path: &Path, suffix: &str, now: DateTime<Local>) -> PathBuf {
    let stem = path.file_stem().unwrap_or_default().to_string_lossy();
    let ext = path
        .extension()
        .map(|e| format!(".{}", e.to_string_lossy()))
        .unwrap_or_default();
    let name = format!("{}_{}{}{}", stem, now.format(TIMESTAMP_FORMAT), ext, suffix);
    path.with_file_name(name)
}

/// First free name of `name<suffix>`, `name<suffix>.1`, `name<suffix>.2`, ...
fn numbered_name(path: &Path, suffix: &str) -> PathBuf {
    let mut base = path.file_name().unwrap_or_default().to_os_string();
    base.push(suffix);

    let candidate = path.with_file_name(&base);
    if !candidate.exists() {
        return candidate;
    }

    (1u64..)
        .map(|n| {
            let mut name = base.clone();
            name.push(format!(".{}", n));
            path.with_file_name(name)
        })
        .find(|candidate| !candidate.exists())
        .unwrap_or(candidate)
}

fn preserve_mtime(from: &Path, to: &Path) -> io::Result<()> {
    let modified = fs::metadata(from)?.modified()?;
    fs::File::options().write(true).open(to)?.set_modified(modified)
}

/// Copy contents and permissions, then modification time where the copy is
/// writable.
fn copy_with_metadata(from: &Path, to: &Path) -> io::Result<()> {
    fs::copy(from, to)?;
    if let Err(e) = preserve_mtime(from, to) {
        log::debug!("Could not preserve mtime on {}: {}", to.display(), e);
    }
    Ok(())
}

/// Back up `path` and return the backup's path.
///
/// Returns `None` when the source is missing (nothing is written) or the
/// copy fails.
pub fn backup_file(path: &Path, suffix: &str, timestamp: bool) -> Option<PathBuf> {
    if !path.is_file() {
        log::warn!("Cannot back up missing file: {}", path.display());
        return None;
    }

    let backup = if timestamp {
        timestamped_name(path, suffix, Local::now())
    } else {
        numbered_name(path, suffix)
    };

    match copy_with_metadata(path, &backup) {
        Ok(()) => {
            log::debug!("Backed up {} to {}", path.display(), backup.display());
            Some(backup)
        }
        Err(e) => {
            log::error!(
                "Failed to back up {} to {}: {}",
                path.display(),
                backup.display(),
                e
            );
            None
        }
    }
}
