//! Best-effort file queries and `touch`.
//!
//! The query helpers never fail: problems are logged and a default is
//! returned. `touch` is the exception and reports errors to its caller.

use std::fs::{self, OpenOptions};
use std::io;
use std::path::Path;
use std::time::SystemTime;

/// Default permission bits for [`touch`].
pub const DEFAULT_FILE_MODE: u32 = 0o644;

/// Size of `path` in bytes, or 0 when it is missing or unreadable.
pub fn get_size(path: &Path) -> u64 {
    match fs::metadata(path) {
        Ok(metadata) => metadata.len(),
        Err(e) if e.kind() == io::ErrorKind::NotFound => 0,
        Err(e) => {
            log::warn!("Failed to get size of {}: {}", path.display(), e);
            0
        }
    }
}

/// Modification time of `path`, or `None` on any failure.
pub fn get_mtime(path: &Path) -> Option<SystemTime> {
    match fs::metadata(path).and_then(|metadata| metadata.modified()) {
        Ok(mtime) => Some(mtime),
        Err(e) => {
            log::debug!("Failed to get mtime of {}: {}", path.display(), e);
            None
        }
    }
}

/// Create `path` or bump its modification time.
///
/// Parent directories are created as needed. With `exist_ok` false an
/// existing file is left alone and `ErrorKind::AlreadyExists` is returned.
/// `mode` is applied on unix and ignored elsewhere.
pub fn touch(path: &Path, mode: u32, exist_ok: bool) -> io::Result<()> {
    if !exist_ok && path.exists() {
        return Err(io::Error::new(
            io::ErrorKind::AlreadyExists,
            format!("File exists: {}", path.display()),
        ));
    }

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    let file = OpenOptions::new().create(true).append(true).open(path)?;
    file.set_modified(SystemTime::now())?;
    set_mode(path, mode)?;

    log::debug!("Touched {}", path.display());
    Ok(())
}

#[cfg(unix)]
fn set_mode(path: &Path, mode: u32) -> io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(path, fs::Permissions::from_mode(mode))
}

#[cfg(not(unix))]
fn set_mode(_path: &Path, _mode: u32) -> io::Result<()> {
    Ok(())
}
