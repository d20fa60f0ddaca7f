//! Filesystem convenience helpers.
//!
//! Queries ([`get_size`], [`get_mtime`], [`find_files`], [`backup_file`]) are
//! best-effort: failures are logged and a default value is returned.
//! [`touch`] and [`ensure_dir`] report errors.

pub mod backup;
pub mod files;
pub mod walker;

pub use backup::{backup_file, DEFAULT_BACKUP_SUFFIX};
pub use files::{get_mtime, get_size, touch, DEFAULT_FILE_MODE};
pub use walker::find_files;

use std::fs;
use std::io;
use std::path::Path;

pub fn ensure_dir(path: &Path) -> io::Result<()> {
    if !path.exists() {
        fs::create_dir_all(path)?;
    }
    Ok(())
}
