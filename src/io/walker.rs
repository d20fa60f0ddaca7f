use std::path::{Path, PathBuf};

/// Recursive glob marker
const RECURSIVE_MARKER: &str = "**";

/// Pattern actually globbed for `pattern` under the recursive flag.
fn effective_pattern(pattern: &str, recursive: bool) -> String {
    if recursive && !pattern.contains(RECURSIVE_MARKER) {
        format!("{}/{}", RECURSIVE_MARKER, pattern)
    } else {
        pattern.to_string()
    }
}

fn glob_files(pattern: &str, root: &Path) -> anyhow::Result<Vec<PathBuf>> {
    let root = glob::Pattern::escape(&root.to_string_lossy());
    let full = format!("{}/{}", root.trim_end_matches('/'), pattern);

    let mut files = Vec::new();
    for entry in glob::glob(&full)? {
        let path = match entry {
            Ok(path) => path,
            Err(e) => {
                log::warn!(
                    "Skipping unreadable entry {}: {}",
                    e.path().display(),
                    e.error()
                );
                continue;
            }
        };
        if path.is_file() {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

/// Regular files under `root` matching `pattern`.
///
/// With `recursive`, a pattern without `**` is searched at every depth.
/// Unreadable entries are skipped with a warning. A missing root or an
/// invalid pattern yields an empty list.
pub fn find_files(pattern: &str, root: &Path, recursive: bool) -> Vec<PathBuf> {
    if !root.exists() {
        log::warn!("Search root does not exist: {}", root.display());
        return Vec::new();
    }

    let pattern = effective_pattern(pattern, recursive);
    match glob_files(&pattern, root) {
        Ok(files) => files,
        Err(e) => {
            log::error!(
                "Failed to find files matching '{}' in {}: {}",
                pattern,
                root.display(),
                e
            );
            Vec::new()
        }
    }
}
