//! Log level names, numeric severities and lookups.
//!
//! Level names are the uppercase strings used across configuration
//! (`TRACE`, `DEBUG`, `INFO`, `WARNING`, `ERROR`, `CRITICAL`). Every lookup
//! normalizes its input first, so `"  warning "` and `"WARNING"` are the same
//! level.

use crate::errors::{ConfigError, ConfigResult};
use log::LevelFilter;

/// Level name to numeric severity, lowest first.
pub const LEVEL_TABLE: &[(&str, i32)] = &[
    ("TRACE", 5),
    ("DEBUG", 10),
    ("INFO", 20),
    ("WARNING", 30),
    ("ERROR", 40),
    ("CRITICAL", 50),
];

/// Level used when a name cannot be resolved.
pub const FALLBACK_LEVEL: &str = "INFO";

/// Numeric severity of [`FALLBACK_LEVEL`].
pub const FALLBACK_NUMERIC: i32 = 20;

/// Uppercase and trim a level name.
pub fn normalize_level(level: &str) -> String {
    level.trim().to_uppercase()
}

/// Numeric severity for `level`.
///
/// Unknown names resolve to `fallback` when given, otherwise to
/// [`FALLBACK_NUMERIC`].
pub fn get_numeric_level(level: &str, fallback: Option<i32>) -> i32 {
    let normalized = normalize_level(level);
    LEVEL_TABLE
        .iter()
        .find(|(name, _)| *name == normalized)
        .map(|(_, value)| *value)
        .unwrap_or_else(|| fallback.unwrap_or(FALLBACK_NUMERIC))
}

pub fn is_valid_level(level: &str) -> bool {
    let normalized = normalize_level(level);
    LEVEL_TABLE.iter().any(|(name, _)| *name == normalized)
}

pub fn get_fallback_level() -> &'static str {
    FALLBACK_LEVEL
}

pub fn get_fallback_numeric() -> i32 {
    FALLBACK_NUMERIC
}

/// Comma separated list of the valid names, for error messages.
pub fn valid_level_names() -> String {
    LEVEL_TABLE
        .iter()
        .map(|(name, _)| *name)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Validate a level name and return its normalized form.
pub fn parse_log_level(value: &str) -> ConfigResult<String> {
    let normalized = normalize_level(value);
    if is_valid_level(&normalized) {
        Ok(normalized)
    } else {
        Err(ConfigError::InvalidLogLevel {
            value: value.to_string(),
            valid: valid_level_names(),
        })
    }
}

/// Map a level name onto the `log` crate's filter.
///
/// `log` has no `CRITICAL`, so it collapses into `Error`. Unknown names map
/// to the fallback level's filter.
pub fn to_level_filter(level: &str) -> LevelFilter {
    match normalize_level(level).as_str() {
        "TRACE" => LevelFilter::Trace,
        "DEBUG" => LevelFilter::Debug,
        "INFO" => LevelFilter::Info,
        "WARNING" => LevelFilter::Warn,
        "ERROR" | "CRITICAL" => LevelFilter::Error,
        _ => to_level_filter(FALLBACK_LEVEL),
    }
}
