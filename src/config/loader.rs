use std::fs;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};

use super::{MapOrString, Settings};
use crate::errors::{ConfigError, ConfigResult};
use crate::logging::levels::{get_fallback_level, parse_log_level};

/// Config file looked up in the working directory when no path is given
pub const CONFIG_FILE_NAME: &str = "groundwork.toml";

pub const ENV_LOG_LEVEL: &str = "GROUNDWORK_LOG_LEVEL";
pub const ENV_MODULE_LEVELS: &str = "GROUNDWORK_LOG_MODULE_LEVELS";
pub const ENV_RATE_LIMITS: &str = "GROUNDWORK_RATE_LIMITS";
pub const ENV_HEADERS: &str = "GROUNDWORK_HEADERS";

pub(crate) fn read_config_file(path: &Path) -> Result<String, std::io::Error> {
    let file = fs::File::open(path)?;
    let mut reader = BufReader::new(file);
    let mut contents = String::new();
    reader.read_to_string(&mut contents)?;
    Ok(contents)
}

/// Parse settings from TOML text.
///
/// An invalid global log level is replaced by the fallback level with a
/// warning instead of failing the whole load.
pub fn parse_settings(contents: &str, path: &Path) -> ConfigResult<Settings> {
    let mut settings =
        toml::from_str::<Settings>(contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

    settings.log_level = match parse_log_level(&settings.log_level) {
        Ok(level) => level,
        Err(e) => {
            log::warn!("{}. Using {}.", e, get_fallback_level());
            get_fallback_level().to_string()
        }
    };

    Ok(settings)
}

pub(crate) fn try_load_settings_from_path(path: &Path) -> Option<Settings> {
    let contents = match read_config_file(path) {
        Ok(contents) => contents,
        Err(e) => {
            handle_read_error(path, e);
            return None;
        }
    };

    match parse_settings(&contents, path) {
        Ok(settings) => {
            log::debug!("Loaded config from {}", path.display());
            Some(settings)
        }
        Err(e) => {
            log::warn!("{}. Using defaults.", e);
            None
        }
    }
}

pub(crate) fn handle_read_error(path: &Path, error: std::io::Error) {
    // Only log actual errors, not "file not found"
    if error.kind() != std::io::ErrorKind::NotFound {
        log::warn!(
            "{}",
            ConfigError::Read {
                path: path.to_path_buf(),
                source: error,
            }
        );
    }
}

/// Layer environment variables over `settings`.
///
/// `lookup` resolves a variable name; pass `|k| std::env::var(k).ok()` in
/// production. Encoded values are kept as strings and go through the lenient
/// parsers when read.
pub fn apply_env_overrides<F>(mut settings: Settings, lookup: F) -> Settings
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(level) = lookup(ENV_LOG_LEVEL) {
        match parse_log_level(&level) {
            Ok(level) => settings.log_level = level,
            Err(e) => log::warn!("Ignoring {}: {}", ENV_LOG_LEVEL, e),
        }
    }
    if let Some(value) = lookup(ENV_MODULE_LEVELS) {
        settings.module_levels = MapOrString::Encoded(value);
    }
    if let Some(value) = lookup(ENV_RATE_LIMITS) {
        settings.rate_limits = MapOrString::Encoded(value);
    }
    if let Some(value) = lookup(ENV_HEADERS) {
        settings.headers = MapOrString::Encoded(value);
    }
    settings
}

/// Load settings from `path` (or `groundwork.toml` in the working
/// directory), then apply environment overrides.
pub fn load_settings(path: Option<&Path>) -> Settings {
    let path = path
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from(CONFIG_FILE_NAME));

    let settings = try_load_settings_from_path(&path).unwrap_or_else(|| {
        log::debug!("No usable config at {}. Using defaults.", path.display());
        Settings::default()
    });

    apply_env_overrides(settings, |key| std::env::var(key).ok())
}
