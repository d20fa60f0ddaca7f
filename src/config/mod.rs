//! Runtime settings and the structured config parsers.
//!
//! Settings come from an optional `groundwork.toml` file, then environment
//! variables are layered on top. Map-valued settings accept either a TOML
//! table or a string in the lenient `key:value,...` grammar of
//! [`parsers`].

pub mod loader;
pub mod parsers;

pub use loader::{apply_env_overrides, load_settings, parse_settings, CONFIG_FILE_NAME};
pub use parsers::{
    normalize_module_levels, parse_headers, parse_module_levels, parse_rate_limits, Headers,
    ModuleLevels, RateLimits,
};

use crate::logging::levels::FALLBACK_LEVEL;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A map setting given either as a table or as an encoded string.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum MapOrString<V> {
    Map(BTreeMap<String, V>),
    Encoded(String),
}

impl<V> Default for MapOrString<V> {
    fn default() -> Self {
        Self::Map(BTreeMap::new())
    }
}

/// Rate limit entry as written in a config table.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
pub struct RateLimit {
    pub rate: f64,
    pub capacity: f64,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct Settings {
    /// Global log level name
    pub log_level: String,
    /// Per-module log levels
    pub module_levels: MapOrString<String>,
    /// Per-logger rate limits
    pub rate_limits: MapOrString<RateLimit>,
    /// Extra HTTP headers
    pub headers: MapOrString<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            log_level: FALLBACK_LEVEL.to_string(),
            module_levels: MapOrString::default(),
            rate_limits: MapOrString::default(),
            headers: MapOrString::default(),
        }
    }
}

impl Settings {
    /// Validated per-module levels. Invalid entries are dropped.
    pub fn module_levels(&self) -> ModuleLevels {
        match &self.module_levels {
            MapOrString::Map(map) => normalize_module_levels(map),
            MapOrString::Encoded(value) => parse_module_levels(value),
        }
    }

    pub fn rate_limits(&self) -> RateLimits {
        match &self.rate_limits {
            MapOrString::Map(map) => map
                .iter()
                .filter(|(logger, _)| !logger.trim().is_empty())
                .map(|(logger, limit)| (logger.clone(), (limit.rate, limit.capacity)))
                .collect(),
            MapOrString::Encoded(value) => parse_rate_limits(value),
        }
    }

    /// Headers. A table is returned as-is.
    pub fn headers(&self) -> Headers {
        match &self.headers {
            MapOrString::Map(map) => map.clone(),
            MapOrString::Encoded(value) => parse_headers(value),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();
        assert_eq!(settings.log_level, "INFO");
        assert!(settings.module_levels().is_empty());
        assert!(settings.rate_limits().is_empty());
        assert!(settings.headers().is_empty());
    }

    #[test]
    fn test_table_module_levels_are_normalized() {
        let mut map = BTreeMap::new();
        map.insert("web".to_string(), "warning".to_string());
        map.insert("db".to_string(), "chatty".to_string());
        let settings = Settings {
            module_levels: MapOrString::Map(map),
            ..Settings::default()
        };
        let levels = settings.module_levels();
        assert_eq!(levels.len(), 1);
        assert_eq!(levels["web"], "WARNING");
    }

    #[test]
    fn test_encoded_headers_are_parsed() {
        let settings = Settings {
            headers: MapOrString::Encoded("a=1,b".to_string()),
            ..Settings::default()
        };
        let headers = settings.headers();
        assert_eq!(headers.len(), 1);
        assert_eq!(headers["a"], "1");
    }

    #[test]
    fn test_table_headers_returned_unchanged() {
        let mut map = BTreeMap::new();
        map.insert(" spaced ".to_string(), "".to_string());
        let settings = Settings {
            headers: MapOrString::Map(map.clone()),
            ..Settings::default()
        };
        assert_eq!(settings.headers(), map);
    }
}
