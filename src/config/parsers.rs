//! Lenient parsers for string-encoded structured config.
//!
//! All three parsers share one grammar: the input is split on `,`, each
//! segment is trimmed, blank segments are skipped, and each remaining
//! segment is split on a field separator. A segment that fails validation is
//! dropped and parsing continues with the next one, so one bad entry never
//! discards the rest of the configuration. Empty or whitespace-only input
//! yields an empty map.
//!
//! ```rust
//! use groundwork::config::parsers::parse_module_levels;
//!
//! let levels = parse_module_levels("api:INFO,bad:INVALID,db:error");
//! assert_eq!(levels.len(), 2);
//! assert_eq!(levels["db"], "ERROR");
//! ```

use crate::logging::levels::parse_log_level;
use std::collections::BTreeMap;

/// Module name to normalized level name.
pub type ModuleLevels = BTreeMap<String, String>;

/// Logger name to `(rate, capacity)`.
pub type RateLimits = BTreeMap<String, (f64, f64)>;

/// Header name to header value.
pub type Headers = BTreeMap<String, String>;

/// Trimmed, non-empty comma separated segments.
fn segments(value: &str) -> impl Iterator<Item = &str> {
    value.split(',').map(str::trim).filter(|s| !s.is_empty())
}

/// Parse `module:LEVEL` pairs.
///
/// Levels are case-insensitive and must be a known level name. Segments
/// without a `:`, with an empty module name, or with an unknown level are
/// skipped.
pub fn parse_module_levels(value: &str) -> ModuleLevels {
    let mut result = ModuleLevels::new();

    for segment in segments(value) {
        let Some((module, level)) = segment.split_once(':') else {
            continue;
        };
        let module = module.trim();
        if module.is_empty() {
            continue;
        }
        match parse_log_level(level.trim()) {
            Ok(level) => {
                result.insert(module.to_string(), level);
            }
            Err(e) => log::debug!("Skipping module level '{}': {}", segment, e),
        }
    }

    result
}

/// Validate an already-built module level map.
///
/// Entries with an empty module name or an unknown level are dropped and
/// the rest are normalized to uppercase.
pub fn normalize_module_levels<'a, I>(levels: I) -> ModuleLevels
where
    I: IntoIterator<Item = (&'a String, &'a String)>,
{
    levels
        .into_iter()
        .filter(|(module, _)| !module.trim().is_empty())
        .filter_map(|(module, level)| {
            parse_log_level(level)
                .ok()
                .map(|level| (module.clone(), level))
        })
        .collect()
}

/// Parse `logger:rate:capacity` triplets.
///
/// A segment must have exactly three `:` separated parts, a non-empty
/// logger name, and float rate and capacity. Anything else is skipped.
pub fn parse_rate_limits(value: &str) -> RateLimits {
    let mut result = RateLimits::new();

    for segment in segments(value) {
        let parts: Vec<&str> = segment.split(':').map(str::trim).collect();
        let [logger, rate, capacity] = parts.as_slice() else {
            continue;
        };
        if logger.is_empty() {
            continue;
        }
        if let (Ok(rate), Ok(capacity)) = (rate.parse::<f64>(), capacity.parse::<f64>()) {
            result.insert(logger.to_string(), (rate, capacity));
        }
    }

    result
}

/// Parse `key=value` header pairs.
///
/// The first `=` splits key from value, so values may contain `=`. An empty
/// key drops the entry. An empty value is kept.
pub fn parse_headers(value: &str) -> Headers {
    let mut result = Headers::new();

    for segment in segments(value) {
        let Some((key, value)) = segment.split_once('=') else {
            continue;
        };
        let key = key.trim();
        if key.is_empty() {
            continue;
        }
        result.insert(key.to_string(), value.trim().to_string());
    }

    result
}
