//! Logging setup and level utilities.
//!
//! The crate logs through the `log` facade. [`init_logging`] wires an
//! `env_logger` backend using the global level and per-module levels from
//! [`Settings`]. `RUST_LOG`, when set, is applied on top.

pub mod levels;

pub use levels::{
    get_fallback_level, get_fallback_numeric, get_numeric_level, is_valid_level, normalize_level,
    parse_log_level, to_level_filter,
};

use crate::config::Settings;
use log::LevelFilter;

/// Build the logger for the given settings without installing it.
pub fn build_logger(settings: &Settings, verbosity: u8) -> env_logger::Builder {
    let mut builder = env_logger::Builder::new();
    builder.filter_level(effective_level(&settings.log_level, verbosity));

    for (module, level) in settings.module_levels() {
        // Config uses dotted names, Rust targets use `::`
        builder.filter_module(&module.replace('.', "::"), to_level_filter(&level));
    }

    if let Ok(spec) = std::env::var("RUST_LOG") {
        builder.parse_filters(&spec);
    }

    builder
}

/// Install the global logger. Safe to call more than once.
pub fn init_logging(settings: &Settings, verbosity: u8) {
    if let Err(e) = build_logger(settings, verbosity).try_init() {
        log::debug!("Logger already initialized: {}", e);
    }
}

/// Each `-v` raises the configured level by one step.
fn effective_level(level: &str, verbosity: u8) -> LevelFilter {
    let base = to_level_filter(level);
    match verbosity {
        0 => base,
        1 => base.max(LevelFilter::Info),
        2 => base.max(LevelFilter::Debug),
        _ => LevelFilter::Trace,
    }
}
