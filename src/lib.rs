// Export modules for library usage
pub mod cli;
pub mod config;
pub mod errors;
pub mod io;
pub mod logging;

// Re-export commonly used types
pub use crate::config::{
    load_settings, parse_headers, parse_module_levels, parse_rate_limits, Settings,
};

pub use crate::errors::{CliError, CommandBuildError, ConfigError};

pub use crate::io::{backup_file, find_files, get_mtime, get_size, touch};

pub use crate::logging::{
    get_fallback_level, get_fallback_numeric, get_numeric_level, init_logging, is_valid_level,
    normalize_level,
};
