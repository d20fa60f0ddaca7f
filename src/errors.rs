//! Error types for the strict code paths.
//!
//! Two error conventions coexist in this crate:
//!
//! - **Strict** operations (command building, attribute building, stdin
//!   reading, client lookup, config validation) return `Result` with one of
//!   the enums below. Callers are expected to stop on these.
//! - **Lenient** operations (the structured config parsers and the
//!   filesystem queries) never return these types. They log and fall back to
//!   an empty or zero value instead.
//!
//! # Example
//!
//! ```rust
//! use groundwork::errors::CliError;
//!
//! let err = CliError::MissingClient;
//! assert_eq!(err.exit_code(), 1);
//! assert_eq!(err.to_string(), "Error: Client not initialized.");
//! ```

use std::path::PathBuf;
use thiserror::Error;

/// Exit code reported by every strict CLI helper failure.
pub const EXIT_FAILURE: i32 = 1;

/// Errors raised by the CLI helpers.
#[derive(Debug, Error)]
pub enum CliError {
    /// Stdin is attached to a terminal, so there is nothing piped to read.
    /// Reported without a user-facing message.
    #[error("stdin is a terminal")]
    StdinIsTerminal,

    /// Piped stdin was empty after trimming whitespace
    #[error("Error: Message is empty.")]
    EmptyMessage,

    /// Reading stdin failed
    #[error("Error: Failed to read stdin: {0}")]
    StdinRead(#[source] std::io::Error),

    /// The attributes JSON document did not parse
    #[error("Error: Invalid JSON for attributes: {0}")]
    InvalidJson(#[source] serde_json::Error),

    /// The attributes JSON document parsed but is not an object
    #[error("Error: Attributes JSON must be an object, got {0}.")]
    JsonNotObject(&'static str),

    /// A `key=value` attribute had no `=`
    #[error("Error: Invalid attribute format '{0}'. Use key=value.")]
    InvalidAttribute(String),

    /// The request context has no usable `client` entry
    #[error("Error: Client not initialized.")]
    MissingClient,
}

impl CliError {
    /// Numeric exit code associated with this failure.
    pub fn exit_code(&self) -> i32 {
        EXIT_FAILURE
    }

    /// User-facing message, if the failure should print one.
    pub fn user_message(&self) -> Option<String> {
        match self {
            Self::StdinIsTerminal => None,
            other => Some(other.to_string()),
        }
    }

    /// Print the user-facing message (if any) to stderr.
    pub fn report(&self) {
        if let Some(message) = self.user_message() {
            eprintln!("{}", message);
        }
    }
}

/// Error raised when a command descriptor cannot be turned into a command.
///
/// Carries the command name and the original cause.
#[derive(Debug, Error)]
#[error("Failed to build command '{command}': {source}")]
pub struct CommandBuildError {
    pub command: String,
    #[source]
    pub source: anyhow::Error,
}

impl CommandBuildError {
    pub fn new(command: impl Into<String>, source: impl Into<anyhow::Error>) -> Self {
        Self {
            command: command.into(),
            source: source.into(),
        }
    }
}

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A log level name outside the known set
    #[error("Invalid log level '{value}'. Valid levels: {valid}")]
    InvalidLogLevel { value: String, valid: String },

    /// A config file could not be read
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A config file did not parse as TOML
    #[error("Failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;
