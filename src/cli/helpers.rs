//! Small conveniences shared by command handlers.
//!
//! The stdin, attribute and client helpers are strict and return
//! [`CliError`]. The filter parser is lenient.

use crate::errors::CliError;
use serde_json::{Map, Number, Value};
use std::any::Any;
use std::collections::{BTreeMap, HashMap};
use std::io::{self, IsTerminal, Read};
use std::sync::Arc;

/// Key under which the client handle lives in [`CliContext::obj`].
pub const CLIENT_KEY: &str = "client";

/// Per-invocation state shared with command handlers.
#[derive(Clone, Default)]
pub struct CliContext {
    pub obj: HashMap<String, Arc<dyn Any + Send + Sync>>,
}

impl CliContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_client<C: Any + Send + Sync>(mut self, client: C) -> Self {
        self.obj.insert(CLIENT_KEY.to_string(), Arc::new(client));
        self
    }
}

impl std::fmt::Debug for CliContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CliContext")
            .field("keys", &self.obj.keys().collect::<Vec<_>>())
            .finish()
    }
}

/// Read a piped message from `reader`.
///
/// Terminal input is rejected without a message. The message is trimmed and
/// must not be empty.
pub fn read_message_from<R: Read>(mut reader: R, is_terminal: bool) -> Result<String, CliError> {
    if is_terminal {
        return Err(CliError::StdinIsTerminal);
    }

    let mut buffer = String::new();
    reader
        .read_to_string(&mut buffer)
        .map_err(CliError::StdinRead)?;

    let message = buffer.trim();
    if message.is_empty() {
        return Err(CliError::EmptyMessage);
    }
    Ok(message.to_string())
}

/// Read a piped message from the process stdin.
pub fn read_stdin_message() -> Result<String, CliError> {
    let stdin = io::stdin();
    let is_terminal = stdin.is_terminal();
    read_message_from(stdin.lock(), is_terminal)
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.to_ascii_lowercase().as_str() {
        "true" | "yes" | "1" => Some(true),
        "false" | "no" | "0" => Some(false),
        _ => None,
    }
}

/// Infer a scalar from a string.
///
/// Tries boolean, then non-negative integer (digits only), then float
/// (values containing `.`), and otherwise keeps the string. A leading `-`
/// never matches the integer rule, so `"-5"` stays a string; existing
/// callers rely on that.
pub fn infer_value(value: &str) -> Value {
    if let Some(flag) = parse_bool(value) {
        return Value::Bool(flag);
    }

    if !value.is_empty() && value.bytes().all(|b| b.is_ascii_digit()) {
        if let Ok(n) = value.parse::<u64>() {
            return Value::Number(n.into());
        }
    }

    if value.contains('.') {
        if let Some(n) = value.parse::<f64>().ok().and_then(Number::from_f64) {
            return Value::Number(n);
        }
    }

    Value::String(value.to_string())
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn build_attributes_inner(
    json_attrs: Option<&str>,
    pairs: &[String],
) -> Result<Map<String, Value>, CliError> {
    let mut attributes = match json_attrs {
        Some(json) => match serde_json::from_str::<Value>(json).map_err(CliError::InvalidJson)? {
            Value::Object(map) => map,
            other => return Err(CliError::JsonNotObject(json_type_name(&other))),
        },
        None => Map::new(),
    };

    for pair in pairs {
        let (key, value) = pair
            .split_once('=')
            .ok_or_else(|| CliError::InvalidAttribute(pair.clone()))?;
        attributes.insert(key.to_string(), infer_value(value));
    }

    Ok(attributes)
}

/// Merge a JSON object with `key=value` pairs; later entries win.
///
/// Any malformed input is fatal and its message is printed to stderr.
pub fn build_attributes(
    json_attrs: Option<&str>,
    pairs: &[String],
) -> Result<Map<String, Value>, CliError> {
    build_attributes_inner(json_attrs, pairs).inspect_err(CliError::report)
}

/// Parse `key=value,key=value`.
///
/// A segment without `=` logs a warning and the whole result is empty.
pub fn parse_filter_string(filter: &str) -> BTreeMap<String, String> {
    let mut filters = BTreeMap::new();

    for segment in filter.split(',').map(str::trim).filter(|s| !s.is_empty()) {
        match segment.split_once('=') {
            Some((key, value)) => {
                filters.insert(key.trim().to_string(), value.trim().to_string());
            }
            None => {
                log::warn!(
                    "Invalid filter format '{}'. Expected key=value pairs.",
                    filter
                );
                return BTreeMap::new();
            }
        }
    }

    filters
}

/// `1d2h3m4s` with zero units omitted.
fn format_duration_short(total_seconds: u64) -> String {
    let days = total_seconds / 86_400;
    let hours = (total_seconds % 86_400) / 3_600;
    let minutes = (total_seconds % 3_600) / 60;
    let seconds = total_seconds % 60;

    let mut out = String::new();
    for (amount, unit) in [(days, 'd'), (hours, 'h'), (minutes, 'm'), (seconds, 's')] {
        if amount > 0 {
            out.push_str(&amount.to_string());
            out.push(unit);
        }
    }
    out
}

/// Human readable duration.
///
/// Under a minute renders as `45.0s`; longer durations as `1h 2m 3s`.
pub fn format_duration(seconds: f64) -> String {
    if seconds < 60.0 {
        return format!("{:.1}s", seconds);
    }

    let short = format_duration_short(seconds as u64);
    let mut spaced = String::with_capacity(short.len() + 3);
    for c in short.chars() {
        spaced.push(c);
        if matches!(c, 'd' | 'h' | 'm') {
            spaced.push(' ');
        }
    }
    spaced.trim_end().to_string()
}

/// Fetch the client handle stored in the context.
pub fn get_client_from_context<C: Any + Send + Sync>(ctx: &CliContext) -> Result<Arc<C>, CliError> {
    ctx.obj
        .get(CLIENT_KEY)
        .cloned()
        .and_then(|client| client.downcast::<C>().ok())
        .ok_or(CliError::MissingClient)
        .inspect_err(CliError::report)
}
