use super::{print_json, value};
use crate::cli::builder::{CommandDescriptor, ParameterSpec, ValueType};
use crate::cli::helpers::{get_client_from_context, CliContext};
use crate::config::{parse_headers, parse_module_levels, parse_rate_limits, Settings};
use anyhow::Result;
use clap::ArgMatches;
use serde_json::json;

pub(super) const GROUP: &str = "config";

fn value_param() -> ParameterSpec {
    ParameterSpec::new("value", ValueType::String).help("Encoded config string")
}

pub(super) fn descriptors() -> Vec<CommandDescriptor> {
    vec![
        CommandDescriptor::new("show", show)
            .parent(GROUP)
            .description("Print the effective settings")
            .parameters(vec![]),
        CommandDescriptor::new("parse-modules", parse_modules)
            .parent(GROUP)
            .description("Parse 'module:LEVEL,...'")
            .parameters(vec![value_param()]),
        CommandDescriptor::new("parse-rate-limits", parse_limits)
            .parent(GROUP)
            .description("Parse 'logger:rate:capacity,...'")
            .parameters(vec![value_param()]),
        CommandDescriptor::new("parse-headers", parse_header_values)
            .parent(GROUP)
            .description("Parse 'key=value,...'")
            .parameters(vec![value_param()]),
    ]
}

/// Loaded settings are the context's client handle.
fn show(ctx: &CliContext, _matches: &ArgMatches) -> Result<()> {
    let settings = get_client_from_context::<Settings>(ctx)?;
    let rate_limits: serde_json::Map<_, _> = settings
        .rate_limits()
        .into_iter()
        .map(|(logger, (rate, capacity))| {
            (logger, json!({ "rate": rate, "capacity": capacity }))
        })
        .collect();

    print_json(&json!({
        "log_level": settings.log_level,
        "module_levels": settings.module_levels(),
        "rate_limits": rate_limits,
        "headers": settings.headers(),
    }))
}

fn parse_modules(_ctx: &CliContext, matches: &ArgMatches) -> Result<()> {
    let raw: &String = value(matches, "value")?;
    print_json(&parse_module_levels(raw))
}

fn parse_limits(_ctx: &CliContext, matches: &ArgMatches) -> Result<()> {
    let raw: &String = value(matches, "value")?;
    print_json(&parse_rate_limits(raw))
}

fn parse_header_values(_ctx: &CliContext, matches: &ArgMatches) -> Result<()> {
    let raw: &String = value(matches, "value")?;
    print_json(&parse_headers(raw))
}
