use super::{print_json, value};
use crate::cli::builder::{CommandDescriptor, ParameterSpec, StaticParameters, ValueType};
use crate::cli::helpers::{format_duration, parse_filter_string, CliContext};
use anyhow::Result;
use clap::ArgMatches;

pub(super) const GROUP: &str = "util";

pub(super) fn descriptors() -> Vec<CommandDescriptor> {
    vec![
        CommandDescriptor::new("duration", duration)
            .parent(GROUP)
            .description("Format a number of seconds for humans"),
        CommandDescriptor::new("filter", filter)
            .parent(GROUP)
            .description("Parse a 'key=value,...' filter string"),
    ]
}

pub(super) fn parameters() -> StaticParameters {
    StaticParameters::new()
        .insert(
            "duration",
            vec![ParameterSpec::new("seconds", ValueType::Float)],
        )
        .insert(
            "filter",
            vec![ParameterSpec::new("filter", ValueType::String)],
        )
}

fn duration(_ctx: &CliContext, matches: &ArgMatches) -> Result<()> {
    let seconds: &f64 = value(matches, "seconds")?;
    println!("{}", format_duration(*seconds));
    Ok(())
}

fn filter(_ctx: &CliContext, matches: &ArgMatches) -> Result<()> {
    let raw: &String = value(matches, "filter")?;
    print_json(&parse_filter_string(raw))
}
