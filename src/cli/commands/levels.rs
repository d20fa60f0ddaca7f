use super::value;
use crate::cli::builder::{CommandDescriptor, ParameterSpec, ValueType};
use crate::cli::helpers::CliContext;
use crate::logging::levels::{get_numeric_level, is_valid_level, normalize_level, valid_level_names};
use anyhow::{bail, Result};
use clap::ArgMatches;

pub(super) const GROUP: &str = "levels";

pub(super) fn descriptors() -> Vec<CommandDescriptor> {
    vec![
        CommandDescriptor::new("check", check)
            .parent(GROUP)
            .description("Validate a log level name")
            .parameters(vec![ParameterSpec::new("level", ValueType::String)]),
        CommandDescriptor::new("numeric", numeric)
            .parent(GROUP)
            .description("Print the numeric severity of a log level")
            .parameters(vec![
                ParameterSpec::new("level", ValueType::String),
                ParameterSpec::new("fallback", ValueType::Integer)
                    .optional()
                    .positional(false)
                    .help("Value printed for unknown levels"),
            ]),
    ]
}

fn check(_ctx: &CliContext, matches: &ArgMatches) -> Result<()> {
    let level: &String = value(matches, "level")?;
    if !is_valid_level(level) {
        bail!(
            "'{}' is not a valid level. Valid levels: {}",
            level,
            valid_level_names()
        );
    }
    println!("{}", normalize_level(level));
    Ok(())
}

fn numeric(_ctx: &CliContext, matches: &ArgMatches) -> Result<()> {
    let level: &String = value(matches, "level")?;
    let fallback = matches
        .get_one::<i64>("fallback")
        .map(|n| i32::try_from(*n))
        .transpose()?;
    println!("{}", get_numeric_level(level, fallback));
    Ok(())
}
