use super::print_json;
use crate::cli::builder::{CommandDescriptor, ParameterSpec, ValueType};
use crate::cli::helpers::{build_attributes, read_stdin_message, CliContext};
use crate::errors::CliError;
use anyhow::Result;
use clap::ArgMatches;

pub(super) fn descriptor() -> CommandDescriptor {
    CommandDescriptor::new("attrs", attrs)
        .description("Merge a JSON object with key=value pairs")
        .parameters(vec![
            ParameterSpec::new("pairs", ValueType::String)
                .optional()
                .multiple()
                .help("key=value pairs; later pairs win"),
            ParameterSpec::new("json", ValueType::String)
                .optional()
                .positional(false)
                .help("JSON object to start from"),
            ParameterSpec::new("stdin", ValueType::Bool)
                .with_default("false")
                .help("Read the JSON object from piped stdin"),
        ])
}

fn attrs(_ctx: &CliContext, matches: &ArgMatches) -> Result<()> {
    let pairs: Vec<String> = matches
        .get_many::<String>("pairs")
        .map(|values| values.cloned().collect())
        .unwrap_or_default();

    let json = if matches.get_flag("stdin") {
        Some(read_stdin_message().inspect_err(CliError::report)?)
    } else {
        matches.get_one::<String>("json").cloned()
    };

    let attributes = build_attributes(json.as_deref(), &pairs)?;
    print_json(&attributes)
}
