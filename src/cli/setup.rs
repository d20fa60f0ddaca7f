//! Assembly of the `groundwork` command tree and global arguments.

use super::builder::{build_command, register_command};
use super::commands;
use super::group::CommandGroup;
use crate::errors::CommandBuildError;
use clap::{value_parser, Arg, ArgAction, Command};
use std::collections::HashMap;
use std::path::PathBuf;

pub const APP_NAME: &str = "groundwork";

/// Build every command and hang it in the group tree.
pub fn build_app() -> Result<CommandGroup, CommandBuildError> {
    let mut groups: HashMap<String, CommandGroup> = commands::groups()
        .into_iter()
        .map(|group| (group.name().to_string(), group))
        .collect();
    let mut root = CommandGroup::new(APP_NAME)
        .about("Filesystem, log level and config string utilities");

    let source = commands::parameter_source();
    for descriptor in commands::descriptors() {
        let built = build_command(&descriptor, &source)?;
        register_command(built, &mut groups, &mut root);
    }

    root.attach_groups(groups);
    Ok(root)
}

/// The root `clap::Command` with global options added.
pub fn root_command(app: &CommandGroup) -> Command {
    app.to_clap()
        .version(env!("CARGO_PKG_VERSION"))
        .arg(
            Arg::new("config")
                .long("config")
                .env("GROUNDWORK_CONFIG")
                .global(true)
                .value_parser(value_parser!(PathBuf))
                .help("Path to a groundwork.toml settings file"),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .global(true)
                .action(ArgAction::Count)
                .help("Increase log verbosity (-v, -vv, -vvv)"),
        )
}
