//! Command handlers for the `groundwork` binary.
//!
//! Each submodule contributes descriptors for one command group. The
//! `util` commands leave their parameters to [`parameter_source`] instead of
//! attaching them.

mod attrs;
mod config;
mod files;
mod levels;
mod util;

use crate::cli::builder::{CommandDescriptor, StaticParameters};
use crate::cli::group::CommandGroup;
use anyhow::{Context, Result};
use clap::ArgMatches;
use std::any::Any;

/// All command descriptors, in help order.
pub fn descriptors() -> Vec<CommandDescriptor> {
    let mut all = Vec::new();
    all.extend(files::descriptors());
    all.extend(levels::descriptors());
    all.extend(config::descriptors());
    all.extend(util::descriptors());
    all.push(attrs::descriptor());
    all
}

/// Empty groups that descriptors name as their parent.
pub fn groups() -> Vec<CommandGroup> {
    vec![
        CommandGroup::new(files::GROUP).about("Filesystem helpers"),
        CommandGroup::new(levels::GROUP).about("Log level lookups"),
        CommandGroup::new(config::GROUP).about("Inspect settings and parse config strings"),
        CommandGroup::new(util::GROUP).about("Formatting and parsing utilities"),
    ]
}

/// Parameters for descriptors that do not carry their own.
pub fn parameter_source() -> StaticParameters {
    util::parameters()
}

/// Typed value of a parameter that clap guarantees is present.
pub(crate) fn value<'a, T>(matches: &'a ArgMatches, name: &str) -> Result<&'a T>
where
    T: Any + Clone + Send + Sync + 'static,
{
    matches
        .get_one::<T>(name)
        .with_context(|| format!("missing value for '{}'", name))
}

pub(crate) fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
