use super::value;
use crate::cli::builder::{CommandDescriptor, ParameterSpec, ValueType, ALIASES_KEY};
use crate::cli::helpers::CliContext;
use crate::io::{backup_file, find_files, get_mtime, get_size, touch, DEFAULT_BACKUP_SUFFIX};
use anyhow::{Context, Result};
use chrono::{DateTime, Local};
use clap::ArgMatches;
use serde_json::json;
use std::path::PathBuf;

pub(super) const GROUP: &str = "files";

fn path_param() -> ParameterSpec {
    ParameterSpec::new("path", ValueType::Path).help("File to inspect")
}

pub(super) fn descriptors() -> Vec<CommandDescriptor> {
    vec![
        CommandDescriptor::new("size", size)
            .parent(GROUP)
            .description("Print a file's size in bytes (0 if missing)")
            .parameters(vec![path_param()]),
        CommandDescriptor::new("mtime", mtime)
            .parent(GROUP)
            .description("Print a file's modification time")
            .parameters(vec![path_param()]),
        CommandDescriptor::new("touch", touch_cmd)
            .parent(GROUP)
            .description("Create a file or update its modification time")
            .parameters(vec![
                ParameterSpec::new("path", ValueType::Path),
                ParameterSpec::new("mode", ValueType::String)
                    .with_default("644")
                    .help("Octal permission bits"),
                ParameterSpec::new("no_clobber", ValueType::Bool)
                    .with_default("false")
                    .help("Fail if the file already exists"),
            ]),
        CommandDescriptor::new("find", find)
            .parent(GROUP)
            .description("List files matching a glob pattern")
            .metadata(ALIASES_KEY, json!(["glob"]))
            .parameters(vec![
                ParameterSpec::new("pattern", ValueType::String),
                ParameterSpec::new("root", ValueType::Path).with_default("."),
                ParameterSpec::new("recursive", ValueType::Bool).with_default("false"),
            ]),
        CommandDescriptor::new("backup", backup)
            .parent(GROUP)
            .description("Copy a file to a numbered or timestamped backup")
            .parameters(vec![
                ParameterSpec::new("path", ValueType::Path),
                ParameterSpec::new("suffix", ValueType::String).with_default(DEFAULT_BACKUP_SUFFIX),
                ParameterSpec::new("timestamp", ValueType::Bool).with_default("false"),
            ]),
    ]
}

fn size(_ctx: &CliContext, matches: &ArgMatches) -> Result<()> {
    let path: &PathBuf = value(matches, "path")?;
    println!("{}", get_size(path));
    Ok(())
}

fn mtime(_ctx: &CliContext, matches: &ArgMatches) -> Result<()> {
    let path: &PathBuf = value(matches, "path")?;
    match get_mtime(path) {
        Some(mtime) => println!("{}", DateTime::<Local>::from(mtime).to_rfc3339()),
        None => println!("none"),
    }
    Ok(())
}

fn touch_cmd(_ctx: &CliContext, matches: &ArgMatches) -> Result<()> {
    let path: &PathBuf = value(matches, "path")?;
    let mode: &String = value(matches, "mode")?;
    let mode = u32::from_str_radix(mode, 8).with_context(|| format!("invalid mode '{}'", mode))?;
    touch(path, mode, !matches.get_flag("no_clobber"))
        .with_context(|| format!("Failed to touch {}", path.display()))
}

fn find(_ctx: &CliContext, matches: &ArgMatches) -> Result<()> {
    let pattern: &String = value(matches, "pattern")?;
    let root: &PathBuf = value(matches, "root")?;
    for file in find_files(pattern, root, matches.get_flag("recursive")) {
        println!("{}", file.display());
    }
    Ok(())
}

fn backup(_ctx: &CliContext, matches: &ArgMatches) -> Result<()> {
    let path: &PathBuf = value(matches, "path")?;
    let suffix: &String = value(matches, "suffix")?;
    let backup = backup_file(path, suffix, matches.get_flag("timestamp"))
        .with_context(|| format!("No backup created for {}", path.display()))?;
    println!("{}", backup.display());
    Ok(())
}
