//! CLI module for groundwork
//!
//! This module provides the command-line layer, including:
//! - Descriptor-driven command construction (`builder`, `group`)
//! - Input and formatting helpers for handlers (`helpers`)
//! - Command handlers (`commands`)
//! - Command tree assembly (`setup`)

pub mod builder;
pub mod commands;
pub mod group;
pub mod helpers;
pub mod setup;

pub use builder::{
    build_command, register_command, BuiltCommand, CommandDescriptor, Handler, ParameterSource,
    ParameterSpec, StaticParameters, ValueType,
};
pub use group::CommandGroup;
pub use helpers::{
    build_attributes, format_duration, get_client_from_context, infer_value, parse_filter_string,
    read_message_from, read_stdin_message, CliContext,
};
pub use setup::{build_app, root_command, APP_NAME};
