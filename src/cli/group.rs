//! Command group tree.

use super::builder::BuiltCommand;
use super::helpers::CliContext;
use anyhow::bail;
use clap::{ArgMatches, Command};
use std::collections::HashMap;

/// A named set of commands and nested groups.
#[derive(Debug, Clone)]
pub struct CommandGroup {
    name: String,
    about: Option<String>,
    commands: Vec<BuiltCommand>,
    groups: Vec<CommandGroup>,
}

impl CommandGroup {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            about: None,
            commands: Vec::new(),
            groups: Vec::new(),
        }
    }

    pub fn about(mut self, about: impl Into<String>) -> Self {
        self.about = Some(about.into());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn add_command(&mut self, command: BuiltCommand) {
        self.commands.push(command);
    }

    pub fn add_group(&mut self, group: CommandGroup) {
        self.groups.push(group);
    }

    /// Nest every group of `groups`, ordered by name.
    pub fn attach_groups(&mut self, groups: HashMap<String, CommandGroup>) {
        let mut groups: Vec<_> = groups.into_values().collect();
        groups.sort_by(|a, b| a.name.cmp(&b.name));
        self.groups.extend(groups);
    }

    pub fn command_names(&self) -> Vec<&str> {
        self.commands.iter().map(|c| c.name.as_str()).collect()
    }

    pub fn find_command(&self, name: &str) -> Option<&BuiltCommand> {
        self.commands.iter().find(|c| c.name == name)
    }

    pub fn find_group(&self, name: &str) -> Option<&CommandGroup> {
        self.groups.iter().find(|g| g.name == name)
    }

    /// Render the tree as a `clap::Command`.
    pub fn to_clap(&self) -> Command {
        let mut command = Command::new(self.name.clone())
            .subcommand_required(true)
            .arg_required_else_help(true);
        if let Some(about) = &self.about {
            command = command.about(about.clone());
        }

        command
            .subcommands(self.commands.iter().map(|c| c.command.clone()))
            .subcommands(self.groups.iter().map(CommandGroup::to_clap))
    }

    /// Run the handler selected by `matches`.
    pub fn dispatch(&self, ctx: &CliContext, matches: &ArgMatches) -> anyhow::Result<()> {
        let Some((name, sub_matches)) = matches.subcommand() else {
            bail!("No command given for '{}'", self.name);
        };

        if let Some(command) = self.find_command(name) {
            log::debug!("Dispatching '{} {}'", self.name, name);
            return command.run(ctx, sub_matches);
        }
        if let Some(group) = self.find_group(name) {
            return group.dispatch(ctx, sub_matches);
        }
        bail!("Unknown command '{}' in '{}'", name, self.name)
    }
}
