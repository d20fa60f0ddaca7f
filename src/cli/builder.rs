//! Build `clap` commands from declarative descriptors.
//!
//! A [`CommandDescriptor`] names a command, its handler and its parameters.
//! [`build_command`] turns it into a [`BuiltCommand`]: a `clap::Command`
//! plus the descriptor's original handler. [`register_command`] then hangs
//! the result in a [`CommandGroup`] tree.
//!
//! ```rust
//! use groundwork::cli::builder::{
//!     build_command, CommandDescriptor, ParameterSpec, StaticParameters, ValueType,
//! };
//!
//! let descriptor = CommandDescriptor::new("greet", |_ctx, matches| {
//!     let name: &String = matches.get_one("name").expect("required");
//!     println!("hello {name}");
//!     Ok(())
//! })
//! .description("Say hello")
//! .parameters(vec![ParameterSpec::new("name", ValueType::String)]);
//!
//! let built = build_command(&descriptor, &StaticParameters::default()).unwrap();
//! assert_eq!(built.command.get_name(), "greet");
//! ```

use super::group::CommandGroup;
use super::helpers::CliContext;
use crate::errors::CommandBuildError;
use anyhow::{bail, Context};
use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use serde_json::{Map, Value};
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

/// Metadata key holding a list of visible command aliases
pub const ALIASES_KEY: &str = "aliases";

/// Callable invoked when a built command is selected.
pub type Handler = Arc<dyn Fn(&CliContext, &ArgMatches) -> anyhow::Result<()> + Send + Sync>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueType {
    String,
    Integer,
    Float,
    Bool,
    Path,
}

impl ValueType {
    fn validate_default(self, value: &str) -> anyhow::Result<()> {
        match self {
            Self::String | Self::Path => Ok(()),
            Self::Integer => value.parse::<i64>().map(drop).context("expected an integer"),
            Self::Float => value.parse::<f64>().map(drop).context("expected a float"),
            Self::Bool => value.parse::<bool>().map(drop).context("expected true or false"),
        }
    }

    fn apply(self, arg: Arg) -> Arg {
        match self {
            Self::String => arg.value_parser(value_parser!(String)),
            Self::Integer => arg.value_parser(value_parser!(i64)),
            Self::Float => arg.value_parser(value_parser!(f64)),
            Self::Bool => arg.value_parser(value_parser!(bool)),
            Self::Path => arg.value_parser(value_parser!(PathBuf)),
        }
    }
}

/// One command parameter.
#[derive(Debug, Clone, PartialEq)]
pub struct ParameterSpec {
    pub name: String,
    pub value_type: ValueType,
    pub default: Option<String>,
    pub required: bool,
    pub help: Option<String>,
    /// Explicit positional/option choice, overriding the default rule
    pub positional: Option<bool>,
    /// Accept the parameter more than once
    pub multiple: bool,
}

impl ParameterSpec {
    /// A required parameter without a default.
    pub fn new(name: impl Into<String>, value_type: ValueType) -> Self {
        Self {
            name: name.into(),
            value_type,
            default: None,
            required: true,
            help: None,
            positional: None,
            multiple: false,
        }
    }

    /// Give the parameter a default, which also makes it optional.
    pub fn with_default(mut self, default: impl Into<String>) -> Self {
        self.default = Some(default.into());
        self.required = false;
        self
    }

    pub fn optional(mut self) -> Self {
        self.required = false;
        self
    }

    pub fn help(mut self, help: impl Into<String>) -> Self {
        self.help = Some(help.into());
        self
    }

    pub fn multiple(mut self) -> Self {
        self.multiple = true;
        self
    }

    pub fn positional(mut self, positional: bool) -> Self {
        self.positional = Some(positional);
        self
    }

    /// Positional unless it has a default or an explicit override says
    /// otherwise.
    pub fn is_argument(&self) -> bool {
        self.positional.unwrap_or(self.default.is_none())
    }

    fn long_name(&self) -> String {
        self.name.replace('_', "-")
    }
}

/// Supplies parameters for descriptors that do not carry their own.
pub trait ParameterSource {
    fn parameters(&self, descriptor: &CommandDescriptor) -> anyhow::Result<Vec<ParameterSpec>>;
}

/// Parameter lists registered up front, keyed by command name.
#[derive(Debug, Clone, Default)]
pub struct StaticParameters {
    by_command: HashMap<String, Vec<ParameterSpec>>,
}

impl StaticParameters {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(mut self, command: impl Into<String>, parameters: Vec<ParameterSpec>) -> Self {
        self.by_command.insert(command.into(), parameters);
        self
    }
}

impl ParameterSource for StaticParameters {
    fn parameters(&self, descriptor: &CommandDescriptor) -> anyhow::Result<Vec<ParameterSpec>> {
        self.by_command
            .get(&descriptor.name)
            .cloned()
            .with_context(|| format!("no parameters registered for '{}'", descriptor.name))
    }
}

/// Declarative description of a CLI command.
#[derive(Clone)]
pub struct CommandDescriptor {
    pub name: String,
    pub handler: Handler,
    pub description: String,
    pub hidden: bool,
    pub parent: Option<String>,
    pub metadata: Map<String, Value>,
    pub parameters: Option<Vec<ParameterSpec>>,
    /// Render every parameter as an `--option`
    pub force_options: bool,
}

impl CommandDescriptor {
    pub fn new<F>(name: impl Into<String>, handler: F) -> Self
    where
        F: Fn(&CliContext, &ArgMatches) -> anyhow::Result<()> + Send + Sync + 'static,
    {
        Self::with_handler(name, Arc::new(handler))
    }

    /// Descriptor around an existing shared handler.
    pub fn with_handler(name: impl Into<String>, handler: Handler) -> Self {
        Self {
            name: name.into(),
            handler,
            description: String::new(),
            hidden: false,
            parent: None,
            metadata: Map::new(),
            parameters: None,
            force_options: false,
        }
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn hidden(mut self, hidden: bool) -> Self {
        self.hidden = hidden;
        self
    }

    pub fn parent(mut self, parent: impl Into<String>) -> Self {
        self.parent = Some(parent.into());
        self
    }

    pub fn metadata(mut self, key: impl Into<String>, value: Value) -> Self {
        self.metadata.insert(key.into(), value);
        self
    }

    pub fn parameters(mut self, parameters: Vec<ParameterSpec>) -> Self {
        self.parameters = Some(parameters);
        self
    }

    pub fn force_options(mut self, force: bool) -> Self {
        self.force_options = force;
        self
    }
}

impl fmt::Debug for CommandDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandDescriptor")
            .field("name", &self.name)
            .field("description", &self.description)
            .field("hidden", &self.hidden)
            .field("parent", &self.parent)
            .field("metadata", &self.metadata)
            .field("parameters", &self.parameters)
            .field("force_options", &self.force_options)
            .finish_non_exhaustive()
    }
}

/// A `clap::Command` paired with the handler it dispatches to.
#[derive(Clone)]
pub struct BuiltCommand {
    pub name: String,
    pub parent: Option<String>,
    pub command: Command,
    pub handler: Handler,
}

impl BuiltCommand {
    pub fn run(&self, ctx: &CliContext, matches: &ArgMatches) -> anyhow::Result<()> {
        (self.handler)(ctx, matches)
    }
}

impl fmt::Debug for BuiltCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BuiltCommand")
            .field("name", &self.name)
            .field("parent", &self.parent)
            .finish_non_exhaustive()
    }
}

/// Names clap generates on every command
const RESERVED_NAMES: &[&str] = &["help"];

fn validate_parameters(parameters: &[ParameterSpec]) -> anyhow::Result<()> {
    let mut seen = HashSet::new();
    let mut long_names = HashSet::new();
    for param in parameters {
        if param.name.trim().is_empty() || param.name.contains(char::is_whitespace) {
            bail!("invalid parameter name '{}'", param.name);
        }
        if !seen.insert(param.name.as_str()) {
            bail!("duplicate parameter '{}'", param.name);
        }
        let long_name = param.long_name();
        if RESERVED_NAMES.contains(&long_name.as_str()) {
            bail!("parameter name '{}' is reserved", param.name);
        }
        if !long_names.insert(long_name.clone()) {
            bail!(
                "parameter '{}' clashes with another on '--{}'",
                param.name,
                long_name
            );
        }
        if let Some(default) = &param.default {
            param
                .value_type
                .validate_default(default)
                .with_context(|| format!("bad default '{}' for '{}'", default, param.name))?;
        }
    }
    Ok(())
}

/// Positionals are matched in order, so nothing optional or repeatable may
/// sit in front of a later positional.
fn validate_positionals(arguments: &[&ParameterSpec]) -> anyhow::Result<()> {
    let mut loose: Option<&ParameterSpec> = None;
    for &param in arguments {
        if let Some(earlier) = loose {
            if earlier.multiple {
                bail!(
                    "repeatable positional '{}' must come last, but '{}' follows it",
                    earlier.name,
                    param.name
                );
            }
            if param.required && param.default.is_none() {
                bail!(
                    "required positional '{}' follows optional '{}'",
                    param.name,
                    earlier.name
                );
            }
        }
        if param.multiple {
            loose = Some(param);
        } else if !param.required || param.default.is_some() {
            loose = loose.or(Some(param));
        }
    }
    Ok(())
}

fn option_arg(param: &ParameterSpec, order: usize) -> Arg {
    let mut arg = Arg::new(param.name.clone())
        .long(param.long_name())
        .display_order(order);

    let is_flag = param.value_type == ValueType::Bool
        && param.default.as_deref().map_or(true, |d| d == "false");
    if is_flag {
        arg = arg.action(ArgAction::SetTrue);
    } else {
        let action = if param.multiple {
            ArgAction::Append
        } else {
            ArgAction::Set
        };
        arg = param.value_type.apply(arg.action(action));
        if let Some(default) = &param.default {
            arg = arg.default_value(default.clone());
        }
        arg = arg.required(param.required && param.default.is_none());
    }

    match &param.help {
        Some(help) => arg.help(help.clone()),
        None => arg,
    }
}

fn argument_arg(param: &ParameterSpec, index: usize) -> Arg {
    let mut arg = Arg::new(param.name.clone()).index(index);
    arg = if param.multiple {
        arg.action(ArgAction::Append).num_args(1..)
    } else {
        arg.action(ArgAction::Set)
    };
    arg = param
        .value_type
        .apply(arg)
        .required(param.required && param.default.is_none());
    if let Some(default) = &param.default {
        arg = arg.default_value(default.clone());
    }
    match &param.help {
        Some(help) => arg.help(help.clone()),
        None => arg,
    }
}

fn build_inner(
    descriptor: &CommandDescriptor,
    source: &dyn ParameterSource,
) -> anyhow::Result<BuiltCommand> {
    if descriptor.name.trim().is_empty() {
        bail!("command name is empty");
    }

    let parameters = match &descriptor.parameters {
        Some(parameters) => parameters.clone(),
        None => source.parameters(descriptor)?,
    };
    validate_parameters(&parameters)?;

    // Declaration position is kept alongside each parameter so positional
    // indices and help order follow the declaration, whatever order the
    // definitions are applied in.
    let (arguments, options): (Vec<_>, Vec<_>) = parameters
        .iter()
        .enumerate()
        .partition(|(_, p)| !descriptor.force_options && p.is_argument());
    let positionals: Vec<&ParameterSpec> = arguments.iter().map(|(_, p)| *p).collect();
    validate_positionals(&positionals)?;

    let mut wrapper = Command::new(descriptor.name.clone());
    for (order, param) in options.iter().rev() {
        wrapper = wrapper.arg(option_arg(param, *order));
    }
    for (position, (_, param)) in arguments.iter().enumerate().rev() {
        wrapper = wrapper.arg(argument_arg(param, position + 1));
    }

    let aliases: Vec<String> = descriptor
        .metadata
        .get(ALIASES_KEY)
        .and_then(Value::as_array)
        .map(|values| {
            values
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default();

    let command = wrapper
        .about(descriptor.description.clone())
        .hide(descriptor.hidden)
        .visible_aliases(aliases);

    Ok(BuiltCommand {
        name: descriptor.name.clone(),
        parent: descriptor.parent.clone(),
        command,
        handler: Arc::clone(&descriptor.handler),
    })
}

/// Build a command from `descriptor`.
///
/// Parameters attached to the descriptor are used as-is; otherwise `source`
/// is asked for them. Any failure is reported as one [`CommandBuildError`]
/// naming the command.
pub fn build_command(
    descriptor: &CommandDescriptor,
    source: &dyn ParameterSource,
) -> Result<BuiltCommand, CommandBuildError> {
    build_inner(descriptor, source).map_err(|e| {
        log::debug!("Failed to build command '{}': {:#}", descriptor.name, e);
        CommandBuildError::new(descriptor.name.clone(), e)
    })
}

/// Attach `built` to its parent group, or to `root` when it has no parent
/// or the parent is not in `groups`.
pub fn register_command(
    built: BuiltCommand,
    groups: &mut HashMap<String, CommandGroup>,
    root: &mut CommandGroup,
) {
    let group = match built.parent.as_deref() {
        Some(parent) => groups.get_mut(parent),
        None => None,
    };
    match group {
        Some(group) => group.add_command(built),
        None => {
            if let Some(parent) = &built.parent {
                log::debug!(
                    "Group '{}' not found for '{}', registering at root",
                    parent,
                    built.name
                );
            }
            root.add_command(built);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn noop() -> CommandDescriptor {
        CommandDescriptor::new("noop", |_, _| Ok(()))
    }

    #[test]
    fn test_parameter_classification() {
        let required = ParameterSpec::new("path", ValueType::Path);
        let defaulted = ParameterSpec::new("count", ValueType::Integer).with_default("3");
        let forced = ParameterSpec::new("name", ValueType::String).positional(false);
        assert!(required.is_argument());
        assert!(!defaulted.is_argument());
        assert!(!forced.is_argument());
        assert!(defaulted.clone().positional(true).is_argument());
    }

    #[test]
    fn test_build_preserves_handler_identity() {
        let descriptor = noop();
        let err = build_command(&descriptor, &StaticParameters::new()).unwrap_err();
        // No parameters anywhere: introspection fails
        assert_eq!(err.command, "noop");

        let descriptor = noop().parameters(vec![]);
        let built = build_command(&descriptor, &StaticParameters::new()).unwrap();
        assert!(Arc::ptr_eq(&built.handler, &descriptor.handler));
    }

    #[test]
    fn test_positional_indices_follow_declaration() {
        let descriptor = noop().parameters(vec![
            ParameterSpec::new("src", ValueType::Path),
            ParameterSpec::new("verbose", ValueType::Bool).with_default("false"),
            ParameterSpec::new("dst", ValueType::Path),
        ]);
        let built = build_command(&descriptor, &StaticParameters::new()).unwrap();
        let matches = built
            .command
            .try_get_matches_from(["noop", "a.txt", "b.txt", "--verbose"])
            .unwrap();
        assert_eq!(
            matches.get_one::<PathBuf>("src"),
            Some(&PathBuf::from("a.txt"))
        );
        assert_eq!(
            matches.get_one::<PathBuf>("dst"),
            Some(&PathBuf::from("b.txt"))
        );
        assert!(matches.get_flag("verbose"));
    }

    #[test]
    fn test_force_options_turns_arguments_into_flags() {
        let descriptor = noop()
            .force_options(true)
            .parameters(vec![ParameterSpec::new("user_name", ValueType::String)]);
        let built = build_command(&descriptor, &StaticParameters::new()).unwrap();
        let matches = built
            .command
            .clone()
            .try_get_matches_from(["noop", "--user-name", "ada"])
            .unwrap();
        assert_eq!(matches.get_one::<String>("user_name").unwrap(), "ada");
        assert!(built.command.try_get_matches_from(["noop"]).is_err());
    }

    #[test]
    fn test_option_defaults_are_typed() {
        let descriptor = noop().parameters(vec![
            ParameterSpec::new("rate", ValueType::Float).with_default("1.5"),
            ParameterSpec::new("count", ValueType::Integer).with_default("3"),
        ]);
        let built = build_command(&descriptor, &StaticParameters::new()).unwrap();
        let matches = built.command.try_get_matches_from(["noop"]).unwrap();
        assert_eq!(matches.get_one::<f64>("rate"), Some(&1.5));
        assert_eq!(matches.get_one::<i64>("count"), Some(&3));
    }

    #[test]
    fn test_introspection_used_when_parameters_absent() {
        let source = StaticParameters::new()
            .insert("noop", vec![ParameterSpec::new("target", ValueType::String)]);
        let built = build_command(&noop(), &source).unwrap();
        let matches = built.command.try_get_matches_from(["noop", "x"]).unwrap();
        assert_eq!(matches.get_one::<String>("target").unwrap(), "x");
    }

    #[test]
    fn test_invalid_definitions_become_build_errors() {
        let duplicate = noop().parameters(vec![
            ParameterSpec::new("a", ValueType::String),
            ParameterSpec::new("a", ValueType::String),
        ]);
        let err = build_command(&duplicate, &StaticParameters::new()).unwrap_err();
        assert_eq!(err.command, "noop");
        assert!(err.to_string().contains("duplicate parameter 'a'"));

        let bad_default = noop().parameters(vec![
            ParameterSpec::new("n", ValueType::Integer).with_default("many")
        ]);
        assert!(build_command(&bad_default, &StaticParameters::new()).is_err());

        let unnamed = CommandDescriptor::new(" ", |_, _| Ok(())).parameters(vec![]);
        assert!(build_command(&unnamed, &StaticParameters::new()).is_err());
    }

    #[test]
    fn test_options_sharing_a_long_name_are_rejected() {
        let descriptor = noop().parameters(vec![
            ParameterSpec::new("user_name", ValueType::String).with_default("a"),
            ParameterSpec::new("user-name", ValueType::String).with_default("b"),
        ]);
        let err = build_command(&descriptor, &StaticParameters::new()).unwrap_err();
        assert_eq!(err.command, "noop");
        assert!(err.to_string().contains("--user-name"));
    }

    #[test]
    fn test_help_parameter_is_rejected() {
        for param in [
            ParameterSpec::new("help", ValueType::String),
            ParameterSpec::new("help", ValueType::Bool).with_default("false"),
        ] {
            let descriptor = noop().parameters(vec![param]);
            let err = build_command(&descriptor, &StaticParameters::new()).unwrap_err();
            assert!(err.to_string().contains("reserved"));
        }
    }

    #[test]
    fn test_optional_positional_before_required_is_rejected() {
        let descriptor = noop().parameters(vec![
            ParameterSpec::new("a", ValueType::String).optional(),
            ParameterSpec::new("b", ValueType::String),
        ]);
        let err = build_command(&descriptor, &StaticParameters::new()).unwrap_err();
        assert!(err.to_string().contains("required positional 'b' follows optional 'a'"));

        let repeated_first = noop().parameters(vec![
            ParameterSpec::new("items", ValueType::String).multiple(),
            ParameterSpec::new("tail", ValueType::String).optional(),
        ]);
        assert!(build_command(&repeated_first, &StaticParameters::new()).is_err());
    }

    #[test]
    fn test_accepted_definitions_parse_without_panicking() {
        let descriptor = noop().parameters(vec![
            ParameterSpec::new("src", ValueType::Path),
            ParameterSpec::new("rest", ValueType::String).optional().multiple(),
            ParameterSpec::new("user_name", ValueType::String).with_default("ada"),
        ]);
        let built = build_command(&descriptor, &StaticParameters::new()).unwrap();
        built.command.clone().debug_assert();
        assert!(built.command.try_get_matches_from(["noop", "a", "b", "c"]).is_ok());
    }

    #[test]
    fn test_multiple_positional_collects_values() {
        let descriptor = noop().parameters(vec![
            ParameterSpec::new("pairs", ValueType::String).optional().multiple()
        ]);
        let built = build_command(&descriptor, &StaticParameters::new()).unwrap();
        let matches = built
            .command
            .clone()
            .try_get_matches_from(["noop", "a=1", "b=2"])
            .unwrap();
        let values: Vec<&String> = matches.get_many("pairs").unwrap().collect();
        assert_eq!(values, vec!["a=1", "b=2"]);

        let empty = built.command.try_get_matches_from(["noop"]).unwrap();
        assert!(empty.get_many::<String>("pairs").is_none());
    }

    #[test]
    fn test_metadata_aliases() {
        let descriptor = noop()
            .metadata(ALIASES_KEY, serde_json::json!(["nop", 3]))
            .parameters(vec![]);
        let built = build_command(&descriptor, &StaticParameters::new()).unwrap();
        let aliases: Vec<&str> = built.command.get_visible_aliases().collect();
        assert_eq!(aliases, vec!["nop"]);
    }

    #[test]
    fn test_hidden_and_description() {
        let descriptor = noop()
            .description("Does nothing")
            .hidden(true)
            .parameters(vec![]);
        let built = build_command(&descriptor, &StaticParameters::new()).unwrap();
        assert!(built.command.is_hide_set());
        assert_eq!(
            built.command.get_about().map(|s| s.to_string()).as_deref(),
            Some("Does nothing")
        );
    }

    #[test]
    fn test_register_into_parent_or_root() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let child = CommandDescriptor::new("child", move |_, _| {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok(())
        })
        .parent("tools")
        .parameters(vec![]);
        let orphan = noop().parent("missing").parameters(vec![]);

        let mut groups = HashMap::new();
        groups.insert("tools".to_string(), CommandGroup::new("tools"));
        let mut root = CommandGroup::new("app");

        let source = StaticParameters::new();
        register_command(build_command(&child, &source).unwrap(), &mut groups, &mut root);
        register_command(build_command(&orphan, &source).unwrap(), &mut groups, &mut root);

        assert_eq!(groups["tools"].command_names(), vec!["child"]);
        assert_eq!(root.command_names(), vec!["noop"]);

        root.attach_groups(groups);
        let matches = root.to_clap().try_get_matches_from(["app", "tools", "child"]).unwrap();
        root.dispatch(&CliContext::new(), &matches).unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
