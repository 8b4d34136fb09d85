// Mon Jan 19 2026 - Alex

use crate::command::argument::ArgumentDescriptor;
use crate::command::binder::{self, Arguments, CompiledInvoker, Handler, Output};
use crate::command::error::{DefinitionError, DefinitionResult};
use ahash::RandomState;
use indexmap::IndexMap;
use log::debug;
use once_cell::sync::{Lazy, OnceCell};
use regex::Regex;
use std::fmt;

static NAME_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9]+$").expect("command name pattern is valid"));

pub const HELP_COMMAND: &str = "help";

/// Whether `register_with` may take over names that are already bound.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Overwrite {
    #[default]
    Deny,
    Allow,
}

pub fn is_valid_name(name: &str) -> bool {
    NAME_PATTERN.is_match(name)
}

/// Everything needed to register a command, before it is compiled.
pub struct CommandDef {
    names: Vec<String>,
    description: String,
    examples: Vec<String>,
    arguments: Vec<ArgumentDescriptor>,
    raw: bool,
    handler: Option<Handler>,
}

impl CommandDef {
    pub fn new(name: &str) -> Self {
        Self {
            names: vec![name.to_string()],
            description: String::new(),
            examples: Vec::new(),
            arguments: Vec::new(),
            raw: false,
            handler: None,
        }
    }

    pub fn with_alias(mut self, alias: &str) -> Self {
        if !self.names.iter().any(|n| n == alias) {
            self.names.push(alias.to_string());
        }
        self
    }

    pub fn with_description(mut self, description: &str) -> Self {
        self.description = description.to_string();
        self
    }

    pub fn with_example(mut self, example: &str) -> Self {
        self.examples.push(example.to_string());
        self
    }

    pub fn with_argument(mut self, argument: ArgumentDescriptor) -> Self {
        self.arguments.push(argument);
        self
    }

    /// The single text parameter receives the rest of the line untouched.
    pub fn raw(mut self) -> Self {
        self.raw = true;
        self
    }

    pub fn with_handler<F>(mut self, handler: F) -> Self
    where
        F: Fn(&Arguments<'_>) -> anyhow::Result<Output> + Send + Sync + 'static,
    {
        self.handler = Some(Box::new(handler));
        self
    }

    pub fn primary_name(&self) -> &str {
        &self.names[0]
    }
}

impl fmt::Debug for CommandDef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandDef")
            .field("names", &self.names)
            .field("arguments", &self.arguments.len())
            .field("raw", &self.raw)
            .finish()
    }
}

fn noop_handler() -> Handler {
    Box::new(|_| Ok(None))
}

// A verb only routes: handler, parameters and raw mode belong to its sub-commands.
fn check_verb(definition: &CommandDef) -> DefinitionResult<()> {
    let reason = if definition.handler.is_some() {
        "have a handler"
    } else if !definition.arguments.is_empty() {
        "declare arguments"
    } else if definition.raw {
        "be marked raw"
    } else {
        return Ok(());
    };

    Err(DefinitionError::InvalidVerb {
        verb: definition.primary_name().to_string(),
        reason: reason.to_string(),
    })
}

pub(crate) enum Action {
    Invoke(CompiledInvoker),
    Verb(Box<CommandManager>),
    Help,
}

/// A registered, compiled command.
pub struct Command {
    names: Vec<String>,
    description: String,
    examples: Vec<String>,
    arguments: Vec<ArgumentDescriptor>,
    raw: bool,
    pub(crate) action: Action,
    pub(crate) help: OnceCell<Vec<String>>,
}

impl Command {
    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn primary_name(&self) -> &str {
        &self.names[0]
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn examples(&self) -> &[String] {
        &self.examples
    }

    pub fn arguments(&self) -> &[ArgumentDescriptor] {
        &self.arguments
    }

    pub fn is_raw(&self) -> bool {
        self.raw
    }

    pub fn is_verb(&self) -> bool {
        matches!(self.action, Action::Verb(_))
    }

    /// The nested manager of a verb.
    pub fn sub_commands(&self) -> Option<&CommandManager> {
        match &self.action {
            Action::Verb(nested) => Some(&**nested),
            _ => None,
        }
    }
}

impl fmt::Debug for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = match self.action {
            Action::Invoke(_) => "command",
            Action::Verb(_) => "verb",
            Action::Help => "help",
        };
        f.debug_struct("Command")
            .field("names", &self.names)
            .field("kind", &kind)
            .field("raw", &self.raw)
            .finish()
    }
}

/// Name-indexed command table. Verbs nest further managers inside their command.
#[derive(Default)]
pub struct CommandManager {
    commands: Vec<Command>,
    by_name: IndexMap<String, usize, RandomState>,
}

impl CommandManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, definition: CommandDef) -> DefinitionResult<()> {
        self.register_with(definition, Overwrite::Deny)
    }

    pub fn register_with(&mut self, definition: CommandDef, overwrite: Overwrite) -> DefinitionResult<()> {
        self.check_names(&definition.names, overwrite)?;

        let CommandDef {
            names,
            description,
            examples,
            arguments,
            raw,
            handler,
        } = definition;

        let handler = handler.unwrap_or_else(noop_handler);
        let invoker = binder::compile(&names[0], &arguments, raw, handler)?;

        debug!(
            "registered command '{}' ({} argument(s), raw: {})",
            names[0],
            invoker.arity(),
            raw
        );

        self.insert(Command {
            names,
            description,
            examples,
            arguments,
            raw,
            action: Action::Invoke(invoker),
            help: OnceCell::new(),
        });
        Ok(())
    }

    /// Register a verb and return its fresh sub-manager for further registration.
    ///
    /// The verb is a raw command: everything after its name is dispatched again
    /// against the returned manager.
    pub fn add_verb(&mut self, definition: CommandDef) -> DefinitionResult<&mut CommandManager> {
        self.check_names(&definition.names, Overwrite::Deny)?;
        check_verb(&definition)?;

        let slot = self.insert(Command {
            names: definition.names,
            description: definition.description,
            examples: definition.examples,
            arguments: vec![ArgumentDescriptor::text("command")
                .with_description("sub-command and its arguments")
                .join_rest()
                .optional()],
            raw: true,
            action: Action::Verb(Box::new(CommandManager::new())),
            help: OnceCell::new(),
        });

        debug!("registered verb '{}'", self.commands[slot].primary_name());

        match &mut self.commands[slot].action {
            Action::Verb(nested) => Ok(&mut **nested),
            _ => unreachable!("verb slot holds a verb action"),
        }
    }

    /// Register `help [command...]`, rendering this manager's help or one command's.
    pub fn add_help_command(&mut self) -> DefinitionResult<()> {
        let names = vec![HELP_COMMAND.to_string()];
        self.check_names(&names, Overwrite::Deny)?;

        self.insert(Command {
            names,
            description: "Show available commands, or details for one command".to_string(),
            examples: vec!["help".to_string(), format!("{} {}", HELP_COMMAND, HELP_COMMAND)],
            arguments: vec![ArgumentDescriptor::text("command")
                .with_description("command path to describe")
                .params()
                .optional()],
            raw: false,
            action: Action::Help,
            help: OnceCell::new(),
        });
        Ok(())
    }

    /// Look a name up in this manager only. Matching is exact and case-sensitive.
    pub fn get(&self, name: &str) -> Option<&Command> {
        self.by_name.get(name).map(|&slot| &self.commands[slot])
    }

    pub fn contains(&self, name: &str) -> bool {
        self.by_name.contains_key(name)
    }

    /// Sub-manager of the verb called `name`.
    pub fn verb(&self, name: &str) -> Option<&CommandManager> {
        self.get(name).and_then(Command::sub_commands)
    }

    pub fn verb_mut(&mut self, name: &str) -> Option<&mut CommandManager> {
        let slot = *self.by_name.get(name)?;
        match &mut self.commands[slot].action {
            Action::Verb(nested) => Some(&mut **nested),
            _ => None,
        }
    }

    /// Commands in registration order.
    pub fn commands(&self) -> impl Iterator<Item = &Command> {
        self.commands.iter()
    }

    /// Every bound name, aliases included, in binding order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.by_name.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    fn check_names(&self, names: &[String], overwrite: Overwrite) -> DefinitionResult<()> {
        for name in names {
            if !is_valid_name(name) {
                return Err(DefinitionError::InvalidName(name.clone()));
            }
            if overwrite == Overwrite::Deny && self.by_name.contains_key(name) {
                return Err(DefinitionError::DuplicateName(name.clone()));
            }
        }
        Ok(())
    }

    fn insert(&mut self, command: Command) -> usize {
        for name in command.names() {
            self.detach_name(name);
        }

        let slot = self.commands.len();
        for name in command.names() {
            self.by_name.insert(name.clone(), slot);
        }
        self.commands.push(command);
        slot
    }

    // Take `name` away from whichever command holds it; drop that command if it has no names left.
    fn detach_name(&mut self, name: &str) {
        let Some(slot) = self.by_name.shift_remove(name) else {
            return;
        };

        debug!("name '{}' taken over from command #{}", name, slot);

        let previous = &mut self.commands[slot];
        previous.names.retain(|n| n != name);
        previous.help.take();

        if previous.names.is_empty() {
            self.commands.remove(slot);
            for index in self.by_name.values_mut() {
                if *index > slot {
                    *index -= 1;
                }
            }
        }
    }
}

impl fmt::Debug for CommandManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandManager")
            .field("commands", &self.commands)
            .finish()
    }
}
