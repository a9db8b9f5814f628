//! The registry of shell commands.
//!
//! Both the dispatch loop and the completer look commands up here. The table
//! is built once at startup and shared read-only afterwards.

use crate::args::ParsedArgs;
use crate::remote::DirectoryLister;
use crate::session::Session;

/// What a command handler gets to work with.
pub struct CommandContext<'a> {
    pub session: &'a mut Session,
    pub lister: &'a dyn DirectoryLister,
}

/// Result of running a command handler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandResult {
    /// Command succeeded, optionally with output to display
    Ok { display: Option<String> },
    /// Command failed with an error message
    Error(String),
    /// Show help, for one command or for all of them
    Help(Option<String>),
    /// Clear the terminal screen
    ClearScreen,
    /// Leave the shell with this process exit code
    Exit(i32),
}

impl CommandResult {
    pub fn ok_display(display: impl Into<String>) -> Self {
        CommandResult::Ok {
            display: Some(display.into()),
        }
    }

    pub fn ok_none() -> Self {
        CommandResult::Ok { display: None }
    }

    pub fn error(msg: impl Into<String>) -> Self {
        CommandResult::Error(msg.into())
    }
}

pub type Handler = fn(&mut CommandContext<'_>, &ParsedArgs) -> CommandResult;

/// A named option accepted by a command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlagSpec {
    pub name: &'static str,
    pub usage: &'static str,
    /// Whether the flag takes a value (`--name value`) or is a switch.
    pub takes_value: bool,
    pub default: Option<&'static str>,
}

impl FlagSpec {
    pub fn value(name: &'static str, usage: &'static str) -> Self {
        Self {
            name,
            usage,
            takes_value: true,
            default: None,
        }
    }

    pub fn switch(name: &'static str, usage: &'static str) -> Self {
        Self {
            name,
            usage,
            takes_value: false,
            default: None,
        }
    }

    pub fn with_default(mut self, default: &'static str) -> Self {
        self.default = Some(default);
        self
    }
}

#[derive(Clone)]
pub struct CommandDescriptor {
    pub name: &'static str,
    pub aliases: &'static [&'static str],
    /// One-line description for the command overview.
    pub usage: &'static str,
    /// Argument synopsis, e.g. `<path>`.
    pub synopsis: &'static str,
    /// Trailing arguments complete as remote paths.
    pub accepts_paths: bool,
    /// Left out of the help overview.
    pub hidden: bool,
    pub flags: Vec<FlagSpec>,
    pub handler: Handler,
}

impl CommandDescriptor {
    pub fn new(name: &'static str, usage: &'static str, handler: Handler) -> Self {
        Self {
            name,
            aliases: &[],
            usage,
            synopsis: "",
            accepts_paths: false,
            hidden: false,
            flags: Vec::new(),
            handler,
        }
    }

    pub fn aliases(mut self, aliases: &'static [&'static str]) -> Self {
        self.aliases = aliases;
        self
    }

    pub fn synopsis(mut self, synopsis: &'static str) -> Self {
        self.synopsis = synopsis;
        self
    }

    pub fn accepts_paths(mut self) -> Self {
        self.accepts_paths = true;
        self
    }

    pub fn hidden(mut self) -> Self {
        self.hidden = true;
        self
    }

    pub fn flag(mut self, flag: FlagSpec) -> Self {
        self.flags.push(flag);
        self
    }

    /// The primary name followed by the aliases.
    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        std::iter::once(self.name).chain(self.aliases.iter().copied())
    }

    /// Exact, case-sensitive match on the name or an alias.
    pub fn is_named(&self, name: &str) -> bool {
        self.names().any(|n| n == name)
    }
}

impl std::fmt::Debug for CommandDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CommandDescriptor")
            .field("name", &self.name)
            .field("aliases", &self.aliases)
            .field("accepts_paths", &self.accepts_paths)
            .field("hidden", &self.hidden)
            .field("flags", &self.flags)
            .finish_non_exhaustive()
    }
}

/// Commands sorted by name.
#[derive(Debug, Clone, Default)]
pub struct CommandTable {
    commands: Vec<CommandDescriptor>,
}

impl CommandTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, command: CommandDescriptor) {
        self.commands.push(command);
        self.commands.sort_by_key(|c| c.name);
    }

    pub fn with(mut self, command: CommandDescriptor) -> Self {
        self.register(command);
        self
    }

    pub fn lookup(&self, name: &str) -> Option<&CommandDescriptor> {
        self.commands.iter().find(|c| c.is_named(name))
    }

    pub fn iter(&self) -> impl Iterator<Item = &CommandDescriptor> {
        self.commands.iter()
    }

    /// Every name and alias, in table order.
    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.commands.iter().flat_map(|c| c.names())
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}
