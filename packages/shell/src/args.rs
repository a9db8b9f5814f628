//! Flag parsing for command arguments.
//!
//! The dispatch loop hands a command's arguments (everything after the
//! command name) to an [`ArgParser`] and gets back [`ParsedArgs`] or an
//! error to show the user. [`ClapArgParser`] builds a `clap` command from the
//! descriptor's flags on each call.

use std::collections::{BTreeMap, BTreeSet};

use clap::error::ErrorKind;
use clap::{Arg, ArgAction, Command};

use crate::command_table::CommandDescriptor;

const POSITIONAL: &str = "args";

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ArgsError {
    /// The user asked for `--help`; the payload is the rendered help.
    #[error("{0}")]
    HelpRequested(String),

    #[error("{0}")]
    Invalid(String),
}

/// Arguments after flag parsing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedArgs {
    positional: Vec<String>,
    values: BTreeMap<String, String>,
    switches: BTreeSet<String>,
}

impl ParsedArgs {
    /// Arguments with no flag parsing applied.
    pub fn from_positional(positional: Vec<String>) -> Self {
        Self {
            positional,
            ..Self::default()
        }
    }

    pub fn with_value(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.values.insert(name.into(), value.into());
        self
    }

    pub fn with_switch(mut self, name: impl Into<String>) -> Self {
        self.switches.insert(name.into());
        self
    }

    pub fn positional(&self) -> &[String] {
        &self.positional
    }

    pub fn first(&self) -> Option<&str> {
        self.positional.first().map(String::as_str)
    }

    /// Value of a value-taking flag, or its default.
    pub fn value(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(String::as_str)
    }

    /// Whether a switch flag was given.
    pub fn is_set(&self, name: &str) -> bool {
        self.switches.contains(name)
    }
}

/// Turns a command's argument tokens into [`ParsedArgs`].
pub trait ArgParser {
    fn parse(
        &self,
        command: &CommandDescriptor,
        args: &[String],
    ) -> Result<ParsedArgs, ArgsError>;
}

/// Flag parsing backed by `clap`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ClapArgParser;

impl ClapArgParser {
    fn build(command: &CommandDescriptor) -> Command {
        let mut cmd = Command::new(command.name)
            .no_binary_name(true)
            .about(command.usage)
            .disable_version_flag(true);

        for flag in &command.flags {
            let mut arg = Arg::new(flag.name).long(flag.name).help(flag.usage);
            arg = if flag.takes_value {
                arg.num_args(1).action(ArgAction::Set)
            } else {
                arg.action(ArgAction::SetTrue)
            };
            if let Some(default) = flag.default {
                arg = arg.default_value(default);
            }
            cmd = cmd.arg(arg);
        }

        cmd.arg(
            Arg::new(POSITIONAL)
                .num_args(0..)
                .action(ArgAction::Append),
        )
    }
}

impl ArgParser for ClapArgParser {
    fn parse(
        &self,
        command: &CommandDescriptor,
        args: &[String],
    ) -> Result<ParsedArgs, ArgsError> {
        let matches = Self::build(command)
            .try_get_matches_from(args)
            .map_err(|e| match e.kind() {
                ErrorKind::DisplayHelp => ArgsError::HelpRequested(e.render().to_string()),
                _ => ArgsError::Invalid(e.render().to_string().trim_end().to_string()),
            })?;

        let mut parsed = ParsedArgs::from_positional(
            matches
                .get_many::<String>(POSITIONAL)
                .map(|values| values.cloned().collect())
                .unwrap_or_default(),
        );

        for flag in &command.flags {
            if flag.takes_value {
                if let Some(value) = matches.get_one::<String>(flag.name) {
                    parsed.values.insert(flag.name.to_string(), value.clone());
                }
            } else if matches.get_flag(flag.name) {
                parsed.switches.insert(flag.name.to_string());
            }
        }

        Ok(parsed)
    }
}
