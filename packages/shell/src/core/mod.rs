//! Platform-independent shell core.
//!
//! This module contains the read-dispatch loop. It interacts only through
//! the `IoHost` trait, so the same loop runs in a terminal or under test.
//!
//! Each cycle renders the prompt, blocks for one line, records it in the
//! history, and runs the matching command with the terminal suspended from
//! raw mode. The terminal is back in raw mode before the next prompt no
//! matter how the command ended. Ctrl+C or Ctrl+D at the prompt ends the
//! session; the history is flushed exactly once on the way out.

use std::any::Any;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;

use tracing::{debug, warn};

use crate::args::{ArgParser, ArgsError, ClapArgParser};
use crate::command_table::{CommandContext, CommandResult, CommandTable};
use crate::commands::{self, APP_NAME};
use crate::history::HistoryStore;
use crate::io::{ExitReason, IoError, IoHost, Output, PromptConfig, Signal, TerminalState};
use crate::remote::DirectoryLister;
use crate::session::Session;
use crate::tokenizer::CommandLine;

/// How a single dispatched command ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Success,
    /// The command reported a failure (already shown to the user).
    Failed,
    /// The command asked to leave the shell.
    Exit(i32),
}

/// Resolves and runs commands. Owns the session and the terminal mode.
pub struct Dispatcher {
    table: Arc<CommandTable>,
    lister: Arc<dyn DirectoryLister + Send + Sync>,
    parser: Box<dyn ArgParser>,
    session: Session,
    terminal: TerminalState,
}

impl Dispatcher {
    pub fn new(table: Arc<CommandTable>, lister: Arc<dyn DirectoryLister + Send + Sync>) -> Self {
        Self {
            table,
            lister,
            parser: Box::new(ClapArgParser),
            session: Session::new(),
            terminal: TerminalState::Raw,
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn terminal_state(&self) -> TerminalState {
        self.terminal
    }

    /// Run one tokenized line. Unknown commands and command failures are
    /// reported to the user; only host I/O failures are returned as errors.
    pub fn dispatch(
        &mut self,
        line: &CommandLine,
        io: &mut impl IoHost,
    ) -> Result<Outcome, IoError> {
        let Some(name) = line.command() else {
            return Ok(Outcome::Success);
        };

        if self.table.lookup(name).is_none() {
            io.write_output(Output::error(format!("command not found: {}", name)))?;
            io.write_output(Output::info("run 'help' for a list of commands"))?;
            return Ok(Outcome::Failed);
        }

        self.suspend(io)?;
        let outcome = self.invoke(name, line.rest(), io);
        let resumed = self.resume(io);

        let outcome = outcome?;
        resumed?;
        Ok(outcome)
    }

    fn suspend(&mut self, io: &mut impl IoHost) -> Result<(), IoError> {
        io.flush()?;
        io.suspend_raw_mode()?;
        self.terminal = TerminalState::Cooked;
        Ok(())
    }

    fn resume(&mut self, io: &mut impl IoHost) -> Result<(), IoError> {
        let result = io.resume_raw_mode();
        self.terminal = TerminalState::Raw;
        result
    }

    /// Parse flags, run the handler and render its result.
    fn invoke(
        &mut self,
        name: &str,
        args: &[String],
        io: &mut impl IoHost,
    ) -> Result<Outcome, IoError> {
        let table = Arc::clone(&self.table);
        let Some(command) = table.lookup(name) else {
            return Ok(Outcome::Failed);
        };

        let parsed = match self.parser.parse(command, args) {
            Ok(parsed) => parsed,
            Err(ArgsError::HelpRequested(help)) => {
                io.write_output(Output::normal(help.trim_end()))?;
                return Ok(Outcome::Success);
            }
            Err(ArgsError::Invalid(msg)) => {
                io.write_output(Output::error(msg))?;
                return Ok(Outcome::Failed);
            }
        };

        debug!("dispatching {} {:?}", command.name, parsed);

        let mut ctx = CommandContext {
            session: &mut self.session,
            lister: self.lister.as_ref(),
        };
        let result = match catch_unwind(AssertUnwindSafe(|| (command.handler)(&mut ctx, &parsed))) {
            Ok(result) => result,
            Err(payload) => {
                let msg = panic_message(payload.as_ref());
                warn!("command '{}' panicked: {}", command.name, msg);
                CommandResult::Error(format!("{}: internal error: {}", command.name, msg))
            }
        };

        self.render(result, io)
    }

    fn render(&self, result: CommandResult, io: &mut impl IoHost) -> Result<Outcome, IoError> {
        match result {
            CommandResult::Ok { display: None } => Ok(Outcome::Success),
            CommandResult::Ok {
                display: Some(output),
            } => {
                io.write_output(Output::normal(output))?;
                Ok(Outcome::Success)
            }
            CommandResult::Error(msg) => {
                io.write_output(Output::error(msg))?;
                Ok(Outcome::Failed)
            }
            CommandResult::Help(topic) => {
                match commands::format_help(&self.table, topic.as_deref()) {
                    Some(help) => {
                        io.write_output(Output::normal(help))?;
                        Ok(Outcome::Success)
                    }
                    None => {
                        io.write_output(Output::error(format!(
                            "no help for '{}': command not found",
                            topic.as_deref().unwrap_or_default()
                        )))?;
                        Ok(Outcome::Failed)
                    }
                }
            }
            CommandResult::ClearScreen => {
                io.clear_screen()?;
                Ok(Outcome::Success)
            }
            CommandResult::Exit(code) => Ok(Outcome::Exit(code)),
        }
    }

    fn prompt(&self) -> PromptConfig {
        PromptConfig::new(APP_NAME, &self.session)
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

/// The interactive shell: dispatcher plus persistent history.
pub struct ReplCore {
    dispatcher: Dispatcher,
    history: HistoryStore,
}

impl ReplCore {
    pub fn new(
        table: Arc<CommandTable>,
        lister: Arc<dyn DirectoryLister + Send + Sync>,
        history: HistoryStore,
    ) -> Self {
        Self {
            dispatcher: Dispatcher::new(table, lister),
            history,
        }
    }

    /// Replace the flag parser.
    pub fn with_parser(mut self, parser: Box<dyn ArgParser>) -> Self {
        self.dispatcher.parser = parser;
        self
    }

    /// Start from an existing session instead of a fresh one.
    pub fn with_session(mut self, session: Session) -> Self {
        self.dispatcher.session = session;
        self
    }

    pub fn session(&self) -> &Session {
        self.dispatcher.session()
    }

    pub fn history(&self) -> &HistoryStore {
        &self.history
    }

    pub fn terminal_state(&self) -> TerminalState {
        self.dispatcher.terminal_state()
    }

    /// Run the interactive loop until the user leaves.
    ///
    /// A read failure from the host ends the session with `Err`; the caller
    /// decides whether that is fatal for the process. The history is saved
    /// once on the way out either way.
    pub fn run(&mut self, io: &mut impl IoHost) -> Result<ExitReason, IoError> {
        let result = self.run_loop(io);

        if let Err(e) = self.history.flush() {
            warn!("failed to save command history: {}", e);
            io.write_output(Output::warning(format!("could not save command history: {}", e)))?;
        }

        result
    }

    fn run_loop(&mut self, io: &mut impl IoHost) -> Result<ExitReason, IoError> {
        write_tips(io)?;

        loop {
            io.write_prompt(self.dispatcher.prompt())?;
            io.wait_for_input()?;

            if let Some(signal) = io.read_signal()? {
                io.write_output(Output::info("Goodbye!"))?;
                io.flush()?;
                return Ok(match signal {
                    Signal::Interrupt => ExitReason::Interrupted,
                    Signal::Eof => ExitReason::Eof,
                });
            }

            let input = match io.read_input()? {
                Some(input) => input,
                None => continue,
            };

            let line = CommandLine::parse(input.line);
            if line.is_empty() {
                continue;
            }

            self.history.append(line.raw.as_str());

            if let Outcome::Exit(code) = self.dispatcher.dispatch(&line, io)? {
                io.flush()?;
                return Ok(ExitReason::UserExit(code));
            }

            io.flush()?;
        }
    }

    /// Run a single command given as arguments, without prompting or
    /// touching the history. Returns the process exit code.
    pub fn run_command(&mut self, args: &[String], io: &mut impl IoHost) -> Result<i32, IoError> {
        let line = CommandLine {
            raw: crate::tokenizer::join(args),
            args: args.to_vec(),
        };

        let code = match self.dispatcher.dispatch(&line, io)? {
            Outcome::Success => 0,
            Outcome::Failed => 1,
            Outcome::Exit(code) => code,
        };
        io.flush()?;
        Ok(code)
    }
}

fn write_tips(io: &mut impl IoHost) -> Result<(), IoError> {
    io.write_output(Output::info("Tip: use the up/down arrow keys to recall previous commands."))?;
    io.write_output(Output::info("Tip: Ctrl+A / Ctrl+E jump to the start / end of the line."))?;
    io.write_output(Output::info("Tip: type 'help' for a list of commands."))
}
