//! Output-only host for running one command outside the interactive shell.

use std::io::{self, IsTerminal, Write};

use super::render_output;
use crate::io::{InputLine, IoError, IoHost, Output, OutputStyle, PromptConfig, Signal};

/// Writes results to stdout and problems to stderr. Has no input: waiting
/// for a line reports end of input.
#[derive(Debug)]
pub struct PlainHost {
    styled: bool,
    pending_signal: Option<Signal>,
}

impl PlainHost {
    pub fn new() -> Self {
        Self {
            styled: io::stdout().is_terminal(),
            pending_signal: None,
        }
    }
}

impl Default for PlainHost {
    fn default() -> Self {
        Self::new()
    }
}

impl IoHost for PlainHost {
    fn wait_for_input(&mut self) -> Result<(), IoError> {
        self.pending_signal = Some(Signal::Eof);
        Ok(())
    }

    fn read_input(&mut self) -> Result<Option<InputLine>, IoError> {
        Ok(None)
    }

    fn read_signal(&mut self) -> Result<Option<Signal>, IoError> {
        Ok(self.pending_signal.take())
    }

    fn write_output(&mut self, output: Output) -> Result<(), IoError> {
        let rendered = render_output(&output, self.styled);
        match output.style {
            OutputStyle::Error | OutputStyle::Warning => writeln!(io::stderr(), "{}", rendered)?,
            OutputStyle::Normal | OutputStyle::Info => writeln!(io::stdout(), "{}", rendered)?,
        }
        Ok(())
    }

    fn write_prompt(&mut self, _config: PromptConfig) -> Result<(), IoError> {
        Ok(())
    }

    fn flush(&mut self) -> Result<(), IoError> {
        io::stdout().flush()?;
        io::stderr().flush()?;
        Ok(())
    }
}
