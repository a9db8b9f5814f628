//! I/O abstraction for the shell.
//!
//! This module defines the interface between the dispatch loop and its host
//! environment. The loop interacts only through the `IoHost` trait, so the
//! same loop runs against a real terminal or an in-memory host in tests.

pub mod types;

#[cfg(test)]
pub mod test_host;

pub use types::*;

#[cfg(test)]
pub use test_host::TestHost;

/// Error type for I/O operations.
#[derive(Debug, thiserror::Error)]
pub enum IoError {
    #[error("I/O error: {0}")]
    Io(String),
}

impl From<std::io::Error> for IoError {
    fn from(e: std::io::Error) -> Self {
        IoError::Io(e.to_string())
    }
}

/// Host interface for shell I/O operations.
pub trait IoHost {
    /// Wait for input to become available.
    ///
    /// After this returns, `read_signal()` returns `Some(Signal)` if the
    /// user aborted the prompt, otherwise `read_input()` returns the line.
    fn wait_for_input(&mut self) -> Result<(), IoError>;

    /// Read the next input line, if available.
    fn read_input(&mut self) -> Result<Option<InputLine>, IoError>;

    /// Read any pending signal (Ctrl+C, Ctrl+D).
    fn read_signal(&mut self) -> Result<Option<Signal>, IoError>;

    /// Write output to the user.
    fn write_output(&mut self, output: Output) -> Result<(), IoError>;

    /// Update the prompt configuration.
    ///
    /// The host uses this to render the prompt before the next input.
    fn write_prompt(&mut self, config: PromptConfig) -> Result<(), IoError>;

    /// Hand the terminal back in normal (cooked) mode before a command runs.
    fn suspend_raw_mode(&mut self) -> Result<(), IoError> {
        Ok(())
    }

    /// Take the terminal back for line editing after a command finished.
    fn resume_raw_mode(&mut self) -> Result<(), IoError> {
        Ok(())
    }

    /// Clear the screen.
    fn clear_screen(&mut self) -> Result<(), IoError> {
        Ok(())
    }

    /// Flush any buffered output.
    fn flush(&mut self) -> Result<(), IoError> {
        Ok(())
    }
}
