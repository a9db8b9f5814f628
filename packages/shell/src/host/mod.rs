//! Host implementations for the shell.
//!
//! The terminal host uses Reedline for interactive terminal I/O. The plain
//! host only writes output and is used to run a single command.

pub mod plain;
pub mod terminal;

pub use plain::PlainHost;
pub use terminal::TerminalHost;

use nu_ansi_term::Color;

use crate::io::{Output, OutputStyle};

/// Render output for display, with color when `styled`.
pub(crate) fn render_output(output: &Output, styled: bool) -> String {
    if !styled {
        return match output.style {
            OutputStyle::Normal | OutputStyle::Info => output.text.clone(),
            OutputStyle::Error => format!("Error: {}", output.text),
            OutputStyle::Warning => format!("Warning: {}", output.text),
        };
    }

    match output.style {
        OutputStyle::Normal => output.text.clone(),
        OutputStyle::Error => format!("{} {}", Color::Red.bold().paint("Error:"), output.text),
        OutputStyle::Warning => {
            format!("{} {}", Color::Yellow.bold().paint("Warning:"), output.text)
        }
        OutputStyle::Info => Color::Cyan.paint(&output.text).to_string(),
    }
}
