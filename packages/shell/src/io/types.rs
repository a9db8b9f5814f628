//! I/O types for the shell.
//!
//! These types define the interface between the dispatch loop and its host
//! environment.

use crate::session::{base, short_display, Session};

/// Visible characters of the working directory kept in the prompt.
pub const PROMPT_DIR_MAX: usize = 16;

/// A line of input from the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputLine {
    pub line: String,
}

/// A signal from the host instead of a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Signal {
    /// User pressed Ctrl+C (interrupt).
    Interrupt,
    /// User pressed Ctrl+D (end of file).
    Eof,
}

/// Terminal mode. The line editor runs in raw mode; commands run with the
/// terminal suspended back to normal line-buffered (cooked) mode.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TerminalState {
    #[default]
    Raw,
    Cooked,
}

/// Output to be written by the shell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Output {
    pub text: String,
    pub style: OutputStyle,
}

impl Output {
    pub fn normal(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            style: OutputStyle::Normal,
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            style: OutputStyle::Error,
        }
    }

    pub fn warning(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            style: OutputStyle::Warning,
        }
    }

    pub fn info(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            style: OutputStyle::Info,
        }
    }
}

/// Style hint for output rendering.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputStyle {
    /// Normal output (already contains ANSI codes if applicable).
    #[default]
    Normal,
    /// Error message (host may add red prefix).
    Error,
    /// Recoverable problem (host may add yellow prefix).
    Warning,
    /// Informational message (host may style in cyan).
    Info,
}

/// Prompt configuration sent from the loop to the host.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PromptConfig {
    pub app_name: String,
    /// Active account, if logged in.
    pub account: Option<String>,
    /// Shortened name of the current directory.
    pub directory: String,
    /// The session as of this prompt, for completion.
    pub session: Session,
}

impl PromptConfig {
    pub fn new(app_name: &str, session: &Session) -> Self {
        Self {
            app_name: app_name.to_string(),
            account: session.account().map(str::to_string),
            directory: short_display(&base(session.workdir()), PROMPT_DIR_MAX),
            session: session.clone(),
        }
    }

    /// The prompt as plain text: `app:<dir> <account>$ ` when logged in,
    /// `app > ` otherwise.
    pub fn render(&self) -> String {
        match &self.account {
            Some(account) => format!("{}:{} {}$ ", self.app_name, self.directory, account),
            None => format!("{} > ", self.app_name),
        }
    }
}

/// Reason the shell exited.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitReason {
    /// A command asked to leave with this exit code.
    UserExit(i32),
    /// User pressed Ctrl+C at the prompt.
    Interrupted,
    /// User pressed Ctrl+D at the prompt.
    Eof,
}

impl ExitReason {
    /// Process exit code for this reason.
    pub fn code(self) -> i32 {
        match self {
            ExitReason::UserExit(code) => code,
            ExitReason::Interrupted | ExitReason::Eof => 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prompt_without_account() {
        let config = PromptConfig::new("cloudsh", &Session::new().with_workdir("/photos"));
        assert_eq!(config.render(), "cloudsh > ");
    }

    #[test]
    fn prompt_with_account_shows_directory_base() {
        let session = Session::new()
            .with_account("alice")
            .with_workdir("/photos/2020");
        assert_eq!(
            PromptConfig::new("cloudsh", &session).render(),
            "cloudsh:2020 alice$ "
        );
    }

    #[test]
    fn prompt_at_root() {
        let session = Session::new().with_account("alice");
        assert_eq!(
            PromptConfig::new("cloudsh", &session).render(),
            "cloudsh:/ alice$ "
        );
    }

    #[test]
    fn prompt_truncates_long_directory() {
        let session = Session::new()
            .with_account("bob")
            .with_workdir("/backups/an-extremely-long-folder");
        assert_eq!(
            PromptConfig::new("cloudsh", &session).render(),
            "cloudsh:an-extremely-lon... bob$ "
        );
    }

    #[test]
    fn exit_codes() {
        assert_eq!(ExitReason::UserExit(3).code(), 3);
        assert_eq!(ExitReason::Interrupted.code(), 0);
        assert_eq!(ExitReason::Eof.code(), 0);
    }
}
