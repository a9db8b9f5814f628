//! Terminal host implementation using Reedline.
//!
//! This host provides interactive terminal I/O with:
//! - Readline-style line editing (Vi and Emacs modes)
//! - Tab completion of command names and remote paths
//! - Syntax highlighting
//! - Up/down recall of earlier command lines
//!
//! Reedline only holds the terminal in raw mode while `read_line` runs, so
//! a command dispatched between two reads already sees a cooked terminal.

use std::borrow::Cow;
use std::io::{self, Write};
use std::sync::{Arc, Mutex};

use nu_ansi_term::{Color, Style};
use reedline::{
    default_emacs_keybindings, default_vi_insert_keybindings, default_vi_normal_keybindings,
    ColumnarMenu, DefaultHinter, EditMode as ReedlineEditMode, Emacs, FileBackedHistory, History,
    HistoryItem, KeyCode, KeyModifiers, Keybindings, MenuBuilder, Prompt, PromptEditMode,
    PromptHistorySearch, PromptHistorySearchStatus, PromptViMode, Reedline, ReedlineEvent,
    ReedlineMenu, Signal as ReedlineSignal, Vi,
};
use tracing::debug;

use super::render_output;
use crate::command_table::CommandTable;
use crate::completer::ReplCompleter;
use crate::config::{EditMode, ShellConfig};
use crate::highlighter::ReplHighlighter;
use crate::io::{InputLine, IoError, IoHost, Output, PromptConfig, Signal};
use crate::remote::DirectoryLister;
use crate::session::Session;

/// Lines kept for up/down recall.
const RECALL_CAPACITY: usize = 1000;

/// Terminal host using Reedline for interactive I/O.
pub struct TerminalHost {
    line_editor: Reedline,
    pending_input: Option<InputLine>,
    pending_signal: Option<Signal>,
    current_prompt: PromptConfig,
    /// Shared with the completer, which resolves relative paths against it.
    session: Arc<Mutex<Session>>,
}

impl TerminalHost {
    /// Create a new terminal host.
    ///
    /// `history` seeds the up/down recall list; persisting it is left to
    /// the caller.
    pub fn new(
        config: &ShellConfig,
        table: Arc<CommandTable>,
        lister: Arc<dyn DirectoryLister + Send + Sync>,
        history: &[String],
    ) -> io::Result<Self> {
        let session = Arc::new(Mutex::new(Session::new()));

        let completer = Box::new(ReplCompleter::new(
            Arc::clone(&table),
            lister,
            Arc::clone(&session),
        ));
        let highlighter = Box::new(ReplHighlighter::new(&table));
        let hinter = Box::new(
            DefaultHinter::default().with_style(Style::new().fg(Color::LightGray).dimmed()),
        );

        let completion_menu = Box::new(
            ColumnarMenu::default()
                .with_name("completion_menu")
                .with_text_style(Style::new().fg(Color::Cyan))
                .with_selected_text_style(Style::new().fg(Color::Black).on(Color::Cyan).bold()),
        );

        let edit_mode: Box<dyn ReedlineEditMode> = match config.edit_mode {
            EditMode::Vi => {
                let mut insert_keybindings = default_vi_insert_keybindings();
                add_completion_binding(&mut insert_keybindings);
                Box::new(Vi::new(insert_keybindings, default_vi_normal_keybindings()))
            }
            EditMode::Emacs => {
                let mut keybindings = default_emacs_keybindings();
                add_completion_binding(&mut keybindings);
                Box::new(Emacs::new(keybindings))
            }
        };

        let mut recall = FileBackedHistory::new(RECALL_CAPACITY)
            .map_err(|e| io::Error::other(e.to_string()))?;
        for line in history {
            recall
                .save(HistoryItem::from_command_line(line.as_str()))
                .map_err(|e| io::Error::other(e.to_string()))?;
        }
        debug!("seeded line editor with {} history entries", history.len());

        let line_editor = Reedline::create()
            .with_completer(completer)
            .with_highlighter(highlighter)
            .with_hinter(hinter)
            .with_menu(ReedlineMenu::EngineCompleter(completion_menu))
            .with_edit_mode(edit_mode)
            .with_history(Box::new(recall));

        Ok(Self {
            line_editor,
            pending_input: None,
            pending_signal: None,
            current_prompt: PromptConfig::default(),
            session,
        })
    }
}

fn add_completion_binding(keybindings: &mut Keybindings) {
    keybindings.add_binding(
        KeyModifiers::NONE,
        KeyCode::Tab,
        ReedlineEvent::UntilFound(vec![
            ReedlineEvent::Menu("completion_menu".to_string()),
            ReedlineEvent::MenuNext,
        ]),
    );
}

impl IoHost for TerminalHost {
    fn wait_for_input(&mut self) -> Result<(), IoError> {
        let prompt = TerminalPrompt::from_config(&self.current_prompt);

        match self.line_editor.read_line(&prompt) {
            Ok(ReedlineSignal::Success(line)) => {
                self.pending_input = Some(InputLine { line });
            }
            Ok(ReedlineSignal::CtrlC) => {
                self.pending_signal = Some(Signal::Interrupt);
            }
            Ok(ReedlineSignal::CtrlD) => {
                self.pending_signal = Some(Signal::Eof);
            }
            Err(e) => {
                return Err(IoError::Io(format!("Reedline error: {}", e)));
            }
        }

        Ok(())
    }

    fn read_input(&mut self) -> Result<Option<InputLine>, IoError> {
        Ok(self.pending_input.take())
    }

    fn read_signal(&mut self) -> Result<Option<Signal>, IoError> {
        Ok(self.pending_signal.take())
    }

    fn write_output(&mut self, output: Output) -> Result<(), IoError> {
        println!("{}", render_output(&output, true));
        Ok(())
    }

    fn write_prompt(&mut self, config: PromptConfig) -> Result<(), IoError> {
        match self.session.lock() {
            Ok(mut session) => *session = config.session.clone(),
            Err(poisoned) => *poisoned.into_inner() = config.session.clone(),
        }
        self.current_prompt = config;
        Ok(())
    }

    fn suspend_raw_mode(&mut self) -> Result<(), IoError> {
        // Anything echoed while editing must reach the screen first
        self.flush()
    }

    fn resume_raw_mode(&mut self) -> Result<(), IoError> {
        // The next read_line re-enters raw mode
        self.flush()
    }

    fn clear_screen(&mut self) -> Result<(), IoError> {
        self.line_editor
            .clear_screen()
            .map_err(|e| IoError::Io(e.to_string()))
    }

    fn flush(&mut self) -> Result<(), IoError> {
        io::stdout().flush().map_err(|e| IoError::Io(e.to_string()))
    }
}

/// Prompt implementation for the terminal.
struct TerminalPrompt {
    app_name: String,
    account: Option<String>,
    directory: String,
}

impl TerminalPrompt {
    fn from_config(config: &PromptConfig) -> Self {
        Self {
            app_name: config.app_name.clone(),
            account: config.account.clone(),
            directory: config.directory.clone(),
        }
    }

    fn marker(&self) -> &'static str {
        if self.account.is_some() {
            "$"
        } else {
            " >"
        }
    }
}

impl Prompt for TerminalPrompt {
    fn render_prompt_left(&self) -> Cow<'_, str> {
        let app = Color::Green.bold().paint(&self.app_name);
        match &self.account {
            Some(account) => Cow::Owned(format!(
                "{}:{} {}",
                app,
                Color::Yellow.paint(&self.directory),
                Color::Cyan.paint(account)
            )),
            None => Cow::Owned(app.to_string()),
        }
    }

    fn render_prompt_right(&self) -> Cow<'_, str> {
        Cow::Borrowed("")
    }

    fn render_prompt_indicator(&self, edit_mode: PromptEditMode) -> Cow<'_, str> {
        match edit_mode {
            PromptEditMode::Default | PromptEditMode::Emacs => {
                Cow::Owned(format!("{} ", self.marker()))
            }
            PromptEditMode::Vi(vi_mode) => {
                let indicator = match vi_mode {
                    PromptViMode::Normal => Color::Blue.bold().paint("[N]"),
                    PromptViMode::Insert => Color::Green.bold().paint("[I]"),
                };
                Cow::Owned(format!("{}{} ", self.marker(), indicator))
            }
            PromptEditMode::Custom(s) => Cow::Owned(format!("({}){} ", s, self.marker())),
        }
    }

    fn render_prompt_multiline_indicator(&self) -> Cow<'_, str> {
        Cow::Borrowed(": ")
    }

    fn render_prompt_history_search_indicator(
        &self,
        history_search: PromptHistorySearch,
    ) -> Cow<'_, str> {
        let prefix = match history_search.status {
            PromptHistorySearchStatus::Passing => "",
            PromptHistorySearchStatus::Failing => "failing ",
        };
        Cow::Owned(format!(
            "({}reverse-search: {}) ",
            prefix, history_search.term
        ))
    }
}
