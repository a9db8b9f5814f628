//! Startup configuration.
//!
//! Everything comes from the environment and the command line; no config
//! file is read.

use std::path::{Path, PathBuf};

/// Overrides the directory holding the history file.
pub const CONFIG_DIR_VAR: &str = "CLOUDSH_CONFIG_DIR";
/// Enables debug logging.
pub const VERBOSE_VAR: &str = "CLOUDSH_VERBOSE";
/// Forces the edit mode (`vi` or `emacs`).
pub const EDIT_MODE_VAR: &str = "CLOUDSH_EDIT_MODE";

const HISTORY_FILE: &str = "command_history.txt";

/// Key bindings used by the line editor.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum EditMode {
    #[default]
    Emacs,
    Vi,
}

impl EditMode {
    /// Parse an explicit mode name.
    pub fn parse(name: &str) -> Option<Self> {
        match name.trim().to_lowercase().as_str() {
            "vi" | "vim" => Some(EditMode::Vi),
            "emacs" => Some(EditMode::Emacs),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShellConfig {
    pub history_path: PathBuf,
    pub verbose: bool,
    pub edit_mode: EditMode,
}

impl ShellConfig {
    /// Build the configuration from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build the configuration from an arbitrary variable source.
    pub fn from_lookup(var: impl Fn(&str) -> Option<String>) -> Self {
        let config_dir = var(CONFIG_DIR_VAR)
            .filter(|dir| !dir.is_empty())
            .map(PathBuf::from)
            .or_else(|| dirs::config_dir().map(|dir| dir.join("cloudsh")))
            .unwrap_or_else(|| PathBuf::from(".cloudsh"));

        Self {
            history_path: config_dir.join(HISTORY_FILE),
            verbose: var(VERBOSE_VAR).is_some_and(|v| is_truthy(&v)),
            edit_mode: detect_edit_mode(&var),
        }
    }

    pub fn with_edit_mode(mut self, mode: EditMode) -> Self {
        self.edit_mode = mode;
        self
    }

    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    pub fn with_history_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.history_path = path.into();
        self
    }
}

impl Default for ShellConfig {
    fn default() -> Self {
        Self::from_env()
    }
}

pub fn is_truthy(value: &str) -> bool {
    matches!(
        value.trim().to_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

fn detect_edit_mode(var: &impl Fn(&str) -> Option<String>) -> EditMode {
    // Explicit override wins
    if let Some(mode) = var(EDIT_MODE_VAR).as_deref().and_then(EditMode::parse) {
        return mode;
    }

    let names_vi = |editor: String| {
        let editor = editor.to_lowercase();
        let program = editor.rsplit('/').next().unwrap_or_default();
        program.contains("vim") || program == "vi"
    };

    if var("EDITOR").is_some_and(names_vi) || var("VISUAL").is_some_and(names_vi) {
        return EditMode::Vi;
    }

    let inputrc_paths = [
        var("INPUTRC").map(PathBuf::from),
        dirs::home_dir().map(|p| p.join(".inputrc")),
        Some(PathBuf::from("/etc/inputrc")),
    ];

    if inputrc_paths
        .into_iter()
        .flatten()
        .any(|path| inputrc_sets_vi(&path))
    {
        return EditMode::Vi;
    }

    EditMode::Emacs
}

/// Check an inputrc file for `set editing-mode vi`.
fn inputrc_sets_vi(path: &Path) -> bool {
    let Ok(content) = std::fs::read_to_string(path) else {
        return false;
    };

    content.lines().any(|line| {
        let words: Vec<&str> = line.split_whitespace().collect();
        matches!(words.as_slice(), ["set", "editing-mode", "vi", ..])
    })
}
