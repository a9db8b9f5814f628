//! # cloudsh
//!
//! An interactive shell front-end for a remote storage CLI.
//!
//! The shell reads command lines with a line editor, completes command
//! names and remote paths, keeps a persistent command history and hands
//! each line to the matching command. Storage operations themselves live
//! behind the [`remote::DirectoryLister`] seam and the command table.
//!
//! ## Features
//!
//! - Tab completion of command names, aliases and remote paths
//! - Quoting and backslash escaping of arguments
//! - Command history saved across sessions
//! - Vi mode support (detected from EDITOR, .inputrc, or CLOUDSH_EDIT_MODE)
//! - One-shot mode: `cloudsh <command> [args...]`
//!
//! ## Usage
//!
//! ```bash
//! # Run the shell
//! cloudsh
//!
//! # Inside the shell:
//! cloudsh > login --username alice
//! cloudsh:/ alice$ cd photos
//! cloudsh:photos alice$ ls
//! ```

pub mod args;
pub mod command_table;
pub mod commands;
pub mod completer;
pub mod config;
pub mod core;
pub mod error;
pub mod highlighter;
pub mod history;
pub mod host;
pub mod io;
pub mod remote;
pub mod repl;
pub mod session;
pub mod tokenizer;

pub use config::ShellConfig;
pub use error::ShellError;
pub use repl::{run, run_command};
