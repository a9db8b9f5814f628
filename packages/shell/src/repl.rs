//! Session wiring: load the history, build a host and run the core.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::command_table::CommandTable;
use crate::commands;
use crate::config::ShellConfig;
use crate::core::ReplCore;
use crate::error::ShellError;
use crate::history::HistoryStore;
use crate::host::{PlainHost, TerminalHost};
use crate::io::{ExitReason, IoHost, Output};
use crate::remote::{DirectoryLister, MemoryTree};

/// Load the history, falling back to an empty one.
///
/// A missing file is normal on first start. Any other failure is reported
/// through `warnings` and the session starts with no history.
pub fn load_history(config: &ShellConfig, warnings: &mut Vec<String>) -> HistoryStore {
    match HistoryStore::load(&config.history_path) {
        Ok(history) => history,
        Err(e) => {
            warn!("{}", e);
            warnings.push(format!("command history not loaded: {}", e));
            HistoryStore::empty(&config.history_path)
        }
    }
}

fn default_lister() -> Arc<dyn DirectoryLister + Send + Sync> {
    Arc::new(MemoryTree::new())
}

/// Run an interactive session in the terminal.
pub fn run(config: &ShellConfig) -> Result<ExitReason, ShellError> {
    run_with(config, Arc::new(commands::default_table()), default_lister())
}

/// Run an interactive session with a specific command table and lister.
pub fn run_with(
    config: &ShellConfig,
    table: Arc<CommandTable>,
    lister: Arc<dyn DirectoryLister + Send + Sync>,
) -> Result<ExitReason, ShellError> {
    let mut warnings = Vec::new();
    let history = load_history(config, &mut warnings);

    let mut host = TerminalHost::new(
        config,
        Arc::clone(&table),
        Arc::clone(&lister),
        history.entries(),
    )?;
    for warning in warnings {
        host.write_output(Output::warning(warning))?;
    }

    let mut core = ReplCore::new(table, lister, history);
    let reason = core.run(&mut host)?;
    debug!("session ended: {:?}", reason);
    Ok(reason)
}

/// Run one command without entering the interactive shell. Returns the
/// process exit code.
pub fn run_command(config: &ShellConfig, args: &[String]) -> Result<i32, ShellError> {
    let history = HistoryStore::empty(&config.history_path);
    let mut core = ReplCore::new(
        Arc::new(commands::default_table()),
        default_lister(),
        history,
    );
    let mut host = PlainHost::new();
    Ok(core.run_command(args, &mut host)?)
}
