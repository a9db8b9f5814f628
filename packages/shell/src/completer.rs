//! Tab completion.
//!
//! [`complete`] is a pure function of the line, the command table, the
//! session and one directory listing. [`ReplCompleter`] adapts it to the
//! line editor.

use std::sync::{Arc, Mutex};

use reedline::{Completer, Span, Suggestion};
use tracing::debug;

use crate::command_table::CommandTable;
use crate::remote::DirectoryLister;
use crate::session::{clean, dir, is_absolute, Session};
use crate::tokenizer::{escape, tokenize_partial};

/// Candidates for the argument under the cursor.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Completion {
    /// Byte offset where the replaced text starts; it ends at the cursor.
    pub start: usize,
    pub candidates: Vec<String>,
}

impl Completion {
    fn none(start: usize) -> Self {
        Self {
            start,
            candidates: Vec::new(),
        }
    }

    /// The line with `candidate` put in place of the partial argument.
    pub fn apply(&self, line: &str, cursor: usize, candidate: &str) -> String {
        format!("{}{}{}", &line[..self.start], candidate, &line[cursor..])
    }
}

/// Complete the argument that ends at `cursor`.
///
/// A lone unfinished word completes to command names and aliases. Later
/// arguments of commands that accept paths complete to entries of the remote
/// directory they point into: directories end in `/`, files in a space.
pub fn complete(
    line: &str,
    cursor: usize,
    table: &CommandTable,
    session: &Session,
    lister: &dyn DirectoryLister,
) -> Completion {
    let cursor = floor_char_boundary(line, cursor);
    let line = &line[..cursor];
    let partial = tokenize_partial(line);
    let start = partial.last_start;

    match (partial.args.len(), partial.closed) {
        (0, _) => return Completion::none(start),
        (1, false) => {
            let prefix = partial.current();
            return Completion {
                start,
                candidates: table
                    .names()
                    .filter(|name| name.starts_with(prefix))
                    .map(|name| format!("{} ", name))
                    .collect(),
            };
        }
        _ => {}
    }

    let command = match table.lookup(&partial.args[0]) {
        Some(command) if command.accepts_paths => command,
        _ => return Completion::none(start),
    };

    let target = partial.current();

    // `.` and `..` name the directory itself; just add the separator
    if matches!(target, "." | "..") || target.ends_with("/.") || target.ends_with("/..") {
        return Completion {
            start,
            candidates: vec![format!("{}/", &line[start..])],
        };
    }

    let (search_dir, typed_dir, prefix) = split_target(target, session.workdir());

    let entries = match lister.list(&search_dir) {
        Ok(entries) => entries,
        Err(e) => {
            debug!("{}: no completion for {:?}: {}", command.name, target, e);
            return Completion::none(start);
        }
    };

    Completion {
        start,
        candidates: entries
            .into_iter()
            .filter(|entry| entry.name.starts_with(prefix))
            .map(|entry| {
                let suffix = if entry.is_dir { "/" } else { " " };
                format!("{}{}", escape(&format!("{}{}", typed_dir, entry.name)), suffix)
            })
            .collect(),
    }
}

/// Split a path argument into (directory to list, the directory part as
/// typed, the segment being completed).
fn split_target<'a>(target: &'a str, workdir: &str) -> (String, &'a str, &'a str) {
    let (typed_dir, prefix) = match target.rfind('/') {
        Some(i) => target.split_at(i + 1),
        None => ("", target),
    };

    let search_dir = if is_absolute(target) {
        dir(target)
    } else {
        let joined = clean(&format!("{}/{}", workdir, target));
        if target.is_empty() || target.ends_with('/') {
            joined
        } else {
            dir(&joined)
        }
    };

    (search_dir, typed_dir, prefix)
}

fn floor_char_boundary(s: &str, mut index: usize) -> usize {
    if index >= s.len() {
        return s.len();
    }
    while !s.is_char_boundary(index) {
        index -= 1;
    }
    index
}

/// Completer for the line editor.
///
/// The working directory is shared with the terminal host, which updates it
/// before each prompt.
pub struct ReplCompleter {
    table: Arc<CommandTable>,
    lister: Arc<dyn DirectoryLister + Send + Sync>,
    session: Arc<Mutex<Session>>,
}

impl ReplCompleter {
    pub fn new(
        table: Arc<CommandTable>,
        lister: Arc<dyn DirectoryLister + Send + Sync>,
        session: Arc<Mutex<Session>>,
    ) -> Self {
        Self {
            table,
            lister,
            session,
        }
    }

    fn session(&self) -> Session {
        match self.session.lock() {
            Ok(session) => session.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    fn description(&self, candidate: &str) -> Option<String> {
        self.table
            .lookup(candidate.trim_end())
            .map(|command| command.usage.to_string())
    }
}

impl Completer for ReplCompleter {
    fn complete(&mut self, line: &str, pos: usize) -> Vec<Suggestion> {
        let session = self.session();
        let completion = complete(line, pos, &self.table, &session, self.lister.as_ref());
        let is_command = tokenize_partial(&line[..completion.start]).args.is_empty();

        completion
            .candidates
            .into_iter()
            .map(|value| Suggestion {
                description: if is_command {
                    self.description(&value)
                } else {
                    None
                },
                value,
                style: None,
                extra: None,
                span: Span::new(completion.start, pos),
                append_whitespace: false,
                match_indices: None,
            })
            .collect()
    }
}
