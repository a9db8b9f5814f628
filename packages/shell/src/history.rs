//! Persistent command history.
//!
//! The history file holds one command line per line. It is read once when
//! the shell starts and rewritten in full once when it stops; in between,
//! submitted lines are only appended in memory.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::debug;

#[derive(thiserror::Error, Debug)]
pub enum HistoryError {
    #[error("failed to read history file {}: {source}", path.display())]
    Read { path: PathBuf, source: io::Error },

    #[error("history file {} is not valid UTF-8", path.display())]
    Corrupt { path: PathBuf },

    #[error("failed to write history file {}: {source}", path.display())]
    Write { path: PathBuf, source: io::Error },
}

/// Ordered, append-only list of past command lines backed by a file.
#[derive(Debug, Clone)]
pub struct HistoryStore {
    path: PathBuf,
    entries: Vec<String>,
}

impl HistoryStore {
    /// A store with no entries that will flush to `path`.
    pub fn empty(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            entries: Vec::new(),
        }
    }

    /// Load the history at `path`.
    ///
    /// A missing file is a first run, not an error, and yields an empty
    /// store. Unreadable or non-UTF-8 contents are reported so the caller can
    /// warn and fall back to [`HistoryStore::empty`].
    pub fn load(path: impl Into<PathBuf>) -> Result<Self, HistoryError> {
        let path = path.into();

        let bytes = match fs::read(&path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!("no history file at {}", path.display());
                return Ok(Self::empty(path));
            }
            Err(source) => return Err(HistoryError::Read { path, source }),
        };

        let content = match String::from_utf8(bytes) {
            Ok(content) => content,
            Err(_) => return Err(HistoryError::Corrupt { path }),
        };

        let entries: Vec<String> = content
            .lines()
            .filter(|line| !line.trim().is_empty())
            .map(str::to_string)
            .collect();

        debug!("loaded {} history entries from {}", entries.len(), path.display());
        Ok(Self { path, entries })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Record a submitted line. Duplicates are kept.
    pub fn append(&mut self, line: impl Into<String>) {
        // One record per line on disk
        let line = line.into().replace(['\r', '\n'], " ");
        self.entries.push(line);
    }

    /// Overwrite the history file with the in-memory entries.
    pub fn flush(&self) -> Result<(), HistoryError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|source| HistoryError::Write {
                    path: self.path.clone(),
                    source,
                })?;
            }
        }

        let mut content = self.entries.join("\n");
        if !content.is_empty() {
            content.push('\n');
        }

        fs::write(&self.path, content).map_err(|source| HistoryError::Write {
            path: self.path.clone(),
            source,
        })?;

        debug!("wrote {} history entries to {}", self.len(), self.path.display());
        Ok(())
    }
}
