//! Remote directory listing.
//!
//! The shell never talks to a storage provider directly. Completion and the
//! navigation commands go through [`DirectoryLister`], which a provider
//! backend implements. [`MemoryTree`] is a self-contained implementation used
//! when no backend is connected and in tests.

use std::collections::BTreeMap;

use crate::session::{base, clean, dir};

/// One child of a remote directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteEntry {
    pub name: String,
    pub is_dir: bool,
}

impl RemoteEntry {
    pub fn dir(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            is_dir: true,
        }
    }

    pub fn file(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            is_dir: false,
        }
    }
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ListError {
    #[error("{0}: no such directory")]
    NotFound(String),

    #[error("{0}: not a directory")]
    NotADirectory(String),

    #[error("listing unavailable: {0}")]
    Unavailable(String),
}

/// Lists the children of an absolute remote directory.
pub trait DirectoryLister {
    fn list(&self, path: &str) -> Result<Vec<RemoteEntry>, ListError>;
}

/// An in-memory directory tree.
///
/// The root always exists. Adding a path creates its missing parents.
#[derive(Debug, Clone)]
pub struct MemoryTree {
    /// Directory path -> child name -> is_dir
    dirs: BTreeMap<String, BTreeMap<String, bool>>,
}

impl MemoryTree {
    pub fn new() -> Self {
        let mut dirs = BTreeMap::new();
        dirs.insert("/".to_string(), BTreeMap::new());
        Self { dirs }
    }

    pub fn with_dir(mut self, path: &str) -> Self {
        self.add_dir(path);
        self
    }

    pub fn with_file(mut self, path: &str) -> Self {
        self.add_file(path);
        self
    }

    pub fn add_dir(&mut self, path: &str) {
        let path = clean(&format!("/{}", path));
        if self.dirs.contains_key(&path) {
            return;
        }
        self.dirs.insert(path.clone(), BTreeMap::new());
        self.link(&path, true);
    }

    pub fn add_file(&mut self, path: &str) {
        let path = clean(&format!("/{}", path));
        if path == "/" {
            return;
        }
        self.link(&path, false);
    }

    fn link(&mut self, path: &str, is_dir: bool) {
        let parent = dir(path);
        self.add_dir(&parent);
        if let Some(children) = self.dirs.get_mut(&parent) {
            children.insert(base(path), is_dir);
        }
    }
}

impl Default for MemoryTree {
    fn default() -> Self {
        Self::new()
    }
}

impl DirectoryLister for MemoryTree {
    fn list(&self, path: &str) -> Result<Vec<RemoteEntry>, ListError> {
        let path = clean(path);

        if let Some(children) = self.dirs.get(&path) {
            return Ok(children
                .iter()
                .map(|(name, &is_dir)| RemoteEntry {
                    name: name.clone(),
                    is_dir,
                })
                .collect());
        }

        let is_file = self
            .dirs
            .get(&dir(&path))
            .and_then(|children| children.get(&base(&path)))
            .is_some();

        if is_file {
            Err(ListError::NotADirectory(path))
        } else {
            Err(ListError::NotFound(path))
        }
    }
}
