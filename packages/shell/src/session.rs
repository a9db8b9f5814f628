//! Account and working-directory state for the shell.
//!
//! Remote paths are `/`-rooted strings that never touch the local
//! filesystem. The helpers here follow the usual slash-path rules: `.` and
//! empty segments vanish, `..` drops the previous segment and cannot climb
//! above the root.

/// The active account and its current remote directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    account: Option<String>,
    workdir: String,
}

impl Session {
    /// A session with no account, positioned at the root.
    pub fn new() -> Self {
        Self {
            account: None,
            workdir: "/".to_string(),
        }
    }

    pub fn with_account(mut self, name: impl Into<String>) -> Self {
        self.set_account(name);
        self
    }

    pub fn with_workdir(mut self, path: &str) -> Self {
        self.set_workdir(path);
        self
    }

    /// Display name of the active account, if one is logged in.
    pub fn account(&self) -> Option<&str> {
        self.account.as_deref()
    }

    pub fn set_account(&mut self, name: impl Into<String>) {
        let name = name.into();
        self.account = if name.is_empty() { None } else { Some(name) };
    }

    /// Current remote directory, always absolute and clean.
    pub fn workdir(&self) -> &str {
        &self.workdir
    }

    /// Change the current directory. Relative paths resolve against the
    /// current one.
    pub fn set_workdir(&mut self, path: &str) {
        self.workdir = self.resolve(path);
    }

    /// Resolve a path string against the current directory.
    pub fn resolve(&self, path: &str) -> String {
        if is_absolute(path) {
            clean(path)
        } else {
            clean(&format!("{}/{}", self.workdir, path))
        }
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

pub fn is_absolute(path: &str) -> bool {
    path.starts_with('/')
}

/// Normalize a slash path.
///
/// Absolute paths come back rooted (`/` at minimum); relative paths come
/// back without a leading slash, or as `.` when nothing is left.
pub fn clean(path: &str) -> String {
    let rooted = is_absolute(path);
    let mut parts: Vec<&str> = Vec::new();

    for segment in path.split('/') {
        match segment {
            "" | "." => {}
            ".." => match parts.last() {
                Some(&last) if last != ".." => {
                    parts.pop();
                }
                _ if rooted => {}
                _ => parts.push(".."),
            },
            s => parts.push(s),
        }
    }

    match (rooted, parts.is_empty()) {
        (true, _) => format!("/{}", parts.join("/")),
        (false, true) => ".".to_string(),
        (false, false) => parts.join("/"),
    }
}

/// Everything up to the last slash, cleaned. `/a/b/c` → `/a/b`,
/// `/a/b/` → `/a/b`, `c` → `.`.
pub fn dir(path: &str) -> String {
    match path.rfind('/') {
        Some(i) => clean(&path[..=i]),
        None => ".".to_string(),
    }
}

/// Last path segment, ignoring trailing slashes. The root is `/`.
pub fn base(path: &str) -> String {
    if path.is_empty() {
        return ".".to_string();
    }

    let trimmed = path.trim_end_matches('/');
    if trimmed.is_empty() {
        return "/".to_string();
    }

    match trimmed.rfind('/') {
        Some(i) => trimmed[i + 1..].to_string(),
        None => trimmed.to_string(),
    }
}

/// Shorten `s` to at most `max` visible characters, appending `...` when
/// anything was cut. Control characters are dropped.
pub fn short_display(s: &str, max: usize) -> String {
    let mut out = String::new();
    let mut count = 0;

    for c in s.chars().filter(|c| !c.is_control()) {
        count += 1;
        if count > max {
            out.push_str("...");
            break;
        }
        out.push(c);
    }

    out
}
