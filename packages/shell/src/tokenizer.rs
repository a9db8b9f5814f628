//! Splitting command lines into arguments.
//!
//! Whitespace separates arguments. Outside of quotes a backslash escapes the
//! next character, so `my\ file` is one argument. Single quotes take their
//! contents literally; double quotes group their contents but still honor
//! backslash escapes. An unterminated quote runs to the end of the line, which
//! lets a half-typed argument tokenize the same way during completion as it
//! will once it is submitted.

/// A submitted line together with its arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandLine {
    pub raw: String,
    pub args: Vec<String>,
}

impl CommandLine {
    pub fn parse(raw: impl Into<String>) -> Self {
        let raw = raw.into();
        let args = tokenize(&raw);
        Self { raw, args }
    }

    /// True when the line has no arguments (blank or only whitespace).
    pub fn is_empty(&self) -> bool {
        self.args.is_empty()
    }

    /// The command name, i.e. the first argument.
    pub fn command(&self) -> Option<&str> {
        self.args.first().map(String::as_str)
    }

    /// Everything after the command name.
    pub fn rest(&self) -> &[String] {
        self.args.get(1..).unwrap_or(&[])
    }
}

/// Tokenization of a line up to the cursor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartialLine {
    /// All arguments, including a trailing in-progress one.
    pub args: Vec<String>,
    /// The line ends in an unescaped delimiter: the next keystroke starts a
    /// new argument rather than extending the last one.
    pub closed: bool,
    /// Byte offset where the in-progress argument starts. Equal to the line
    /// length when `closed`.
    pub last_start: usize,
}

impl PartialLine {
    /// The argument under the cursor, or `""` when the line is closed.
    pub fn current(&self) -> &str {
        if self.closed {
            ""
        } else {
            self.args.last().map(String::as_str).unwrap_or("")
        }
    }
}

/// Split a complete line into arguments.
pub fn tokenize(line: &str) -> Vec<String> {
    tokenize_partial(line).args
}

/// Split a line that may end in the middle of an argument.
pub fn tokenize_partial(line: &str) -> PartialLine {
    let mut args = Vec::new();
    let mut current = String::new();
    let mut in_token = false;
    let mut token_start = line.len();
    let mut quote: Option<char> = None;
    let mut escaped = false;

    for (i, c) in line.char_indices() {
        if !in_token && !c.is_whitespace() {
            in_token = true;
            token_start = i;
        }

        if escaped {
            current.push(c);
            escaped = false;
            continue;
        }

        match quote {
            Some('\'') => {
                if c == '\'' {
                    quote = None;
                } else {
                    current.push(c);
                }
            }
            Some(q) => {
                if c == q {
                    quote = None;
                } else if c == '\\' {
                    escaped = true;
                } else {
                    current.push(c);
                }
            }
            None => match c {
                '\\' => escaped = true,
                '\'' | '"' => quote = Some(c),
                c if c.is_whitespace() => {
                    if in_token {
                        args.push(std::mem::take(&mut current));
                        in_token = false;
                    }
                }
                c => current.push(c),
            },
        }
    }

    if in_token {
        args.push(current);
        PartialLine {
            args,
            closed: false,
            last_start: token_start,
        }
    } else {
        PartialLine {
            args,
            closed: true,
            last_start: line.len(),
        }
    }
}

/// Escape one argument so that [`tokenize`] reads it back unchanged.
///
/// Whitespace, quotes and backslashes get a backslash; an empty argument
/// becomes `''`.
pub fn escape(arg: &str) -> String {
    if arg.is_empty() {
        return "''".to_string();
    }

    let mut out = String::with_capacity(arg.len());
    for c in arg.chars() {
        if c.is_whitespace() || matches!(c, '\\' | '\'' | '"') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

/// Join arguments into a line that tokenizes back to the same arguments.
pub fn join<S: AsRef<str>>(args: &[S]) -> String {
    args.iter()
        .map(|a| escape(a.as_ref()))
        .collect::<Vec<_>>()
        .join(" ")
}
