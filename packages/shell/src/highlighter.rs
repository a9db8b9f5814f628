use nu_ansi_term::{Color, Style};
use reedline::{Highlighter, StyledText};

use crate::command_table::CommandTable;

/// Syntax highlighter for the shell input line
pub struct ReplHighlighter {
    commands: Vec<&'static str>,
    path_commands: Vec<&'static str>,
}

impl ReplHighlighter {
    pub fn new(table: &CommandTable) -> Self {
        Self {
            commands: table.names().collect(),
            path_commands: table
                .iter()
                .filter(|c| c.accepts_paths)
                .flat_map(|c| c.names())
                .collect(),
        }
    }
}

impl Highlighter for ReplHighlighter {
    fn highlight(&self, line: &str, _cursor: usize) -> StyledText {
        let mut styled = StyledText::new();

        if line.is_empty() {
            return styled;
        }

        // Leading whitespace stays unstyled
        let body_start = line.len() - line.trim_start().len();
        if body_start > 0 {
            styled.push((Style::new(), line[..body_start].to_string()));
        }
        let body = &line[body_start..];

        let (command, rest) = match body.find(char::is_whitespace) {
            Some(pos) => (&body[..pos], &body[pos..]),
            None => (body, ""),
        };

        if command.is_empty() {
            return styled;
        }

        let cmd_style = if self.commands.contains(&command) {
            Style::new().bold().fg(Color::Cyan)
        } else {
            Style::new().fg(Color::Red)
        };
        styled.push((cmd_style, command.to_string()));

        if rest.is_empty() {
            return styled;
        }

        if self.path_commands.contains(&command) {
            styled.push((Style::new().fg(Color::Yellow), rest.to_string()));
        } else {
            styled.push((Style::new(), rest.to_string()));
        }

        styled
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::default_table;

    fn highlighter() -> ReplHighlighter {
        ReplHighlighter::new(&default_table())
    }

    #[test]
    fn new_collects_names_and_aliases() {
        let highlighter = highlighter();
        assert!(highlighter.commands.contains(&"help"));
        assert!(highlighter.commands.contains(&"quit"));
        assert!(highlighter.commands.contains(&"exit"));
        assert!(highlighter.commands.contains(&"cls"));
        assert!(highlighter.path_commands.contains(&"cd"));
        assert!(!highlighter.path_commands.contains(&"pwd"));
    }

    #[test]
    fn highlight_empty_returns_empty() {
        let styled = highlighter().highlight("", 0);
        assert!(styled.buffer.is_empty());
    }

    #[test]
    fn highlight_recognized_command_only() {
        let styled = highlighter().highlight("help", 0);
        assert_eq!(styled.buffer.len(), 1);
        assert_eq!(styled.buffer[0].1, "help");
        assert_eq!(styled.buffer[0].0.foreground, Some(Color::Cyan));
        assert!(styled.buffer[0].0.is_bold);
    }

    #[test]
    fn highlight_unknown_command() {
        let styled = highlighter().highlight("unknown", 0);
        assert_eq!(styled.buffer.len(), 1);
        assert_eq!(styled.buffer[0].0.foreground, Some(Color::Red));
    }

    #[test]
    fn highlight_is_case_sensitive() {
        let styled = highlighter().highlight("LS", 0);
        assert_eq!(styled.buffer[0].0.foreground, Some(Color::Red));
    }

    #[test]
    fn highlight_path_arguments() {
        let styled = highlighter().highlight("cd /photos/2020", 0);
        assert_eq!(styled.buffer.len(), 2);
        assert_eq!(styled.buffer[0].1, "cd");
        assert_eq!(styled.buffer[1].1, " /photos/2020");
        assert_eq!(styled.buffer[1].0.foreground, Some(Color::Yellow));
    }

    #[test]
    fn highlight_alias_with_paths() {
        let styled = highlighter().highlight("cls x", 0);
        assert_eq!(styled.buffer[0].0.foreground, Some(Color::Cyan));
        assert_eq!(styled.buffer[1].0.foreground, Some(Color::Yellow));
    }

    #[test]
    fn highlight_plain_arguments() {
        let styled = highlighter().highlight("help login", 0);
        assert_eq!(styled.buffer.len(), 2);
        assert_eq!(styled.buffer[1].1, " login");
        assert_eq!(styled.buffer[1].0.foreground, None);
    }

    #[test]
    fn highlight_keeps_leading_whitespace() {
        let styled = highlighter().highlight("  ls", 0);
        assert_eq!(styled.buffer.len(), 2);
        assert_eq!(styled.buffer[0].1, "  ");
        assert_eq!(styled.buffer[1].1, "ls");
        assert_eq!(styled.buffer[1].0.foreground, Some(Color::Cyan));
    }
}
