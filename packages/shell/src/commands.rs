//! Built-in commands.
//!
//! Commands:
//! - `cd [path]` - Change the current remote directory
//! - `ls [path]` - List a remote directory
//! - `pwd` - Print the current remote directory
//! - `login [--username <name>]` - Set the active account
//! - `clear` - Clear the screen (alias: cls)
//! - `help [command]` - Show help
//! - `quit` - Leave the shell (alias: exit)
//!
//! `cp`, `download`, `mkdir`, `mv`, `rm`, `share` and `upload` are registered
//! so they complete and show up in help, but they need a storage backend and
//! report an error until one is connected.

use nu_ansi_term::{Color, Style};

use crate::args::ParsedArgs;
use crate::command_table::{
    CommandContext, CommandDescriptor, CommandResult, CommandTable, FlagSpec,
};

/// Name shown in prompts and help.
pub const APP_NAME: &str = "cloudsh";

/// The command table the shell ships with.
pub fn default_table() -> CommandTable {
    CommandTable::new()
        .with(
            CommandDescriptor::new("login", "Log in to a storage account", cmd_login)
                .synopsis("[--username <name>]")
                .accepts_paths()
                .flag(FlagSpec::value("username", "Account user name"))
                .flag(FlagSpec::value("password", "Account password")),
        )
        .with(
            CommandDescriptor::new("cd", "Change the current remote directory", cmd_cd)
                .synopsis("[path]")
                .accepts_paths(),
        )
        .with(
            CommandDescriptor::new("ls", "List a remote directory", cmd_ls)
                .synopsis("[path]")
                .accepts_paths(),
        )
        .with(CommandDescriptor::new(
            "pwd",
            "Print the current remote directory",
            cmd_pwd,
        ))
        .with(
            CommandDescriptor::new("mkdir", "Create a remote directory", cmd_backend)
                .synopsis("<path>...")
                .accepts_paths(),
        )
        .with(
            CommandDescriptor::new("cp", "Copy remote files", cmd_backend)
                .synopsis("<source>... <target>")
                .accepts_paths(),
        )
        .with(
            CommandDescriptor::new("mv", "Move or rename remote files", cmd_backend)
                .synopsis("<source>... <target>")
                .accepts_paths(),
        )
        .with(
            CommandDescriptor::new("rm", "Delete remote files or directories", cmd_backend)
                .synopsis("<path>...")
                .accepts_paths(),
        )
        .with(
            CommandDescriptor::new("share", "Create a share link", cmd_backend)
                .synopsis("<path>...")
                .accepts_paths(),
        )
        .with(
            CommandDescriptor::new("upload", "Upload local files", cmd_backend)
                .synopsis("<local>... <target dir>")
                .accepts_paths(),
        )
        .with(
            CommandDescriptor::new("download", "Download remote files", cmd_backend)
                .synopsis("<path>...")
                .accepts_paths()
                .flag(FlagSpec::value("saveto", "Local directory to save into").with_default("."))
                .flag(FlagSpec::switch("overwrite", "Overwrite existing local files")),
        )
        .with(
            CommandDescriptor::new("clear", "Clear the screen", cmd_clear)
                .aliases(&["cls"])
                .accepts_paths(),
        )
        .with(
            CommandDescriptor::new("help", "Show help for all commands or one", cmd_help)
                .synopsis("[command]"),
        )
        .with(
            CommandDescriptor::new("quit", "Leave the shell", cmd_quit)
                .aliases(&["exit"])
                .accepts_paths()
                .hidden(),
        )
}

/// Format help text: the overview when `topic` is `None`, one command's
/// details otherwise. Returns `None` for an unknown command.
pub fn format_help(table: &CommandTable, topic: Option<&str>) -> Option<String> {
    match topic {
        None => Some(format_overview(table)),
        Some(name) => table.lookup(name).map(format_command),
    }
}

fn format_overview(table: &CommandTable) -> String {
    let cmd_style = Style::new().bold().fg(Color::Cyan);
    let arg_style = Style::new().fg(Color::Yellow);

    let mut help = String::new();
    help.push_str(&format!(
        "{}\n\n",
        Style::new().bold().paint(format!("{} commands", APP_NAME))
    ));

    for command in table.iter().filter(|c| !c.hidden) {
        let mut desc = command.usage.to_string();
        if !command.aliases.is_empty() {
            desc.push_str(&format!(" (alias: {})", command.aliases.join(", ")));
        }
        // Pad before styling so escape codes don't skew the columns
        help.push_str(&format!(
            "  {} {} {}\n",
            cmd_style.paint(format!("{:<10}", command.name)),
            arg_style.paint(format!("{:<24}", command.synopsis)),
            desc
        ));
    }

    help.push_str(&format!(
        "\n{}",
        Style::new()
            .italic()
            .paint("Run 'help <command>' for details. Press Tab to complete commands and remote paths.")
    ));

    help
}

fn format_command(command: &CommandDescriptor) -> String {
    let mut help = String::new();
    help.push_str(&format!(
        "{} {}\n  {}\n",
        Style::new().bold().fg(Color::Cyan).paint(command.name),
        Color::Yellow.paint(command.synopsis),
        command.usage
    ));

    if !command.aliases.is_empty() {
        help.push_str(&format!("\n{} {}\n", Style::new().bold().paint("Aliases:"), command.aliases.join(", ")));
    }

    if !command.flags.is_empty() {
        help.push_str(&format!("\n{}\n", Style::new().bold().paint("Flags:")));
        for flag in &command.flags {
            let spec = if flag.takes_value {
                format!("--{} <value>", flag.name)
            } else {
                format!("--{}", flag.name)
            };
            let default = flag
                .default
                .map(|d| format!(" [default: {}]", d))
                .unwrap_or_default();
            help.push_str(&format!(
                "  {} {}{}\n",
                Color::Yellow.paint(format!("{:<20}", spec)),
                flag.usage,
                default
            ));
        }
    }

    help.trim_end().to_string()
}

fn cmd_help(_ctx: &mut CommandContext<'_>, args: &ParsedArgs) -> CommandResult {
    CommandResult::Help(args.first().map(str::to_string))
}

fn cmd_clear(_ctx: &mut CommandContext<'_>, _args: &ParsedArgs) -> CommandResult {
    CommandResult::ClearScreen
}

fn cmd_quit(_ctx: &mut CommandContext<'_>, _args: &ParsedArgs) -> CommandResult {
    CommandResult::Exit(0)
}

fn cmd_pwd(ctx: &mut CommandContext<'_>, _args: &ParsedArgs) -> CommandResult {
    CommandResult::ok_display(ctx.session.workdir())
}

fn cmd_cd(ctx: &mut CommandContext<'_>, args: &ParsedArgs) -> CommandResult {
    let target = ctx.session.resolve(args.first().unwrap_or("/"));

    match ctx.lister.list(&target) {
        Ok(_) => {
            ctx.session.set_workdir(&target);
            CommandResult::ok_none()
        }
        Err(e) => CommandResult::error(format!("cd: {}", e)),
    }
}

fn cmd_ls(ctx: &mut CommandContext<'_>, args: &ParsedArgs) -> CommandResult {
    let target = ctx.session.resolve(args.first().unwrap_or("."));

    let entries = match ctx.lister.list(&target) {
        Ok(entries) => entries,
        Err(e) => return CommandResult::error(format!("ls: {}", e)),
    };

    if entries.is_empty() {
        return CommandResult::ok_display(format!("{}", Color::DarkGray.paint("(empty)")));
    }

    let lines: Vec<String> = entries
        .iter()
        .map(|entry| {
            if entry.is_dir {
                format!("{}/", Color::Blue.bold().paint(&entry.name))
            } else {
                entry.name.clone()
            }
        })
        .collect();

    CommandResult::ok_display(lines.join("\n"))
}

fn cmd_login(ctx: &mut CommandContext<'_>, args: &ParsedArgs) -> CommandResult {
    if !args.positional().is_empty() {
        return CommandResult::Help(Some("login".to_string()));
    }

    match args.value("username") {
        Some(name) if !name.is_empty() => {
            ctx.session.set_account(name);
            CommandResult::ok_display(format!(
                "{} {}",
                Color::Green.paint("Logged in as"),
                Color::Cyan.bold().paint(name)
            ))
        }
        _ => CommandResult::error("login: --username is required"),
    }
}

/// Storage operations that need a connected provider.
fn cmd_backend(ctx: &mut CommandContext<'_>, args: &ParsedArgs) -> CommandResult {
    let targets: Vec<String> = args
        .positional()
        .iter()
        .map(|p| ctx.session.resolve(p))
        .collect();

    if targets.is_empty() {
        CommandResult::error("no storage backend is connected")
    } else {
        CommandResult::error(format!(
            "no storage backend is connected (targets: {})",
            targets.join(", ")
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::remote::MemoryTree;
    use crate::session::Session;

    fn run(name: &str, args: ParsedArgs, session: &mut Session) -> CommandResult {
        let tree = MemoryTree::new()
            .with_dir("/photos/2020")
            .with_file("/photos/cat.jpg");
        let table = default_table();
        let command = table.lookup(name).unwrap();
        let mut ctx = CommandContext {
            session,
            lister: &tree,
        };
        (command.handler)(&mut ctx, &args)
    }

    fn positional(v: &[&str]) -> ParsedArgs {
        ParsedArgs::from_positional(v.iter().map(|s| s.to_string()).collect())
    }

    #[test]
    fn path_completion_allow_list() {
        let table = default_table();
        let mut accepting: Vec<_> = table
            .iter()
            .filter(|c| c.accepts_paths)
            .map(|c| c.name)
            .collect();
        accepting.sort();
        assert_eq!(
            accepting,
            vec![
                "cd", "clear", "cp", "download", "login", "ls", "mkdir", "mv", "quit", "rm",
                "share", "upload"
            ]
        );
        assert!(!table.lookup("pwd").unwrap().accepts_paths);
        assert!(!table.lookup("help").unwrap().accepts_paths);
    }

    #[test]
    fn quit_and_exit_exit_zero() {
        let mut session = Session::new();
        assert_eq!(run("quit", positional(&[]), &mut session), CommandResult::Exit(0));
        assert_eq!(run("exit", positional(&[]), &mut session), CommandResult::Exit(0));
    }

    #[test]
    fn cls_clears_screen() {
        let mut session = Session::new();
        assert_eq!(run("cls", positional(&[]), &mut session), CommandResult::ClearScreen);
    }

    #[test]
    fn cd_changes_workdir() {
        let mut session = Session::new();
        let result = run("cd", positional(&["photos/2020"]), &mut session);
        assert_eq!(result, CommandResult::ok_none());
        assert_eq!(session.workdir(), "/photos/2020");

        run("cd", positional(&[".."]), &mut session);
        assert_eq!(session.workdir(), "/photos");

        run("cd", positional(&[]), &mut session);
        assert_eq!(session.workdir(), "/");
    }

    #[test]
    fn cd_to_missing_directory_fails() {
        let mut session = Session::new().with_workdir("/photos");
        let result = run("cd", positional(&["music"]), &mut session);
        assert!(matches!(result, CommandResult::Error(ref m) if m.contains("/photos/music")));
        assert_eq!(session.workdir(), "/photos");
    }

    #[test]
    fn cd_to_file_fails() {
        let mut session = Session::new();
        let result = run("cd", positional(&["/photos/cat.jpg"]), &mut session);
        assert!(matches!(result, CommandResult::Error(ref m) if m.contains("not a directory")));
    }

    #[test]
    fn pwd_shows_workdir() {
        let mut session = Session::new().with_workdir("/photos");
        assert_eq!(
            run("pwd", positional(&[]), &mut session),
            CommandResult::ok_display("/photos")
        );
    }

    #[test]
    fn ls_lists_entries() {
        let mut session = Session::new().with_workdir("/photos");
        match run("ls", positional(&[]), &mut session) {
            CommandResult::Ok {
                display: Some(text),
            } => {
                assert!(text.contains("2020"));
                assert!(text.contains("cat.jpg"));
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn login_sets_account() {
        let mut session = Session::new();
        let args = ParsedArgs::default().with_value("username", "alice");
        let result = run("login", args, &mut session);
        assert!(matches!(result, CommandResult::Ok { .. }));
        assert_eq!(session.account(), Some("alice"));
    }

    #[test]
    fn login_without_username_fails() {
        let mut session = Session::new();
        let result = run("login", ParsedArgs::default(), &mut session);
        assert!(matches!(result, CommandResult::Error(_)));
        assert_eq!(session.account(), None);
    }

    #[test]
    fn login_with_positional_shows_help() {
        let mut session = Session::new();
        let result = run("login", positional(&["alice"]), &mut session);
        assert_eq!(result, CommandResult::Help(Some("login".to_string())));
    }

    #[test]
    fn storage_stubs_report_missing_backend() {
        let mut session = Session::new().with_workdir("/photos");
        let result = run("rm", positional(&["cat.jpg"]), &mut session);
        assert!(
            matches!(result, CommandResult::Error(ref m) if m.contains("/photos/cat.jpg"))
        );
    }

    #[test]
    fn help_overview_hides_quit() {
        let help = format_help(&default_table(), None).unwrap();
        assert!(help.contains("login"));
        assert!(help.contains("cls"));
        assert!(!help.contains("quit"));
    }

    #[test]
    fn help_for_one_command_lists_flags() {
        let help = format_help(&default_table(), Some("download")).unwrap();
        assert!(help.contains("--saveto"));
        assert!(help.contains("[default: .]"));
    }

    #[test]
    fn help_for_alias() {
        let help = format_help(&default_table(), Some("exit")).unwrap();
        assert!(help.contains("quit"));
    }

    #[test]
    fn help_for_unknown_command() {
        assert!(format_help(&default_table(), Some("frobnicate")).is_none());
    }
}
