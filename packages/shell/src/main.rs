use std::env;
use std::process;

use clap::Parser;
use tracing::debug;

use cloudsh::config::{is_truthy, EditMode, ShellConfig, VERBOSE_VAR};

/// cloudsh - Interactive shell for remote storage
#[derive(Parser, Debug)]
#[command(name = "cloudsh")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Force vi editing mode
    #[arg(long, conflicts_with = "emacs")]
    vi: bool,

    /// Force emacs editing mode
    #[arg(long)]
    emacs: bool,

    /// Enable debug logging
    #[arg(long)]
    verbose: bool,

    /// Run a single command instead of the interactive shell
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    command: Vec<String>,
}

fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "warn" };
    let env_filter = env::var("RUST_LOG").unwrap_or_else(|_| level.to_string());

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new(env_filter))
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .init();
}

fn main() {
    let args = Args::parse();

    let verbose = args.verbose || env::var(VERBOSE_VAR).is_ok_and(|v| is_truthy(&v));
    init_logging(verbose);

    let mut config = ShellConfig::from_env().with_verbose(verbose);
    if args.vi {
        config = config.with_edit_mode(EditMode::Vi);
    } else if args.emacs {
        config = config.with_edit_mode(EditMode::Emacs);
    }
    debug!("configuration: {:?}", config);

    if !args.command.is_empty() {
        match cloudsh::run_command(&config, &args.command) {
            Ok(code) => process::exit(code),
            Err(e) => {
                eprintln!("Error: {}", e);
                process::exit(1);
            }
        }
    }

    match cloudsh::run(&config) {
        Ok(reason) => process::exit(reason.code()),
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    }
}
