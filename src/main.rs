use anyhow::{Context, Result};
use clap::{Arg, ArgAction, Command};
use dotenv::dotenv;
use envtoken::{run, ProcessEnv, Settings};
use std::path::{Path, PathBuf};
use std::process;
use tracing::info;
use tracing_subscriber::EnvFilter;

fn main() {
    // Load environment variables from .env file
    dotenv().ok();

    let matches = build_cli().get_matches();
    init_logging(
        matches.get_flag("verbose"),
        matches.get_one::<String>("log-format").map(String::as_str).unwrap_or("pretty"),
    );

    let root = matches
        .get_one::<PathBuf>("directory")
        .cloned()
        .unwrap_or_else(|| PathBuf::from("."));

    if let Err(e) = execute(&root) {
        eprintln!("Error: {:#}", e);
        process::exit(1);
    }
}

fn build_cli() -> Command {
    Command::new("envtoken")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Replace line placeholders in files with environment variable values")
        .long_about(
            "Walks a directory, selects files with the INPUT_FILES glob and replaces every line \
             of the form INPUT_PREFIX NAME INPUT_SUFFIX with the value of the environment variable NAME",
        )
        .arg(
            Arg::new("directory")
                .short('C')
                .long("directory")
                .help("Directory to walk (globs match paths relative to it)")
                .value_parser(clap::value_parser!(PathBuf))
                .default_value("."),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Verbose output")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("log-format")
                .long("log-format")
                .help("Log output format")
                .value_parser(["pretty", "compact", "json"])
                .default_value("pretty"),
        )
}

fn init_logging(verbose: bool, format: &str) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stdout);

    // Ignore the error when a global subscriber is already installed
    let _ = match format {
        "json" => builder.json().try_init(),
        "compact" => builder.compact().try_init(),
        _ => builder.pretty().try_init(),
    };
}

fn execute(root: &Path) -> Result<()> {
    let settings = Settings::from_env().context("Failed to load configuration")?;
    let summary = run(&settings, root, &ProcessEnv)?;

    info!(
        files_scanned = summary.files_scanned,
        files_rewritten = summary.files_rewritten,
        tokens_replaced = summary.tokens_replaced,
        "Substitution complete"
    );
    Ok(())
}
