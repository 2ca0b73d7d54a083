//! Command-line interface entry point for `cumtracker`

mod args;
mod commands;

use args::{Cli, Command};
use clap::Parser;
use cum_tracker::config::Config;
use cum_tracker::logger::{enable_debug, enable_verbose, init_file_logging, set_level, Level};
use cum_tracker::{error, info};

fn main() {
    let args = Cli::parse();

    // Load configuration once at startup and apply CLI overrides to it
    let mut config = Config::load();
    let defaults = Config::from_defaults();
    config.apply_overrides(&args.to_config_overrides());

    // CLI flag overrides config; otherwise use config logging.level; fallback warn
    let effective_level = args
        .log_level
        .map(std::convert::Into::into)
        .or_else(|| config.logging.level.parse::<Level>().ok())
        .unwrap_or(Level::Warn);

    let mut level = effective_level;
    if args.debug_flag || level == Level::Debug {
        level = Level::Debug;
        enable_debug();
    }

    let verbose = args.verbose || config.logging.verbose;
    if verbose {
        enable_verbose();
    }
    set_level(level);

    // CLI flag wins, otherwise use config logging.file if set
    let config_log_path: Option<std::path::PathBuf> = if config.logging.file.is_empty() {
        None
    } else {
        Some(std::path::PathBuf::from(&config.logging.file))
    };

    if let Some(log_path) = args.log_file.as_ref().or(config_log_path.as_ref()) {
        let display_path = log_path.to_string_lossy();
        if init_file_logging(log_path) {
            info!("File logging initialized at: {display_path}");
        } else {
            eprintln!("✗ Failed to initialize file logging at: {display_path}");
        }
    }

    if let Err(message) = dispatch(args.command, &mut config, &defaults) {
        eprintln!("{message}");
        std::process::exit(1);
    }
}

/// Run one subcommand. Record commands open the store, perform a single
/// operation, and flush before returning.
fn dispatch(command: Command, config: &mut Config, defaults: &Config) -> Result<(), String> {
    if let Command::Config { subcommand } = command {
        return commands::config::run(subcommand, config, defaults);
    }

    let mut store = commands::open_store(config);
    let outcome = match command {
        Command::Config { .. } => Ok(()),
        Command::Term { subcommand } => commands::term::run(subcommand, &mut store),
        Command::Course { subcommand } => commands::course::run(subcommand, &mut store),
        Command::Activity { subcommand } => commands::activity::run(subcommand, &mut store),
        Command::Stats { json } => commands::stats::run(&store, json),
        Command::Scholarship { cum } => commands::stats::scholarship(&store, config, cum),
        Command::Report {
            format,
            output,
            stdout,
        } => commands::report::run(&store, config, format.into(), output.as_deref(), stdout),
        Command::Export { file } => commands::data::export(&store, config, file.as_deref()),
        Command::Import { file, yes } => commands::data::import(&mut store, &file, yes),
        Command::Wipe { yes } => commands::data::wipe(&mut store, yes),
    };
    store.flush();

    if let Err(message) = &outcome {
        error!("Command failed: {message}");
    }
    outcome
}
