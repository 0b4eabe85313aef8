//! CLI entry point for the Ruby stub indexer.
//!
//! Loads settings and logging, then dispatches to the command modules.

use clap::Parser;
use rubystubs::cli::commands::{self, report_error};
use rubystubs::cli::{Cli, Commands};
use rubystubs::io::ExitCode;
use rubystubs::{Settings, StubCorpus};

fn exit(code: ExitCode) -> ! {
    std::process::exit(code as i32)
}

fn main() {
    let cli = Cli::parse();

    if !matches!(cli.command, Commands::Init { .. }) && cli.config.is_none() {
        if let Err(warning) = Settings::check_init() {
            eprintln!("Warning: {warning}");
            eprintln!("Using default configuration for now.");
        }
    }

    let config = if let Some(config_path) = &cli.config {
        Settings::load_from(config_path).unwrap_or_else(|e| {
            eprintln!(
                "Configuration error loading from {}: {}",
                config_path.display(),
                e
            );
            exit(ExitCode::ConfigError);
        })
    } else {
        Settings::load().unwrap_or_else(|e| {
            eprintln!("Configuration error: {e}");
            Settings::default()
        })
    };

    // Logs go to stderr so stdout stays clean for JSON output.
    rubystubs::logging::init_with_config(&config.logging);

    // Commands that never touch the corpus.
    match &cli.command {
        Commands::Init { force } => exit(commands::config::run_init(*force)),
        Commands::Config => exit(commands::config::run_config(&config, cli.config.as_deref())),
        Commands::Audit { file } => exit(commands::audit::run(file)),
        _ => {}
    }

    let root = config.resolve_stubs_root(cli.config.as_deref());
    tracing::debug!(target: "cli", "loading stubs from {}", root.display());
    let corpus = StubCorpus::load_from(&config, &root).unwrap_or_else(|e| exit(report_error(&e)));
    let selected = corpus.snapshot(cli.snapshot.as_deref());

    match &cli.command {
        Commands::Versions => {
            exit(commands::index::run_versions(&corpus, selected.as_ref().ok().copied()))
        }
        Commands::Index => exit(commands::index::run_index(&corpus)),
        _ => {}
    }

    let snapshot = selected.unwrap_or_else(|e| exit(report_error(&e)));
    let code = match cli.command {
        Commands::Lookup { query, json } => commands::query::run_lookup(snapshot, &query, json),
        Commands::Complete {
            prefix,
            limit,
            json,
        } => {
            let limit = limit.unwrap_or(config.completion.max_results);
            commands::query::run_complete(snapshot, &prefix, limit, json)
        }
        Commands::Lint { json } => commands::lint::run(snapshot, &config.lint, json),
        Commands::Dump { output } => commands::dump::run(snapshot, output.as_deref()),
        Commands::Init { .. }
        | Commands::Config
        | Commands::Audit { .. }
        | Commands::Versions
        | Commands::Index => ExitCode::Success,
    };
    exit(code);
}
