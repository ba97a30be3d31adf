//! hal-assets - asset pipeline and runtime shims for the HAL management console.

mod cli;
mod config;
mod core;
mod logger;
mod mode;
mod pipeline;
mod resolve;
mod sync;
mod theme;
mod utils;

use anyhow::Result;
use clap::{ColorChoice, Parser};
use cli::{Cli, Commands};
use config::{HalConfig, init_config};

fn main() -> Result<()> {
    // Setup global Ctrl+C handler (before any blocking operations)
    core::setup_shutdown_handler()?;

    let cli = Cli::parse();

    // Set global color override based on CLI option
    match cli.color {
        ColorChoice::Always => owo_colors::set_override(true),
        ColorChoice::Never => owo_colors::set_override(false),
        ColorChoice::Auto => {} // owo-colors auto-detects TTY
    }
    logger::set_verbose(cli.verbose);

    // Commands that never touch the project layout skip config loading.
    match &cli.command {
        Commands::Highlight { file, tokens } => {
            return cli::highlight::highlight(file, *tokens, cli.color);
        }
        Commands::EditorCss => return cli::highlight::print_editor_css(),
        _ => {}
    }

    let config = init_config(HalConfig::load(&cli)?);

    match &cli.command {
        Commands::Run { tasks } => cli::run::run_tasks(&config, tasks),
        Commands::Watch => cli::watch::watch(&config),
        Commands::Serve { .. } => cli::serve::serve(&config),
        Commands::Resolve { specifier, from } => {
            cli::resolve::resolve_specifier(&config, specifier, from)
        }
        Commands::Sync {
            database,
            db,
            input,
        } => cli::sync::sync_documents(&config, database, db.as_deref(), input),
        Commands::Highlight { .. } | Commands::EditorCss => Ok(()),
    }
}
