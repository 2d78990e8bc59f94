//! i18nctl - command-line interface for the i18n token engine
//!
//! This is the main entry point for the i18nctl application, providing
//! commands for translating tokens, inspecting and checking catalogs and
//! exporting them in binary form through the native engine.

mod cli;
mod config;
mod error;
mod handlers;
mod logging;
mod output;
#[cfg(test)]
mod test_support;

use clap::ValueEnum;
use cli::{CatalogArgs, Cli, Commands, OutputFormat};
use colored::control;
use config::Config;
use error::{Error, Result};
use logging::{timing::Timer, LoggingConfig};
use output::OutputWriter;
use std::process;
use tracing::instrument;

fn main() {
    // Parse command-line arguments
    let cli = Cli::parse_args();

    // The config file can carry output and logging settings, so it is read
    // first and its error reported once logging is up
    let loaded = Config::load_with_file(cli.config.as_deref());

    let use_color = cli.use_color() && loaded.as_ref().map_or(true, |c| c.output.color);
    control::set_override(use_color);

    if let Err(e) = init_logging(&cli, loaded.as_ref().ok()) {
        eprintln!("Failed to initialize logging: {}", e);
    }

    let result = loaded.and_then(|config| run(cli, config, use_color));

    match result {
        Ok(()) => {
            process::exit(0);
        }
        Err(e) => {
            tracing::debug!(error = ?e, "Command failed");
            eprintln!("{}", error::format_error(&e, use_color));

            if e.should_show_help() {
                eprintln!("\nFor more information, try '--help'");
            }

            process::exit(e.exit_code());
        }
    }
}

/// Main application logic
#[instrument(skip_all, fields(command = ?cli.command))]
fn run(cli: Cli, config: Config, use_color: bool) -> Result<()> {
    let _timer = Timer::new("cli_execution");

    let format = resolve_output_format(cli.output, &config)?;
    let mut output = OutputWriter::new(format, use_color, cli.quiet);
    let engine_config = config.engine_config(cli.library.as_deref());
    let open = |catalog: &CatalogArgs| handlers::utils::open_with_catalog(&engine_config, catalog);

    tracing::info!(
        command = ?cli.command,
        verbosity = cli.verbosity_level(),
        output = ?format,
        "Executing command"
    );

    match cli.command {
        Commands::Translate(args) => {
            let engine = open(&args.catalog)?;
            handlers::handle_translate(args, &engine, &mut output)
        }
        Commands::Plural(args) => {
            let engine = open(&args.catalog)?;
            handlers::handle_plural(args, &engine, &mut output)
        }
        Commands::Meta(args) => {
            let engine = open(&args.catalog)?;
            handlers::handle_meta(args, &engine, &mut output)
        }
        Commands::Export(args) => {
            let engine = open(&args.catalog)?;
            handlers::handle_export(args, &engine, &mut output)
        }
        Commands::Dump(args) => {
            let engine = open(&args.catalog)?;
            handlers::handle_dump(args, &engine, &mut output)
        }
        Commands::Find(args) => {
            let engine = open(&args.catalog)?;
            handlers::handle_find(args, &engine, &mut output)
        }
        Commands::Check(args) => {
            let engine = open(&args.catalog)?;
            handlers::handle_check(args, &engine, &mut output)
        }
        Commands::Info => {
            let engine = handlers::utils::open_engine(&engine_config)?;
            handlers::handle_info(&engine, &mut output)
        }
        Commands::Config(args) => {
            let effective = Config {
                engine: engine_config.clone(),
                ..config
            };
            handlers::handle_config(args, &effective, &mut output)
        }
        Commands::Completions(args) => {
            handlers::handle_completions(args, &mut std::io::stdout())
        }
    }
}

/// `--output` wins; otherwise the config file's `output.format`
fn resolve_output_format(flag: Option<OutputFormat>, config: &Config) -> Result<OutputFormat> {
    if let Some(format) = flag {
        return Ok(format);
    }
    OutputFormat::from_str(&config.output.format, true).map_err(|_| {
        Error::config(format!(
            "unknown output format '{}' (expected human, json, json-pretty or yaml)",
            config.output.format
        ))
    })
}

/// Initialize the logging system
fn init_logging(cli: &Cli, config: Option<&Config>) -> Result<()> {
    let verbosity = cli.verbosity_level();
    let mut logging_config = LoggingConfig::from_verbosity(verbosity);

    if let Some(config) = config {
        logging_config.merge_settings(&config.logging, verbosity);
    }

    // Apply environment overrides
    logging_config.merge_with_env();

    // If quiet mode, only log errors
    if cli.quiet {
        logging_config.level = "error".to_string();
        logging_config.console = false;
    }

    logging::init_logging(logging_config)
}
