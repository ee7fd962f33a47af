//! gqlpoint CLI - load GraphQL documents from any mix of pointers
//!
//! This is the main entry point for the gqlpoint CLI application, providing
//! commands for loading, filtering and printing GraphQL definitions.

mod cli;
mod config;
mod error;
mod handlers;
mod logging;
mod output;

use cli::{Cli, Commands};
use colored::control;
use config::Config;
use error::Result;
use logging::{timing::Timer, LoggingConfig};
use output::OutputWriter;
use std::process;
use tracing::instrument;

#[tokio::main]
async fn main() {
    // Parse command-line arguments
    let cli = Cli::parse_args();

    let result = match load_config(&cli) {
        Ok(config) => {
            control::set_override(cli.use_color() && config.output.color);

            if let Err(e) = init_logging(&cli, &config) {
                eprintln!("Failed to initialize logging: {}", e);
            }

            run(cli, config).await
        }
        Err(e) => Err(e),
    };

    match result {
        Ok(()) => process::exit(0),
        Err(e) => {
            eprintln!(
                "{}",
                error::format_error(&e, control::SHOULD_COLORIZE.should_colorize())
            );

            if e.should_show_help() {
                eprintln!("\nFor more information, try '--help'");
            }

            process::exit(e.exit_code());
        }
    }
}

/// Main application logic
#[instrument(skip_all, fields(command = ?cli.command))]
async fn run(cli: Cli, config: Config) -> Result<()> {
    let _timer = Timer::new("cli_execution");

    let mut output = OutputWriter::new(cli.output, cli.use_color() && config.output.color, cli.quiet);

    tracing::info!(
        command = ?cli.command,
        verbosity = cli.verbosity_level(),
        run_id = logging::current_run_id().unwrap_or("unknown"),
        "Executing command"
    );

    match cli.command {
        Commands::Load(args) => handlers::handle_load(args, &config, &mut output).await,
        Commands::Kinds => handlers::handle_kinds(&mut output),
    }
}

/// Explicit `--config` file, or the first default location that exists
fn load_config(cli: &Cli) -> Result<Config> {
    let cwd = std::env::current_dir()?;
    Config::load_with_file(cli.config.as_deref(), &cwd)
}

/// Initialize the logging system
fn init_logging(cli: &Cli, config: &Config) -> Result<()> {
    let mut logging_config = LoggingConfig::from_verbosity(cli.verbosity_level());
    logging_config.apply_settings(&config.logging, cli.verbosity_level());
    logging_config.merge_with_env();

    // If quiet mode, only log errors
    if cli.quiet {
        logging_config.level = "error".to_string();
        logging_config.console = false;
    }

    logging::init_logging(logging_config)
}
