//! CLI argument parsing and command dispatch.

pub mod args;
pub mod commands;

use anyhow::Result;
use args::{Cli, Commands};
use clap::Parser;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use crate::config::Config;

/// Run the CLI application.
pub async fn run() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if cli.no_color {
        colored::control::set_override(false);
    }

    let (config, config_path) = Config::load(cli.config.as_deref())?;
    debug!(config = ?config_path, "Configuration loaded");

    // Flag beats config file
    let output_format = cli.output.or(config.output_format).unwrap_or_default();

    let ctx = commands::Context {
        config,
        config_path,
        output_format,
        verbose: cli.verbose,
    };

    match cli.command {
        Commands::Build => commands::build::execute(&ctx),
        Commands::Download(args) => commands::download::execute(&ctx, args).await,
        Commands::Analyze(args) => commands::analyze::execute(&ctx, &args),
        Commands::Lookup(args) => commands::lookup::execute(&ctx, &args),
        Commands::Show(args) => commands::show::execute(&ctx, &args),
        Commands::Config(args) => commands::config::execute(&ctx, &args),
    }
}

/// Log to stderr; `RUST_LOG` overrides the `-v` default.
fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
