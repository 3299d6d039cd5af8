//! `tldkit config` - inspect configuration.

use anyhow::Result;
use colored::Colorize;

use super::Context;
use crate::cli::args::{ConfigArgs, ConfigCommands};
use crate::config::Config;
use crate::output::OutputFormat;

pub fn execute(ctx: &Context, args: &ConfigArgs) -> Result<()> {
    match args.command {
        ConfigCommands::Show => show_config(ctx),
        ConfigCommands::Path => show_path(ctx),
    }
}

fn show_config(ctx: &Context) -> Result<()> {
    let config = &ctx.config;

    match ctx.output_format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(config)?);
        }
        OutputFormat::Yaml => {
            println!("{}", serde_yaml::to_string(config)?);
        }
        OutputFormat::Pretty => {
            println!("{}", "Current Configuration:".bold());
            println!();
            print!("{}", toml::to_string_pretty(config)?);

            let paths = config.build_paths();
            println!();
            println!("{}", "Resolved paths:".bold());
            println!("  {} {}", "root_zone:".bold(), paths.root_zone.display());
            println!("  {} {}", "pages_dir:".bold(), paths.pages_dir.display());
            println!("  {} {}", "asn_table:".bold(), paths.asn_table.display());
            println!("  {} {}", "output:".bold(), paths.output.display());
            println!("  {} {}", "metadata:".bold(), config.metadata_path().display());
        }
    }

    Ok(())
}

fn show_path(ctx: &Context) -> Result<()> {
    match &ctx.config_path {
        Some(path) => println!("{}", path.display()),
        None => {
            let user = Config::user_path()?;
            println!(
                "{} (no config file found; user config would be {})",
                "defaults".dimmed(),
                user.display()
            );
        }
    }
    Ok(())
}
