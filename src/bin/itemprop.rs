//! Itemprop CLI Binary
//!
//! Command-line interface for creating item properties.

use clap::Parser;
use itemprop::cli::{Cli, RunContext};
use itemprop::config::ConfigLoader;
use itemprop::logging::{init_logging, LoggingConfig};
use std::process;
use tracing::{error, info};

fn main() {
    let cli = Cli::parse();

    // Build logging config from CLI args, env vars, and config file
    let logging_config = build_logging_config(&cli);

    if let Err(e) = init_logging(Some(&logging_config)) {
        eprintln!("Failed to initialize logging: {}", e);
        process::exit(1);
    }

    info!("Itemprop CLI starting");

    let context = match RunContext::new(cli.workspace.clone(), cli.config.clone(), cli.state.clone())
        .and_then(|ctx| ctx.with_location(cli.location.clone()))
    {
        Ok(ctx) => ctx,
        Err(e) => {
            error!("Error initializing run context: {}", e);
            eprintln!("{}", itemprop::cli::map_error(&e));
            process::exit(1);
        }
    };

    match context.execute(&cli.command) {
        Ok(output) => {
            if !output.stdout.is_empty() {
                println!("{}", output.stdout);
            }
            for line in &output.errors {
                eprintln!("{}", line);
            }
            info!(exit_code = output.exit_code, "Command completed");
            process::exit(output.exit_code);
        }
        Err(e) => {
            error!("Command failed: {}", e);
            if let Some(stdout) = itemprop::cli::aborted_output(&e, &cli.command) {
                println!("{}", stdout);
            }
            eprintln!("{}", itemprop::cli::map_error(&e));
            process::exit(1);
        }
    }
}

/// Build logging configuration from CLI args and config file.
/// Logging stays off unless --verbose or an explicit level is given;
/// CLI flags override the config file.
fn build_logging_config(cli: &Cli) -> LoggingConfig {
    let mut config = if let Some(ref config_path) = cli.config {
        ConfigLoader::load_from_file(config_path)
            .ok()
            .map(|c| c.logging)
            .unwrap_or_default()
    } else {
        ConfigLoader::load(&cli.workspace)
            .ok()
            .map(|c| c.logging)
            .unwrap_or_default()
    };

    if cli.quiet || (!cli.verbose && cli.log_level.is_none()) {
        config.enabled = false;
        return config;
    }
    if cli.verbose {
        config.level = "debug".to_string();
    }
    if let Some(ref level) = cli.log_level {
        config.level = level.clone();
    }
    if let Some(ref format) = cli.log_format {
        config.format = format.clone();
    }
    if let Some(ref output) = cli.log_output {
        config.output = output.clone();
    }
    if let Some(ref file) = cli.log_file {
        config.file = Some(file.clone());
    }

    config
}
