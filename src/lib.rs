//! VAME - project configuration and evaluation orchestration.
//!
//! This crate keeps VAME project config files in their canonical, documented
//! layout, recovers configs written by older tooling, and prepares model
//! evaluation runs from a config.

#![warn(missing_docs)]

pub mod cli;
pub mod config;
pub mod constants;
pub mod error;
pub mod evaluate;
pub mod project;

use clap::Parser;
use cli::{Cli, Command};
use config::{
    ReadOptions, ReadOutcome, apply_overrides, build_template, read_config, read_config_with,
    render_config, write_config,
};
use constants::APP_NAME;
use evaluate::{EvaluationPlan, evaluate_model};
use std::path::Path;
use tracing::warn;

pub use error::{Error, Result};

/// Main entry point for the vame CLI.
pub fn run() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    init_logging(cli.verbose, cli.quiet);

    handle_command(cli.command)
}

fn init_logging(verbose: u8, quiet: bool) {
    use tracing_subscriber::{EnvFilter, fmt};

    let filter_str = if quiet {
        "warn"
    } else {
        match verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter_str));

    // Logs go to stderr so command output stays pipeable
    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn handle_command(command: Command) -> Result<()> {
    match command {
        Command::Template => {
            print!(
                "{}",
                render_config(build_template(), &config::ConfigDocument::new())?
            );
            Ok(())
        }
        Command::Init {
            name,
            working_directory,
        } => {
            let today = chrono::Local::now().date_naive();
            let config_path = project::init_project(&name, &working_directory, today)?;
            println!("Created project config: {}", config_path.display());
            println!("\nNext steps:");
            println!("  {APP_NAME} set {} key=value ...", config_path.display());
            Ok(())
        }
        Command::Show { config, json } => handle_show(&config, json),
        Command::Set { config, values } => {
            let mut doc = read_config(&config)?;
            apply_overrides(&mut doc, values);
            write_config(&config, &doc)?;
            println!("Updated {}", config.display());
            Ok(())
        }
        Command::Migrate { config } => {
            let report = read_config_with(&config, ReadOptions::default())?;
            match report.outcome {
                ReadOutcome::Canonical => {
                    println!("{} is already canonical", config.display());
                }
                ReadOutcome::Migrated { reason } => {
                    println!("Rewrote {} ({reason})", config.display());
                }
                ReadOutcome::LegacyLeftInPlace { reason } => {
                    println!("Left {} unchanged ({reason})", config.display());
                }
            }
            Ok(())
        }
        Command::Evaluate {
            config,
            model,
            suffix,
        } => {
            let mut plan = EvaluationPlan::default();
            evaluate_model(&config, &model, suffix.as_deref(), &mut plan)?;
            println!("{}", to_json(&plan)?);
            Ok(())
        }
    }
}

fn handle_show(path: &Path, json: bool) -> Result<()> {
    let doc = read_config(path)?;

    let unknown = build_template().unknown_keys(&doc);
    if !unknown.is_empty() {
        warn!(keys = ?unknown, "config has keys outside the template");
    }

    if json {
        println!("{}", to_json(&doc)?);
    } else {
        print!("{}", render_config(build_template(), &doc)?);
    }
    Ok(())
}

fn to_json<T: serde::Serialize>(value: &T) -> Result<String> {
    serde_json::to_string_pretty(value).map_err(|e| Error::JsonSerialize { source: e })
}
