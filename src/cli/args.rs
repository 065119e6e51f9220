//! CLI argument definitions.

use crate::cli::validators::parse_key_value;
use clap::{Parser, Subcommand};
use serde_yaml::Value;
use std::path::PathBuf;

/// Manage VAME project configuration and evaluation runs.
#[derive(Debug, Parser)]
#[command(name = "vame")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to run.
    #[command(subcommand)]
    pub command: Command,

    /// Suppress informational output.
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Increase verbosity (-v: debug, -vv: trace).
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Print the blank configuration template.
    Template,
    /// Create a new dated project directory with a config file.
    Init {
        /// Project name.
        name: String,
        /// Directory in which the project is created.
        #[arg(short, long, default_value = ".")]
        working_directory: PathBuf,
    },
    /// Display a project configuration.
    Show {
        /// Path to the project config file.
        #[arg(env = "VAME_CONFIG")]
        config: PathBuf,
        /// Print the set keys as JSON instead of the YAML layout.
        #[arg(long)]
        json: bool,
    },
    /// Set configuration values (`key=value`, empty value unsets).
    Set {
        /// Path to the project config file.
        #[arg(env = "VAME_CONFIG")]
        config: PathBuf,
        /// Values to set.
        #[arg(required = true, value_parser = parse_key_value)]
        values: Vec<(String, Value)>,
    },
    /// Rewrite a legacy config file in canonical form.
    Migrate {
        /// Path to the project config file.
        #[arg(env = "VAME_CONFIG")]
        config: PathBuf,
    },
    /// Resolve an evaluation run and print its job plan as JSON.
    Evaluate {
        /// Path to the project config file.
        #[arg(env = "VAME_CONFIG")]
        config: PathBuf,
        /// Trained model name.
        #[arg(short, long)]
        model: String,
        /// Suffix for the reconstruction plot name.
        #[arg(long)]
        suffix: Option<String>,
    },
}
