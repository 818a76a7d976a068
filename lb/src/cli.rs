//! CLI command definitions and subcommands

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::debug;

use crate::config::GenAiConfig;

/// Madpakke-Magikeren - build a lunchbox, plan the week
#[derive(Parser)]
#[command(
    name = "lb",
    about = "Interactive lunchbox builder with a magical food coach",
    version
)]
pub struct Cli {
    /// Path to config file
    #[arg(short, long, global = true, help = "Path to config file")]
    pub config: Option<PathBuf>,

    /// Log level (TRACE, DEBUG, INFO, WARN, ERROR)
    #[arg(
        short = 'l',
        long = "log-level",
        global = true,
        help = "Log level (TRACE, DEBUG, INFO, WARN, ERROR)"
    )]
    pub log_level: Option<String>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Command>,
}

/// CLI subcommands
#[derive(Debug, Subcommand)]
pub enum Command {
    /// List the food catalog with prices
    Catalog,

    /// Build lunchboxes interactively (default)
    Build,

    /// Generate a random week and print it
    Plan {
        /// Seed for the random draw, for a reproducible week
        #[arg(short, long)]
        seed: Option<u64>,

        /// Also write the printable HTML page to this path
        #[arg(long, value_name = "PATH")]
        html: Option<PathBuf>,
    },
}

/// Path of the log file
pub fn get_log_path() -> PathBuf {
    debug!("get_log_path: called");
    let path = dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("lunchbox")
        .join("logs")
        .join("lunchbox.log");
    debug!(?path, "get_log_path: returning path");
    path
}

/// Generate the after_help text with the API key check and log location
pub fn generate_after_help() -> String {
    debug!("generate_after_help: called");
    let genai = GenAiConfig::default();
    let key_set = std::env::var(&genai.api_key_env).is_ok_and(|v| !v.is_empty());

    let mut help = String::new();
    help.push_str("API key:\n");
    let icon = if key_set { "\u{2705}" } else { "\u{274C}" };
    let status = if key_set { "set" } else { "not set" };
    help.push_str(&format!("  {} {:<16} {}\n", icon, genai.api_key_env, status));

    help.push('\n');
    help.push_str(&format!("Logs are written to: {}\n", get_log_path().display()));
    help
}
