//! Madpakke-Magikeren
//!
//! CLI entry point: catalog listing, the interactive builder and week plans.

use std::fs;
use std::path::Path;
use std::sync::Arc;

use clap::{CommandFactory, FromArgMatches};
use eyre::{Context, Result};
use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::{debug, info};

use lunchbox::cli::{Cli, Command, generate_after_help, get_log_path};
use lunchbox::config::Config;
use lunchbox::domain::{Category, catalog};
use lunchbox::export;
use lunchbox::genai::create_client;
use lunchbox::repl::ReplSession;
use lunchbox::{Advisor, Illustrator, LunchboxSession, PromptLoader};

fn setup_logging(cli_log_level: Option<&str>, config_log_level: Option<&str>) -> Result<()> {
    // Logging isn't initialized yet, so nothing here can be traced
    let log_path = get_log_path();
    if let Some(log_dir) = log_path.parent() {
        fs::create_dir_all(log_dir).context("Failed to create log directory")?;
    }

    // Priority: CLI --log-level > config file > INFO
    let level = match cli_log_level.or(config_log_level) {
        Some(s) => match s.to_uppercase().as_str() {
            "TRACE" => tracing::Level::TRACE,
            "DEBUG" => tracing::Level::DEBUG,
            "INFO" => tracing::Level::INFO,
            "WARN" | "WARNING" => tracing::Level::WARN,
            "ERROR" => tracing::Level::ERROR,
            _ => {
                eprintln!("Warning: Unknown log-level '{}', defaulting to INFO", s);
                tracing::Level::INFO
            }
        },
        None => tracing::Level::INFO,
    };

    let log_file = fs::File::create(&log_path).context("Failed to create log file")?;

    tracing_subscriber::fmt()
        .with_writer(log_file)
        .with_ansi(false)
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()))
        .init();

    info!("Logging initialized (level: {:?})", level);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cmd = Cli::command().after_help(generate_after_help());
    let cli = Cli::from_arg_matches(&cmd.get_matches())?;

    let config_log_level = Config::load_log_level(cli.config.as_ref());
    setup_logging(cli.log_level.as_deref(), config_log_level.as_deref()).context("Failed to setup logging")?;

    let config = Config::load(cli.config.as_ref()).context("Failed to load configuration")?;
    info!(provider = %config.genai.provider, "lb loaded config");

    debug!(command = ?cli.command, "main: dispatching command");
    match cli.command {
        Some(Command::Catalog) => {
            debug!("main: matched Catalog command");
            cmd_catalog()
        }
        Some(Command::Plan { seed, html }) => {
            debug!(?seed, ?html, "main: matched Plan command");
            cmd_plan(&config, seed, html.as_deref()).await
        }
        Some(Command::Build) | None => {
            debug!("main: launching interactive builder");
            cmd_build(&config).await
        }
    }
}

/// Build a session wired to the configured generative AI provider
fn build_session(config: &Config) -> Result<LunchboxSession> {
    let client = create_client(&config.genai).context("Failed to create generative AI client")?;
    let prompts = Arc::new(PromptLoader::new(config.prompts.expanded_dir()));

    let advisor = Advisor::new(client.clone(), prompts.clone(), config.advice.clone());
    let illustrator = Illustrator::new(client, prompts, config.image.clone());
    Ok(LunchboxSession::new(advisor, illustrator))
}

/// Print the catalog grouped by category
fn cmd_catalog() -> Result<()> {
    debug!("cmd_catalog: called");
    for category in Category::ALL {
        println!("{}", category.step_title());
        for item in catalog::items_in(category) {
            println!("  {} {:<18} {:>6} kr  ({})", item.emoji, item.name, item.price.to_string(), item.id);
        }
        println!();
    }
    Ok(())
}

/// Launch the interactive builder
async fn cmd_build(config: &Config) -> Result<()> {
    debug!("cmd_build: called");
    let session = build_session(config)?;
    ReplSession::new(session).run().await
}

/// Generate a random week, print it, and optionally write the HTML page
async fn cmd_plan(config: &Config, seed: Option<u64>, html: Option<&Path>) -> Result<()> {
    debug!(?seed, "cmd_plan: called");
    let mut session = build_session(config)?;
    if let Some(seed) = seed {
        session = session.with_rng(StdRng::seed_from_u64(seed));
    }

    println!("✨ Tryller en hel uge frem... ✨");
    session.bulk_generate().await;
    print!("{}", export::render_text(&export::summarize(session.plan(), &export::today())));

    if let Some(path) = html {
        export::write_html(session.plan(), path)?;
        println!("Printark gemt: {}", path.display());
    }
    Ok(())
}
