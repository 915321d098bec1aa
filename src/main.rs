use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use tokio::sync::mpsc;

use newsdeck::app::{App, AppEvent};
use newsdeck::config::Config;
use newsdeck::ui;

/// Get the config directory path (~/.config/newsdeck/)
fn get_config_dir() -> Result<PathBuf> {
    let home = std::env::var("HOME").context("HOME environment variable not set")?;
    Ok(PathBuf::from(home).join(".config").join("newsdeck"))
}

#[derive(Parser, Debug)]
#[command(name = "newsdeck", about = "Terminal client for a personalized news aggregator")]
struct Args {
    /// Path to the config file (defaults to ~/.config/newsdeck/config.toml)
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Override both API base URLs with one server
    #[arg(long, value_name = "URL")]
    server: Option<String>,

    /// Override the user id sent with bookmark saves
    #[arg(long, value_name = "ID")]
    user: Option<String>,
}

/// Initialize tracing to a log file in the config directory.
///
/// The TUI owns the terminal, so log output cannot go to stderr without
/// corrupting the display. Filtering follows RUST_LOG as usual.
fn init_logging(config_dir: &std::path::Path) -> Result<()> {
    let log_path = config_dir.join("newsdeck.log");
    let file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
        .with_context(|| format!("Failed to open log file: {}", log_path.display()))?;

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::sync::Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Set up config directory
    let config_dir = get_config_dir()?;
    if !config_dir.exists() {
        std::fs::create_dir_all(&config_dir).context("Failed to create config directory")?;
    }

    init_logging(&config_dir)?;

    // Load config, then layer CLI overrides on top
    let config_path = args
        .config
        .unwrap_or_else(|| config_dir.join("config.toml"));
    let mut config = Config::load(&config_path)
        .with_context(|| format!("Failed to load config: {}", config_path.display()))?;

    if let Some(server) = args.server {
        config.news_api_url = server.clone();
        config.auth_api_url = server;
    }
    if let Some(user) = args.user {
        config.user_id = user;
    }

    let mut app = App::new(&config).context("Failed to create application")?;

    // Create event channel for background tasks
    let (event_tx, event_rx) = mpsc::channel::<AppEvent>(32);

    // Run the TUI
    ui::run(&mut app, event_tx, event_rx).await?;

    println!("Goodbye!");
    Ok(())
}
