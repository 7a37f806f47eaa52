mod action;
mod app;
mod app_state;
mod bus;
mod component;
mod components;
mod focus;
mod playback;
mod poller;
mod store;
mod theme;
mod widgets;

use std::path::PathBuf;

use clap::Parser;
use remote_proto::config::Config;
use remote_proto::{platform, Gateway};

/// Terminal remote control for a VLC player's HTTP interface.
#[derive(Debug, Parser)]
#[command(name = "vlcr", version)]
struct Cli {
    /// Base URL of the player's HTTP interface, e.g. http://127.0.0.1:8080
    #[arg(long)]
    url: Option<String>,

    /// HTTP interface password
    #[arg(long)]
    password: Option<String>,

    /// Config file to use instead of the default location
    #[arg(long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let data_dir = platform::data_dir();
    std::fs::create_dir_all(&data_dir)?;
    let log_path = platform::log_path();
    let log_file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)?;

    // RUST_LOG overrides; HTTP client internals stay quiet by default.
    let log_filter = std::env::var("RUST_LOG")
        .unwrap_or_else(|_| "debug,hyper_util=warn,reqwest=warn,hyper=warn".to_string());
    tracing_subscriber::fmt()
        .with_writer(log_file)
        .with_env_filter(log_filter.as_str())
        .with_ansi(false)
        .init();

    eprintln!("vlcr log: {}", log_path.display());
    tracing::info!("vlcr starting…");

    // ── Load config ──────────────────────────────────────────────────────────
    let loaded = match &cli.config {
        Some(path) => Config::load_from(path),
        None => Config::load(),
    };
    let mut config = loaded.unwrap_or_else(|e| {
        tracing::warn!("config unreadable, using defaults: {}", e);
        Config::default()
    });
    if let Some(url) = cli.url {
        config.player.base_url = url;
    }
    if let Some(password) = cli.password {
        config.player.password = password;
    }

    // ── Run TUI ──────────────────────────────────────────────────────────────
    let gateway = Gateway::http(config.player.base_url.clone(), config.player.password());
    app::App::new(config, gateway).run().await?;

    Ok(())
}
