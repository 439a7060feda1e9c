mod action;
mod app;
mod app_state;
mod cli;
mod component;
mod components;
mod controller;
mod focus;
mod stream;
mod theme;
mod widgets;

use clap::Parser;
use picam_proto::config::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = cli::Cli::parse();

    let data_dir = picam_proto::platform::data_dir();
    std::fs::create_dir_all(&data_dir)?;
    let log_path = picam_proto::platform::log_path();

    let log_file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)?;

    // RUST_LOG wins; otherwise debug for our code with the HTTP client internals quiet.
    let log_filter = std::env::var("RUST_LOG")
        .unwrap_or_else(|_| "debug,hyper_util=warn,reqwest=warn,hyper=warn".to_string());
    tracing_subscriber::fmt()
        .with_writer(log_file)
        .with_env_filter(log_filter.as_str())
        .with_ansi(false)
        .init();

    eprintln!("picam log: {}", log_path.display());
    tracing::info!("picam starting…");

    // ── Load config ──────────────────────────────────────────────────────────
    let mut config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load().unwrap_or_else(|e| {
            tracing::warn!("config load failed, using defaults: {}", e);
            Config::default()
        }),
    };
    if let Some(base_url) = cli.base_url {
        config.server.base_url = base_url;
    }
    tracing::info!("backend: {}", config.server.base_url);

    // ── Run TUI ──────────────────────────────────────────────────────────────
    let app = app::App::new(&config);
    app.run().await?;

    Ok(())
}
