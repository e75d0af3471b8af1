use anyhow::Context;
use clap::Parser;
use std::fs::OpenOptions;
use std::path::PathBuf;
use std::sync::Mutex;
use tracing_subscriber::{fmt, EnvFilter};

mod assistant;
mod cli;
mod config;
mod conversation;
mod dashboard;
mod error;
mod generation;
mod model;
mod onboarding;
mod provider;
mod session;
mod tui;

use cli::{Cli, Commands};
use config::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let command = cli.command.unwrap_or(Commands::Tui);

    let mut config = Config::load_or_default(&cli.config)?;
    if let Some(model) = cli.model {
        config.model = model;
    }
    config.validate()?;

    // Only show logs with --verbose; the TUI owns the screen, so it logs to a file
    let filter = if cli.verbose {
        EnvFilter::new("fittoon=debug")
    } else {
        EnvFilter::new("fittoon=warn")
    };

    if matches!(command, Commands::Tui) {
        let path = log_path(&cli.config, &config);
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .with_context(|| format!("Failed to open log file {}", path.display()))?;
        fmt()
            .with_env_filter(filter)
            .with_target(false)
            .with_ansi(false)
            .with_writer(Mutex::new(file))
            .init();
    } else {
        fmt()
            .with_env_filter(filter)
            .with_target(false)
            .with_writer(std::io::stderr)
            .init();
    }

    match command {
        Commands::Tui => cli::tui::execute(&config),
        Commands::Generate(args) => cli::generate::execute(&config, args).await,
        Commands::Chat => cli::chat::execute(&config).await,
        Commands::Schema(args) => cli::schema::execute(args),
    }
}

/// Relative log paths sit beside the config file
fn log_path(config_path: &std::path::Path, config: &Config) -> PathBuf {
    if config.log_file.is_absolute() {
        return config.log_file.clone();
    }
    config_path
        .parent()
        .map(|dir| dir.join(&config.log_file))
        .unwrap_or_else(|| config.log_file.clone())
}
