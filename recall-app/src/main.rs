mod cli;
mod config;

use anyhow::Result;
use clap::Parser;
use recall_core::DeckStore;
use recall_json::JsonStore;
use tracing_subscriber::EnvFilter;

use cli::commands::run_cli;
use cli::opts::Cli;
use config::AppConfig;

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    let args = Cli::parse();
    let cfg = AppConfig::resolve(&args);
    tracing::debug!(?cfg, "configuration resolved");

    let json = JsonStore::open_with(cfg.data_file.clone(), cfg.backups_dir.clone(), cfg.max_backups)?;
    let mut store = DeckStore::open(Box::new(json))?;
    run_cli(args.cmd, &mut store)
}
