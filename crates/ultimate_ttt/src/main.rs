//! Ultimate Tic-Tac-Toe - terminal entry point.

use anyhow::Result;
use clap::Parser;
use tracing::info;
use ultimate_ttt::{AppConfig, Cli, init_logging};

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let config = AppConfig::resolve(&cli)?;

    init_logging(config.log_file())?;

    info!(config = ?config, fresh = cli.fresh, "Configuration resolved");
    ultimate_ttt::run(config, cli.fresh).await
}
