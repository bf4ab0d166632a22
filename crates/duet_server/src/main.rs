//! Duet - run one node of the replicated tic-tac-toe game.

use anyhow::Result;
use clap::Parser;
use duet_server::{Cli, Node, NodeConfig};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,duet_server=debug")),
        )
        .init();

    let config = NodeConfig::load(cli.config.as_deref(), &cli.overrides)?;
    info!(
        address = %config.bind_address(),
        player = %config.assigned_player(),
        "Starting duet node"
    );

    Node::new(config)?.run().await
}
