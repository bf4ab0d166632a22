//! Command-line interface for the duet node.

use clap::{Args, Parser};
use duet_tictactoe::Player;
use std::path::PathBuf;

/// Duet - one node of a two-node replicated tic-tac-toe game
#[derive(Parser, Debug)]
#[command(name = "duet")]
#[command(about = "Two-node tic-tac-toe server with peer state sync", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Path to a TOML config file (`[server]`, `[other.instance]`, `[sync.interval]` ...)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Settings that take precedence over the config file
    #[command(flatten)]
    pub overrides: ConfigOverrides,
}

/// Per-setting overrides, each also readable from the environment.
#[derive(Args, Debug, Clone, Default)]
pub struct ConfigOverrides {
    /// Port this node listens on (`server.port`)
    #[arg(short, long, env = "SERVER_PORT")]
    pub port: Option<u16>,

    /// Address this node binds to (`server.address`)
    #[arg(long, env = "SERVER_ADDRESS")]
    pub host: Option<String>,

    /// Port of the peer node (`other.instance.port`)
    #[arg(long, env = "OTHER_INSTANCE_PORT")]
    pub peer_port: Option<u16>,

    /// Host of the peer node (`other.instance.host`)
    #[arg(long, env = "OTHER_INSTANCE_HOST")]
    pub peer_host: Option<String>,

    /// Milliseconds between sync ticks (`sync.interval.milliseconds`)
    #[arg(long, env = "SYNC_INTERVAL_MILLISECONDS")]
    pub sync_interval_ms: Option<u64>,

    /// Player this node moves for, overriding the port rule (`player.assignment`)
    #[arg(long, env = "PLAYER_ASSIGNMENT", value_parser = parse_player)]
    pub player: Option<Player>,

    /// Do not sync with the peer right after a local move or reset
    #[arg(long)]
    pub no_sync_on_mutation: bool,
}

/// Parses `X` or `O` (case-insensitive).
pub(crate) fn parse_player(s: &str) -> Result<Player, String> {
    match s.trim() {
        "X" | "x" => Ok(Player::X),
        "O" | "o" => Ok(Player::O),
        other => Err(format!("expected X or O, got '{other}'")),
    }
}
