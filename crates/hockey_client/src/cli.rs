//! Command-line interface for hockey_client.

use crate::config::StrategyKind;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Hockey Client - autonomous player for the hockey puck game
#[derive(Parser, Debug)]
#[command(name = "hockey_client")]
#[command(about = "Autonomous player for the hockey puck game", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Path to a TOML configuration file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Values that override the configuration file
    #[command(flatten)]
    pub overrides: Overrides,

    /// Subcommand to run
    #[command(subcommand)]
    pub command: Command,
}

/// Command-line overrides for [`crate::config::ClientConfig`].
#[derive(Args, Debug, Clone, Default)]
pub struct Overrides {
    /// Server host
    #[arg(long, global = true)]
    pub host: Option<String>,

    /// Server port
    #[arg(short, long, global = true)]
    pub port: Option<u16>,

    /// Player name sent to the server
    #[arg(short, long, global = true)]
    pub name: Option<String>,

    /// Board size (odd)
    #[arg(long, global = true)]
    pub board_size: Option<usize>,

    /// Move strategy
    #[arg(long, value_enum, global = true)]
    pub strategy: Option<StrategyKind>,

    /// Seed for the random strategy
    #[arg(long, global = true)]
    pub seed: Option<u64>,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Connect to a game server and play one game
    Play,

    /// Drive a session offline from a recorded transcript
    Replay {
        /// Transcript file, one server line per line
        transcript: PathBuf,
    },
}
