//! Hockey Client - autonomous player for the hockey puck game
//!
//! Connects to a line-protocol game server, tracks the board from the
//! server's events and answers each of its turns with a move.

#![warn(missing_docs)]

mod cli;
mod client;
mod config;
mod replay;

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Command};
use config::ClientConfig;
use hockey_core::GameSession;
use tracing::{info, instrument};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = match &cli.config {
        Some(path) => ClientConfig::from_file(path)?,
        None => ClientConfig::default(),
    }
    .merge(&cli.overrides);

    let name = config.resolve_name();
    let session = config.build_session(&name)?;

    match cli.command {
        Command::Play => run_play(&config, session).await,
        Command::Replay { transcript } => run_replay(&transcript, session),
    }
}

/// Play one game against the configured server
#[instrument(skip_all, fields(player = %session.name()))]
async fn run_play(config: &ClientConfig, session: GameSession) -> Result<()> {
    info!(address = %config.address(), strategy = ?config.strategy(), "Starting hockey client");
    let session = client::run(config, session).await?;
    report(&session);
    Ok(())
}

/// Replay a recorded transcript offline
#[instrument(skip(session), fields(player = %session.name()))]
fn run_replay(transcript: &std::path::Path, session: GameSession) -> Result<()> {
    let session = replay::replay_file(transcript, session)?;
    report(&session);
    Ok(())
}

fn report(session: &GameSession) {
    match session.winner() {
        Some(winner) if winner == session.name() => info!(%winner, "We scored"),
        Some(winner) => info!(%winner, "Opponent scored"),
        None => info!("Game ended without a goal"),
    }
}
