//! Line-protocol connection to the game server.

use crate::config::ClientConfig;
use anyhow::{Context, Result};
use hockey_core::{GameSession, ServerEvent};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::net::TcpStream;
use tracing::{debug, info, instrument, trace, warn};

/// Connects to the configured server and plays one game.
#[instrument(skip_all, fields(address = %config.address(), player = %session.name()))]
pub async fn run(config: &ClientConfig, session: GameSession) -> Result<GameSession> {
    let address = config.address();
    let stream = TcpStream::connect(&address)
        .await
        .with_context(|| format!("Failed to connect to {}", address))?;
    info!("Connected to game server");

    let (reader, writer) = stream.into_split();
    play(BufReader::new(reader), writer, session).await
}

/// Plays a game over an already open line stream.
///
/// Sends the player name, then answers every turn until a goal is
/// scored or the server hangs up.
pub async fn play<R, W>(reader: R, mut writer: W, mut session: GameSession) -> Result<GameSession>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let name = session.name().to_string();
    send_line(&mut writer, &name).await?;

    let mut lines = reader.lines();
    while let Some(line) = lines
        .next_line()
        .await
        .context("Failed to read from server")?
    {
        debug!(%line, "Received");
        let Some(event) = ServerEvent::parse(&line) else {
            trace!(%line, "Ignoring line");
            continue;
        };

        if let Some(mv) = session.handle(event)? {
            send_line(&mut writer, &mv.to_string()).await?;
        }

        if session.is_over() {
            info!(winner = session.winner().unwrap_or_default(), "Game over");
            return Ok(session);
        }
    }

    warn!("Server closed the connection before the game ended");
    Ok(session)
}

async fn send_line<W: AsyncWrite + Unpin>(writer: &mut W, text: &str) -> Result<()> {
    debug!(%text, "Sending");
    writer
        .write_all(format!("{}\r\n", text).as_bytes())
        .await
        .context("Failed to write to server")?;
    writer.flush().await.context("Failed to flush to server")?;
    Ok(())
}
