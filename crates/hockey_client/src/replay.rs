//! Offline replay of a recorded server transcript.

use anyhow::{Context, Result};
use hockey_core::{GameSession, ServerEvent};
use std::io::Write;
use std::path::Path;
use tracing::{info, instrument, trace};

/// Replays a transcript file, printing each move next to the line that asked for it.
#[instrument(skip(session), fields(path = %path.display()))]
pub fn replay_file(path: &Path, session: GameSession) -> Result<GameSession> {
    let transcript = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read transcript {}", path.display()))?;
    let stdout = std::io::stdout();
    replay(&transcript, session, &mut stdout.lock())
}

/// Drives a session through transcript lines, writing `line -> move` for every reply.
pub fn replay<W: Write>(transcript: &str, mut session: GameSession, out: &mut W) -> Result<GameSession> {
    for (number, line) in transcript.lines().enumerate() {
        let Some(event) = ServerEvent::parse(line) else {
            trace!(number, line, "Ignoring line");
            continue;
        };

        let reply = session
            .handle(event)
            .with_context(|| format!("Transcript line {}: {}", number + 1, line.trim()))?;
        if let Some(mv) = reply {
            writeln!(out, "{} -> {}", line.trim(), mv)?;
        }

        if session.is_over() {
            break;
        }
    }

    info!(over = session.is_over(), winner = ?session.winner(), "Replay finished");
    Ok(session)
}
