//! Terminal client: play a session from stdin against the bot or hot-seat.

use crate::error::HostError;
use crate::host::{Envelope, MatchHost};
use tictactoe_match::{MatchParams, Mode, OP_STATE, Outcome, Seat, Snapshot};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::broadcast::error::RecvError;
use tracing::{debug, instrument, warn};

/// Identity used for seat one.
pub const PLAYER_ONE: &str = "player-1";

/// Identity used for seat two in hot-seat games.
pub const PLAYER_TWO: &str = "player-2";

/// Parses `"row col"` (also accepts commas).
pub fn parse_move(line: &str) -> Option<(i64, i64)> {
    let mut parts = line
        .split(|c: char| c.is_whitespace() || c == ',')
        .filter(|part| !part.is_empty());
    let row = parts.next()?.parse().ok()?;
    let col = parts.next()?.parse().ok()?;
    parts.next().is_none().then_some((row, col))
}

/// Renders a snapshot for the terminal.
pub fn render(snapshot: &Snapshot) -> Result<String, HostError> {
    let board = snapshot.board_state()?;
    let status = match snapshot.outcome()? {
        Outcome::Undecided => format!("{} to move", snapshot.turn_seat()?),
        decided => format!("Game over: {}", decided),
    };
    Ok(format!("\n{}\n\n{} vs {} ({})\n{}", board, snapshot.p1(), snapshot.p2(), snapshot.mode(), status))
}

/// Identity that should send the next move, if a human is due.
pub fn mover_for(snapshot: &Snapshot) -> Option<&'static str> {
    match (snapshot.turn_seat().ok()?, snapshot.mode()) {
        (Seat::One, _) => Some(PLAYER_ONE),
        (Seat::Two, Mode::PlayerVsPlayer) => Some(PLAYER_TWO),
        (Seat::Two, Mode::PlayerVsAutomated) => None,
    }
}

/// Plays one match in the terminal until it ends or stdin closes.
#[instrument(skip(host))]
pub async fn play(host: &mut MatchHost, mode: Mode) -> Result<Outcome, HostError> {
    let mut params = MatchParams::new();
    params.insert("mode".to_string(), serde_json::json!(mode.as_ref()));

    let session = host.create_session(&params);
    let mut events = session.subscribe();
    session.join(PLAYER_ONE).await?;
    if mode == Mode::PlayerVsPlayer {
        session.join(PLAYER_TWO).await?;
    }

    println!("Enter moves as `row col` (0-2). Ctrl-D quits.");
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut latest: Option<Snapshot> = None;

    let outcome = loop {
        tokio::select! {
            event = events.recv() => match event {
                Ok(Envelope { op_code: OP_STATE, payload }) => {
                    let snapshot = Snapshot::decode(&payload)?;
                    println!("{}", render(&snapshot)?);
                    let outcome = snapshot.outcome()?;
                    latest = Some(snapshot);
                    if outcome.is_decided() {
                        break outcome;
                    }
                }
                Ok(envelope) => debug!(op_code = envelope.op_code, "Ignoring broadcast"),
                Err(RecvError::Lagged(skipped)) => warn!(skipped, "Missed broadcasts"),
                Err(RecvError::Closed) => return Err(HostError::new("Session ended unexpectedly")),
            },
            line = lines.next_line() => {
                let line = line.map_err(|e| HostError::new(format!("Failed to read stdin: {}", e)))?;
                let Some(line) = line else {
                    session.leave(PLAYER_ONE).await?;
                    break Outcome::Draw;
                };
                let Some((row, col)) = parse_move(&line) else {
                    println!("Could not read `{}`, expected `row col`", line.trim());
                    continue;
                };
                match latest.as_ref().and_then(mover_for) {
                    Some(user_id) => session.send_move(user_id, row, col).await?,
                    None => println!("Waiting for the bot..."),
                }
            }
        }
    };

    session.shutdown().await?;
    Ok(outcome)
}
