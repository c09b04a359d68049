//! Wire payloads: the state snapshot broadcast to participants and the
//! move request they send.

use crate::error::{MoveRejection, WireError};
use crate::participant::{BOT_ID, Occupant, ParticipantId};
use crate::session::MatchSession;
use crate::types::{Board, Mode, Outcome, Seat};
use derive_getters::Getters;
use serde::{Deserialize, Serialize};
use tracing::instrument;

/// Op code of a state snapshot.
pub const OP_STATE: i64 = 0;

/// Op code of a move request.
pub const OP_MOVE: i64 = 1;

/// Snapshot of a session as participants see it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters)]
pub struct Snapshot {
    /// Cell codes: 0 empty, 1 seat one, 2 seat two.
    board: [[u8; 3]; 3],
    /// Seat to move (1 or 2).
    turn: u8,
    /// Seat one identity, empty until assigned.
    p1: String,
    /// Seat two identity, `"BOT"` for the bot.
    p2: String,
    /// 0 undecided, 1/2 seat win, 3 draw.
    winner: u8,
    /// `"pvp"` or `"pvc"`.
    mode: Mode,
}

impl From<&MatchSession> for Snapshot {
    fn from(session: &MatchSession) -> Self {
        let id = |seat| {
            session
                .occupant(seat)
                .map(|occupant| occupant.wire_id().to_string())
                .unwrap_or_default()
        };
        Self {
            board: session.board().codes(),
            turn: session.turn().code(),
            p1: id(Seat::One),
            p2: id(Seat::Two),
            winner: session.outcome().code(),
            mode: session.mode(),
        }
    }
}

impl Snapshot {
    /// Decodes a snapshot payload.
    #[instrument(skip(bytes), fields(len = bytes.len()))]
    pub fn decode(bytes: &[u8]) -> Result<Self, WireError> {
        Ok(serde_json::from_slice(bytes)?)
    }

    /// Board described by this snapshot.
    pub fn board_state(&self) -> Result<Board, WireError> {
        Board::from_codes(self.board).ok_or_else(|| WireError::new("invalid cell code in snapshot"))
    }

    /// Outcome described by this snapshot.
    pub fn outcome(&self) -> Result<Outcome, WireError> {
        Outcome::from_code(self.winner)
            .ok_or_else(|| WireError::new(format!("invalid winner code {}", self.winner)))
    }

    /// Seat to move described by this snapshot.
    pub fn turn_seat(&self) -> Result<Seat, WireError> {
        Seat::from_code(self.turn).ok_or_else(|| WireError::new(format!("invalid turn code {}", self.turn)))
    }
}

impl TryFrom<&Snapshot> for MatchSession {
    type Error = WireError;

    /// Restores a session from a published snapshot. A pending bot reply
    /// is not part of the snapshot and is not restored.
    fn try_from(snapshot: &Snapshot) -> Result<Self, Self::Error> {
        let occupant = |raw: &str| -> Result<Option<Occupant>, WireError> {
            match raw {
                "" => Ok(None),
                BOT_ID => Ok(Some(Occupant::Bot)),
                id => ParticipantId::new(id)
                    .map(|id| Some(Occupant::Human(id)))
                    .map_err(|e| WireError::new(format!("invalid participant {id:?}: {e}"))),
            }
        };
        Ok(MatchSession::restore(
            snapshot.mode,
            snapshot.board_state()?,
            snapshot.turn_seat()?,
            occupant(&snapshot.p1)?,
            occupant(&snapshot.p2)?,
            snapshot.outcome()?,
        ))
    }
}

/// Serializes a session into a snapshot payload.
#[instrument(skip(session), fields(outcome = %session.outcome()))]
pub fn encode_snapshot(session: &MatchSession) -> Result<Vec<u8>, WireError> {
    Ok(serde_json::to_vec(&Snapshot::from(session))?)
}

/// Move request payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveRequest {
    /// Target row.
    pub row: i64,
    /// Target column.
    pub col: i64,
}

impl MoveRequest {
    /// Creates a move request.
    pub fn new(row: i64, col: i64) -> Self {
        Self { row, col }
    }

    /// Decodes a move payload.
    pub fn decode(bytes: &[u8]) -> Result<Self, MoveRejection> {
        serde_json::from_slice(bytes).map_err(|e| MoveRejection::Malformed(e.to_string()))
    }

    /// Encodes this request.
    pub fn encode(&self) -> Result<Vec<u8>, WireError> {
        Ok(serde_json::to_vec(self)?)
    }
}
