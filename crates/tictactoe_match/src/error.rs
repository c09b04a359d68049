//! Error types for the match engine.

use crate::types::{Coord, Outcome, Seat};
use derive_more::{Display, Error};
use tracing::instrument;

/// Why a move event was ignored.
///
/// None of these are sent back to the participant; they only feed logs.
#[derive(Debug, Clone, PartialEq, Eq, Display)]
pub enum MoveRejection {
    /// Payload did not decode as a move.
    #[display("Malformed move payload: {}", _0)]
    Malformed(String),

    /// Coordinates outside the board.
    #[display("Coordinates out of bounds: row={row}, col={col}")]
    OutOfBounds {
        /// Requested row.
        row: i64,
        /// Requested column.
        col: i64,
    },

    /// Sender does not occupy a seat.
    #[display("Participant {} holds no seat", _0)]
    UnknownParticipant(String),

    /// Sender's seat is played by the engine, not by them.
    #[display("{} is not controlled by a human", _0)]
    NotControllable(Seat),

    /// Sender moved out of turn.
    #[display("It is not {}'s turn", _0)]
    NotYourTurn(Seat),

    /// Target cell already marked.
    #[display("Cell {} is already taken", _0)]
    CellTaken(Coord),

    /// Match already decided.
    #[display("Match is over ({})", _0)]
    GameOver(Outcome),
}

impl std::error::Error for MoveRejection {}

impl MoveRejection {
    /// True for problems with the payload itself rather than game rules.
    pub fn is_malformed(&self) -> bool {
        matches!(
            self,
            MoveRejection::Malformed(_) | MoveRejection::OutOfBounds { .. }
        )
    }
}

/// Why a participant may not join.
///
/// The `Display` text is the reason handed back to the joining client.
#[derive(Debug, Clone, PartialEq, Eq, Display)]
pub enum AdmissionError {
    /// Identity is the bot's reserved identifier.
    #[display("identity is reserved")]
    ReservedIdentity,

    /// Identity is blank.
    #[display("identity must not be empty")]
    EmptyIdentity,

    /// Participant already holds a seat in this session.
    #[display("already seated")]
    AlreadySeated,

    /// Player-vs-automated matches take a single human.
    #[display("only one human participant allowed")]
    OneHumanOnly,

    /// Both seats hold humans.
    #[display("session full")]
    SessionFull,
}

impl std::error::Error for AdmissionError {}

/// Wire encoding or decoding failure with location tracking.
#[derive(Debug, Clone, Display, Error)]
#[display("Wire error: {} at {}:{}", message, file, line)]
pub struct WireError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl WireError {
    /// Creates a new wire error with caller location tracking.
    #[track_caller]
    #[instrument(skip(message))]
    pub fn new(message: impl Into<String>) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message: message.into(),
            line: loc.line(),
            file: loc.file(),
        }
    }
}

impl From<serde_json::Error> for WireError {
    #[track_caller]
    fn from(err: serde_json::Error) -> Self {
        Self::new(format!("JSON error: {}", err))
    }
}
