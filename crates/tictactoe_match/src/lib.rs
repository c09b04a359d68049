//! Authoritative tic-tac-toe match engine.
//!
//! Decides, for every incoming move, whether it is legal, what the board
//! and turn become, and what the bot plays in reply. Transport, presence and
//! persistence belong to the host; this crate only sees validated lifecycle
//! callbacks through [`MatchHandler`] and answers with snapshot payloads.
//!
//! # Architecture
//!
//! - **Rules**: pure win/draw detection ([`evaluate`])
//! - **Bot**: full-depth minimax for seat two ([`choose_move`])
//! - **Admission**: join checks and seat assignment ([`admit`], [`seat`])
//! - **Session**: the per-match state machine ([`MatchSession`])
//! - **Wire**: snapshot and move payloads ([`Snapshot`], [`MoveRequest`])
//!
//! # Example
//!
//! ```
//! use tictactoe_match::{BotRng, MatchSession, Mode, admit, seat};
//!
//! let mut session = MatchSession::new(Mode::PlayerVsAutomated);
//! let alice = admit(&session, "alice").unwrap();
//! seat(&mut session, alice);
//!
//! let mut rng = BotRng::new(7);
//! let report = session.process_move("alice", 0, 0, &mut rng).unwrap();
//! assert_eq!(report.bot_reply.map(|c| (c.row(), c.col())), Some((1, 1)));
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod admission;
mod bot;
mod error;
mod handler;
mod participant;
mod rng;
mod rules;
mod session;
mod types;
mod wire;

// Crate-level exports - Domain types
pub use types::{Board, Cell, Coord, MatchParams, Mode, Outcome, Seat};

// Crate-level exports - Rules and bot
pub use bot::{BOT_SEAT, WIN_SCORE, best_move, choose_move, minimax};
pub use rng::BotRng;
pub use rules::{LINES, evaluate};

// Crate-level exports - Participants and admission
pub use admission::{admit, seat};
pub use participant::{BOT_ID, Occupant, ParticipantId};

// Crate-level exports - Session state machine
pub use session::{MatchPhase, MatchSession, MoveReport};

// Crate-level exports - Wire format
pub use wire::{MoveRequest, OP_MOVE, OP_STATE, Snapshot, encode_snapshot};

// Crate-level exports - Host boundary
pub use handler::{Dispatcher, MatchHandler, MatchMessage, MatchSettings, Presence, TicTacToeMatch, publish};

// Crate-level exports - Errors
pub use error::{AdmissionError, MoveRejection, WireError};
