//! Per-session match state and the move-processing state machine.

use crate::bot;
use crate::error::MoveRejection;
use crate::participant::Occupant;
use crate::rng::BotRng;
use crate::rules::evaluate;
use crate::types::{Board, Coord, Mode, Outcome, Seat};
use strum::IntoEnumIterator;
use tracing::{debug, info, instrument};

/// Coarse lifecycle of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, derive_more::Display)]
pub enum MatchPhase {
    /// Fewer seats resolved than the mode needs.
    AwaitingSeats,
    /// Both seats resolved, no outcome yet.
    InProgress,
    /// Outcome decided. Nothing leaves this phase.
    Terminal,
}

/// What a successful move call changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoveReport {
    /// Seat that moved.
    pub seat: Seat,
    /// Cell it marked.
    pub coord: Coord,
    /// Bot reply played within the same call, if any.
    pub bot_reply: Option<Coord>,
    /// Outcome after the call.
    pub outcome: Outcome,
}

/// Complete state of one match.
///
/// Only the owning handler mutates it, one callback at a time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchSession {
    board: Board,
    turn: Seat,
    seat_one: Option<Occupant>,
    seat_two: Option<Occupant>,
    outcome: Outcome,
    mode: Mode,
    /// Tick at which a deferred bot reply fires.
    pending_bot: Option<u64>,
}

impl MatchSession {
    /// Creates an empty session. Seat one moves first.
    #[instrument]
    pub fn new(mode: Mode) -> Self {
        Self {
            board: Board::new(),
            turn: Seat::One,
            seat_one: None,
            seat_two: None,
            outcome: Outcome::Undecided,
            mode,
            pending_bot: None,
        }
    }

    /// Rebuilds a session from previously published parts.
    pub(crate) fn restore(
        mode: Mode,
        board: Board,
        turn: Seat,
        seat_one: Option<Occupant>,
        seat_two: Option<Occupant>,
        outcome: Outcome,
    ) -> Self {
        Self {
            board,
            turn,
            seat_one,
            seat_two,
            outcome,
            mode,
            pending_bot: None,
        }
    }

    /// Returns the board.
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Seat to move next.
    pub fn turn(&self) -> Seat {
        self.turn
    }

    /// Current outcome.
    pub fn outcome(&self) -> Outcome {
        self.outcome
    }

    /// Mode fixed at creation.
    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Occupant of a seat, if assigned.
    pub fn occupant(&self, seat: Seat) -> Option<&Occupant> {
        match seat {
            Seat::One => self.seat_one.as_ref(),
            Seat::Two => self.seat_two.as_ref(),
        }
    }

    /// Tick a deferred bot reply is scheduled for.
    pub fn pending_bot(&self) -> Option<u64> {
        self.pending_bot
    }

    /// Assigns an empty seat. Returns `false` if it was already taken.
    pub(crate) fn assign(&mut self, seat: Seat, occupant: Occupant) -> bool {
        let slot = match seat {
            Seat::One => &mut self.seat_one,
            Seat::Two => &mut self.seat_two,
        };
        if slot.is_some() {
            return false;
        }
        *slot = Some(occupant);
        true
    }

    /// Number of seats held by humans.
    pub fn human_count(&self) -> usize {
        [&self.seat_one, &self.seat_two]
            .into_iter()
            .flatten()
            .filter(|occupant| occupant.is_human())
            .count()
    }

    /// Seat held by the human `user_id`.
    pub fn seat_of(&self, user_id: &str) -> Option<Seat> {
        Seat::iter().find(|&seat| self.occupant(seat).is_some_and(|o| o.is_human_with_id(user_id)))
    }

    /// Derives the lifecycle phase.
    pub fn phase(&self) -> MatchPhase {
        if self.outcome.is_decided() {
            MatchPhase::Terminal
        } else if self.seat_one.is_some() && self.seat_two.is_some() {
            MatchPhase::InProgress
        } else {
            MatchPhase::AwaitingSeats
        }
    }

    /// True when the bot holds seat two and is due to move.
    pub fn bot_to_move(&self) -> bool {
        self.mode == Mode::PlayerVsAutomated
            && self.turn == bot::BOT_SEAT
            && !self.outcome.is_decided()
            && self.occupant(bot::BOT_SEAT) == Some(&Occupant::Bot)
    }

    /// Validates and applies a human move without letting the bot reply.
    ///
    /// On error the session is left untouched.
    #[instrument(skip(self), fields(mode = %self.mode, turn = %self.turn))]
    pub fn apply_move(&mut self, user_id: &str, row: i64, col: i64) -> Result<MoveReport, MoveRejection> {
        let coord = Coord::new(row, col).ok_or(MoveRejection::OutOfBounds { row, col })?;

        let seat = self
            .seat_of(user_id)
            .ok_or_else(|| MoveRejection::UnknownParticipant(user_id.to_string()))?;
        if self.mode == Mode::PlayerVsAutomated && seat != Seat::One {
            return Err(MoveRejection::NotControllable(seat));
        }

        if self.outcome.is_decided() {
            return Err(MoveRejection::GameOver(self.outcome));
        }
        if seat != self.turn {
            return Err(MoveRejection::NotYourTurn(seat));
        }
        if !self.board.is_empty(coord) {
            return Err(MoveRejection::CellTaken(coord));
        }

        let outcome = self.place(seat, coord);
        info!(user_id, %seat, %coord, %outcome, "Move applied");

        Ok(MoveReport {
            seat,
            coord,
            bot_reply: None,
            outcome,
        })
    }

    /// Processes a move event in full: the human move and, in
    /// player-vs-automated mode, the bot's immediate reply.
    #[instrument(skip(self, rng))]
    pub fn process_move(
        &mut self,
        user_id: &str,
        row: i64,
        col: i64,
        rng: &mut BotRng,
    ) -> Result<MoveReport, MoveRejection> {
        let mut report = self.apply_move(user_id, row, col)?;
        report.bot_reply = self.play_bot(rng);
        report.outcome = self.outcome;
        Ok(report)
    }

    /// Plays the bot's move if it is due. Returns the cell it marked.
    #[instrument(skip(self, rng), fields(turn = %self.turn))]
    pub fn play_bot(&mut self, rng: &mut BotRng) -> Option<Coord> {
        self.pending_bot = None;
        if !self.bot_to_move() {
            return None;
        }

        let coord = bot::choose_move(&self.board, rng)?;
        let outcome = self.place(bot::BOT_SEAT, coord);
        info!(%coord, %outcome, "Bot played");
        Some(coord)
    }

    /// Defers the bot's reply until `tick`.
    pub fn schedule_bot(&mut self, tick: u64) {
        debug!(tick, "Bot reply scheduled");
        self.pending_bot = Some(tick);
    }

    /// True when a deferred bot reply is due at `tick`.
    pub fn bot_due(&self, tick: u64) -> bool {
        self.pending_bot.is_some_and(|due| tick >= due)
    }

    /// Ends an undecided match as a draw after a participant left.
    ///
    /// Returns `true` if the outcome changed.
    #[instrument(skip(self), fields(outcome = %self.outcome))]
    pub fn abandon(&mut self) -> bool {
        if self.outcome.is_decided() {
            return false;
        }
        self.outcome = Outcome::Draw;
        self.pending_bot = None;
        info!("Match abandoned, recorded as draw");
        true
    }

    /// Marks a cell, then records the outcome or passes the turn.
    fn place(&mut self, seat: Seat, coord: Coord) -> Outcome {
        self.board.mark(coord, seat);
        self.outcome = evaluate(&self.board);
        if !self.outcome.is_decided() {
            self.turn = seat.opponent();
        }
        self.outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::participant::ParticipantId;

    fn seated(mode: Mode) -> MatchSession {
        let mut session = MatchSession::new(mode);
        session.assign(Seat::One, Occupant::Human(ParticipantId::new("alice").unwrap()));
        let two = match mode {
            Mode::PlayerVsPlayer => Occupant::Human(ParticipantId::new("bob").unwrap()),
            Mode::PlayerVsAutomated => Occupant::Bot,
        };
        session.assign(Seat::Two, two);
        session
    }

    #[test]
    fn test_phases() {
        let mut session = MatchSession::new(Mode::PlayerVsPlayer);
        assert_eq!(session.phase(), MatchPhase::AwaitingSeats);
        session = seated(Mode::PlayerVsPlayer);
        assert_eq!(session.phase(), MatchPhase::InProgress);
        session.abandon();
        assert_eq!(session.phase(), MatchPhase::Terminal);
    }

    #[test]
    fn test_seat_cannot_be_reassigned() {
        let mut session = seated(Mode::PlayerVsPlayer);
        assert!(!session.assign(Seat::One, Occupant::Human(ParticipantId::new("carol").unwrap())));
        assert_eq!(session.seat_of("alice"), Some(Seat::One));
    }

    #[test]
    fn test_rejection_reasons() {
        let mut session = seated(Mode::PlayerVsPlayer);
        assert_eq!(
            session.apply_move("alice", 3, 0),
            Err(MoveRejection::OutOfBounds { row: 3, col: 0 })
        );
        assert_eq!(
            session.apply_move("mallory", 0, 0),
            Err(MoveRejection::UnknownParticipant("mallory".into()))
        );
        assert_eq!(session.apply_move("bob", 0, 0), Err(MoveRejection::NotYourTurn(Seat::Two)));
        session.apply_move("alice", 0, 0).unwrap();
        assert_eq!(
            session.apply_move("bob", 0, 0),
            Err(MoveRejection::CellTaken(Coord::new(0, 0).unwrap()))
        );
    }

    #[test]
    fn test_bot_seat_not_playable_by_id() {
        let mut session = seated(Mode::PlayerVsAutomated);
        session.apply_move("alice", 0, 0).unwrap();
        assert_eq!(
            session.apply_move("BOT", 1, 1),
            Err(MoveRejection::UnknownParticipant("BOT".into()))
        );
        assert!(session.bot_to_move());
    }

    #[test]
    fn test_schedule_and_due() {
        let mut session = seated(Mode::PlayerVsAutomated);
        session.apply_move("alice", 0, 0).unwrap();
        session.schedule_bot(12);
        assert!(!session.bot_due(11));
        assert!(session.bot_due(12));

        let mut rng = BotRng::new(3);
        assert_eq!(session.play_bot(&mut rng), Coord::new(1, 1));
        assert_eq!(session.pending_bot(), None);
        assert_eq!(session.turn(), Seat::One);
    }
}
