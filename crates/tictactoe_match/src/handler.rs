//! Host boundary: lifecycle callbacks invoked by the match host, and the
//! tic-tac-toe implementation of them.

use crate::admission;
use crate::error::{AdmissionError, MoveRejection};
use crate::rng::BotRng;
use crate::session::{MatchSession, MoveReport};
use crate::types::{MatchParams, Mode};
use crate::wire::{MoveRequest, OP_MOVE, OP_STATE, encode_snapshot};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, instrument, warn};

/// A connected participant as the host describes it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Presence {
    /// Opaque participant identity.
    pub user_id: String,
}

impl Presence {
    /// Creates a presence.
    pub fn new(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
        }
    }
}

/// A message received from a participant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchMessage {
    /// Sender identity.
    pub user_id: String,
    /// Message kind.
    pub op_code: i64,
    /// Raw payload.
    pub data: Vec<u8>,
}

/// Fan-out of payloads to every participant of a session.
pub trait Dispatcher {
    /// Delivers `payload` tagged with `op_code` to all participants.
    fn broadcast(&self, op_code: i64, payload: &[u8]);
}

/// Lifecycle callbacks for one session.
///
/// The host calls these one at a time per session, never concurrently.
pub trait MatchHandler {
    /// Session state owned by the host between callbacks.
    type State;

    /// Reason given back to a rejected joiner.
    type Rejection: std::fmt::Display;

    /// Builds the initial state from session parameters.
    fn init(&mut self, params: &MatchParams) -> Self::State;

    /// Advisory check before a participant joins.
    fn join_attempt(&self, state: &Self::State, presence: &Presence) -> Result<(), Self::Rejection>;

    /// Participants that passed [`MatchHandler::join_attempt`] have joined.
    fn join(&mut self, state: &mut Self::State, presences: &[Presence], dispatcher: &dyn Dispatcher);

    /// Participants have left.
    fn leave(&mut self, state: &mut Self::State, presences: &[Presence], dispatcher: &dyn Dispatcher);

    /// One host tick with the messages received since the previous one.
    fn tick(
        &mut self,
        state: &mut Self::State,
        tick: u64,
        messages: &[MatchMessage],
        dispatcher: &dyn Dispatcher,
    );

    /// The host is shutting the session down.
    fn terminate(&mut self, state: &mut Self::State);
}

/// Pacing of the bot's replies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct MatchSettings {
    /// Ticks between a human move and the bot's reply. Zero replies
    /// within the same call.
    pub bot_delay_ticks: u64,
}

/// Tic-tac-toe implementation of [`MatchHandler`]. One instance per session.
#[derive(Debug, Clone)]
pub struct TicTacToeMatch {
    settings: MatchSettings,
    rng: BotRng,
}

impl TicTacToeMatch {
    /// Creates a handler with its own random source.
    #[instrument(skip(rng), fields(seed = rng.seed()))]
    pub fn new(settings: MatchSettings, rng: BotRng) -> Self {
        Self { settings, rng }
    }

    /// Returns the pacing settings.
    pub fn settings(&self) -> &MatchSettings {
        &self.settings
    }

    /// Decodes and applies one move message, scheduling or playing the
    /// bot's reply as configured.
    #[instrument(skip(self, state, message), fields(user_id = %message.user_id))]
    fn handle_move(
        &mut self,
        state: &mut MatchSession,
        tick: u64,
        message: &MatchMessage,
    ) -> Result<MoveReport, MoveRejection> {
        let request = MoveRequest::decode(&message.data)?;

        if self.settings.bot_delay_ticks == 0 {
            return state.process_move(&message.user_id, request.row, request.col, &mut self.rng);
        }

        let report = state.apply_move(&message.user_id, request.row, request.col)?;
        if state.bot_to_move() {
            state.schedule_bot(tick + self.settings.bot_delay_ticks);
        }
        Ok(report)
    }
}

/// Encodes and broadcasts the current state.
#[instrument(skip_all)]
pub fn publish(state: &MatchSession, dispatcher: &dyn Dispatcher) {
    match encode_snapshot(state) {
        Ok(payload) => dispatcher.broadcast(OP_STATE, &payload),
        Err(e) => error!(error = %e, "Failed to encode snapshot"),
    }
}

impl MatchHandler for TicTacToeMatch {
    type State = MatchSession;
    type Rejection = AdmissionError;

    #[instrument(skip(self, params))]
    fn init(&mut self, params: &MatchParams) -> MatchSession {
        let mode = Mode::from_params(params);
        info!(%mode, "Match initialized");
        MatchSession::new(mode)
    }

    #[instrument(skip(self, state))]
    fn join_attempt(&self, state: &MatchSession, presence: &Presence) -> Result<(), AdmissionError> {
        admission::admit(state, &presence.user_id).map(|_| ()).inspect_err(|reason| {
            info!(user_id = %presence.user_id, %reason, "Join rejected");
        })
    }

    #[instrument(skip(self, state, dispatcher))]
    fn join(&mut self, state: &mut MatchSession, presences: &[Presence], dispatcher: &dyn Dispatcher) {
        let mut seated = false;
        for presence in presences {
            match admission::admit(state, &presence.user_id) {
                Ok(id) => seated |= admission::seat(state, id).is_some(),
                Err(reason) => warn!(user_id = %presence.user_id, %reason, "Ignoring join"),
            }
        }
        if seated {
            publish(state, dispatcher);
        }
    }

    #[instrument(skip(self, state, dispatcher))]
    fn leave(&mut self, state: &mut MatchSession, presences: &[Presence], dispatcher: &dyn Dispatcher) {
        for presence in presences {
            if state.seat_of(&presence.user_id).is_none() {
                debug!(user_id = %presence.user_id, "Ignoring leave from non-participant");
                continue;
            }
            info!(user_id = %presence.user_id, "Participant left");
            if state.abandon() {
                publish(state, dispatcher);
            }
        }
    }

    #[instrument(skip(self, state, messages, dispatcher), fields(messages = messages.len()))]
    fn tick(
        &mut self,
        state: &mut MatchSession,
        tick: u64,
        messages: &[MatchMessage],
        dispatcher: &dyn Dispatcher,
    ) {
        // A restored session can hand the bot the turn with nothing scheduled.
        if state.bot_to_move() && state.pending_bot().is_none() {
            state.schedule_bot(tick + self.settings.bot_delay_ticks);
        }
        if state.bot_due(tick) && state.play_bot(&mut self.rng).is_some() {
            publish(state, dispatcher);
        }

        for message in messages {
            if message.op_code != OP_MOVE {
                debug!(op_code = message.op_code, "Ignoring non-move message");
                continue;
            }

            match self.handle_move(state, tick, message) {
                Ok(report) => {
                    debug!(?report, "Move processed");
                    publish(state, dispatcher);
                }
                Err(rejection) if rejection.is_malformed() => {
                    warn!(user_id = %message.user_id, %rejection, "Move dropped");
                }
                Err(rejection) => {
                    debug!(user_id = %message.user_id, %rejection, "Move ignored");
                }
            }
        }
    }

    #[instrument(skip(self, state), fields(outcome = %state.outcome()))]
    fn terminate(&mut self, state: &mut MatchSession) {
        info!("Match terminated");
    }
}
