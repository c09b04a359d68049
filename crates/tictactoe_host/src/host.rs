//! In-process match host.
//!
//! Every session runs on its own task. The task is the only thing that
//! touches the session state, so lifecycle callbacks for one session never
//! overlap. Join and leave requests are handled between ticks; move
//! messages are buffered and handed to the next tick.

use crate::config::HostConfig;
use crate::error::HostError;
use std::time::Duration;
use tictactoe_match::{
    BotRng, Dispatcher, MatchHandler, MatchMessage, MatchParams, MoveRequest, OP_MOVE, Presence, TicTacToeMatch,
};
use tokio::sync::{broadcast, mpsc, oneshot};
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, instrument, trace, warn};

/// Unique identifier for a hosted session.
pub type SessionId = String;

/// Capacity of each session's command queue.
const COMMAND_CAPACITY: usize = 64;

/// Capacity of each session's broadcast channel.
const EVENT_CAPACITY: usize = 64;

/// A payload broadcast to a session's participants.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Envelope {
    /// Message kind.
    pub op_code: i64,
    /// Raw payload.
    pub payload: Vec<u8>,
}

/// [`Dispatcher`] backed by a tokio broadcast channel.
#[derive(Debug, Clone)]
pub struct BroadcastDispatcher {
    tx: broadcast::Sender<Envelope>,
}

impl BroadcastDispatcher {
    /// Wraps a broadcast sender.
    pub fn new(tx: broadcast::Sender<Envelope>) -> Self {
        Self { tx }
    }
}

impl Dispatcher for BroadcastDispatcher {
    fn broadcast(&self, op_code: i64, payload: &[u8]) {
        let envelope = Envelope {
            op_code,
            payload: payload.to_vec(),
        };
        if self.tx.send(envelope).is_err() {
            trace!(op_code, "No subscribers for broadcast");
        }
    }
}

enum Command {
    Join {
        presence: Presence,
        reply: oneshot::Sender<Result<(), String>>,
    },
    Leave {
        presence: Presence,
    },
    Message(MatchMessage),
    Shutdown {
        reply: oneshot::Sender<()>,
    },
}

/// Client-side handle to a running session.
#[derive(Debug, Clone)]
pub struct SessionHandle {
    id: SessionId,
    commands: mpsc::Sender<Command>,
    events: broadcast::Sender<Envelope>,
}

impl std::fmt::Debug for Command {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Command::Join { presence, .. } => write!(f, "Join({})", presence.user_id),
            Command::Leave { presence } => write!(f, "Leave({})", presence.user_id),
            Command::Message(message) => write!(f, "Message({}, op {})", message.user_id, message.op_code),
            Command::Shutdown { .. } => write!(f, "Shutdown"),
        }
    }
}

impl SessionHandle {
    /// Session identifier.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Receives every payload broadcast from now on.
    pub fn subscribe(&self) -> broadcast::Receiver<Envelope> {
        self.events.subscribe()
    }

    /// Runs the join check and, if admitted, the join itself.
    #[instrument(skip(self), fields(session_id = %self.id))]
    pub async fn join(&self, user_id: &str) -> Result<(), HostError> {
        let (reply, rx) = oneshot::channel();
        self.send_command(Command::Join {
            presence: Presence::new(user_id),
            reply,
        })
        .await?;
        rx.await
            .map_err(|_| HostError::new("Session closed before answering join"))?
            .map_err(|reason| HostError::new(format!("Join rejected: {}", reason)))
    }

    /// Reports that a participant disconnected.
    #[instrument(skip(self), fields(session_id = %self.id))]
    pub async fn leave(&self, user_id: &str) -> Result<(), HostError> {
        self.send_command(Command::Leave {
            presence: Presence::new(user_id),
        })
        .await
    }

    /// Queues a raw message for the next tick.
    #[instrument(skip(self, data), fields(session_id = %self.id))]
    pub async fn send(&self, user_id: &str, op_code: i64, data: Vec<u8>) -> Result<(), HostError> {
        self.send_command(Command::Message(MatchMessage {
            user_id: user_id.to_string(),
            op_code,
            data,
        }))
        .await
    }

    /// Queues a move for the next tick.
    pub async fn send_move(&self, user_id: &str, row: i64, col: i64) -> Result<(), HostError> {
        let data = MoveRequest::new(row, col).encode()?;
        self.send(user_id, OP_MOVE, data).await
    }

    /// Terminates the session and waits for the task to finish.
    #[instrument(skip(self), fields(session_id = %self.id))]
    pub async fn shutdown(&self) -> Result<(), HostError> {
        let (reply, rx) = oneshot::channel();
        self.send_command(Command::Shutdown { reply }).await?;
        rx.await
            .map_err(|_| HostError::new("Session closed before shutdown completed"))
    }

    async fn send_command(&self, command: Command) -> Result<(), HostError> {
        self.commands
            .send(command)
            .await
            .map_err(|_| HostError::new(format!("Session {} is no longer running", self.id)))
    }
}

/// Creates sessions and owns the process-wide random source.
#[derive(Debug)]
pub struct MatchHost {
    config: HostConfig,
    rng: BotRng,
    next_id: u64,
}

impl MatchHost {
    /// Creates a host. The random source is seeded once here.
    #[instrument]
    pub fn new(config: HostConfig) -> Self {
        let rng = match *config.seed() {
            Some(seed) => BotRng::new(seed),
            None => BotRng::from_entropy(),
        };
        info!(seed = rng.seed(), "Match host ready");
        Self {
            config,
            rng,
            next_id: 0,
        }
    }

    /// Returns the configuration.
    pub fn config(&self) -> &HostConfig {
        &self.config
    }

    /// Starts a tic-tac-toe session with its own forked random source.
    #[instrument(skip(self, params))]
    pub fn create_session(&mut self, params: &MatchParams) -> SessionHandle {
        self.next_id += 1;
        let id = format!("match-{}", self.next_id);
        let handler = TicTacToeMatch::new(self.config.match_settings(), self.rng.fork());
        spawn_session(id, handler, params, self.config.tick_period())
    }
}

/// Starts a session task for any [`MatchHandler`].
#[instrument(skip(handler, params))]
pub fn spawn_session<H>(id: SessionId, mut handler: H, params: &MatchParams, tick_period: Duration) -> SessionHandle
where
    H: MatchHandler + Send + 'static,
    H::State: Send + 'static,
{
    let (commands, rx) = mpsc::channel(COMMAND_CAPACITY);
    let (events, _) = broadcast::channel(EVENT_CAPACITY);
    let dispatcher = BroadcastDispatcher::new(events.clone());
    let state = handler.init(params);

    info!(session_id = %id, "Session started");
    tokio::spawn(run_session(id.clone(), handler, state, rx, dispatcher, tick_period));

    SessionHandle { id, commands, events }
}

async fn run_session<H: MatchHandler>(
    id: SessionId,
    mut handler: H,
    mut state: H::State,
    mut commands: mpsc::Receiver<Command>,
    dispatcher: BroadcastDispatcher,
    tick_period: Duration,
) {
    let mut interval = tokio::time::interval(tick_period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let mut tick: u64 = 0;
    let mut inbox: Vec<MatchMessage> = Vec::new();

    loop {
        tokio::select! {
            _ = interval.tick() => {
                tick += 1;
                let messages = std::mem::take(&mut inbox);
                handler.tick(&mut state, tick, &messages, &dispatcher);
            }
            command = commands.recv() => {
                let Some(command) = command else {
                    debug!(session_id = %id, "All handles dropped");
                    handler.terminate(&mut state);
                    break;
                };
                trace!(session_id = %id, ?command, "Command received");
                match command {
                    Command::Join { presence, reply } => {
                        let result = handler.join_attempt(&state, &presence).map_err(|reason| reason.to_string());
                        if result.is_ok() {
                            handler.join(&mut state, std::slice::from_ref(&presence), &dispatcher);
                        }
                        if reply.send(result).is_err() {
                            warn!(session_id = %id, "Join requester went away");
                        }
                    }
                    Command::Leave { presence } => {
                        handler.leave(&mut state, std::slice::from_ref(&presence), &dispatcher);
                    }
                    Command::Message(message) => inbox.push(message),
                    Command::Shutdown { reply } => {
                        handler.terminate(&mut state);
                        let _ = reply.send(());
                        break;
                    }
                }
            }
        }
    }

    info!(session_id = %id, tick, "Session stopped");
}
