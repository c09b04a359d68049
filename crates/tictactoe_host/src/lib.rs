//! In-process host for tictactoe_match sessions.
//!
//! Stands in for an external match-hosting framework: it serializes the
//! lifecycle callbacks of each session on a dedicated task, ticks sessions
//! at a configured rate, and fans snapshots out to subscribers.
//!
//! # Example
//!
//! ```no_run
//! use tictactoe_host::{HostConfig, MatchHost};
//! use tictactoe_match::MatchParams;
//!
//! # async fn example() -> Result<(), tictactoe_host::HostError> {
//! let mut host = MatchHost::new(HostConfig::default());
//! let mut params = MatchParams::new();
//! params.insert("mode".into(), serde_json::json!("pvc"));
//!
//! let session = host.create_session(&params);
//! let _events = session.subscribe();
//! session.join("alice").await?;
//! session.send_move("alice", 1, 1).await?;
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod cli;
mod config;
mod error;
mod host;
mod selfplay;
mod terminal;

// Crate-level exports - CLI
pub use cli::{Cli, Command, ModeArg};

// Crate-level exports - Configuration
pub use config::{ConfigError, HostConfig};

// Crate-level exports - Errors
pub use error::HostError;

// Crate-level exports - Host
pub use host::{BroadcastDispatcher, Envelope, MatchHost, SessionHandle, SessionId, spawn_session};

// Crate-level exports - Clients
pub use selfplay::{SelfPlayGame, play_all_openings, play_from};
pub use terminal::{PLAYER_ONE, PLAYER_TWO, mover_for, parse_move, play, render};
