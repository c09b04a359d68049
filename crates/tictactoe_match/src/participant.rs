//! Participant identities and seat occupants.

use crate::error::AdmissionError;
use serde::{Deserialize, Serialize};

/// Identity the bot occupies a seat under. No human may use it.
pub const BOT_ID: &str = "BOT";

/// Validated identity of a human participant.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, derive_more::Display)]
pub struct ParticipantId(String);

impl ParticipantId {
    /// Validates a host-supplied identity.
    pub fn new(id: impl Into<String>) -> Result<Self, AdmissionError> {
        let id = id.into();
        if id.is_empty() {
            return Err(AdmissionError::EmptyIdentity);
        }
        if id == BOT_ID {
            return Err(AdmissionError::ReservedIdentity);
        }
        Ok(Self(id))
    }

    /// The raw identity.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Whoever holds a seat.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Occupant {
    /// A human participant.
    Human(ParticipantId),
    /// The bot.
    Bot,
}

impl Occupant {
    /// Identity as published in snapshots.
    pub fn wire_id(&self) -> &str {
        match self {
            Occupant::Human(id) => id.as_str(),
            Occupant::Bot => BOT_ID,
        }
    }

    /// True for human occupants.
    pub fn is_human(&self) -> bool {
        matches!(self, Occupant::Human(_))
    }

    /// True if this occupant is the human with identity `user_id`.
    pub fn is_human_with_id(&self, user_id: &str) -> bool {
        matches!(self, Occupant::Human(id) if id.as_str() == user_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reserved_identity_rejected() {
        assert_eq!(ParticipantId::new(BOT_ID), Err(AdmissionError::ReservedIdentity));
        assert_eq!(ParticipantId::new(""), Err(AdmissionError::EmptyIdentity));
        assert!(ParticipantId::new("bot").is_ok());
    }

    #[test]
    fn test_bot_never_matches_a_human_id() {
        assert!(!Occupant::Bot.is_human_with_id(BOT_ID));
        assert_eq!(Occupant::Bot.wire_id(), BOT_ID);
    }
}
