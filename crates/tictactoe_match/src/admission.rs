//! Admission control and seat assignment.
//!
//! [`admit`] is the advisory pre-check run on a join attempt; [`seat`] runs
//! on the confirmed join and is the only place seats get filled.

use crate::error::AdmissionError;
use crate::participant::{Occupant, ParticipantId};
use crate::session::MatchSession;
use crate::types::{Mode, Seat};
use tracing::{debug, info, instrument, warn};

/// Decides whether `user_id` may take a seat in `session`.
#[instrument(skip(session), fields(mode = %session.mode(), humans = session.human_count()))]
pub fn admit(session: &MatchSession, user_id: &str) -> Result<ParticipantId, AdmissionError> {
    let id = ParticipantId::new(user_id)?;

    if session.seat_of(id.as_str()).is_some() {
        return Err(AdmissionError::AlreadySeated);
    }
    if session.mode() == Mode::PlayerVsAutomated && session.human_count() >= 1 {
        return Err(AdmissionError::OneHumanOnly);
    }
    if session.human_count() >= 2 {
        return Err(AdmissionError::SessionFull);
    }

    debug!(participant = %id, "Join admitted");
    Ok(id)
}

/// Seats a confirmed participant in the first free seat.
///
/// Seat two only goes to a second human in player-vs-player mode. In
/// player-vs-automated mode the bot fills seat two as soon as seat one is
/// taken. Returns the seat given to `participant`, if any.
#[instrument(skip(session), fields(mode = %session.mode()))]
pub fn seat(session: &mut MatchSession, participant: ParticipantId) -> Option<Seat> {
    let assigned = if session.occupant(Seat::One).is_none() {
        session.assign(Seat::One, Occupant::Human(participant.clone()));
        Some(Seat::One)
    } else if session.mode() == Mode::PlayerVsPlayer
        && session.assign(Seat::Two, Occupant::Human(participant.clone()))
    {
        Some(Seat::Two)
    } else {
        warn!(%participant, "No seat left for participant");
        None
    };

    if let Some(seat) = assigned {
        info!(%participant, %seat, "Participant seated");
    }

    if session.mode() == Mode::PlayerVsAutomated
        && session.occupant(Seat::One).is_some()
        && session.assign(Seat::Two, Occupant::Bot)
    {
        info!("Bot assigned to seat two");
    }

    assigned
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::participant::BOT_ID;

    fn join(session: &mut MatchSession, user_id: &str) -> Result<Option<Seat>, AdmissionError> {
        let id = admit(session, user_id)?;
        Ok(seat(session, id))
    }

    #[test]
    fn test_pvp_fills_both_seats_then_full() {
        let mut session = MatchSession::new(Mode::PlayerVsPlayer);
        assert_eq!(join(&mut session, "alice"), Ok(Some(Seat::One)));
        assert_eq!(join(&mut session, "bob"), Ok(Some(Seat::Two)));
        assert_eq!(join(&mut session, "carol"), Err(AdmissionError::SessionFull));
    }

    #[test]
    fn test_pvc_seats_bot_and_rejects_second_human() {
        let mut session = MatchSession::new(Mode::PlayerVsAutomated);
        assert_eq!(join(&mut session, "alice"), Ok(Some(Seat::One)));
        assert_eq!(session.occupant(Seat::Two), Some(&Occupant::Bot));
        assert_eq!(join(&mut session, "bob"), Err(AdmissionError::OneHumanOnly));
        assert_eq!(
            AdmissionError::OneHumanOnly.to_string(),
            "only one human participant allowed"
        );
    }

    #[test]
    fn test_reserved_identity_cannot_join() {
        let session = MatchSession::new(Mode::PlayerVsPlayer);
        assert_eq!(admit(&session, BOT_ID), Err(AdmissionError::ReservedIdentity));
    }

    #[test]
    fn test_same_participant_cannot_take_both_seats() {
        let mut session = MatchSession::new(Mode::PlayerVsPlayer);
        join(&mut session, "alice").unwrap();
        assert_eq!(admit(&session, "alice"), Err(AdmissionError::AlreadySeated));
    }

    #[test]
    fn test_rejection_leaves_session_untouched() {
        let mut session = MatchSession::new(Mode::PlayerVsAutomated);
        join(&mut session, "alice").unwrap();
        let before = session.clone();
        assert!(admit(&session, "bob").is_err());
        assert_eq!(session, before);
    }
}
