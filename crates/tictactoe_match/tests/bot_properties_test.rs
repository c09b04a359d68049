//! Property tests for the detector and the bot engine.

use proptest::prelude::*;
use tictactoe_match::{
    BotRng, Board, Cell, Coord, LINES, MatchSession, Outcome, Seat, Snapshot, best_move, choose_move, evaluate,
};

/// Any board, legal or not.
fn any_board() -> impl Strategy<Value = Board> {
    prop::array::uniform9(0u8..3).prop_map(|cells| {
        let codes = [
            [cells[0], cells[1], cells[2]],
            [cells[3], cells[4], cells[5]],
            [cells[6], cells[7], cells[8]],
        ];
        Board::from_codes(codes).expect("codes are in range")
    })
}

fn complete_line(board: &Board) -> Option<Seat> {
    LINES.iter().find_map(|line| match line.map(|c| board.get(c)) {
        [Cell::Taken(a), Cell::Taken(b), Cell::Taken(c)] if a == b && b == c => Some(a),
        _ => None,
    })
}

/// A pvc session with alice in seat one, restored from a snapshot.
fn pvc_session() -> MatchSession {
    let snapshot: Snapshot = serde_json::from_value(serde_json::json!({
        "board": [[0, 0, 0], [0, 0, 0], [0, 0, 0]],
        "turn": 1, "p1": "alice", "p2": "BOT", "winner": 0, "mode": "pvc",
    }))
    .expect("valid snapshot");
    MatchSession::try_from(&snapshot).expect("valid session")
}

proptest! {
    #[test]
    fn detector_matches_first_complete_line(board in any_board()) {
        let expected = match complete_line(&board) {
            Some(seat) => Outcome::Won(seat),
            None if board.is_full() => Outcome::Draw,
            None => Outcome::Undecided,
        };
        prop_assert_eq!(evaluate(&board), expected);
    }

    #[test]
    fn bot_only_picks_empty_cells(board in any_board()) {
        let mut rng = BotRng::new(5);
        match choose_move(&board, &mut rng) {
            Some(coord) => prop_assert!(board.is_empty(coord)),
            None => prop_assert!(board.is_full()),
        }
    }

    #[test]
    fn bot_takes_an_immediate_win(board in any_board()) {
        let winning: Vec<Coord> = board
            .empty_cells()
            .filter(|&c| evaluate(&board.with(c, Seat::Two)) == Outcome::Won(Seat::Two))
            .collect();
        prop_assume!(evaluate(&board) == Outcome::Undecided && !winning.is_empty());

        let pick = best_move(&board, Seat::Two).expect("board has empty cells");
        prop_assert!(winning.contains(&pick));
    }
}

/// Plays every human reply to the bot from `session` to the end.
/// Returns the number of finished games.
fn play_every_line(session: &MatchSession, rng: &mut BotRng) -> usize {
    if session.outcome().is_decided() {
        assert_ne!(session.outcome(), Outcome::Won(Seat::One), "bot lost:\n{}", session.board());
        return 1;
    }
    assert_eq!(session.turn(), Seat::One);
    assert_eq!(session.board().occupied_count() % 2, 0);

    let mut games = 0;
    for coord in session.board().empty_cells() {
        let mut next = session.clone();
        next.process_move("alice", coord.row() as i64, coord.col() as i64, rng)
            .expect("legal move");
        games += play_every_line(&next, rng);
    }
    games
}

#[test]
fn bot_never_loses_to_any_human_line() {
    let mut rng = BotRng::new(11);
    let games = play_every_line(&pvc_session(), &mut rng);
    assert!(games >= 9, "every opening is played out, got {games}");
}
