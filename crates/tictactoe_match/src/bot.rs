//! Bot decision engine: full-depth minimax over the 3x3 board.
//!
//! Scores are from the searching seat's point of view. A win scores
//! `10 - depth` so shallower wins are preferred, a loss scores `depth - 10`
//! so losses are delayed, and a draw scores zero. Every branch works on its
//! own copy of the board.

use crate::rng::BotRng;
use crate::rules::evaluate;
use crate::types::{Board, Coord, Outcome, Seat};
use tracing::{debug, instrument, warn};

/// Score of an immediate win.
pub const WIN_SCORE: i32 = 10;

/// Seat the bot always occupies.
pub const BOT_SEAT: Seat = Seat::Two;

/// Chooses the bot's reply, assuming it is [`BOT_SEAT`]'s turn.
///
/// Returns `None` only when the board has no empty cell. Falls back to a
/// uniformly random empty cell if the search produced no candidate.
#[instrument(skip(board, rng), fields(occupied = board.occupied_count()))]
pub fn choose_move(board: &Board, rng: &mut BotRng) -> Option<Coord> {
    if let Some(coord) = best_move(board, BOT_SEAT) {
        debug!(%coord, "Search picked move");
        return Some(coord);
    }

    let empty: Vec<Coord> = board.empty_cells().collect();
    let fallback = rng.choose(&empty).copied();
    if let Some(coord) = fallback {
        warn!(%coord, "Search found no candidate, playing random empty cell");
    }
    fallback
}

/// Best move for `me` on `board`, or `None` if the board is full.
///
/// Ties go to the first candidate in row-major order.
pub fn best_move(board: &Board, me: Seat) -> Option<Coord> {
    let mut best: Option<(Coord, i32)> = None;
    for coord in board.empty_cells() {
        let score = minimax(&board.with(coord, me), me, me.opponent(), 0);
        if best.is_none_or(|(_, best_score)| score > best_score) {
            best = Some((coord, score));
        }
    }
    best.map(|(coord, _)| coord)
}

/// Scores `board` for `me` with `to_move` about to play at `depth`.
pub fn minimax(board: &Board, me: Seat, to_move: Seat, depth: i32) -> i32 {
    match evaluate(board) {
        Outcome::Won(seat) if seat == me => return WIN_SCORE - depth,
        Outcome::Won(_) => return depth - WIN_SCORE,
        Outcome::Draw => return 0,
        Outcome::Undecided => {}
    }

    let scores = board
        .empty_cells()
        .map(|coord| minimax(&board.with(coord, to_move), me, to_move.opponent(), depth + 1));
    let best = if to_move == me {
        scores.max()
    } else {
        scores.min()
    };
    // Undecided boards always have an empty cell.
    best.unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn board(codes: [[u8; 3]; 3]) -> Board {
        Board::from_codes(codes).unwrap()
    }

    #[test]
    fn test_answers_corner_opening_with_center() {
        let b = board([[1, 0, 0], [0, 0, 0], [0, 0, 0]]);
        let mut rng = BotRng::new(0);
        assert_eq!(choose_move(&b, &mut rng), Coord::new(1, 1));
    }

    #[test]
    fn test_takes_immediate_win() {
        // Seat two can win on row 1; seat one threatens row 0.
        let b = board([[1, 1, 0], [2, 2, 0], [1, 0, 0]]);
        assert_eq!(best_move(&b, Seat::Two), Coord::new(1, 2));
    }

    #[test]
    fn test_blocks_immediate_loss() {
        let b = board([[1, 1, 0], [0, 2, 0], [0, 0, 0]]);
        assert_eq!(best_move(&b, Seat::Two), Coord::new(0, 2));
    }

    #[test]
    fn test_full_board_has_no_move() {
        let b = board([[1, 2, 1], [2, 1, 1], [2, 1, 2]]);
        let mut rng = BotRng::new(0);
        assert_eq!(choose_move(&b, &mut rng), None);
    }

    #[test]
    fn test_last_cell_is_played() {
        let b = board([[1, 2, 1], [2, 1, 1], [2, 1, 0]]);
        assert_eq!(best_move(&b, Seat::Two), Coord::new(2, 2));
    }

    #[test]
    fn test_minimax_scores_terminal_positions() {
        let won = board([[2, 2, 2], [1, 1, 0], [1, 0, 0]]);
        assert_eq!(minimax(&won, Seat::Two, Seat::One, 3), WIN_SCORE - 3);
        assert_eq!(minimax(&won, Seat::One, Seat::One, 3), 3 - WIN_SCORE);

        let drawn = board([[1, 2, 1], [2, 1, 1], [2, 1, 2]]);
        assert_eq!(minimax(&drawn, Seat::Two, Seat::One, 8), 0);
    }

    #[test]
    fn test_empty_board_is_a_draw_with_perfect_play() {
        assert_eq!(minimax(&Board::new(), Seat::Two, Seat::One, 0), 0);
    }
}
