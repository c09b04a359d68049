//! Bot self-play from every opening, as a sanity check of the search.

use std::time::{Duration, Instant};
use tictactoe_match::{Board, Coord, Outcome, Seat, best_move, evaluate};
use tracing::{info, instrument};

/// Result of one self-play game.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelfPlayGame {
    /// Seat one's first move.
    pub opening: Coord,
    /// How the game ended.
    pub outcome: Outcome,
    /// Moves played, opening included.
    pub plies: usize,
    /// Time spent searching.
    pub elapsed: Duration,
}

/// Plays the search against itself after `opening`.
#[instrument]
pub fn play_from(opening: Coord) -> SelfPlayGame {
    let started = Instant::now();
    let mut board = Board::new().with(opening, Seat::One);
    let mut to_move = Seat::Two;
    let mut plies = 1;

    let outcome = loop {
        let outcome = evaluate(&board);
        if outcome.is_decided() {
            break outcome;
        }
        let Some(coord) = best_move(&board, to_move) else {
            break outcome;
        };
        board = board.with(coord, to_move);
        to_move = to_move.opponent();
        plies += 1;
    };

    let game = SelfPlayGame {
        opening,
        outcome,
        plies,
        elapsed: started.elapsed(),
    };
    info!(%opening, %outcome, plies, "Self-play game finished");
    game
}

/// Plays one game per opening cell, in row-major order.
pub fn play_all_openings() -> Vec<SelfPlayGame> {
    Coord::ALL.into_iter().map(play_from).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_perfect_play_draws_from_every_opening() {
        for game in play_all_openings() {
            assert_eq!(game.outcome, Outcome::Draw, "opening {}", game.opening);
            assert_eq!(game.plies, 9);
        }
    }
}
