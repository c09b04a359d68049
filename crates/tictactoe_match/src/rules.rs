//! Win and terminal detection.
//!
//! Pure functions over a [`Board`]. Lines are scanned in a fixed order
//! (rows, then columns, then diagonals) and the first complete line wins,
//! so hand-built boards with several lines always evaluate the same way.

use crate::types::{Board, Cell, Coord, Outcome};

/// The eight winning lines in scan order.
pub const LINES: [[Coord; 3]; 8] = [
    // Rows
    [Coord::at(0, 0), Coord::at(0, 1), Coord::at(0, 2)],
    [Coord::at(1, 0), Coord::at(1, 1), Coord::at(1, 2)],
    [Coord::at(2, 0), Coord::at(2, 1), Coord::at(2, 2)],
    // Columns
    [Coord::at(0, 0), Coord::at(1, 0), Coord::at(2, 0)],
    [Coord::at(0, 1), Coord::at(1, 1), Coord::at(2, 1)],
    [Coord::at(0, 2), Coord::at(1, 2), Coord::at(2, 2)],
    // Diagonals
    [Coord::at(0, 0), Coord::at(1, 1), Coord::at(2, 2)],
    [Coord::at(0, 2), Coord::at(1, 1), Coord::at(2, 0)],
];

/// Evaluates a board.
///
/// Returns the winner of the first complete line, [`Outcome::Draw`] for a
/// full board without a line, and [`Outcome::Undecided`] otherwise.
pub fn evaluate(board: &Board) -> Outcome {
    for [a, b, c] in LINES {
        if let Cell::Taken(seat) = board.get(a)
            && board.get(b) == Cell::Taken(seat)
            && board.get(c) == Cell::Taken(seat)
        {
            return Outcome::Won(seat);
        }
    }

    if board.is_full() {
        Outcome::Draw
    } else {
        Outcome::Undecided
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Seat;

    fn board(codes: [[u8; 3]; 3]) -> Board {
        Board::from_codes(codes).unwrap()
    }

    #[test]
    fn test_empty_board_undecided() {
        assert_eq!(evaluate(&Board::new()), Outcome::Undecided);
    }

    #[test]
    fn test_top_row_win() {
        assert_eq!(
            evaluate(&board([[1, 1, 1], [2, 2, 0], [0, 0, 0]])),
            Outcome::Won(Seat::One)
        );
    }

    #[test]
    fn test_column_win() {
        assert_eq!(
            evaluate(&board([[1, 2, 1], [0, 2, 1], [0, 2, 0]])),
            Outcome::Won(Seat::Two)
        );
    }

    #[test]
    fn test_anti_diagonal_win() {
        assert_eq!(
            evaluate(&board([[1, 1, 2], [1, 2, 0], [2, 0, 0]])),
            Outcome::Won(Seat::Two)
        );
    }

    #[test]
    fn test_win_on_full_board_beats_draw() {
        assert_eq!(
            evaluate(&board([[1, 2, 1], [1, 2, 2], [1, 1, 2]])),
            Outcome::Won(Seat::One)
        );
    }

    #[test]
    fn test_full_board_without_line_is_draw() {
        assert_eq!(
            evaluate(&board([[1, 2, 1], [2, 1, 1], [2, 1, 2]])),
            Outcome::Draw
        );
    }

    #[test]
    fn test_first_line_in_scan_order_wins() {
        assert_eq!(
            evaluate(&board([[2, 2, 2], [0, 0, 0], [1, 1, 1]])),
            Outcome::Won(Seat::Two)
        );
        assert_eq!(
            evaluate(&board([[1, 0, 2], [1, 0, 2], [1, 0, 2]])),
            Outcome::Won(Seat::One)
        );
    }
}
