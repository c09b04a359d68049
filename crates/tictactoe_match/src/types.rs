//! Core domain types for a tic-tac-toe match.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::{debug, instrument};

/// One of the two seats in a match.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::EnumIter, derive_more::Display,
)]
pub enum Seat {
    /// First seat, always moves first.
    #[display("seat one")]
    One,
    /// Second seat, taken by the bot in player-vs-automated matches.
    #[display("seat two")]
    Two,
}

impl Seat {
    /// Returns the other seat.
    pub fn opponent(self) -> Self {
        match self {
            Seat::One => Seat::Two,
            Seat::Two => Seat::One,
        }
    }

    /// Wire code for this seat (1 or 2).
    pub fn code(self) -> u8 {
        match self {
            Seat::One => 1,
            Seat::Two => 2,
        }
    }

    /// Parses a wire code.
    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            1 => Some(Seat::One),
            2 => Some(Seat::Two),
            _ => None,
        }
    }
}

/// A single board cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Cell {
    /// Nobody has played here.
    #[default]
    Empty,
    /// Marked by a seat. Never reverts to empty.
    Taken(Seat),
}

impl Cell {
    /// Wire code: 0 for empty, otherwise the seat code.
    pub fn code(self) -> u8 {
        match self {
            Cell::Empty => 0,
            Cell::Taken(seat) => seat.code(),
        }
    }

    /// Parses a wire code.
    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(Cell::Empty),
            other => Seat::from_code(other).map(Cell::Taken),
        }
    }
}

/// Result of a match. Kept separate from [`Cell`] so "no result yet"
/// can never be confused with "empty cell".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, derive_more::Display)]
pub enum Outcome {
    /// Play continues.
    #[default]
    #[display("undecided")]
    Undecided,
    /// A seat completed a line.
    #[display("{_0} wins")]
    Won(Seat),
    /// Board filled without a line, or the match was abandoned.
    #[display("draw")]
    Draw,
}

impl Outcome {
    /// Wire code: 0 undecided, 1/2 seat win, 3 draw.
    pub fn code(self) -> u8 {
        match self {
            Outcome::Undecided => 0,
            Outcome::Won(seat) => seat.code(),
            Outcome::Draw => 3,
        }
    }

    /// Parses a wire code.
    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(Outcome::Undecided),
            3 => Some(Outcome::Draw),
            other => Seat::from_code(other).map(Outcome::Won),
        }
    }

    /// True once the match has a result.
    pub fn is_decided(self) -> bool {
        self != Outcome::Undecided
    }
}

/// Who the second seat is played by.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    strum::EnumString,
    strum::AsRefStr,
    derive_more::Display,
)]
pub enum Mode {
    /// Two human participants.
    #[default]
    #[serde(rename = "pvp")]
    #[strum(serialize = "pvp")]
    #[display("pvp")]
    PlayerVsPlayer,
    /// One human against the bot.
    #[serde(rename = "pvc")]
    #[strum(serialize = "pvc")]
    #[display("pvc")]
    PlayerVsAutomated,
}

/// Session creation parameters as handed over by the host.
pub type MatchParams = HashMap<String, serde_json::Value>;

impl Mode {
    /// Reads the `mode` key from session parameters.
    ///
    /// Anything other than a recognized string falls back to
    /// [`Mode::PlayerVsPlayer`].
    #[instrument(skip(params))]
    pub fn from_params(params: &MatchParams) -> Self {
        let mode = params
            .get("mode")
            .and_then(serde_json::Value::as_str)
            .and_then(|raw| raw.parse().ok())
            .unwrap_or_default();
        debug!(%mode, "Resolved match mode");
        mode
    }
}

/// An in-bounds board coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, derive_more::Display)]
#[display("({row}, {col})")]
pub struct Coord {
    row: usize,
    col: usize,
}

impl Coord {
    /// All nine coordinates in row-major order.
    pub const ALL: [Coord; 9] = [
        Coord::at(0, 0),
        Coord::at(0, 1),
        Coord::at(0, 2),
        Coord::at(1, 0),
        Coord::at(1, 1),
        Coord::at(1, 2),
        Coord::at(2, 0),
        Coord::at(2, 1),
        Coord::at(2, 2),
    ];

    /// Builds a coordinate from untrusted input. Returns `None` outside `[0, 2]`.
    pub fn new(row: i64, col: i64) -> Option<Self> {
        let in_range = |v: i64| (0..3).contains(&v);
        (in_range(row) && in_range(col)).then(|| Coord::at(row as usize, col as usize))
    }

    pub(crate) const fn at(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// Row index (0-2).
    pub fn row(self) -> usize {
        self.row
    }

    /// Column index (0-2).
    pub fn col(self) -> usize {
        self.col
    }
}

/// 3x3 board.
///
/// `Copy` on purpose: the search hands every branch its own board
/// instead of mutating and restoring a shared buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Board {
    cells: [[Cell; 3]; 3],
}

impl Board {
    /// Creates an empty board.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a board from wire codes (0 empty, 1/2 seats).
    pub fn from_codes(codes: [[u8; 3]; 3]) -> Option<Self> {
        let mut board = Self::new();
        for coord in Coord::ALL {
            board.cells[coord.row][coord.col] = Cell::from_code(codes[coord.row][coord.col])?;
        }
        Some(board)
    }

    /// Wire codes for every cell.
    pub fn codes(&self) -> [[u8; 3]; 3] {
        self.cells.map(|row| row.map(Cell::code))
    }

    /// Returns the cell at a coordinate.
    pub fn get(&self, coord: Coord) -> Cell {
        self.cells[coord.row][coord.col]
    }

    /// Checks if a cell is empty.
    pub fn is_empty(&self, coord: Coord) -> bool {
        self.get(coord) == Cell::Empty
    }

    /// Returns a copy of this board with `coord` marked for `seat`.
    pub fn with(mut self, coord: Coord, seat: Seat) -> Self {
        self.cells[coord.row][coord.col] = Cell::Taken(seat);
        self
    }

    /// Marks a cell in place.
    pub(crate) fn mark(&mut self, coord: Coord, seat: Seat) {
        self.cells[coord.row][coord.col] = Cell::Taken(seat);
    }

    /// Empty cells in row-major order.
    pub fn empty_cells(&self) -> impl Iterator<Item = Coord> + '_ {
        Coord::ALL.into_iter().filter(|&coord| self.is_empty(coord))
    }

    /// Number of marked cells.
    pub fn occupied_count(&self) -> usize {
        Coord::ALL.iter().filter(|&&coord| !self.is_empty(coord)).count()
    }

    /// True when no cell is empty.
    pub fn is_full(&self) -> bool {
        self.empty_cells().next().is_none()
    }
}

impl std::fmt::Display for Board {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (r, row) in self.cells.iter().enumerate() {
            for (c, cell) in row.iter().enumerate() {
                let symbol = match cell {
                    Cell::Empty => '.',
                    Cell::Taken(Seat::One) => 'X',
                    Cell::Taken(Seat::Two) => 'O',
                };
                write!(f, "{symbol}")?;
                if c < 2 {
                    write!(f, "|")?;
                }
            }
            if r < 2 {
                writeln!(f)?;
                writeln!(f, "-+-+-")?;
            }
        }
        Ok(())
    }
}
