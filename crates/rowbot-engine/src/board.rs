use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::{BoardShapeError, Cell, Direction, Line, ParseBoardError};

/// Immutable square board of cell ownerships.
///
/// Cells are stored row-major: the cell at `(row, col)` lives at `row * size + col`.
/// A board is always at least 2×2 and `cells.len() == size * size`.
///
/// # Example
///
/// ```
/// use rowbot_engine::{Board, Cell};
///
/// let board = Board::from_cells(vec![Cell::Mine, Cell::Empty, Cell::Opponent, Cell::Mine])
///     .unwrap();
/// assert_eq!(board.size(), 2);
/// assert_eq!(board.get(1, 0), Cell::Opponent);
///
/// assert!(Board::from_cells(vec![Cell::Empty; 5]).is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "Vec<Cell>", into = "Vec<Cell>")]
pub struct Board {
    size: usize,
    cells: Vec<Cell>,
}

impl Board {
    pub const MIN_SIZE: usize = 2;

    /// Creates an all-empty board.
    ///
    /// # Panics
    ///
    /// Panics if `size < Board::MIN_SIZE`.
    #[must_use]
    pub fn empty(size: usize) -> Self {
        assert!(size >= Self::MIN_SIZE, "board size must be at least 2");
        Self {
            size,
            cells: vec![Cell::Empty; size * size],
        }
    }

    /// Reconstructs a board from a flat row-major sequence.
    ///
    /// The side length is the integer square root of the sequence length; sequences whose
    /// length is not a perfect square (or that are smaller than 2×2) are rejected.
    pub fn from_cells(cells: Vec<Cell>) -> Result<Self, BoardShapeError> {
        let len = cells.len();
        let size = len.isqrt();
        if size < Self::MIN_SIZE || size * size != len {
            return Err(BoardShapeError { len });
        }
        Ok(Self { size, cells })
    }

    #[must_use]
    pub fn size(&self) -> usize {
        self.size
    }

    /// Returns all cells in row-major order.
    #[must_use]
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Returns the cell at `(row, col)`.
    ///
    /// # Panics
    ///
    /// Panics if either coordinate is out of range.
    #[must_use]
    pub fn get(&self, row: usize, col: usize) -> Cell {
        assert!(row < self.size && col < self.size);
        self.cells[row * self.size + col]
    }

    /// Flat signed encoding consumed by decision functions.
    #[must_use]
    pub fn to_inputs(&self) -> Vec<i8> {
        self.cells.iter().map(|c| c.value()).collect()
    }

    /// Returns the board seen from the other side (all `Mine`/`Opponent` exchanged).
    #[must_use]
    pub fn swapped(&self) -> Self {
        Self {
            size: self.size,
            cells: self.cells.iter().map(|c| c.swapped()).collect(),
        }
    }

    /// Iterates the rows of the board.
    pub fn rows(&self) -> impl Iterator<Item = &[Cell]> {
        self.cells.chunks_exact(self.size)
    }

    /// Enumerates the lines in one direction.
    ///
    /// Rows and columns yield `size` full-length lines. Each diagonal direction yields
    /// `2 * size - 1` lines of lengths `1..=size`, corner to corner.
    pub fn lines_in(&self, direction: Direction) -> impl Iterator<Item = Line<'_>> {
        let count = direction.line_count(self.size);
        (0..count).map(move |index| Line::new(self, direction, index))
    }

    /// Enumerates every row, column and diagonal (partial diagonals included).
    pub fn lines(&self) -> impl Iterator<Item = Line<'_>> {
        Direction::ALL
            .into_iter()
            .flat_map(move |direction| self.lines_in(direction))
    }
}

impl TryFrom<Vec<Cell>> for Board {
    type Error = BoardShapeError;

    fn try_from(cells: Vec<Cell>) -> Result<Self, Self::Error> {
        Self::from_cells(cells)
    }
}

impl From<Board> for Vec<Cell> {
    fn from(board: Board) -> Self {
        board.cells
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, row) in self.rows().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            for cell in row {
                write!(f, "{}", cell.symbol())?;
            }
        }
        Ok(())
    }
}

/// Parses `O`, `X` and `.` symbols in row-major order; whitespace is ignored.
impl FromStr for Board {
    type Err = ParseBoardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let cells = s
            .chars()
            .filter(|c| !c.is_whitespace())
            .enumerate()
            .map(|(position, symbol)| {
                Cell::try_from_symbol(symbol)
                    .ok_or(ParseBoardError::InvalidSymbol { symbol, position })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Board::from_cells(cells).map_err(ParseBoardError::Shape)
    }
}
