use crate::{Board, Cell};

/// Direction of a [`Line`] across the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, derive_more::IsVariant)]
pub enum Direction {
    /// Left to right along one row.
    Row,
    /// Top to bottom along one column.
    Column,
    /// Top-left to bottom-right diagonal.
    DownRight,
    /// Top-right to bottom-left anti-diagonal.
    DownLeft,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Row,
        Direction::Column,
        Direction::DownRight,
        Direction::DownLeft,
    ];

    /// Number of lines this direction yields on a board of side `size`.
    #[must_use]
    pub const fn line_count(self, size: usize) -> usize {
        match self {
            Direction::Row | Direction::Column => size,
            Direction::DownRight | Direction::DownLeft => 2 * size - 1,
        }
    }
}

/// A borrowed row, column or diagonal of a [`Board`].
///
/// Lines do not copy cells; [`Line::cells`] walks the board on demand.
#[derive(Debug, Clone, Copy)]
pub struct Line<'a> {
    board: &'a Board,
    direction: Direction,
    start: (usize, usize),
    len: usize,
}

impl<'a> Line<'a> {
    // Diagonals are indexed corner to corner: `DownRight` line 0 starts at the top-right
    // corner and line `2 * size - 2` at the bottom-left; `DownLeft` line 0 starts at the
    // top-left corner and line `2 * size - 2` at the bottom-right.
    pub(crate) fn new(board: &'a Board, direction: Direction, index: usize) -> Self {
        let size = board.size();
        assert!(index < direction.line_count(size));
        let (start, len) = match direction {
            Direction::Row => ((index, 0), size),
            Direction::Column => ((0, index), size),
            Direction::DownRight => {
                if index < size {
                    let col = size - 1 - index;
                    ((0, col), size - col)
                } else {
                    let row = index + 1 - size;
                    ((row, 0), size - row)
                }
            }
            Direction::DownLeft => {
                if index < size {
                    ((0, index), index + 1)
                } else {
                    let row = index + 1 - size;
                    ((row, size - 1), size - row)
                }
            }
        };
        Self {
            board,
            direction,
            start,
            len,
        }
    }

    #[must_use]
    pub fn direction(&self) -> Direction {
        self.direction
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Iterates the `(row, col)` coordinates of this line in order.
    pub fn positions(&self) -> impl Iterator<Item = (usize, usize)> + use<'a> {
        let (row, col) = self.start;
        let direction = self.direction;
        (0..self.len).map(move |i| match direction {
            Direction::Row => (row, col + i),
            Direction::Column => (row + i, col),
            Direction::DownRight => (row + i, col + i),
            Direction::DownLeft => (row + i, col - i),
        })
    }

    /// Iterates the cells of this line in order.
    pub fn cells(&self) -> impl Iterator<Item = Cell> + use<'a> {
        let board = self.board;
        self.positions().map(move |(row, col)| board.get(row, col))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn numbered_board() -> Board {
        // Distinguishable layout: row 0 all mine, column 0 all opponent below row 0.
        "OOO X.. X.O".parse().unwrap()
    }

    fn collect(board: &Board, direction: Direction) -> Vec<Vec<(usize, usize)>> {
        board
            .lines_in(direction)
            .map(|line| line.positions().collect())
            .collect()
    }

    #[test]
    fn test_rows_and_columns() {
        let board = numbered_board();
        let rows: Vec<Vec<Cell>> = board
            .lines_in(Direction::Row)
            .map(|l| l.cells().collect())
            .collect();
        assert_eq!(rows[0], vec![Cell::Mine; 3]);
        let cols: Vec<Vec<Cell>> = board
            .lines_in(Direction::Column)
            .map(|l| l.cells().collect())
            .collect();
        assert_eq!(cols[0], vec![Cell::Mine, Cell::Opponent, Cell::Opponent]);
        assert_eq!(cols[2], vec![Cell::Mine, Cell::Empty, Cell::Mine]);
    }

    #[test]
    fn test_down_right_diagonals() {
        let board = Board::empty(3);
        assert_eq!(
            collect(&board, Direction::DownRight),
            vec![
                vec![(0, 2)],
                vec![(0, 1), (1, 2)],
                vec![(0, 0), (1, 1), (2, 2)],
                vec![(1, 0), (2, 1)],
                vec![(2, 0)],
            ]
        );
    }

    #[test]
    fn test_down_left_diagonals() {
        let board = Board::empty(3);
        assert_eq!(
            collect(&board, Direction::DownLeft),
            vec![
                vec![(0, 0)],
                vec![(0, 1), (1, 0)],
                vec![(0, 2), (1, 1), (2, 0)],
                vec![(1, 2), (2, 1)],
                vec![(2, 2)],
            ]
        );
    }

    #[test]
    fn test_diagonals_cover_every_cell_once() {
        for size in 2..=7 {
            let board = Board::empty(size);
            for direction in [Direction::DownRight, Direction::DownLeft] {
                let mut seen = vec![0; size * size];
                for line in board.lines_in(direction) {
                    for (row, col) in line.positions() {
                        seen[row * size + col] += 1;
                    }
                }
                assert!(seen.iter().all(|&n| n == 1), "{direction:?} size {size}");
            }
        }
    }
}
