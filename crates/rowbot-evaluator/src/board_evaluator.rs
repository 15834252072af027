//! Board evaluation: weighted run counts over every line of a board.
//!
//! # How It Works
//!
//! For one owner, every row, column and diagonal of the board is passed to
//! [`evaluate_line`](crate::line_evaluator::evaluate_line). Diagonals include all lines
//! parallel to the two main diagonals, not only the two longest ones; lines shorter than
//! two cells cannot hold a run and are skipped. The resulting histogram is then weighed:
//!
//! ```text
//! score = 1 × runs(2) + 10 × runs(3) + 100 × Σ runs(len ≥ 4)
//! ```
//!
//! The fitness signal is the difference of both owners' scores:
//!
//! ```text
//! reward = score(Mine) - score(Opponent)
//! ```
//!
//! A full board of one owner therefore scores 100 for every row, column and full-length
//! diagonal plus the contributions of the shorter diagonals.

use rowbot_engine::{Board, Cell};
use serde::{Deserialize, Serialize};

use crate::line_evaluator::{MIN_RUN_LEN, RunHistogram, evaluate_line};

/// Points per run, by run length.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreWeights {
    /// Weight of a run of two.
    pub pair: i32,
    /// Weight of a run of three.
    pub triple: i32,
    /// Weight of a run of four or more.
    pub connected: i32,
}

impl ScoreWeights {
    pub const DEFAULT: Self = Self {
        pair: 1,
        triple: 10,
        connected: 100,
    };

    /// Returns the weight of a single run of `len` cells.
    #[must_use]
    pub const fn weight(&self, len: usize) -> i32 {
        match len {
            0 | 1 => 0,
            2 => self.pair,
            3 => self.triple,
            _ => self.connected,
        }
    }

    /// Collapses a histogram into a score.
    #[must_use]
    pub fn score(&self, histogram: &RunHistogram) -> i32 {
        histogram
            .iter()
            .map(|(len, count)| self.weight(len) * i32::try_from(count).unwrap_or(i32::MAX))
            .sum()
    }
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Scores boards for one owner, and both owners against each other.
#[derive(Debug, Clone, Default)]
pub struct BoardEvaluator {
    weights: ScoreWeights,
}

impl BoardEvaluator {
    #[must_use]
    pub const fn new(weights: ScoreWeights) -> Self {
        Self { weights }
    }

    /// Builds the board-wide run histogram for `owner`.
    #[must_use]
    pub fn histogram(&self, board: &Board, owner: Cell) -> RunHistogram {
        let mut histogram = RunHistogram::new();
        for line in board.lines().filter(|line| line.len() >= MIN_RUN_LEN) {
            evaluate_line(line.cells(), owner, &mut histogram);
        }
        histogram
    }

    /// Scores `board` for `owner`.
    #[must_use]
    pub fn evaluate(&self, board: &Board, owner: Cell) -> i32 {
        self.weights.score(&self.histogram(board, owner))
    }

    /// Returns `evaluate(board, Mine) - evaluate(board, Opponent)`.
    #[must_use]
    pub fn reward(&self, board: &Board) -> i32 {
        self.evaluate(board, Cell::Mine) - self.evaluate(board, Cell::Opponent)
    }
}

/// Scores `board` for `owner` with the default weights.
#[must_use]
pub fn evaluate(board: &Board, owner: Cell) -> i32 {
    BoardEvaluator::default().evaluate(board, owner)
}

/// Computes the reward of `board` with the default weights.
#[must_use]
pub fn reward(board: &Board) -> i32 {
    BoardEvaluator::default().reward(board)
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    fn board(text: &str) -> Board {
        text.parse().unwrap()
    }

    fn mirrored(board: &Board) -> Board {
        let size = board.size();
        let cells = (0..size * size)
            .map(|i| board.get(i / size, size - 1 - i % size))
            .collect();
        Board::from_cells(cells).unwrap()
    }

    fn transposed(board: &Board) -> Board {
        let size = board.size();
        let cells = (0..size * size)
            .map(|i| board.get(i % size, i / size))
            .collect();
        Board::from_cells(cells).unwrap()
    }

    #[test]
    fn test_empty_board_scores_zero() {
        let board = Board::empty(4);
        assert_eq!(evaluate(&board, Cell::Mine), 0);
        assert_eq!(evaluate(&board, Cell::Opponent), 0);
        assert_eq!(reward(&board), 0);
    }

    #[test]
    fn test_single_row_of_three() {
        let board = board("OOO. .... .... ....");
        let evaluator = BoardEvaluator::default();
        let histogram = evaluator.histogram(&board, Cell::Mine);
        assert_eq!(histogram.iter().collect::<Vec<_>>(), vec![(3, 1)]);
        assert_eq!(evaluator.evaluate(&board, Cell::Mine), 10);
    }

    #[test]
    fn test_full_board_scores_every_line() {
        let board = board("OOOO OOOO OOOO OOOO");
        let histogram = BoardEvaluator::default().histogram(&board, Cell::Mine);
        // 4 rows + 4 columns + 2 main diagonals
        assert_eq!(histogram.count(4), 10);
        // two shorter diagonals of each length per direction
        assert_eq!(histogram.count(3), 4);
        assert_eq!(histogram.count(2), 4);
        assert_eq!(evaluate(&board, Cell::Mine), 10 * 100 + 4 * 10 + 4);
        assert_eq!(evaluate(&board, Cell::Opponent), 0);
        assert_eq!(reward(&board), 1044);
    }

    #[test]
    fn test_long_runs_use_connected_weight() {
        let board = board("OOOOOO ...... ...... ...... ...... ......");
        let histogram = BoardEvaluator::default().histogram(&board, Cell::Mine);
        assert_eq!(histogram.count(6), 1);
        assert_eq!(evaluate(&board, Cell::Mine), 100);
    }

    #[test]
    fn test_partial_diagonals_are_scored() {
        // Only the short anti-diagonal through (0,1) and (1,0) holds a run.
        let board = board("XO.. O... .... ...X");
        assert_eq!(evaluate(&board, Cell::Mine), 1);
        // Two opponent pieces on the main diagonal are not adjacent.
        assert_eq!(evaluate(&board, Cell::Opponent), 0);
    }

    #[test]
    fn test_reward_is_difference() {
        let board = board("OO.. XXX. .... ....");
        assert_eq!(reward(&board), 1 - 10);
    }

    #[test]
    fn test_custom_weights() {
        let evaluator = BoardEvaluator::new(ScoreWeights {
            pair: 0,
            triple: 0,
            connected: 1,
        });
        let board = board("OOOO OOOO OOOO OOOO");
        assert_eq!(evaluator.evaluate(&board, Cell::Mine), 10);
    }

    fn any_board() -> impl Strategy<Value = Board> {
        (2_usize..=7).prop_flat_map(|size| {
            prop::collection::vec(
                prop_oneof![Just(Cell::Mine), Just(Cell::Opponent), Just(Cell::Empty)],
                size * size,
            )
            .prop_map(|cells| Board::from_cells(cells).unwrap())
        })
    }

    proptest! {
        #[test]
        fn prop_reward_is_antisymmetric(board in any_board()) {
            prop_assert_eq!(reward(&board.swapped()), -reward(&board));
        }

        #[test]
        fn prop_score_is_invariant_under_reflection(board in any_board()) {
            for owner in Cell::ALL {
                prop_assert_eq!(evaluate(&mirrored(&board), owner), evaluate(&board, owner));
                prop_assert_eq!(evaluate(&transposed(&board), owner), evaluate(&board, owner));
            }
        }

        #[test]
        fn prop_scores_are_non_negative(board in any_board()) {
            prop_assert!(evaluate(&board, Cell::Mine) >= 0);
            prop_assert!(evaluate(&board, Cell::Opponent) >= 0);
        }
    }
}
