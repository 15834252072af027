//! Positional evaluation of four-in-a-row boards.
//!
//! This crate turns a [`Board`](rowbot_engine::Board) into the scalar fitness signal used
//! during training. Evaluation happens at two levels:
//!
//! 1. **Line Evaluation** ([`line_evaluator`]) - Groups one line into maximal runs of equal
//!    cells and counts the owner's runs of length ≥ 2 in a [`RunHistogram`](line_evaluator::RunHistogram).
//!
//! 2. **Board Evaluation** ([`board_evaluator`]) - Feeds every row, column and diagonal
//!    (partial diagonals included) to the line evaluator and weighs the accumulated
//!    histogram into a score.
//!
//! # Architecture
//!
//! ```text
//! reward(board) = evaluate(board, Mine) - evaluate(board, Opponent)
//!     ↓ uses
//! Board Evaluation (all lines → one histogram per owner → weighted score)
//!     ↓ uses
//! Line Evaluation (one line → runs → histogram increments)
//! ```
//!
//! # Example
//!
//! ```
//! use rowbot_engine::{Board, Cell};
//! use rowbot_evaluator::board_evaluator::BoardEvaluator;
//!
//! let board: Board = "OOO. X... X... ....".parse().unwrap();
//! let evaluator = BoardEvaluator::default();
//!
//! assert_eq!(evaluator.evaluate(&board, Cell::Mine), 10);
//! assert_eq!(evaluator.evaluate(&board, Cell::Opponent), 1);
//! assert_eq!(evaluator.reward(&board), 9);
//! ```
//!
//! # Design Notes
//!
//! The reward is a difference rather than an absolute score, so it is zero for symmetric
//! positions and flips sign when the two sides are exchanged.
//!
//! Runs of length 5 and more (on boards larger than 4×4) score like runs of length 4.

pub mod board_evaluator;
pub mod line_evaluator;
