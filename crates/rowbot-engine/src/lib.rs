//! Board model for the four-in-a-row console game.
//!
//! This crate holds the typed state that the rest of the workspace works on:
//!
//! - [`Cell`] - Ownership of a single square (mine, opponent, empty) with its signed encoding
//! - [`Board`] - Immutable N×N grid stored row-major
//! - [`Line`] - Borrowed view of one row, column or diagonal of a board
//!
//! The board carries no game rules. It is reconstructed from the external game's console
//! output on every read and thrown away afterwards.
//!
//! # Example
//!
//! ```
//! use rowbot_engine::{Board, Cell};
//!
//! let board: Board = "OO.. X... .... ....".parse().unwrap();
//! assert_eq!(board.size(), 4);
//! assert_eq!(board.get(0, 1), Cell::Mine);
//! assert_eq!(board.get(1, 0), Cell::Opponent);
//! assert_eq!(board.to_inputs()[..4], [1_i8, 1, 0, 0]);
//! ```

pub use self::{board::*, cell::*, line::*};

mod board;
mod cell;
mod line;

/// Returned when a flat cell sequence cannot form a square board.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("{len} cells do not form a square board of side >= 2")]
pub struct BoardShapeError {
    len: usize,
}

impl BoardShapeError {
    #[must_use]
    pub fn cell_count(&self) -> usize {
        self.len
    }
}

#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum ParseBoardError {
    #[display("unexpected symbol {symbol:?} at position {position}")]
    InvalidSymbol { symbol: char, position: usize },
    #[display("invalid board shape")]
    Shape(BoardShapeError),
}
