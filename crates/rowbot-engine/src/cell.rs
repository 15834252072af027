use serde::{Deserialize, Serialize};

/// Ownership of a single board square.
///
/// The discriminants are part of the contract: the decision function consumes the board
/// as a flat sequence of these signed values, and the evaluator selects runs by value.
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
    derive_more::IsVariant,
)]
#[repr(i8)]
pub enum Cell {
    /// Piece placed by the opponent (`X` in the console output).
    Opponent = -1,
    /// No piece (`.` in the console output).
    #[default]
    Empty = 0,
    /// Piece placed by us (`O` in the console output).
    Mine = 1,
}

impl Cell {
    pub const ALL: [Cell; 3] = [Cell::Opponent, Cell::Empty, Cell::Mine];

    /// Returns the signed encoding of this cell (`+1`, `-1` or `0`).
    #[must_use]
    pub const fn value(self) -> i8 {
        self as i8
    }

    #[must_use]
    pub const fn from_value(value: i8) -> Option<Self> {
        match value {
            -1 => Some(Cell::Opponent),
            0 => Some(Cell::Empty),
            1 => Some(Cell::Mine),
            _ => None,
        }
    }

    /// Maps a console symbol to a cell.
    ///
    /// `O` is ours and `X` is the opponent's; anything else reads as empty.
    #[must_use]
    pub const fn from_symbol(symbol: char) -> Self {
        match symbol {
            'O' => Cell::Mine,
            'X' => Cell::Opponent,
            _ => Cell::Empty,
        }
    }

    /// Strict variant of [`Cell::from_symbol`] accepting only `O`, `X` and `.`.
    #[must_use]
    pub const fn try_from_symbol(symbol: char) -> Option<Self> {
        match symbol {
            'O' => Some(Cell::Mine),
            'X' => Some(Cell::Opponent),
            '.' => Some(Cell::Empty),
            _ => None,
        }
    }

    #[must_use]
    pub const fn symbol(self) -> char {
        match self {
            Cell::Opponent => 'X',
            Cell::Empty => '.',
            Cell::Mine => 'O',
        }
    }

    /// Exchanges `Mine` and `Opponent`; `Empty` is unchanged.
    #[must_use]
    pub const fn swapped(self) -> Self {
        match self {
            Cell::Opponent => Cell::Mine,
            Cell::Empty => Cell::Empty,
            Cell::Mine => Cell::Opponent,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encoding_is_signed() {
        assert_eq!(Cell::Mine.value(), 1);
        assert_eq!(Cell::Opponent.value(), -1);
        assert_eq!(Cell::Empty.value(), 0);
        for cell in Cell::ALL {
            assert_eq!(Cell::from_value(cell.value()), Some(cell));
        }
        assert_eq!(Cell::from_value(2), None);
    }

    #[test]
    fn test_symbol_mapping() {
        assert_eq!(Cell::from_symbol('O'), Cell::Mine);
        assert_eq!(Cell::from_symbol('X'), Cell::Opponent);
        assert_eq!(Cell::from_symbol('.'), Cell::Empty);
        assert_eq!(Cell::from_symbol('?'), Cell::Empty);
        assert_eq!(Cell::try_from_symbol('?'), None);
        for cell in Cell::ALL {
            assert_eq!(Cell::try_from_symbol(cell.symbol()), Some(cell));
        }
    }

    #[test]
    fn test_swapped() {
        assert_eq!(Cell::Mine.swapped(), Cell::Opponent);
        assert_eq!(Cell::Opponent.swapped(), Cell::Mine);
        assert_eq!(Cell::Empty.swapped(), Cell::Empty);
    }
}
