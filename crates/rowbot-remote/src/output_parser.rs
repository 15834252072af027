//! Extraction of board renderings from captured console text.
//!
//! # Grammar
//!
//! After line breaks are removed, a board rendering is a single digit `1`-`9` (the last
//! column number of the header) immediately followed by one or more symbols from
//! `{O, X, .}`:
//!
//! ```text
//! 1234          (newlines stripped)
//! ....    ───▶  "1234.........O.XO"  ───▶  match "4" + ".........O.XO"
//! ....
//! .O.X
//! ```
//!
//! `O` is ours and `X` the opponent's. Matches are non-overlapping and returned in the
//! order they appear, so the last one is the most recent position.
//!
//! A read without any rendering is not an error here; the caller decides whether to read
//! again.

use rowbot_engine::{Board, Cell};

use crate::outcome::{GameOutcome, PhraseTable};

/// Boards and outcome extracted from one captured read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedOutput {
    snapshots: Vec<Vec<Cell>>,
    outcome: GameOutcome,
}

impl ParsedOutput {
    /// Returns every rendering in chronological order, as flat cell sequences.
    #[must_use]
    pub fn snapshots(&self) -> &[Vec<Cell>] {
        &self.snapshots
    }

    #[must_use]
    pub fn outcome(&self) -> GameOutcome {
        self.outcome
    }

    /// Returns the renderings that form square boards, in chronological order.
    pub fn boards(&self) -> impl Iterator<Item = Board> + '_ {
        self.snapshots
            .iter()
            .filter_map(|cells| Board::from_cells(cells.clone()).ok())
    }

    /// Returns the most recent rendering that forms a board of side `size`.
    #[must_use]
    pub fn latest_board(&self, size: usize) -> Option<Board> {
        self.snapshots
            .iter()
            .rev()
            .find(|cells| cells.len() == size * size)
            .and_then(|cells| Board::from_cells(cells.clone()).ok())
    }
}

/// Parses console text using a phrase table for classification.
#[derive(Debug, Clone, Default)]
pub struct OutputParser {
    phrases: PhraseTable,
}

impl OutputParser {
    #[must_use]
    pub fn new(phrases: PhraseTable) -> Self {
        Self { phrases }
    }

    /// Extracts all renderings and classifies the text.
    #[must_use]
    pub fn parse(&self, raw: &str) -> ParsedOutput {
        let text = strip_line_breaks(raw);
        ParsedOutput {
            snapshots: extract_snapshots(&text),
            outcome: self.phrases.classify(&text),
        }
    }

    #[must_use]
    pub fn classify(&self, raw: &str) -> GameOutcome {
        self.phrases.classify(&strip_line_breaks(raw))
    }
}

fn strip_line_breaks(raw: &str) -> String {
    raw.chars().filter(|c| !matches!(c, '\n' | '\r')).collect()
}

fn is_board_symbol(c: char) -> bool {
    matches!(c, 'O' | 'X' | '.')
}

/// Finds every `[1-9][OX.]+` match, left to right.
///
/// # Example
///
/// ```
/// use rowbot_engine::Cell::{Empty as E, Mine as M, Opponent as P};
/// use rowbot_remote::output_parser::extract_snapshots;
///
/// assert_eq!(extract_snapshots("4O.X.OXO"), vec![vec![M, E, P, E, M, P, M]]);
/// assert!(extract_snapshots("no board here").is_empty());
/// ```
#[must_use]
pub fn extract_snapshots(text: &str) -> Vec<Vec<Cell>> {
    let chars: Vec<char> = text.chars().collect();
    let mut snapshots = vec![];
    let mut i = 0;
    while i < chars.len() {
        if matches!(chars[i], '1'..='9') {
            let body = &chars[i + 1..];
            let len = body.iter().take_while(|c| is_board_symbol(**c)).count();
            if len > 0 {
                snapshots.push(body[..len].iter().map(|c| Cell::from_symbol(*c)).collect());
                i += 1 + len;
                continue;
            }
        }
        i += 1;
    }
    snapshots
}
