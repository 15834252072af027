//! Line evaluation: run-length grouping of a single line.
//!
//! A line is scanned left to right and split into maximal runs of identical cells. Empty
//! runs take part in the grouping (they separate the owner's pieces) but only runs that
//! belong to the owner and span at least two cells are recorded.
//!
//! ```text
//! line:   O O O . X X O
//! runs:   (O,3) (.,1) (X,2) (O,1)
//! owner O → histogram {3: 1}
//! owner X → histogram {2: 1}
//! ```

use std::collections::BTreeMap;

use rowbot_engine::Cell;

/// Shortest run that is recorded in a histogram.
pub const MIN_RUN_LEN: usize = 2;

/// A maximal run of equal cells within a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Run {
    pub cell: Cell,
    pub len: usize,
}

/// Iterator adapter yielding the maximal runs of a cell sequence.
///
/// Created by [`runs`].
#[derive(Debug, Clone)]
pub struct Runs<I>
where
    I: Iterator<Item = Cell>,
{
    cells: std::iter::Peekable<I>,
}

impl<I> Iterator for Runs<I>
where
    I: Iterator<Item = Cell>,
{
    type Item = Run;

    fn next(&mut self) -> Option<Self::Item> {
        let cell = self.cells.next()?;
        let mut len = 1;
        while self.cells.next_if_eq(&cell).is_some() {
            len += 1;
        }
        Some(Run { cell, len })
    }
}

/// Groups a cell sequence into maximal runs of equal cells.
///
/// # Example
///
/// ```
/// use rowbot_engine::Cell::{Empty as E, Mine as M, Opponent as P};
/// use rowbot_evaluator::line_evaluator::{Run, runs};
///
/// let grouped: Vec<Run> = runs([M, M, E, P]).collect();
/// assert_eq!(
///     grouped,
///     [Run { cell: M, len: 2 }, Run { cell: E, len: 1 }, Run { cell: P, len: 1 }],
/// );
/// ```
pub fn runs<I>(cells: I) -> Runs<I::IntoIter>
where
    I: IntoIterator<Item = Cell>,
{
    Runs {
        cells: cells.into_iter().peekable(),
    }
}

/// Occurrence counts of run lengths for one owner.
///
/// Only lengths of at least [`MIN_RUN_LEN`] are ever recorded. Lines are at most `size`
/// cells long, so the recorded lengths lie in `2..=size`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunHistogram {
    counts: BTreeMap<usize, u32>,
}

impl RunHistogram {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records one run of the given length.
    pub fn record(&mut self, len: usize) {
        debug_assert!(len >= MIN_RUN_LEN);
        *self.counts.entry(len).or_default() += 1;
    }

    /// Returns how many runs of exactly `len` cells were recorded.
    #[must_use]
    pub fn count(&self, len: usize) -> u32 {
        self.counts.get(&len).copied().unwrap_or(0)
    }

    /// Iterates `(length, count)` pairs in ascending length order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, u32)> + '_ {
        self.counts.iter().map(|(len, count)| (*len, *count))
    }

    #[must_use]
    pub fn total_runs(&self) -> u32 {
        self.counts.values().sum()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    pub fn clear(&mut self) {
        self.counts.clear();
    }
}

/// Accumulates the owner's runs of one line into `histogram`.
///
/// The histogram is not reset, so calling this for every line of a board yields the
/// board-wide histogram.
pub fn evaluate_line<I>(line: I, owner: Cell, histogram: &mut RunHistogram)
where
    I: IntoIterator<Item = Cell>,
{
    for run in runs(line) {
        if run.cell == owner && run.len >= MIN_RUN_LEN {
            histogram.record(run.len);
        }
    }
}
