//! Classification of captured console text into game outcomes.
//!
//! The external game reports its state only in free-form text. Classification is plain
//! case-sensitive substring matching against the four literal phrases of a
//! [`PhraseTable`]. The table is data, so a build of the game with different wording only
//! needs a different configuration.
//!
//! When several phrases are present the fixed priority
//! `ColumnFull > Loss > Draw > Win > Ongoing` decides.

use serde::{Deserialize, Serialize};

/// Result of classifying one read of console output.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    derive_more::Display,
    derive_more::IsVariant,
)]
pub enum GameOutcome {
    /// The chosen column was rejected as full. Ends training of the candidate.
    ColumnFull,
    /// We won.
    Win,
    /// The opponent won.
    Loss,
    /// Tie game.
    Draw,
    /// No terminal phrase seen yet.
    Ongoing,
}

impl GameOutcome {
    #[must_use]
    pub fn is_terminal(self) -> bool {
        !self.is_ongoing()
    }
}

/// The literal phrases announcing each terminal outcome.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PhraseTable {
    pub column_full: String,
    pub win: String,
    pub loss: String,
    pub draw: String,
}

impl Default for PhraseTable {
    fn default() -> Self {
        Self {
            column_full: "That column is full. Please try a different column".to_owned(),
            win: "Player O has won the game!".to_owned(),
            loss: "Player X has won the game!".to_owned(),
            draw: "Tie game!".to_owned(),
        }
    }
}

impl PhraseTable {
    /// Classifies `text` by phrase containment in priority order.
    ///
    /// Empty phrases never match.
    ///
    /// # Example
    ///
    /// ```
    /// use rowbot_remote::outcome::{GameOutcome, PhraseTable};
    ///
    /// let phrases = PhraseTable::default();
    /// assert_eq!(phrases.classify("...Tie game!"), GameOutcome::Draw);
    /// assert_eq!(phrases.classify("Player O, choose a column"), GameOutcome::Ongoing);
    /// ```
    #[must_use]
    pub fn classify(&self, text: &str) -> GameOutcome {
        let candidates = [
            (&self.column_full, GameOutcome::ColumnFull),
            (&self.loss, GameOutcome::Loss),
            (&self.draw, GameOutcome::Draw),
            (&self.win, GameOutcome::Win),
        ];
        candidates
            .into_iter()
            .find(|(phrase, _)| !phrase.is_empty() && text.contains(phrase.as_str()))
            .map_or(GameOutcome::Ongoing, |(_, outcome)| outcome)
    }

    /// Returns `true` if every phrase is non-empty.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        [&self.column_full, &self.win, &self.loss, &self.draw]
            .iter()
            .all(|phrase| !phrase.is_empty())
    }
}
