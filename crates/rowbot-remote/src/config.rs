//! Configuration of one remote game.
//!
//! Every field has a default matching the reference console game, so a configuration
//! file only needs the fields that differ:
//!
//! ```json
//! {
//!   "program": "./connect_four",
//!   "board_size": 4,
//!   "read_timeout_ms": 5000
//! }
//! ```

use std::{path::PathBuf, time::Duration};

use rowbot_engine::Board;
use serde::{Deserialize, Serialize};

use crate::outcome::PhraseTable;

#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum ConfigError {
    #[display("board size must be at least {min}, got {size}")]
    BoardTooSmall { size: usize, min: usize },
    #[display("win length must be between 2 and the board size, got {win_length}")]
    InvalidWinLength { win_length: usize },
    #[display("prompt delimiter must not be empty")]
    EmptyPrompt,
    #[display("every outcome phrase must be non-empty")]
    IncompletePhrases,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GameConfig {
    /// Path of the game executable.
    pub program: PathBuf,
    /// Extra command-line arguments for the executable.
    pub args: Vec<String>,
    /// Board width and height.
    pub board_size: usize,
    /// Number of pieces in a row needed to win.
    pub win_length: usize,
    /// Player setup answers sent after the board dimensions and win length.
    pub setup_params: [u32; 3],
    /// Text that ends every block of output awaiting input.
    pub prompt: String,
    /// Maximum wait for one prompt; `None` waits forever.
    pub read_timeout_ms: Option<u64>,
    /// Extra reads allowed when a read contains no board rendering.
    pub max_parse_retries: usize,
    /// Pause between turns.
    pub turn_delay_ms: u64,
    /// Subtracted from the fitness when a move is rejected for a full column.
    pub column_full_penalty: i32,
    pub phrases: PhraseTable,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            program: PathBuf::from("GAME230-P1-Connect_Four.exe"),
            args: vec![],
            board_size: 6,
            win_length: 4,
            setup_params: [2, 2, 1],
            prompt: ": ".to_owned(),
            read_timeout_ms: Some(30_000),
            max_parse_retries: 3,
            turn_delay_ms: 0,
            column_full_penalty: 1000,
            phrases: PhraseTable::default(),
        }
    }
}

impl GameConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.board_size < Board::MIN_SIZE {
            return Err(ConfigError::BoardTooSmall {
                size: self.board_size,
                min: Board::MIN_SIZE,
            });
        }
        if !(2..=self.board_size).contains(&self.win_length) {
            return Err(ConfigError::InvalidWinLength {
                win_length: self.win_length,
            });
        }
        if self.prompt.is_empty() {
            return Err(ConfigError::EmptyPrompt);
        }
        if !self.phrases.is_complete() {
            return Err(ConfigError::IncompletePhrases);
        }
        Ok(())
    }

    /// Lines answering the game's setup questions, in the order they are asked.
    ///
    /// Width, height, win length, then the three setup parameters.
    #[must_use]
    pub fn init_commands(&self) -> Vec<String> {
        let [a, b, c] = self.setup_params;
        vec![
            self.board_size.to_string(),
            self.board_size.to_string(),
            self.win_length.to_string(),
            a.to_string(),
            b.to_string(),
            c.to_string(),
        ]
    }

    #[must_use]
    pub fn read_timeout(&self) -> Option<Duration> {
        self.read_timeout_ms.map(Duration::from_millis)
    }

    #[must_use]
    pub fn turn_delay(&self) -> Duration {
        Duration::from_millis(self.turn_delay_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_handshake() {
        let config = GameConfig::default();
        assert_eq!(config.init_commands(), ["6", "6", "4", "2", "2", "1"]);
        assert_eq!(config.validate(), Ok(()));
    }

    #[test]
    fn test_partial_json() {
        let config: GameConfig =
            serde_json::from_str(r#"{"board_size": 4, "read_timeout_ms": null}"#).unwrap();
        assert_eq!(config.board_size, 4);
        assert_eq!(config.read_timeout(), None);
        assert_eq!(config.init_commands()[..3], ["4", "4", "4"]);
        assert_eq!(config.prompt, ": ");
    }

    #[test]
    fn test_unknown_field_rejected() {
        assert!(serde_json::from_str::<GameConfig>(r#"{"bord_size": 4}"#).is_err());
    }

    #[test]
    fn test_validation() {
        let config = GameConfig {
            board_size: 1,
            ..GameConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::BoardTooSmall { size: 1, .. })
        ));

        let config = GameConfig {
            win_length: 7,
            ..GameConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidWinLength { win_length: 7 })
        ));

        let config = GameConfig {
            prompt: String::new(),
            ..GameConfig::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::EmptyPrompt));
    }
}
