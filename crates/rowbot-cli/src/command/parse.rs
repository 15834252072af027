use std::path::PathBuf;

use rowbot_engine::Cell;
use rowbot_remote::{config::GameConfig, outcome::GameOutcome, output_parser::OutputParser};
use serde::Serialize;

use crate::util::{self, Output};

#[derive(Debug, Clone, clap::Args)]
pub struct ParseArg {
    /// Captured game output (stdin if omitted or `-`)
    transcript: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
struct ParseReport {
    outcome: GameOutcome,
    /// Every rendering found, as O/X/. symbols in reading order.
    snapshots: Vec<String>,
    /// Most recent rendering matching the configured board size.
    latest_board: Option<String>,
}

impl ParseReport {
    fn new(text: &str, config: &GameConfig) -> Self {
        let parsed = OutputParser::new(config.phrases.clone()).parse(text);
        Self {
            outcome: parsed.outcome(),
            snapshots: parsed
                .snapshots()
                .iter()
                .map(|cells| cells.iter().copied().map(Cell::symbol).collect())
                .collect(),
            latest_board: parsed
                .latest_board(config.board_size)
                .map(|board| board.to_string()),
        }
    }
}

pub fn run(arg: &ParseArg, config: &GameConfig) -> anyhow::Result<()> {
    let text = util::read_text_input("transcript", arg.transcript.as_deref())?;
    Output::save_json(&ParseReport::new(&text, config), None)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> GameConfig {
        GameConfig {
            board_size: 2,
            ..GameConfig::default()
        }
    }

    #[test]
    fn test_report_lists_snapshots_in_order() {
        let text = "12\r\n..\r\nO.\r\nPlayer X, choose a column: 12\r\n.X\r\nO.\r\n";
        let report = ParseReport::new(text, &config());
        assert_eq!(report.outcome, GameOutcome::Ongoing);
        assert_eq!(report.snapshots, ["..O.", ".XO."]);
        assert_eq!(report.latest_board.as_deref(), Some(".X\nO."));
    }

    #[test]
    fn test_report_without_matching_board() {
        let text = "4O.X.OXO\nThat column is full. Please try a different column";
        let report = ParseReport::new(text, &config());
        assert_eq!(report.outcome, GameOutcome::ColumnFull);
        assert_eq!(report.snapshots, ["O.X.OXO"]);
        assert_eq!(report.latest_board, None);
    }
}
