use std::path::PathBuf;

use anyhow::Context as _;
use rowbot_engine::{Board, Cell};
use rowbot_evaluator::board_evaluator::BoardEvaluator;
use serde::Serialize;

use crate::util::{self, Output};

#[derive(Debug, Clone, clap::Args)]
pub struct ScoreArg {
    /// Board file with one row of O/X/. per line (stdin if omitted or `-`)
    board: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
struct ScoreReport {
    size: usize,
    mine: i32,
    opponent: i32,
    reward: i32,
}

impl ScoreReport {
    fn new(board: &Board) -> Self {
        let evaluator = BoardEvaluator::default();
        Self {
            size: board.size(),
            mine: evaluator.evaluate(board, Cell::Mine),
            opponent: evaluator.evaluate(board, Cell::Opponent),
            reward: evaluator.reward(board),
        }
    }
}

pub fn run(arg: &ScoreArg) -> anyhow::Result<()> {
    let text = util::read_text_input("board", arg.board.as_deref())?;
    let board: Board = text.parse().context("Failed to parse board")?;
    Output::save_json(&ScoreReport::new(&board), None)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report() {
        let board: Board = "OOO.\nX...\nX...\n....\n".parse().unwrap();
        assert_eq!(
            ScoreReport::new(&board),
            ScoreReport {
                size: 4,
                mine: 10,
                opponent: 1,
                reward: 9,
            }
        );
    }
}
