use std::path::PathBuf;

use anyhow::Context as _;
use rowbot_remote::{
    channel::ProcessChannel,
    config::GameConfig,
    observer::{GameContext, GameObserver as _},
    session::GameSession,
};
use tracing::{info, warn};

use crate::{observer::TracingObserver, schema::elite::EliteFile, util};

#[derive(Debug, Clone, clap::Args)]
pub struct ReplayArg {
    /// Path to the elite file (JSON format)
    elite_file: PathBuf,
    /// Replay only the elite at this position (0 is the best)
    #[arg(long)]
    index: Option<usize>,
}

pub fn run(arg: &ReplayArg, config: &GameConfig) -> anyhow::Result<()> {
    let ReplayArg { elite_file, index } = arg;

    let file: EliteFile = util::read_json_file("elite", elite_file)?;
    info!(
        path = %elite_file.display(),
        elites = file.elites.len(),
        trained_at = %file.trained_at,
        "elite file loaded"
    );

    let mut config = config.clone();
    if config.board_size != file.board_size {
        warn!(
            configured = config.board_size,
            trained = file.board_size,
            "using the board size the elites were trained on"
        );
        config.board_size = file.board_size;
        config.validate().context("Invalid game configuration")?;
    }

    let selected: Vec<_> = match index {
        Some(index) => {
            let elite = file
                .elites
                .get(*index)
                .with_context(|| format!("No elite at index {index}"))?;
            vec![(*index, elite)]
        }
        None => file.elites.iter().enumerate().collect(),
    };

    let mut observer = TracingObserver::default();
    for (i, elite) in selected {
        observer.game_started(&GameContext {
            generation: elite.generation,
            candidate: i,
        });
        let channel = ProcessChannel::spawn(&config)
            .with_context(|| format!("Failed to start {}", config.program.display()))?;
        let mut fitness = 0;
        let report = GameSession::new(channel, &config)
            .play(&elite.policy, &mut fitness, &mut observer)
            .with_context(|| format!("Replay of elite {i} failed"))?;
        println!(
            "elite {i}: {} after {} turns, fitness {} (trained {})",
            report.outcome, report.turns, report.fitness, elite.fitness
        );
        if let Some(board) = &report.final_board {
            println!("{board}");
        }
    }
    Ok(())
}
