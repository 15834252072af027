use std::{io, path::PathBuf, thread};

use anyhow::Context as _;
use rowbot_remote::{cancel::CancelToken, channel::ProcessLauncher, config::GameConfig};
use rowbot_training::{
    source::{RandomSource, RandomSourceParams},
    trainer::{Trainer, TrainingError, TrainingParams},
};
use tracing::{info, warn};

use crate::{observer::TracingObserver, schema::elite::EliteFile, util::Output};

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct TrainArg {
    /// Candidates per generation
    #[arg(long, default_value_t = 20)]
    population: usize,
    /// Number of generations to evaluate
    #[arg(long, default_value_t = 100)]
    generations: usize,
    /// Candidates scoring strictly above this fitness are saved
    #[arg(long, default_value_t = 100, allow_negative_numbers = true)]
    elite_threshold: i32,
    /// Best candidates carried unchanged into the next generation
    #[arg(long, default_value_t = 2)]
    carry: usize,
    /// Standard deviation of random policy weights
    #[arg(long, default_value_t = 1.0)]
    sigma: f32,
    /// Seed for reproducible candidate proposals
    #[arg(long)]
    seed: Option<u64>,
    /// Extra games granted to a candidate whose game failed
    #[arg(long, default_value_t = 1)]
    transport_retries: usize,
    /// Elite file, rewritten whenever it changes (stdout at the end if omitted)
    #[arg(long)]
    output: Option<PathBuf>,
}

pub(crate) fn run(arg: &TrainArg, config: &GameConfig) -> anyhow::Result<()> {
    let TrainArg {
        population,
        generations,
        elite_threshold,
        carry,
        sigma,
        seed,
        transport_retries,
        output,
    } = arg;

    let source = RandomSource::new(
        RandomSourceParams {
            board_size: config.board_size,
            population: *population,
            carry: *carry,
            sigma: *sigma,
        },
        *seed,
    )
    .context("Invalid --sigma for random policies")?;
    let params = TrainingParams {
        transport_retries: *transport_retries,
    };
    let cancel = CancelToken::new();
    let mut trainer = Trainer::new(ProcessLauncher, config, source, params)
        .context("Failed to set up training")?
        .with_cancel_token(cancel.clone());
    spawn_quit_listener(cancel);

    info!(
        program = %config.program.display(),
        population,
        generations,
        "training started, enter q to stop"
    );
    let mut elites = EliteFile::new(config.board_size, *elite_threshold);
    let mut observer = TracingObserver::default();
    for _ in 0..*generations {
        let generation = match trainer.step(&mut observer) {
            Ok(generation) => generation,
            Err(TrainingError::Cancelled) => {
                warn!(
                    generation = trainer.next_generation(),
                    "training cancelled"
                );
                break;
            }
            Err(e) => return Err(e).context("Training failed"),
        };
        let changed = elites.record(&generation);
        if changed > 0
            && let Some(path) = output
        {
            Output::save_json(&elites, Some(path.as_path()))?;
            info!(path = %path.display(), elites = elites.elites.len(), "elites saved");
        }
    }

    if output.is_none() {
        Output::save_json(&elites, None)?;
    }
    info!(
        generations = elites.generations,
        elites = elites.elites.len(),
        best = ?elites.elites.first().map(|e| e.fitness),
        "training completed"
    );
    Ok(())
}

/// Cancels training when `q` is entered on stdin.
fn spawn_quit_listener(cancel: CancelToken) {
    let spawned = thread::Builder::new()
        .name("quit-listener".to_owned())
        .spawn(move || {
            for line in io::stdin().lines() {
                let Ok(line) = line else {
                    break;
                };
                if line.trim().eq_ignore_ascii_case("q") {
                    info!("quit requested, stopping before the next move");
                    cancel.cancel();
                    break;
                }
            }
        });
    if let Err(e) = spawned {
        warn!(error = %e, "quit listener unavailable");
    }
}
