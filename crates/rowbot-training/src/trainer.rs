//! Sequencing of games across candidates and generations.
//!
//! Each [`Trainer::step`] asks the [`CandidateSource`] for a generation of policies and
//! plays one game per policy, one after another, each against a freshly launched game. The
//! game's final fitness is recorded on the candidate.
//!
//! # Failure policy
//!
//! A game that fails (transport failure or no board in the output) is replayed in a fresh
//! process up to `transport_retries` more times. If every attempt fails, the candidate is
//! kept without a fitness and training moves on. A game that cannot be launched at all
//! stops training, since every other candidate would fail the same way. Cancellation stops
//! training before the next turn of the running game.

use rowbot_remote::{
    cancel::CancelToken,
    channel::{ChannelError, Launcher},
    config::{ConfigError, GameConfig},
    observer::{GameContext, GameObserver},
    session::{GameSession, SessionError},
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::{
    candidate::{self, Candidate},
    policy::LinearPolicy,
    source::CandidateSource,
};

#[derive(Debug, derive_more::Display, derive_more::Error)]
pub enum TrainingError {
    #[display("invalid game configuration")]
    Config(ConfigError),
    #[display("failed to launch the game")]
    Launch(ChannelError),
    #[display("training cancelled")]
    Cancelled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrainingParams {
    /// Additional games granted to a candidate whose game failed.
    pub transport_retries: usize,
}

impl Default for TrainingParams {
    fn default() -> Self {
        Self {
            transport_retries: 1,
        }
    }
}

/// Fitness statistics of one evaluated generation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationSummary {
    pub generation: usize,
    /// Candidates that finished a game.
    pub evaluated: usize,
    /// Candidates whose every attempt failed.
    pub failed: usize,
    pub best: Option<i32>,
    pub worst: Option<i32>,
    pub mean: Option<f64>,
}

impl GenerationSummary {
    #[must_use]
    pub fn new(generation: usize, candidates: &[Candidate]) -> Self {
        let fitness: Vec<i32> = candidates.iter().filter_map(|c| c.fitness).collect();
        let mean = (!fitness.is_empty()).then(|| {
            let sum: f64 = fitness.iter().copied().map(f64::from).sum();
            #[expect(clippy::cast_precision_loss)]
            let count = fitness.len() as f64;
            sum / count
        });
        Self {
            generation,
            evaluated: fitness.len(),
            failed: candidates.len() - fitness.len(),
            best: fitness.iter().copied().max(),
            worst: fitness.iter().copied().min(),
            mean,
        }
    }
}

/// One evaluated generation.
#[derive(Debug, Clone, PartialEq)]
pub struct Generation {
    pub number: usize,
    /// Sorted best first, failed candidates last.
    pub candidates: Vec<Candidate>,
    pub summary: GenerationSummary,
}

impl Generation {
    /// Returns the candidates whose fitness is strictly greater than `threshold`, best first.
    pub fn elites(&self, threshold: i32) -> impl Iterator<Item = &Candidate> + '_ {
        self.candidates.iter().filter(move |c| c.exceeds(threshold))
    }

    #[must_use]
    pub fn best(&self) -> Option<&Candidate> {
        self.candidates.first().filter(|c| c.fitness.is_some())
    }
}

/// Plays generations of candidates against the external game.
#[derive(Debug)]
pub struct Trainer<'a, L, S> {
    launcher: L,
    config: &'a GameConfig,
    source: S,
    params: TrainingParams,
    cancel: CancelToken,
    next_generation: usize,
    previous: Vec<Candidate>,
}

impl<'a, L, S> Trainer<'a, L, S>
where
    L: Launcher,
    S: CandidateSource,
{
    pub fn new(
        launcher: L,
        config: &'a GameConfig,
        source: S,
        params: TrainingParams,
    ) -> Result<Self, TrainingError> {
        config.validate().map_err(TrainingError::Config)?;
        Ok(Self {
            launcher,
            config,
            source,
            params,
            cancel: CancelToken::new(),
            next_generation: 0,
            previous: vec![],
        })
    }

    #[must_use]
    pub fn with_cancel_token(mut self, cancel: CancelToken) -> Self {
        self.cancel = cancel;
        self
    }

    /// Number of the generation the next [`step`](Self::step) evaluates.
    #[must_use]
    pub fn next_generation(&self) -> usize {
        self.next_generation
    }

    /// Proposes and evaluates the next generation.
    pub fn step<O>(&mut self, observer: &mut O) -> Result<Generation, TrainingError>
    where
        O: GameObserver + ?Sized,
    {
        let number = self.next_generation;
        let policies = self.source.next_generation(&self.previous);
        debug!(generation = number, candidates = policies.len(), "generation started");

        let mut candidates = Vec::with_capacity(policies.len());
        for (index, policy) in policies.into_iter().enumerate() {
            let context = GameContext {
                generation: number,
                candidate: index,
            };
            let fitness = self.evaluate(&context, &policy, observer)?;
            candidates.push(Candidate { policy, fitness });
        }
        candidate::sort_by_fitness(&mut candidates);

        let summary = GenerationSummary::new(number, &candidates);
        info!(
            generation = number,
            evaluated = summary.evaluated,
            failed = summary.failed,
            best = ?summary.best,
            mean = ?summary.mean,
            "generation finished"
        );
        self.previous.clone_from(&candidates);
        self.next_generation += 1;
        Ok(Generation {
            number,
            candidates,
            summary,
        })
    }

    /// Plays one game for `policy`, retrying failed games in a fresh process.
    ///
    /// Returns `None` if every attempt failed.
    pub fn evaluate<O>(
        &self,
        context: &GameContext,
        policy: &LinearPolicy,
        observer: &mut O,
    ) -> Result<Option<i32>, TrainingError>
    where
        O: GameObserver + ?Sized,
    {
        let attempts = self.params.transport_retries + 1;
        for attempt in 1..=attempts {
            if self.cancel.is_cancelled() {
                return Err(TrainingError::Cancelled);
            }
            observer.game_started(context);
            let transport = match self.launcher.launch(self.config) {
                Ok(transport) => transport,
                Err(e @ ChannelError::Spawn { .. }) => return Err(TrainingError::Launch(e)),
                Err(e) => {
                    warn!(generation = context.generation, candidate = context.candidate, attempt, error = %e, "game launch failed");
                    continue;
                }
            };
            let session =
                GameSession::new(transport, self.config).with_cancel_token(self.cancel.clone());
            let mut fitness = 0;
            match session.play(policy, &mut fitness, observer) {
                Ok(report) => return Ok(Some(report.fitness)),
                Err(SessionError::Cancelled) => return Err(TrainingError::Cancelled),
                Err(e) => {
                    warn!(generation = context.generation, candidate = context.candidate, attempt, error = %e, "game failed");
                }
            }
        }
        warn!(
            generation = context.generation,
            candidate = context.candidate,
            attempts,
            "skipping candidate"
        );
        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use std::{cell::RefCell, collections::VecDeque, io};

    use rowbot_engine::Board;
    use rowbot_remote::{channel::Transport, observer::NoopObserver};

    use super::*;

    type Script = VecDeque<Result<String, ChannelError>>;

    #[derive(Debug)]
    struct ScriptedGame {
        reads: Script,
    }

    impl Transport for ScriptedGame {
        fn write_line(&mut self, _line: &str) -> Result<(), ChannelError> {
            Ok(())
        }

        fn read_until_prompt(&mut self) -> Result<String, ChannelError> {
            self.reads.pop_front().unwrap_or(Err(ChannelError::Exited {
                partial: String::new(),
            }))
        }

        fn terminate(&mut self) {}
    }

    /// Hands out one script per launch.
    #[derive(Debug, Default)]
    struct ScriptedLauncher {
        games: RefCell<VecDeque<Result<Script, ChannelError>>>,
        launches: RefCell<usize>,
    }

    impl ScriptedLauncher {
        fn new(games: impl IntoIterator<Item = Result<Script, ChannelError>>) -> Self {
            Self {
                games: RefCell::new(games.into_iter().collect()),
                launches: RefCell::new(0),
            }
        }
    }

    impl Launcher for ScriptedLauncher {
        type Transport = ScriptedGame;

        fn launch(&self, _config: &GameConfig) -> Result<Self::Transport, ChannelError> {
            *self.launches.borrow_mut() += 1;
            let reads = self
                .games
                .borrow_mut()
                .pop_front()
                .unwrap_or_else(|| Ok(Script::new()))?;
            Ok(ScriptedGame { reads })
        }
    }

    struct FixedSource(Vec<LinearPolicy>);

    impl CandidateSource for FixedSource {
        fn next_generation(&mut self, _previous: &[Candidate]) -> Vec<LinearPolicy> {
            self.0.clone()
        }
    }

    #[derive(Default)]
    struct ContextRecorder(Vec<GameContext>);

    impl GameObserver for ContextRecorder {
        fn game_started(&mut self, context: &GameContext) {
            self.0.push(*context);
        }
    }

    fn render(board: &str) -> String {
        let board: Board = board.parse().unwrap();
        format!("1234\n{board}\n")
    }

    fn handshake() -> Script {
        (0..6).map(|i| Ok(format!("Question {i}"))).collect()
    }

    /// A game ending in a tie after one move, on `final_board`.
    fn tie_game(final_board: &str) -> Result<Script, ChannelError> {
        let mut script = handshake();
        script.push_back(Ok(render(".... .... .... ....")));
        script.push_back(Ok("Tie game!".to_owned()));
        script.push_back(Ok(render(final_board)));
        Ok(script)
    }

    fn broken_game() -> Result<Script, ChannelError> {
        Ok(handshake())
    }

    fn config() -> GameConfig {
        GameConfig {
            board_size: 4,
            ..GameConfig::default()
        }
    }

    fn policy(column: usize) -> LinearPolicy {
        let mut bias = vec![0.0; 4];
        bias[column - 1] = 1.0;
        LinearPolicy::from_parts(4, vec![0.0; 64], bias).unwrap()
    }

    #[test]
    fn test_fitness_recorded_and_sorted() {
        let config = config();
        let launcher = ScriptedLauncher::new([
            tie_game("OO.. .... .... ...."),
            tie_game("XX.. .... .... ...."),
            tie_game("OOO. .... .... ...."),
        ]);
        let source = FixedSource(vec![policy(1), policy(2), policy(3)]);
        let mut trainer =
            Trainer::new(launcher, &config, source, TrainingParams::default()).unwrap();

        let generation = trainer.step(&mut NoopObserver).unwrap();

        assert_eq!(generation.number, 0);
        let fitness: Vec<_> = generation.candidates.iter().map(|c| c.fitness).collect();
        assert_eq!(fitness, [Some(10), Some(1), Some(-1)]);
        assert_eq!(generation.candidates[0].policy, policy(3));
        assert_eq!(generation.summary.evaluated, 3);
        assert_eq!(generation.summary.failed, 0);
        assert_eq!(generation.summary.best, Some(10));
        assert_eq!(generation.summary.worst, Some(-1));
        assert_eq!(generation.summary.mean, Some(10.0 / 3.0));
        assert_eq!(trainer.next_generation(), 1);
    }

    #[test]
    fn test_failed_game_is_retried_in_fresh_process() {
        let config = config();
        let launcher = ScriptedLauncher::new([broken_game(), tie_game("OO.. .... .... ....")]);
        let source = FixedSource(vec![policy(1)]);
        let mut trainer =
            Trainer::new(launcher, &config, source, TrainingParams::default()).unwrap();

        let generation = trainer.step(&mut NoopObserver).unwrap();

        assert_eq!(generation.candidates[0].fitness, Some(1));
        assert_eq!(*trainer.launcher.launches.borrow(), 2);
    }

    #[test]
    fn test_candidate_skipped_after_retries() {
        let config = config();
        let launcher = ScriptedLauncher::new([
            broken_game(),
            Err(ChannelError::Io(io::Error::other("pipe"))),
            broken_game(),
            tie_game("OO.. .... .... ...."),
        ]);
        let source = FixedSource(vec![policy(1), policy(2)]);
        let params = TrainingParams {
            transport_retries: 2,
        };
        let mut trainer = Trainer::new(launcher, &config, source, params).unwrap();

        let generation = trainer.step(&mut NoopObserver).unwrap();

        assert_eq!(generation.candidates[0].fitness, Some(1));
        assert_eq!(generation.candidates[0].policy, policy(2));
        assert_eq!(generation.candidates[1].fitness, None);
        assert_eq!(generation.summary.failed, 1);
        assert_eq!(generation.best().map(|c| c.fitness), Some(Some(1)));
    }

    #[test]
    fn test_spawn_failure_stops_training() {
        let config = config();
        let launcher = ScriptedLauncher::new([Err(ChannelError::Spawn {
            program: "game".to_owned(),
            source: io::Error::from(io::ErrorKind::NotFound),
        })]);
        let source = FixedSource(vec![policy(1)]);
        let mut trainer =
            Trainer::new(launcher, &config, source, TrainingParams::default()).unwrap();

        let err = trainer.step(&mut NoopObserver).unwrap_err();
        assert!(matches!(err, TrainingError::Launch(ChannelError::Spawn { .. })));
    }

    #[test]
    fn test_cancel_stops_training() {
        let config = config();
        let cancel = CancelToken::new();
        cancel.cancel();
        let launcher = ScriptedLauncher::new([tie_game("OO.. .... .... ....")]);
        let source = FixedSource(vec![policy(1)]);
        let mut trainer = Trainer::new(launcher, &config, source, TrainingParams::default())
            .unwrap()
            .with_cancel_token(cancel);

        let err = trainer.step(&mut NoopObserver).unwrap_err();
        assert!(matches!(err, TrainingError::Cancelled));
        assert_eq!(*trainer.launcher.launches.borrow(), 0);
    }

    #[test]
    fn test_generation_number_reaches_observer() {
        let config = config();
        let launcher = ScriptedLauncher::new([
            tie_game("OO.. .... .... ...."),
            tie_game("OO.. .... .... ...."),
            tie_game("OO.. .... .... ...."),
            tie_game("OO.. .... .... ...."),
        ]);
        let source = FixedSource(vec![policy(1), policy(2)]);
        let mut trainer =
            Trainer::new(launcher, &config, source, TrainingParams::default()).unwrap();
        let mut recorder = ContextRecorder::default();

        trainer.step(&mut recorder).unwrap();
        trainer.step(&mut recorder).unwrap();

        let seen: Vec<_> = recorder
            .0
            .iter()
            .map(|c| (c.generation, c.candidate))
            .collect();
        assert_eq!(seen, [(0, 0), (0, 1), (1, 0), (1, 1)]);
    }

    #[test]
    fn test_elites_exceed_threshold() {
        let config = config();
        let launcher = ScriptedLauncher::new([
            tie_game("OOO. .... .... ...."),
            tie_game("OO.. .... .... ...."),
            broken_game(),
            broken_game(),
        ]);
        let source = FixedSource(vec![policy(1), policy(2), policy(3)]);
        let mut trainer =
            Trainer::new(launcher, &config, source, TrainingParams::default()).unwrap();

        let generation = trainer.step(&mut NoopObserver).unwrap();

        let elites: Vec<_> = generation.elites(1).map(|c| c.fitness).collect();
        assert_eq!(elites, [Some(10)]);
        assert_eq!(generation.elites(0).count(), 2);
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let config = GameConfig {
            board_size: 1,
            ..GameConfig::default()
        };
        let result = Trainer::new(
            ScriptedLauncher::default(),
            &config,
            FixedSource(vec![]),
            TrainingParams::default(),
        );
        assert!(matches!(result, Err(TrainingError::Config(_))));
    }
}
