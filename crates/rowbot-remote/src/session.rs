//! The interaction state machine playing one game.
//!
//! # States
//!
//! ```text
//! Init ──▶ Playing ──▶ Finished(ColumnFull | Win | Loss | Draw)
//!            │  ▲
//!            └──┘ Ongoing
//! ```
//!
//! - **Init** answers the game's setup questions (one read before each answer) and reads
//!   the initial board.
//! - **Playing** takes the latest board from the most recent read, records its reward as
//!   the running fitness, sends the decision function's column and classifies the reply.
//! - **Finished** settles the fitness: a rejected move scores the last seen board minus
//!   the column-full penalty; a win, loss or draw performs one more read and scores the
//!   latest board found in the result text and that read, with no bonus. When the game
//!   exits right after announcing the result, its last output is scored instead.
//!
//! The fitness is written before each move is sent, so an aborted game leaves the reward
//! of the last position the decision function saw.
//!
//! # Failures
//!
//! No retries are performed here except for reads that contain no board, which are
//! repeated up to [`GameConfig::max_parse_retries`] times. Any transport failure ends the
//! game. The transport is terminated on every path out of [`GameSession::play`].

use std::thread;

use rowbot_engine::Board;
use rowbot_evaluator::board_evaluator::BoardEvaluator;
use tracing::{debug, warn};

use crate::{
    cancel::CancelToken,
    channel::{ChannelError, Transport},
    config::GameConfig,
    decision::DecisionFunction,
    observer::GameObserver,
    outcome::GameOutcome,
    output_parser::OutputParser,
};

#[derive(Debug, derive_more::Display, derive_more::Error, derive_more::IsVariant)]
pub enum SessionError {
    #[display("transport failure: {_0}")]
    Transport(ChannelError),
    #[display("no board rendering found after {attempts} reads")]
    MalformedOutput { attempts: usize },
    #[display("game cancelled")]
    Cancelled,
}

impl From<ChannelError> for SessionError {
    fn from(error: ChannelError) -> Self {
        SessionError::Transport(error)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::IsVariant)]
pub enum SessionState {
    Init,
    Playing,
    Finished(GameOutcome),
}

/// Summary of a finished game.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameReport {
    pub outcome: GameOutcome,
    pub fitness: i32,
    /// Number of moves sent.
    pub turns: usize,
    /// Board the final fitness was computed from.
    pub final_board: Option<Board>,
}

/// Drives one game over a [`Transport`].
#[derive(Debug)]
pub struct GameSession<'a, T>
where
    T: Transport,
{
    transport: T,
    config: &'a GameConfig,
    parser: OutputParser,
    evaluator: BoardEvaluator,
    cancel: CancelToken,
    state: SessionState,
    pending: String,
    last_board: Option<Board>,
    turns: usize,
    exited: bool,
}

impl<'a, T> GameSession<'a, T>
where
    T: Transport,
{
    #[must_use]
    pub fn new(transport: T, config: &'a GameConfig) -> Self {
        Self {
            transport,
            config,
            parser: OutputParser::new(config.phrases.clone()),
            evaluator: BoardEvaluator::default(),
            cancel: CancelToken::new(),
            state: SessionState::Init,
            pending: String::new(),
            last_board: None,
            turns: 0,
            exited: false,
        }
    }

    #[must_use]
    pub fn with_cancel_token(mut self, cancel: CancelToken) -> Self {
        self.cancel = cancel;
        self
    }

    #[must_use]
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Plays the game to a terminal outcome.
    ///
    /// `fitness` is overwritten with the running reward before every move and with the
    /// final fitness at the end.
    pub fn play<D, O>(
        mut self,
        decision: &D,
        fitness: &mut i32,
        observer: &mut O,
    ) -> Result<GameReport, SessionError>
    where
        D: DecisionFunction + ?Sized,
        O: GameObserver + ?Sized,
    {
        let result = self.run(decision, fitness, observer);
        self.transport.terminate();
        if let Err(e) = &result {
            debug!(error = %e, turns = self.turns, "game aborted");
        }
        result
    }

    fn run<D, O>(
        &mut self,
        decision: &D,
        fitness: &mut i32,
        observer: &mut O,
    ) -> Result<GameReport, SessionError>
    where
        D: DecisionFunction + ?Sized,
        O: GameObserver + ?Sized,
    {
        loop {
            match self.state {
                SessionState::Init => {
                    self.handshake()?;
                    self.state = SessionState::Playing;
                }
                SessionState::Playing => {
                    let outcome = self.play_turn(decision, fitness, observer)?;
                    if outcome.is_terminal() {
                        self.state = SessionState::Finished(outcome);
                    }
                }
                SessionState::Finished(outcome) => {
                    let (final_fitness, final_board) = self.settle(outcome)?;
                    *fitness = final_fitness;
                    if let Some(board) = &final_board {
                        observer.board_observed(board);
                    }
                    observer.fitness_updated(final_fitness);
                    observer.game_finished(outcome, final_fitness);
                    debug!(%outcome, fitness = final_fitness, turns = self.turns, "game finished");
                    return Ok(GameReport {
                        outcome,
                        fitness: final_fitness,
                        turns: self.turns,
                        final_board,
                    });
                }
            }
        }
    }

    fn handshake(&mut self) -> Result<(), SessionError> {
        for command in self.config.init_commands() {
            let text = self.transport.read_until_prompt()?;
            debug!(question = text.trim(), answer = command, "setup");
            self.transport.write_line(&command)?;
        }
        self.pending = self.transport.read_until_prompt()?;
        Ok(())
    }

    fn play_turn<D, O>(
        &mut self,
        decision: &D,
        fitness: &mut i32,
        observer: &mut O,
    ) -> Result<GameOutcome, SessionError>
    where
        D: DecisionFunction + ?Sized,
        O: GameObserver + ?Sized,
    {
        if self.cancel.is_cancelled() {
            return Err(SessionError::Cancelled);
        }

        let board = self.current_board()?;
        observer.board_observed(&board);
        let reward = self.evaluator.reward(&board);
        *fitness = reward;
        observer.fitness_updated(reward);

        let column = self.clamp_column(decision.choose_column(&board.to_inputs()));
        debug!(turn = self.turns, column, fitness = reward, "move");
        self.last_board = Some(board);

        self.transport.write_line(&column.to_string())?;
        self.turns += 1;
        self.pending = match self.transport.read_until_prompt() {
            Ok(text) => text,
            Err(ChannelError::Exited { partial })
                if self.parser.classify(&partial).is_terminal() =>
            {
                self.exited = true;
                partial
            }
            Err(e) => return Err(e.into()),
        };

        let outcome = self.parser.classify(&self.pending);
        if outcome.is_ongoing() {
            let delay = self.config.turn_delay();
            if !delay.is_zero() {
                thread::sleep(delay);
            }
        }
        Ok(outcome)
    }

    fn current_board(&mut self) -> Result<Board, SessionError> {
        let size = self.config.board_size;
        let mut attempts = 1;
        loop {
            if let Some(board) = self.parser.parse(&self.pending).latest_board(size) {
                return Ok(board);
            }
            if attempts > self.config.max_parse_retries {
                return Err(SessionError::MalformedOutput { attempts });
            }
            warn!(attempts, "no board in game output, reading again");
            let more = self.transport.read_until_prompt()?;
            self.pending.push_str(&more);
            attempts += 1;
        }
    }

    fn clamp_column(&self, column: usize) -> usize {
        let size = self.config.board_size;
        let clamped = column.clamp(1, size);
        if clamped != column {
            warn!(column, clamped, "decision out of range, clamping");
        }
        clamped
    }

    fn settle(&mut self, outcome: GameOutcome) -> Result<(i32, Option<Board>), SessionError> {
        match outcome {
            GameOutcome::ColumnFull => {
                let reward = self
                    .last_board
                    .as_ref()
                    .map_or(0, |board| self.evaluator.reward(board));
                Ok((
                    reward - self.config.column_full_penalty,
                    self.last_board.clone(),
                ))
            }
            GameOutcome::Win | GameOutcome::Loss | GameOutcome::Draw => {
                let size = self.config.board_size;
                let mut transcript = std::mem::take(&mut self.pending);
                if !self.exited {
                    match self.transport.read_until_prompt() {
                        Ok(text) => transcript.push_str(&text),
                        // The game may close right after announcing the result.
                        Err(ChannelError::Exited { partial }) => transcript.push_str(&partial),
                        Err(e) => return Err(e.into()),
                    }
                }
                let board = self
                    .parser
                    .parse(&transcript)
                    .latest_board(size)
                    .or_else(|| self.last_board.clone());
                let reward = board.as_ref().map_or(0, |board| self.evaluator.reward(board));
                Ok((reward, board))
            }
            GameOutcome::Ongoing => unreachable!("ongoing is not a terminal outcome"),
        }
    }
}
