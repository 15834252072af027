//! Hooks for reporting game progress.
//!
//! A [`GameObserver`] receives the same events an on-screen board would show. All methods
//! have empty defaults, so an observer only overrides what it displays.

use rowbot_engine::Board;

use crate::outcome::GameOutcome;

/// Identifies a game within a training run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GameContext {
    /// Generation number, starting at 0.
    pub generation: usize,
    /// Index of the candidate within its generation.
    pub candidate: usize,
}

pub trait GameObserver {
    fn game_started(&mut self, _context: &GameContext) {}

    fn board_observed(&mut self, _board: &Board) {}

    fn fitness_updated(&mut self, _fitness: i32) {}

    fn game_finished(&mut self, _outcome: GameOutcome, _fitness: i32) {}
}

/// Observer that ignores every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl GameObserver for NoopObserver {}
