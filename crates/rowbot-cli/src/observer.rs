use rowbot_engine::Board;
use rowbot_remote::{
    observer::{GameContext, GameObserver},
    outcome::GameOutcome,
};
use tracing::{debug, info};

/// Reports game progress through the log, tagged with the running game.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct TracingObserver {
    context: GameContext,
}

impl GameObserver for TracingObserver {
    fn game_started(&mut self, context: &GameContext) {
        self.context = *context;
        debug!(
            generation = context.generation,
            candidate = context.candidate,
            "game started"
        );
    }

    fn board_observed(&mut self, board: &Board) {
        debug!(candidate = self.context.candidate, "board\n{board}");
    }

    fn fitness_updated(&mut self, fitness: i32) {
        debug!(candidate = self.context.candidate, fitness, "fitness");
    }

    fn game_finished(&mut self, outcome: GameOutcome, fitness: i32) {
        info!(
            generation = self.context.generation,
            candidate = self.context.candidate,
            %outcome,
            fitness,
            "game finished"
        );
    }
}
