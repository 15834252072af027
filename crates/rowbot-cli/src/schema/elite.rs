use chrono::{DateTime, Utc};
use rowbot_training::{policy::LinearPolicy, trainer::Generation};
use serde::{Deserialize, Serialize};

/// Policies that beat the elite threshold during training, best first.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct EliteFile {
    pub trained_at: DateTime<Utc>,
    pub board_size: usize,
    pub elite_threshold: i32,
    /// Number of generations evaluated when the file was written.
    pub generations: usize,
    pub elites: Vec<Elite>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Elite {
    pub generation: usize,
    pub fitness: i32,
    pub policy: LinearPolicy,
}

impl EliteFile {
    pub fn new(board_size: usize, elite_threshold: i32) -> Self {
        Self {
            trained_at: Utc::now(),
            board_size,
            elite_threshold,
            generations: 0,
            elites: vec![],
        }
    }

    /// Adds the elites of `generation` and returns how many entries changed.
    ///
    /// A policy already on file is kept once, with its best fitness.
    pub fn record(&mut self, generation: &Generation) -> usize {
        let mut changed = 0;
        for candidate in generation.elites(self.elite_threshold) {
            let Some(fitness) = candidate.fitness else {
                continue;
            };
            match self
                .elites
                .iter()
                .position(|elite| elite.policy == candidate.policy)
            {
                Some(i) if self.elites[i].fitness >= fitness => {}
                Some(i) => {
                    let elite = &mut self.elites[i];
                    elite.fitness = fitness;
                    elite.generation = generation.number;
                    changed += 1;
                }
                None => {
                    self.elites.push(Elite {
                        generation: generation.number,
                        fitness,
                        policy: candidate.policy.clone(),
                    });
                    changed += 1;
                }
            }
        }
        self.elites.sort_by(|a, b| b.fitness.cmp(&a.fitness));
        self.generations = self.generations.max(generation.number + 1);
        self.trained_at = Utc::now();
        changed
    }
}
