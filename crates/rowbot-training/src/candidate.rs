use serde::{Deserialize, Serialize};

use crate::policy::LinearPolicy;

/// A policy under evaluation and the fitness its game produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    pub policy: LinearPolicy,
    /// `None` until the candidate has finished a game, and after every attempt failed.
    pub fitness: Option<i32>,
}

impl Candidate {
    #[must_use]
    pub fn new(policy: LinearPolicy) -> Self {
        Self {
            policy,
            fitness: None,
        }
    }

    /// Returns `true` if the candidate's fitness is strictly greater than `threshold`.
    #[must_use]
    pub fn exceeds(&self, threshold: i32) -> bool {
        self.fitness.is_some_and(|fitness| fitness > threshold)
    }
}

/// Sorts candidates best first. Candidates without fitness go last.
pub fn sort_by_fitness(candidates: &mut [Candidate]) {
    candidates.sort_by(|a, b| b.fitness.cmp(&a.fitness));
}
