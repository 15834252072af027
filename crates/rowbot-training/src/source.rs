//! Where the policies of each generation come from.
//!
//! [`CandidateSource`] is the seam for an external optimizer. The trainer hands it the
//! evaluated candidates of the previous generation and plays whatever it proposes next.
//!
//! [`RandomSource`] is the bundled implementation. It keeps the best `carry` policies that
//! finished a game and fills the rest of the generation with fresh random policies. It is
//! seeded through `rand_pcg`, so a fixed seed reproduces the same proposals.

use rand::SeedableRng as _;
use rand_distr::Normal;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::{candidate::Candidate, policy::LinearPolicy};

pub trait CandidateSource {
    /// Proposes the policies of the next generation.
    ///
    /// `previous` is empty for the first generation. Otherwise it holds the previous
    /// generation's candidates sorted best first, failed candidates last.
    fn next_generation(&mut self, previous: &[Candidate]) -> Vec<LinearPolicy>;
}

/// Returned when the weight standard deviation is not a positive finite number.
#[derive(Debug, Clone, Copy, PartialEq, derive_more::Display, derive_more::Error)]
#[display("weight sigma must be positive and finite, got {sigma}")]
pub struct InvalidSigmaError {
    sigma: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RandomSourceParams {
    pub board_size: usize,
    /// Number of policies per generation.
    pub population: usize,
    /// Number of best policies kept unchanged.
    pub carry: usize,
    /// Standard deviation of freshly drawn weights.
    pub sigma: f32,
}

#[derive(Debug, Clone)]
pub struct RandomSource {
    params: RandomSourceParams,
    distribution: Normal<f32>,
    rng: Pcg32,
}

impl RandomSource {
    /// Creates a source. Without a seed, the generator is seeded from the thread RNG.
    pub fn new(params: RandomSourceParams, seed: Option<u64>) -> Result<Self, InvalidSigmaError> {
        let sigma = params.sigma;
        if !(sigma.is_finite() && sigma > 0.0) {
            return Err(InvalidSigmaError { sigma });
        }
        let distribution = Normal::new(0.0, sigma).map_err(|_| InvalidSigmaError { sigma })?;
        let rng = match seed {
            Some(seed) => Pcg32::seed_from_u64(seed),
            None => Pcg32::from_rng(&mut rand::rng()),
        };
        Ok(Self {
            params,
            distribution,
            rng,
        })
    }
}

impl CandidateSource for RandomSource {
    fn next_generation(&mut self, previous: &[Candidate]) -> Vec<LinearPolicy> {
        let RandomSourceParams {
            board_size,
            population,
            carry,
            ..
        } = self.params;
        let mut policies: Vec<LinearPolicy> = previous
            .iter()
            .filter(|candidate| candidate.fitness.is_some())
            .filter(|candidate| candidate.policy.board_size() == board_size)
            .take(carry.min(population))
            .map(|candidate| candidate.policy.clone())
            .collect();
        while policies.len() < population {
            policies.push(LinearPolicy::random(
                &mut self.rng,
                board_size,
                &self.distribution,
            ));
        }
        policies
    }
}
