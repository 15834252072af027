//! Single-layer decision policy.
//!
//! A [`LinearPolicy`] maps the `size * size` signed board inputs to one score per column
//! and plays the highest-scoring column:
//!
//! ```text
//! score[c] = bias[c] + Σ weights[c][i] · inputs[i]      column = argmax(score) + 1
//! ```
//!
//! The policy knows nothing about the game rules. Full columns are only discovered when the
//! game rejects the move, which ends the game with the column-full penalty.

use rand::Rng;
use rand_distr::Distribution;
use rowbot_remote::decision::DecisionFunction;
use serde::{Deserialize, Serialize};

use crate::weights;

/// Returned when weight vectors do not match the declared board size.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display(
    "policy for a {board_size}x{board_size} board needs {expected_weights} weights and {board_size} biases, got {weights} and {biases}"
)]
pub struct PolicyShapeError {
    board_size: usize,
    expected_weights: usize,
    weights: usize,
    biases: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "PolicyParts", into = "PolicyParts")]
pub struct LinearPolicy {
    board_size: usize,
    /// Row-major `board_size` × `board_size²` matrix, one row per column choice.
    weights: Vec<f32>,
    bias: Vec<f32>,
}

#[derive(Serialize, Deserialize)]
struct PolicyParts {
    board_size: usize,
    weights: Vec<f32>,
    bias: Vec<f32>,
}

impl TryFrom<PolicyParts> for LinearPolicy {
    type Error = PolicyShapeError;

    fn try_from(parts: PolicyParts) -> Result<Self, Self::Error> {
        Self::from_parts(parts.board_size, parts.weights, parts.bias)
    }
}

impl From<LinearPolicy> for PolicyParts {
    fn from(policy: LinearPolicy) -> Self {
        Self {
            board_size: policy.board_size,
            weights: policy.weights,
            bias: policy.bias,
        }
    }
}

impl LinearPolicy {
    pub fn from_parts(
        board_size: usize,
        weights: Vec<f32>,
        bias: Vec<f32>,
    ) -> Result<Self, PolicyShapeError> {
        let expected_weights = board_size * board_size * board_size;
        if board_size == 0 || weights.len() != expected_weights || bias.len() != board_size {
            return Err(PolicyShapeError {
                board_size,
                expected_weights,
                weights: weights.len(),
                biases: bias.len(),
            });
        }
        Ok(Self {
            board_size,
            weights,
            bias,
        })
    }

    /// Creates a policy with every weight and bias drawn from `distribution`.
    pub fn random<R, D>(rng: &mut R, board_size: usize, distribution: &D) -> Self
    where
        R: Rng + ?Sized,
        D: Distribution<f32> + ?Sized,
    {
        let inputs = board_size * board_size;
        Self {
            board_size,
            weights: weights::sample(rng, distribution, inputs * board_size),
            bias: weights::sample(rng, distribution, board_size),
        }
    }

    #[must_use]
    pub fn board_size(&self) -> usize {
        self.board_size
    }

    #[must_use]
    pub fn weights(&self) -> &[f32] {
        &self.weights
    }

    #[must_use]
    pub fn bias(&self) -> &[f32] {
        &self.bias
    }

    /// Returns one score per column.
    ///
    /// Inputs beyond `board_size²` are ignored and missing inputs count as empty cells.
    #[must_use]
    pub fn scores(&self, inputs: &[i8]) -> Vec<f32> {
        let input_len = self.board_size * self.board_size;
        if input_len == 0 {
            return vec![];
        }
        self.weights
            .chunks_exact(input_len)
            .zip(&self.bias)
            .map(|(row, bias)| {
                row.iter()
                    .zip(inputs)
                    .fold(*bias, |acc, (w, x)| acc + w * f32::from(*x))
            })
            .collect()
    }
}

impl DecisionFunction for LinearPolicy {
    fn choose_column(&self, inputs: &[i8]) -> usize {
        weights::argmax(&self.scores(inputs)).map_or(1, |i| i + 1)
    }
}
