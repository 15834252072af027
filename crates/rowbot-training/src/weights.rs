//! Weight vector operations for policies.
//!
//! # Operations
//!
//! - **Initialization**: [`sample`] draws weights from a distribution, usually `N(0, sigma)`
//! - **Selection**: [`argmax`] picks the strongest output
//!
//! Weights are signed. A policy must be able to prefer a column because the opponent owns
//! a cell, which is encoded as `-1`.

use rand::Rng;
use rand_distr::Distribution;

/// Creates a weight vector by applying a function to each index.
///
/// # Examples
///
/// ```
/// use rowbot_training::weights;
///
/// let weights = weights::from_fn(|i| 1.0 / (i as f32 + 1.0), 4);
/// assert_eq!(weights, vec![1.0, 0.5, 1.0 / 3.0, 0.25]);
/// ```
pub fn from_fn<F>(mut f: F, len: usize) -> Vec<f32>
where
    F: FnMut(usize) -> f32,
{
    let mut values = Vec::with_capacity(len);
    for i in 0..len {
        values.push(f(i));
    }
    values
}

/// Generates `len` weights sampled independently from `distribution`.
pub fn sample<R, D>(rng: &mut R, distribution: &D, len: usize) -> Vec<f32>
where
    R: Rng + ?Sized,
    D: Distribution<f32> + ?Sized,
{
    from_fn(|_| distribution.sample(rng), len)
}

/// Returns the index of the largest value.
///
/// Ties resolve to the lowest index. `NaN` values are never selected unless every value is
/// `NaN`, in which case the first index is returned. Returns `None` for an empty slice.
///
/// ```
/// use rowbot_training::weights::argmax;
///
/// assert_eq!(argmax(&[0.1, 0.7, 0.7, -2.0]), Some(1));
/// assert_eq!(argmax(&[]), None);
/// ```
#[must_use]
pub fn argmax(values: &[f32]) -> Option<usize> {
    let mut best: Option<(usize, f32)> = None;
    for (i, &value) in values.iter().enumerate() {
        let better = match best {
            None => true,
            Some((_, best_value)) => value > best_value || (best_value.is_nan() && !value.is_nan()),
        };
        if better {
            best = Some((i, value));
        }
    }
    best.map(|(i, _)| i)
}
