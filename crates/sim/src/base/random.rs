//! Random draw helpers shared by the stochastic operators.
//!
//! Every helper takes the generator as `&mut R` so that a replicate consumes a
//! single, strictly ordered stream of draws.

use crate::errors::SimulationError;
use rand::Rng;
use rand_distr::{Distribution, Poisson};

/// Draw a Poisson-distributed event count with the given mean.
///
/// A mean of exactly zero yields zero events without consuming the
/// generator. Negative or non-finite means are rejected.
pub fn poisson<R: Rng + ?Sized>(
    rng: &mut R,
    mean: f64,
    name: &'static str,
) -> Result<usize, SimulationError> {
    if mean == 0.0 {
        return Ok(0);
    }
    if !mean.is_finite() || mean < 0.0 {
        return Err(SimulationError::InvalidRate { name, value: mean });
    }
    let dist = Poisson::new(mean).map_err(|_| SimulationError::InvalidRate { name, value: mean })?;
    let draw: f64 = dist.sample(rng);
    Ok(draw as usize)
}

/// Pick uniformly one index in `[0, n)` among those satisfying `eligible`.
///
/// Returns `None` when no index qualifies. Draws a single integer.
pub fn choose_eligible<R, F>(rng: &mut R, n: usize, eligible: F) -> Option<usize>
where
    R: Rng + ?Sized,
    F: Fn(usize) -> bool,
{
    let count = (0..n).filter(|&i| eligible(i)).count();
    if count == 0 {
        return None;
    }
    let rank = rng.random_range(0..count);
    (0..n).filter(|&i| eligible(i)).nth(rank)
}

/// Draw two distinct indices uniformly in `[0, n)`.
///
/// The second index is drawn among the `n - 1` remaining values, which gives
/// the same joint distribution as redrawing until different.
///
/// # Panics
/// Panics if `n < 2`.
pub fn distinct_pair<R: Rng + ?Sized>(rng: &mut R, n: usize) -> (usize, usize) {
    assert!(n >= 2, "distinct_pair needs at least two values, got {n}");
    let i = rng.random_range(0..n);
    let mut j = rng.random_range(0..n - 1);
    if j >= i {
        j += 1;
    }
    (i, j)
}
