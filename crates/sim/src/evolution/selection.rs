//! Zygote selection against element load.
//!
//! Fitness declines with the number of elements carried, following
//! `w(L) = 1 - m L^t`. The exponent `t` sets the shape of the interaction
//! between insertions: `t > 1` gives synergistic epistasis, the regime in
//! which selection can contain copy number.
//!
//! Fitness is not clamped. A heavily loaded individual may have negative
//! fitness and is then never viable.

use crate::errors::ConfigError;
use crate::genome::Individual;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Trait for scoring the fitness of a diploid individual.
pub trait IndividualFitness {
    /// Fitness of `individual`. Higher is better; 1 is neutral.
    fn individual_fitness(&self, individual: &Individual) -> f64;
}

/// Fitness as a decreasing power function of element load.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LoadFitness {
    /// Selection multiplier (m)
    pub multiplier: f64,
    /// Selection exponent (t)
    pub exponent: f64,
}

impl LoadFitness {
    /// Create a load fitness function.
    ///
    /// # Errors
    /// Returns an error if either coefficient is not finite.
    pub fn new(multiplier: f64, exponent: f64) -> Result<Self, ConfigError> {
        if !multiplier.is_finite() {
            return Err(ConfigError::InvalidParameter(format!(
                "selection multiplier must be finite, got {multiplier}"
            )));
        }
        if !exponent.is_finite() {
            return Err(ConfigError::InvalidParameter(format!(
                "selection exponent must be finite, got {exponent}"
            )));
        }
        Ok(Self {
            multiplier,
            exponent,
        })
    }

    /// Fitness of an individual carrying `load` elements.
    #[inline]
    pub fn fitness_for_load(&self, load: usize) -> f64 {
        1.0 - self.multiplier * (load as f64).powf(self.exponent)
    }
}

impl IndividualFitness for LoadFitness {
    fn individual_fitness(&self, individual: &Individual) -> f64 {
        self.fitness_for_load(individual.load())
    }
}

/// Selection settings shared by every individual of a population.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FitnessConfig {
    /// Whether zygotes are culled according to their fitness
    pub zygote_selection: bool,
    /// Fitness function, kept even when selection is off so it can be reported
    pub function: LoadFitness,
}

impl FitnessConfig {
    /// Selection enabled with the given fitness function.
    pub fn new(function: LoadFitness) -> Self {
        Self {
            zygote_selection: true,
            function,
        }
    }

    /// No selection.
    pub fn neutral(function: LoadFitness) -> Self {
        Self {
            zygote_selection: false,
            function,
        }
    }

    /// Check if selection is disabled.
    #[inline]
    pub fn is_neutral(&self) -> bool {
        !self.zygote_selection
    }

    /// Fitness of `individual` under the configured function.
    pub fn fitness(&self, individual: &Individual) -> f64 {
        self.function.individual_fitness(individual)
    }

    /// Viability test of a zygote.
    ///
    /// Without selection every zygote is viable and no draw is consumed.
    /// Otherwise one uniform `u` is drawn and the zygote survives iff
    /// `u <= fitness`.
    pub fn is_viable<R: Rng + ?Sized>(&self, rng: &mut R, individual: &Individual) -> bool {
        if self.is_neutral() {
            return true;
        }
        rng.random::<f64>() <= self.fitness(individual)
    }
}

impl Default for FitnessConfig {
    fn default() -> Self {
        Self::neutral(LoadFitness {
            multiplier: 0.001,
            exponent: 1.5,
        })
    }
}
