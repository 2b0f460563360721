//! Crossing-over between homologous chromosomes.
//!
//! The number of crossovers per meiosis and per chromosome pair follows a
//! Poisson law whose mean is the total map distance of the pair. Each
//! crossover falls at a uniform site and exchanges the two suffixes starting
//! at that site. Crossovers are applied in draw order, so successive events
//! compound.

use crate::base::random;
use crate::errors::{ConfigError, SimulationError};
use crate::genome::Chromosome;
use log::trace;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Parameters controlling crossover formation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RecombinationModel {
    /// Expected number of crossovers per chromosome pair and meiosis
    map_distance: f64,
}

impl RecombinationModel {
    /// Create a recombination model.
    ///
    /// # Errors
    /// Returns an error if `map_distance` is negative or not finite.
    pub fn new(map_distance: f64) -> Result<Self, ConfigError> {
        if !map_distance.is_finite() || map_distance < 0.0 {
            return Err(ConfigError::InvalidParameter(format!(
                "map distance must be a finite value >= 0, got {map_distance}"
            )));
        }
        Ok(Self { map_distance })
    }

    /// A model that never produces crossovers.
    pub fn none() -> Self {
        Self { map_distance: 0.0 }
    }

    /// Get the total map distance.
    #[inline]
    pub fn map_distance(&self) -> f64 {
        self.map_distance
    }

    /// Draw the crossover loci for one chromosome pair of `n_sites` sites.
    ///
    /// Loci are returned in draw order, unsorted and possibly repeated.
    pub fn sample_crossovers<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        n_sites: usize,
    ) -> Result<Vec<usize>, SimulationError> {
        if n_sites == 0 {
            return Ok(Vec::new());
        }
        let count = random::poisson(rng, self.map_distance, "crossovers")?;
        Ok((0..count).map(|_| rng.random_range(0..n_sites)).collect())
    }

    /// Recombine two homologues in place.
    ///
    /// Returns the number of crossovers applied.
    pub fn recombine<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        first: &mut Chromosome,
        second: &mut Chromosome,
    ) -> Result<usize, SimulationError> {
        let loci = self.sample_crossovers(rng, first.len())?;
        for &locus in &loci {
            trace!("crossing-over at site {locus}");
            first.crossover_at(second, locus)?;
        }
        Ok(loci.len())
    }
}

impl Default for RecombinationModel {
    fn default() -> Self {
        Self::none()
    }
}
