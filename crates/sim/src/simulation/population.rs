//! Population management and operations.
//!
//! A population is a fixed-size, ordered set of diploid individuals sharing
//! one chromosome architecture. Reproduction is Wright-Fisher like: every
//! generation is entirely replaced by offspring of random couples, filtered
//! by zygote selection.

use crate::base::random;
use crate::errors::{ConfigError, PopulationError, SimulationError};
use crate::evolution::{FitnessConfig, LossModel, RecombinationModel, TranspositionModel};
use crate::genome::{Chromosome, Individual};
use crate::simulation::configs::DEFAULT_MAX_VIABILITY_ATTEMPTS;
use log::{debug, trace};
use rand::Rng;

/// A population of diploid individuals.
#[derive(Debug, Clone)]
pub struct Population {
    /// The individuals in this population
    individuals: Vec<Individual>,
    /// Sites per chromosome, shared by every individual
    sites_per_chromosome: usize,
    /// Crossover parameters used when forming gametes
    recombination: RecombinationModel,
    /// Selection settings applied to zygotes
    fitness: FitnessConfig,
    /// Rejected zygotes tolerated per offspring slot
    max_viability_attempts: usize,
}

impl Population {
    /// Create a population from existing individuals.
    ///
    /// # Errors
    /// Fails if there are fewer than two individuals or if they do not all
    /// share the same number of sites per chromosome.
    pub fn new(
        individuals: Vec<Individual>,
        recombination: RecombinationModel,
        fitness: FitnessConfig,
    ) -> Result<Self, PopulationError> {
        if individuals.len() < 2 {
            return Err(PopulationError::TooSmall(individuals.len()));
        }
        let sites_per_chromosome = individuals[0].sites_per_chromosome();
        check_architecture(&individuals, sites_per_chromosome)?;
        Ok(Self {
            individuals,
            sites_per_chromosome,
            recombination,
            fitness,
            max_viability_attempts: DEFAULT_MAX_VIABILITY_ATTEMPTS,
        })
    }

    /// Create `size` random individuals, each carrying `initial_elements`
    /// elements on average.
    pub fn random<R: Rng + ?Sized>(
        rng: &mut R,
        size: usize,
        sites_per_chromosome: usize,
        initial_elements: usize,
        recombination: RecombinationModel,
        fitness: FitnessConfig,
    ) -> Result<Self, ConfigError> {
        let individuals = (0..size)
            .map(|_| Individual::random(rng, sites_per_chromosome, initial_elements as f64))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self::new(individuals, recombination, fitness)?)
    }

    /// Set the per-slot viability retry budget.
    pub fn with_max_viability_attempts(mut self, attempts: usize) -> Self {
        self.max_viability_attempts = attempts.max(1);
        self
    }

    /// Get the number of individuals in the population.
    #[inline]
    pub fn size(&self) -> usize {
        self.individuals.len()
    }

    /// Check if population is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.individuals.is_empty()
    }

    #[inline]
    pub fn sites_per_chromosome(&self) -> usize {
        self.sites_per_chromosome
    }

    /// Loci per individual (`2 * sites_per_chromosome`).
    #[inline]
    pub fn n_loci(&self) -> usize {
        2 * self.sites_per_chromosome
    }

    /// Get all individuals as a slice.
    #[inline]
    pub fn individuals(&self) -> &[Individual] {
        &self.individuals
    }

    /// Get a specific individual by index.
    #[inline]
    pub fn get(&self, index: usize) -> Option<&Individual> {
        self.individuals.get(index)
    }

    #[inline]
    pub fn recombination(&self) -> &RecombinationModel {
        &self.recombination
    }

    #[inline]
    pub fn fitness(&self) -> &FitnessConfig {
        &self.fitness
    }

    /// Replace the entire population with new individuals.
    ///
    /// # Errors
    /// The size and chromosome architecture must be unchanged.
    pub fn set_individuals(&mut self, individuals: Vec<Individual>) -> Result<(), PopulationError> {
        if individuals.len() != self.size() {
            return Err(PopulationError::SizeMismatch {
                expected: self.size(),
                found: individuals.len(),
            });
        }
        check_architecture(&individuals, self.sites_per_chromosome)?;
        self.individuals = individuals;
        Ok(())
    }

    /// Copies of two distinct individuals, chosen uniformly.
    pub fn sample_couple<R: Rng + ?Sized>(&self, rng: &mut R) -> (Individual, Individual) {
        let (i, j) = random::distinct_pair(rng, self.size());
        (self.individuals[i].clone(), self.individuals[j].clone())
    }

    /// Replace every individual by offspring of random couples.
    ///
    /// Each offspring slot repeats {sample a couple, one gamete per parent,
    /// fecundation, viability test} until a viable zygote is produced.
    ///
    /// # Errors
    /// `SimulationError::ViabilityExhausted` if a slot rejects
    /// `max_viability_attempts` zygotes in a row.
    pub fn make_new_generation<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<(), SimulationError> {
        let size = self.size();
        let mut offspring = Vec::with_capacity(size);
        let mut rejected = 0usize;
        while offspring.len() < size {
            let (mut parent1, mut parent2) = self.sample_couple(rng);
            let gamete1 = parent1.gamete(rng, &self.recombination)?;
            let gamete2 = parent2.gamete(rng, &self.recombination)?;
            let zygote = Individual::fecundation(gamete1, gamete2);
            if zygote.is_viable(rng, &self.fitness) {
                trace!("offspring {} accepted after {rejected} rejections", offspring.len());
                offspring.push(zygote);
                rejected = 0;
            } else {
                rejected += 1;
                if rejected >= self.max_viability_attempts {
                    return Err(SimulationError::ViabilityExhausted { attempts: rejected });
                }
            }
        }
        self.set_individuals(offspring)?;
        Ok(())
    }

    /// Apply losses to every individual in order. Returns the total count.
    pub fn loss<R: Rng + ?Sized>(&mut self, rng: &mut R, model: &LossModel) -> Result<usize, SimulationError> {
        let mut total = 0;
        for ind in &mut self.individuals {
            total += ind.loss(rng, model)?;
        }
        debug!("nb of losses: {total}");
        Ok(total)
    }

    /// Apply transpositions to every individual in order. Returns the total count.
    pub fn transposition<R: Rng + ?Sized>(
        &mut self,
        rng: &mut R,
        model: &TranspositionModel,
    ) -> Result<usize, SimulationError> {
        let mut total = 0;
        for ind in &mut self.individuals {
            total += ind.transposition(rng, model)?;
        }
        debug!("nb of transpositions: {total}");
        Ok(total)
    }

    /// Element load of every individual, in order.
    pub fn loads(&self) -> Vec<usize> {
        self.individuals.iter().map(Individual::load).collect()
    }

    /// Total number of elements in the population.
    pub fn total_load(&self) -> usize {
        self.individuals.iter().map(Individual::load).sum()
    }

    /// Per-individual occupancy vectors (one entry per locus, values 0 to 2).
    pub fn occupancy_per_locus(&self) -> Vec<Vec<usize>> {
        self.individuals.iter().map(Individual::occupancy).collect()
    }

    /// Population frequency of elements at each locus: total occupancy over
    /// the `2 * size` homologous copies.
    pub fn te_frequency_per_locus(&self) -> Vec<f64> {
        let mut counts = vec![0usize; self.n_loci()];
        for ind in &self.individuals {
            for (slot, occ) in counts.iter_mut().zip(ind.occupancy()) {
                *slot += occ;
            }
        }
        let copies = (2 * self.size()) as f64;
        counts.into_iter().map(|c| c as f64 / copies).collect()
    }

    /// Proportion of (individual, locus) pairs where neither homologue
    /// carries an element.
    pub fn prop_empty_loci(&self) -> f64 {
        let pairs = self.size() * self.n_loci();
        if pairs == 0 {
            return 0.0;
        }
        let empty: usize = self
            .individuals
            .iter()
            .map(|ind| ind.occupancy().into_iter().filter(|&o| o == 0).count())
            .sum();
        empty as f64 / pairs as f64
    }
}

fn check_architecture(individuals: &[Individual], sites: usize) -> Result<(), PopulationError> {
    for ind in individuals {
        if let Some(found_sites) = ind.chromosomes().map(Chromosome::len).find(|&len| len != sites) {
            return Err(PopulationError::ArchitectureMismatch {
                expected_sites: sites,
                found_sites,
            });
        }
    }
    Ok(())
}
