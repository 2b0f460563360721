use crate::base::stats;
use crate::simulation::Population;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Column names of the statistics table, in order.
///
/// The last four (per-locus frequency summaries) are part of the declared
/// format but are never filled in.
pub const COLUMNS: [&str; 16] = [
    "simu", "gen", "nC", "meanC", "varC", "sdC", "minC", "q25C", "medC", "q75C", "maxC", "empty",
    "nL", "meanL", "varL", "sdL",
];

/// Summary of the element load distribution of one generation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationStats {
    /// Replicate index (1-based)
    pub replicate: usize,
    /// Generation index (0 is the founding population)
    pub generation: usize,
    /// Total number of elements
    pub total: usize,
    pub mean: f64,
    /// Sample variance (n - 1 denominator)
    pub variance: f64,
    /// Standard deviation, reported as 0 when the mean load is 0
    pub std_dev: f64,
    pub min: usize,
    pub q25: f64,
    pub median: f64,
    pub q75: f64,
    pub max: usize,
    /// Proportion of (individual, locus) pairs without any element
    pub prop_empty_loci: f64,
}

impl GenerationStats {
    /// Compute the statistics of the current state of `population`.
    pub fn from_population(replicate: usize, generation: usize, population: &Population) -> Self {
        let loads = population.loads();
        let values: Vec<f64> = loads.iter().map(|&l| l as f64).collect();
        let sorted = stats::sorted_copy(&values);

        let mean = stats::mean(&values);
        let variance = stats::variance(&values);
        let std_dev = if mean == 0.0 { 0.0 } else { variance.sqrt() };

        Self {
            replicate,
            generation,
            total: loads.iter().sum(),
            mean,
            variance,
            std_dev,
            min: loads.iter().copied().min().unwrap_or(0),
            q25: stats::quantile_sorted(&sorted, 0.25),
            median: stats::quantile_sorted(&sorted, 0.50),
            q75: stats::quantile_sorted(&sorted, 0.75),
            max: loads.iter().copied().max().unwrap_or(0),
            prop_empty_loci: population.prop_empty_loci(),
        }
    }
}

impl fmt::Display for GenerationStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "simu={} gen={} nC={} mean={:.3} sd={:.3} min={} q25={:.3} med={:.3} q75={:.3} max={} empty={:.3}",
            self.replicate,
            self.generation,
            self.total,
            self.mean,
            self.std_dev,
            self.min,
            self.q25,
            self.median,
            self.q75,
            self.max,
            self.prop_empty_loci
        )
    }
}
