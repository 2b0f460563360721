//! Transposition (element copy) and excision (element loss) rates.
//!
//! Both processes act per element: an individual carrying `L` elements
//! experiences a Poisson number of events with mean `rate * L`. The
//! transposition rate can be regulated by copy number, decreasing as
//! `p0 / (1 + k L)`.

use crate::errors::ConfigError;
use serde::{Deserialize, Serialize};

/// Per-element transposition rate with copy-number regulation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TranspositionModel {
    /// Transposition probability per element in an unregulated genome (p0)
    rate: f64,
    /// Strength of copy-number regulation (k); 0 disables regulation
    regulation: f64,
}

impl TranspositionModel {
    /// Create a transposition model.
    ///
    /// # Errors
    /// Returns an error if `rate` is outside [0, 1] or `regulation` is
    /// negative or not finite.
    pub fn new(rate: f64, regulation: f64) -> Result<Self, ConfigError> {
        if !(0.0..=1.0).contains(&rate) {
            return Err(ConfigError::InvalidParameter(format!(
                "transposition rate must be between 0.0 and 1.0, got {rate}"
            )));
        }
        if !regulation.is_finite() || regulation < 0.0 {
            return Err(ConfigError::InvalidParameter(format!(
                "regulation must be a finite value >= 0, got {regulation}"
            )));
        }
        Ok(Self { rate, regulation })
    }

    #[inline]
    pub fn rate(&self) -> f64 {
        self.rate
    }

    #[inline]
    pub fn regulation(&self) -> f64 {
        self.regulation
    }

    /// Per-element transposition probability for an individual of `load`
    /// elements.
    pub fn effective_rate(&self, load: usize) -> f64 {
        if self.regulation == 0.0 {
            self.rate
        } else {
            self.rate / (1.0 + self.regulation * load as f64)
        }
    }

    /// Expected number of transpositions for an individual of `load` elements.
    pub fn expected_events(&self, load: usize) -> f64 {
        self.effective_rate(load) * load as f64
    }
}

/// Per-element loss (excision) probability.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LossModel {
    /// Loss probability per element and generation (q)
    rate: f64,
}

impl LossModel {
    /// Create a loss model.
    ///
    /// # Errors
    /// Returns an error if `rate` is outside [0, 1].
    pub fn new(rate: f64) -> Result<Self, ConfigError> {
        if !(0.0..=1.0).contains(&rate) {
            return Err(ConfigError::InvalidParameter(format!(
                "loss rate must be between 0.0 and 1.0, got {rate}"
            )));
        }
        Ok(Self { rate })
    }

    #[inline]
    pub fn rate(&self) -> f64 {
        self.rate
    }

    /// Expected number of losses for an individual of `load` elements.
    pub fn expected_events(&self, load: usize) -> f64 {
        self.rate * load as f64
    }
}
