use std::error;
use std::fmt;
use std::io;

/// Errors raised by chromosome and individual level operations.
#[derive(Debug, Clone, PartialEq)]
pub enum GenomeError {
    /// A site vector did not have the expected number of sites.
    LengthMismatch { expected: usize, found: usize },
    /// A site index was outside the chromosome.
    SiteOutOfBounds { site: usize, len: usize },
    /// A flattened locus index was outside the individual.
    LocusOutOfBounds { locus: usize, n_loci: usize },
    /// A loss was requested on a chromosome carrying no element.
    NoElement,
    /// A transposition was requested on a chromosome with no empty site.
    Saturated { sites: usize },
    /// A per-site occupation probability outside [0, 1].
    InvalidProbability(f64),
    /// A character other than `0` or `1` in a site string.
    InvalidSymbol(char),
}

impl fmt::Display for GenomeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::LengthMismatch { expected, found } => {
                write!(f, "Site vector length mismatch: expected {expected}, found {found}")
            }
            Self::SiteOutOfBounds { site, len } => {
                write!(f, "Site {site} out of bounds (len = {len})")
            }
            Self::LocusOutOfBounds { locus, n_loci } => {
                write!(f, "Locus {locus} out of bounds ({n_loci} loci)")
            }
            Self::NoElement => write!(f, "No transposable element left to lose"),
            Self::Saturated { sites } => {
                write!(f, "All {sites} sites are already occupied")
            }
            Self::InvalidProbability(p) => {
                write!(f, "Invalid occupation probability: {p} (must be between 0.0 and 1.0)")
            }
            Self::InvalidSymbol(c) => write!(f, "Invalid site symbol '{c}' (expected 0 or 1)"),
        }
    }
}

impl error::Error for GenomeError {}

/// Errors raised when replacing the individuals of a population.
#[derive(Debug, Clone, PartialEq)]
pub enum PopulationError {
    /// The new generation does not have the configured number of individuals.
    SizeMismatch { expected: usize, found: usize },
    /// An individual does not share the population's chromosome architecture.
    ArchitectureMismatch { expected_sites: usize, found_sites: usize },
    /// Mating needs at least two individuals.
    TooSmall(usize),
}

impl fmt::Display for PopulationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SizeMismatch { expected, found } => {
                write!(f, "New population has {found} individuals, expected {expected}")
            }
            Self::ArchitectureMismatch {
                expected_sites,
                found_sites,
            } => write!(
                f,
                "New population has {found_sites} sites per chromosome, expected {expected_sites}"
            ),
            Self::TooSmall(n) => write!(f, "Population of {n} cannot mate (at least 2 required)"),
        }
    }
}

impl error::Error for PopulationError {}

/// Configuration and input errors, detected before a replicate starts.
#[derive(Debug)]
pub enum ConfigError {
    /// A required parameter is missing
    MissingRequired(&'static str),
    /// An invalid parameter value was provided
    InvalidParameter(String),
    /// A configuration file could not be read
    Io(io::Error),
    /// A configuration file could not be parsed
    Parse(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingRequired(param) => write!(f, "Missing required parameter: {param}"),
            Self::InvalidParameter(msg) => write!(f, "Invalid parameter: {msg}"),
            Self::Io(e) => write!(f, "IO error: {e}"),
            Self::Parse(msg) => write!(f, "Parse error: {msg}"),
        }
    }
}

impl error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for ConfigError {
    fn from(e: io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(e: serde_json::Error) -> Self {
        Self::Parse(format!("JSON error: {e}"))
    }
}

impl From<GenomeError> for ConfigError {
    fn from(e: GenomeError) -> Self {
        Self::InvalidParameter(e.to_string())
    }
}

impl From<PopulationError> for ConfigError {
    fn from(e: PopulationError) -> Self {
        Self::InvalidParameter(e.to_string())
    }
}

/// Unrecoverable errors discovered while a replicate is running.
///
/// These mean the event bookkeeping no longer matches the genome state, or
/// that the parameters drove the population somewhere the model cannot go.
/// The replicate (and the run) is aborted; nothing is retried.
#[derive(Debug, Clone, PartialEq)]
pub enum SimulationError {
    /// Load after the loss events differs from `before - events`.
    LossMismatch { before: usize, events: usize, after: usize },
    /// Load after the transposition events differs from `before + events`.
    TranspositionMismatch { before: usize, events: usize, after: usize },
    /// The drawn transpositions would fill every site of an individual.
    Saturation { load: usize, events: usize, capacity: usize },
    /// Too many consecutive offspring were rejected by zygote selection.
    ViabilityExhausted { attempts: usize },
    /// A Poisson mean that is negative, infinite or NaN.
    InvalidRate { name: &'static str, value: f64 },
    /// A chromosome operation failed.
    Genome(GenomeError),
    /// A generation replacement failed.
    Population(PopulationError),
}

impl SimulationError {
    /// Whether the error is a failed post-condition of the event bookkeeping.
    pub fn is_invariant_violation(&self) -> bool {
        matches!(
            self,
            Self::LossMismatch { .. } | Self::TranspositionMismatch { .. } | Self::Genome(_)
        )
    }
}

impl fmt::Display for SimulationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::LossMismatch {
                before,
                events,
                after,
            } => write!(f, "Bad number of lost TEs ({after} != {before} - {events})"),
            Self::TranspositionMismatch {
                before,
                events,
                after,
            } => write!(f, "Bad number of transposed TEs ({after} != {before} + {events})"),
            Self::Saturation {
                load,
                events,
                capacity,
            } => write!(
                f,
                "Too many TEs and no more empty sites ({load} + {events} transpositions >= {capacity} sites)"
            ),
            Self::ViabilityExhausted { attempts } => write!(
                f,
                "No viable offspring after {attempts} consecutive attempts"
            ),
            Self::InvalidRate { name, value } => {
                write!(f, "Invalid expected number of {name}: {value}")
            }
            Self::Genome(e) => write!(f, "Genome error: {e}"),
            Self::Population(e) => write!(f, "Population error: {e}"),
        }
    }
}

impl error::Error for SimulationError {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match self {
            Self::Genome(e) => Some(e),
            Self::Population(e) => Some(e),
            _ => None,
        }
    }
}

impl From<GenomeError> for SimulationError {
    fn from(e: GenomeError) -> Self {
        Self::Genome(e)
    }
}

impl From<PopulationError> for SimulationError {
    fn from(e: PopulationError) -> Self {
        Self::Population(e)
    }
}

/// Errors writing the statistics file.
#[derive(Debug)]
pub enum RecorderError {
    Io(io::Error),
}

impl fmt::Display for RecorderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "Recorder IO error: {e}"),
        }
    }
}

impl error::Error for RecorderError {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
        }
    }
}

impl From<io::Error> for RecorderError {
    fn from(e: io::Error) -> Self {
        Self::Io(e)
    }
}

/// Any error that ends a run: an invalid configuration, the simulation
/// itself, or the recorder receiving its rows.
#[derive(Debug)]
pub enum RunError {
    Config(ConfigError),
    Simulation(SimulationError),
    Recorder(RecorderError),
}

impl fmt::Display for RunError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config(e) => write!(f, "{e}"),
            Self::Simulation(e) => write!(f, "{e}"),
            Self::Recorder(e) => write!(f, "{e}"),
        }
    }
}

impl error::Error for RunError {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match self {
            Self::Config(e) => Some(e),
            Self::Simulation(e) => Some(e),
            Self::Recorder(e) => Some(e),
        }
    }
}

impl From<ConfigError> for RunError {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

impl From<SimulationError> for RunError {
    fn from(e: SimulationError) -> Self {
        Self::Simulation(e)
    }
}

impl From<RecorderError> for RunError {
    fn from(e: RecorderError) -> Self {
        Self::Recorder(e)
    }
}
