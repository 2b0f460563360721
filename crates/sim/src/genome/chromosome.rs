use crate::errors::GenomeError;
use rand::Rng;
use std::fmt;
use std::str::FromStr;

/// A chromosome: a fixed number of insertion sites, each either empty or
/// carrying one transposable element.
///
/// The number of occupied sites (the *load*) is cached and kept exact by every
/// mutating operation, so `load()` is O(1).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Chromosome {
    /// Presence of an element at each site
    sites: Vec<bool>,
    /// Cached number of `true` entries in `sites`
    load: usize,
}

impl Chromosome {
    /// Create a chromosome with `n_sites` empty sites.
    pub fn new(n_sites: usize) -> Self {
        Self {
            sites: vec![false; n_sites],
            load: 0,
        }
    }

    /// Create a chromosome where each site is independently occupied with
    /// probability `p`.
    ///
    /// One uniform draw is consumed per site, in site order.
    ///
    /// # Errors
    /// Returns `GenomeError::InvalidProbability` if `p` is outside [0, 1].
    pub fn random<R: Rng + ?Sized>(
        rng: &mut R,
        n_sites: usize,
        p: f64,
    ) -> Result<Self, GenomeError> {
        if !(0.0..=1.0).contains(&p) {
            return Err(GenomeError::InvalidProbability(p));
        }
        let sites: Vec<bool> = (0..n_sites).map(|_| rng.random::<f64>() < p).collect();
        Ok(Self::from_sites(sites))
    }

    /// Create a chromosome from an explicit site vector.
    pub fn from_sites(sites: Vec<bool>) -> Self {
        let load = sites.iter().filter(|&&s| s).count();
        Self { sites, load }
    }

    /// Create a chromosome from a site vector, checking its length.
    ///
    /// # Errors
    /// Returns `GenomeError::LengthMismatch` if `sites.len() != n_sites`.
    pub fn from_sites_checked(sites: Vec<bool>, n_sites: usize) -> Result<Self, GenomeError> {
        if sites.len() != n_sites {
            return Err(GenomeError::LengthMismatch {
                expected: n_sites,
                found: sites.len(),
            });
        }
        Ok(Self::from_sites(sites))
    }

    /// Number of sites.
    #[inline]
    pub fn len(&self) -> usize {
        self.sites.len()
    }

    /// Returns `true` if the chromosome has no sites at all.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.sites.is_empty()
    }

    /// Number of occupied sites.
    #[inline]
    pub fn load(&self) -> usize {
        self.load
    }

    /// Number of empty sites.
    #[inline]
    pub fn free_sites(&self) -> usize {
        self.sites.len() - self.load
    }

    /// Returns `true` if every site is occupied.
    #[inline]
    pub fn is_saturated(&self) -> bool {
        self.load == self.sites.len()
    }

    /// Borrow the raw site vector.
    #[inline]
    pub fn as_slice(&self) -> &[bool] {
        &self.sites
    }

    /// Occupancy of `site`, or `None` if out of bounds.
    #[inline]
    pub fn get(&self, site: usize) -> Option<bool> {
        self.sites.get(site).copied()
    }

    /// Occupancy of `site`.
    ///
    /// # Errors
    /// Returns `GenomeError::SiteOutOfBounds` for an invalid site.
    pub fn is_occupied(&self, site: usize) -> Result<bool, GenomeError> {
        self.get(site).ok_or(GenomeError::SiteOutOfBounds {
            site,
            len: self.len(),
        })
    }

    /// Set the occupancy of `site`, keeping the cached load exact.
    pub fn set(&mut self, site: usize, occupied: bool) -> Result<(), GenomeError> {
        let len = self.len();
        let slot = self
            .sites
            .get_mut(site)
            .ok_or(GenomeError::SiteOutOfBounds { site, len })?;
        match (*slot, occupied) {
            (false, true) => self.load += 1,
            (true, false) => self.load -= 1,
            _ => {}
        }
        *slot = occupied;
        Ok(())
    }

    /// Iterate over the indices of occupied sites in increasing order.
    pub fn occupied_sites(&self) -> impl Iterator<Item = usize> + '_ {
        self.sites
            .iter()
            .enumerate()
            .filter_map(|(i, &s)| s.then_some(i))
    }

    /// Remove one element, chosen uniformly among the occupied sites.
    ///
    /// Returns the site that was cleared.
    ///
    /// # Errors
    /// Returns `GenomeError::NoElement` if the chromosome is empty.
    pub fn loss<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<usize, GenomeError> {
        if self.load == 0 {
            return Err(GenomeError::NoElement);
        }
        let rank = rng.random_range(0..self.load);
        let site = self
            .nth_with_state(true, rank)
            .ok_or(GenomeError::NoElement)?;
        self.sites[site] = false;
        self.load -= 1;
        Ok(site)
    }

    /// Insert one element at a site chosen uniformly among the empty sites.
    ///
    /// Returns the site that was filled.
    ///
    /// # Errors
    /// Returns `GenomeError::Saturated` if no site is empty.
    pub fn transposition<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<usize, GenomeError> {
        let free = self.free_sites();
        if free == 0 {
            return Err(GenomeError::Saturated { sites: self.len() });
        }
        let rank = rng.random_range(0..free);
        let site = self
            .nth_with_state(false, rank)
            .ok_or(GenomeError::Saturated { sites: self.len() })?;
        self.sites[site] = true;
        self.load += 1;
        Ok(site)
    }

    /// Exchange the segment `[locus, len)` with the homologous segment of
    /// `other`.
    ///
    /// A locus of 0 exchanges the whole chromosomes.
    ///
    /// # Errors
    /// Returns `GenomeError::LengthMismatch` if the homologues differ in length
    /// and `GenomeError::SiteOutOfBounds` if `locus >= len`.
    pub fn crossover_at(&mut self, other: &mut Self, locus: usize) -> Result<(), GenomeError> {
        if self.len() != other.len() {
            return Err(GenomeError::LengthMismatch {
                expected: self.len(),
                found: other.len(),
            });
        }
        if locus >= self.len() {
            return Err(GenomeError::SiteOutOfBounds {
                site: locus,
                len: self.len(),
            });
        }
        let mine = count_occupied(&self.sites[locus..]);
        let theirs = count_occupied(&other.sites[locus..]);
        self.sites[locus..].swap_with_slice(&mut other.sites[locus..]);
        self.load = self.load - mine + theirs;
        other.load = other.load - theirs + mine;
        Ok(())
    }

    // Index of the `rank`-th (0-based) site whose state equals `state`.
    fn nth_with_state(&self, state: bool, rank: usize) -> Option<usize> {
        self.sites
            .iter()
            .enumerate()
            .filter(|(_, &s)| s == state)
            .nth(rank)
            .map(|(i, _)| i)
    }
}

fn count_occupied(sites: &[bool]) -> usize {
    sites.iter().filter(|&&s| s).count()
}

impl fmt::Display for Chromosome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for &s in &self.sites {
            f.write_str(if s { "1" } else { "0" })?;
        }
        Ok(())
    }
}

impl FromStr for Chromosome {
    type Err = GenomeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let sites = s
            .chars()
            .map(|c| match c {
                '0' => Ok(false),
                '1' => Ok(true),
                other => Err(GenomeError::InvalidSymbol(other)),
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self::from_sites(sites))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_xoshiro::Xoshiro256PlusPlus;

    fn chr(s: &str) -> Chromosome {
        s.parse().unwrap()
    }

    #[test]
    fn test_chromosome_new_is_empty() {
        let c = Chromosome::new(10);
        assert_eq!(c.len(), 10);
        assert_eq!(c.load(), 0);
        assert_eq!(c.to_string(), "0000000000");
    }

    #[test]
    fn test_random_extremes() {
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(42);
        assert_eq!(Chromosome::random(&mut rng, 31, 0.0).unwrap().load(), 0);
        assert_eq!(Chromosome::random(&mut rng, 31, 1.0).unwrap().load(), 31);
    }

    #[test]
    fn test_random_rejects_bad_probability() {
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(42);
        assert_eq!(
            Chromosome::random(&mut rng, 5, 1.5),
            Err(GenomeError::InvalidProbability(1.5))
        );
        assert!(Chromosome::random(&mut rng, 5, -0.1).is_err());
    }

    #[test]
    fn test_from_str_and_display() {
        let c = chr("0110");
        assert_eq!(c.load(), 2);
        assert_eq!(c.to_string(), "0110");
        assert_eq!("01x".parse::<Chromosome>(), Err(GenomeError::InvalidSymbol('x')));
    }

    #[test]
    fn test_from_sites_checked() {
        assert!(Chromosome::from_sites_checked(vec![true, false], 2).is_ok());
        assert_eq!(
            Chromosome::from_sites_checked(vec![true], 2),
            Err(GenomeError::LengthMismatch {
                expected: 2,
                found: 1
            })
        );
    }

    #[test]
    fn test_set_keeps_load() {
        let mut c = Chromosome::new(4);
        c.set(1, true).unwrap();
        c.set(1, true).unwrap();
        c.set(3, true).unwrap();
        assert_eq!(c.load(), 2);
        c.set(1, false).unwrap();
        assert_eq!(c.load(), 1);
        assert!(c.set(4, true).is_err());
        assert_eq!(c.occupied_sites().collect::<Vec<_>>(), vec![3]);
    }

    #[test]
    fn test_loss_removes_an_occupied_site() {
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(42);
        let mut c = chr("0101100");
        let before = c.clone();
        let site = c.loss(&mut rng).unwrap();
        assert!(before.get(site).unwrap());
        assert!(!c.get(site).unwrap());
        assert_eq!(c.load(), 2);
    }

    #[test]
    fn test_loss_on_empty_chromosome() {
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(42);
        let mut c = Chromosome::new(5);
        assert_eq!(c.loss(&mut rng), Err(GenomeError::NoElement));
    }

    #[test]
    fn test_loss_is_uniform_over_occupied() {
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(1);
        let mut counts = [0usize; 6];
        for _ in 0..6000 {
            let mut c = chr("101011");
            counts[c.loss(&mut rng).unwrap()] += 1;
        }
        assert_eq!(counts[1] + counts[3], 0);
        for site in [0, 2, 4, 5] {
            assert!((1250..1750).contains(&counts[site]), "{counts:?}");
        }
    }

    #[test]
    fn test_transposition_fills_an_empty_site() {
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(42);
        let mut c = chr("1101");
        let site = c.transposition(&mut rng).unwrap();
        assert_eq!(site, 2);
        assert!(c.is_saturated());
        assert_eq!(
            c.transposition(&mut rng),
            Err(GenomeError::Saturated { sites: 4 })
        );
    }

    #[test]
    fn test_single_crossover() {
        let mut a = Chromosome::new(10);
        let mut b = chr("1111111111");
        a.crossover_at(&mut b, 3).unwrap();
        assert_eq!(a.to_string(), "0001111111");
        assert_eq!(b.to_string(), "1110000000");
        assert_eq!(a.load(), 7);
        assert_eq!(b.load(), 3);
    }

    #[test]
    fn test_two_crossovers_compound() {
        let mut a = Chromosome::new(10);
        let mut b = chr("1111111111");
        a.crossover_at(&mut b, 3).unwrap();
        a.crossover_at(&mut b, 6).unwrap();
        assert_eq!(a.to_string(), "0001110000");
        assert_eq!(b.to_string(), "1110001111");
        assert_eq!(a.load() + b.load(), 10);
    }

    #[test]
    fn test_crossover_errors() {
        let mut a = Chromosome::new(4);
        let mut b = Chromosome::new(5);
        assert!(matches!(
            a.crossover_at(&mut b, 1),
            Err(GenomeError::LengthMismatch { .. })
        ));
        let mut c = Chromosome::new(4);
        assert!(matches!(
            a.crossover_at(&mut c, 4),
            Err(GenomeError::SiteOutOfBounds { site: 4, len: 4 })
        ));
    }
}
