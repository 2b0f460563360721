use crate::base::random;
use crate::errors::{GenomeError, SimulationError};
use crate::evolution::{
    FitnessConfig, IndividualFitness, LossModel, RecombinationModel, TranspositionModel,
};
use crate::genome::{Chromosome, Haplotype, LinkageGroup, Locus};
use log::trace;
use rand::Rng;

/// A diploid individual: two haplotypes, hence two homologous chromosome
/// pairs (linkage groups A and B).
///
/// The four chromosomes have a canonical flat order
/// `[A/hap1, A/hap2, B/hap1, B/hap2]`, used by initialisation draws and by
/// the chromosome choice of loss and transposition events.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Individual {
    /// First haplotype
    haplotype1: Haplotype,
    /// Second haplotype
    haplotype2: Haplotype,
}

impl Individual {
    /// Number of chromosomes of an individual.
    pub const N_CHROMOSOMES: usize = 4;

    /// Create a new `Individual` from two haplotypes.
    pub fn new(haplotype1: Haplotype, haplotype2: Haplotype) -> Self {
        Self {
            haplotype1,
            haplotype2,
        }
    }

    /// Zygote formed by the union of two gametes.
    ///
    /// The chromosomes of the zygote are
    /// `{gamete1[A], gamete2[A], gamete1[B], gamete2[B]}`.
    #[inline]
    pub fn fecundation(gamete1: Haplotype, gamete2: Haplotype) -> Self {
        Self::new(gamete1, gamete2)
    }

    /// Individual without any element.
    pub fn empty(n_sites: usize) -> Self {
        Self::new(Haplotype::empty(n_sites), Haplotype::empty(n_sites))
    }

    /// Create an individual carrying on average `expected_load` elements.
    ///
    /// Each site of each chromosome is occupied independently with
    /// probability `expected_load / (4 * n_sites)`. Chromosomes are drawn in
    /// canonical order.
    pub fn random<R: Rng + ?Sized>(
        rng: &mut R,
        n_sites: usize,
        expected_load: f64,
    ) -> Result<Self, GenomeError> {
        let p = if n_sites == 0 {
            0.0
        } else {
            expected_load / (Self::N_CHROMOSOMES * n_sites) as f64
        };
        let a1 = Chromosome::random(rng, n_sites, p)?;
        let a2 = Chromosome::random(rng, n_sites, p)?;
        let b1 = Chromosome::random(rng, n_sites, p)?;
        let b2 = Chromosome::random(rng, n_sites, p)?;
        Ok(Self::new(Haplotype::new(a1, b1), Haplotype::new(a2, b2)))
    }

    /// Borrow the first haplotype (read-only).
    #[inline]
    pub fn haplotype1(&self) -> &Haplotype {
        &self.haplotype1
    }

    /// Borrow the second haplotype (read-only).
    #[inline]
    pub fn haplotype2(&self) -> &Haplotype {
        &self.haplotype2
    }

    /// Number of sites of each chromosome.
    #[inline]
    pub fn sites_per_chromosome(&self) -> usize {
        self.haplotype1.sites_per_chromosome()
    }

    /// Number of loci (homologous site positions): `2 * n_sites`.
    #[inline]
    pub fn n_loci(&self) -> usize {
        LinkageGroup::ALL.len() * self.sites_per_chromosome()
    }

    /// Total number of sites over the four chromosomes: `4 * n_sites`.
    #[inline]
    pub fn capacity(&self) -> usize {
        Self::N_CHROMOSOMES * self.sites_per_chromosome()
    }

    /// Both homologues of `group`, first haplotype first.
    #[inline]
    pub fn homologues(&self, group: LinkageGroup) -> (&Chromosome, &Chromosome) {
        (self.haplotype1.get(group), self.haplotype2.get(group))
    }

    /// Both homologues of `group`, mutably.
    #[inline]
    pub fn homologues_mut(&mut self, group: LinkageGroup) -> (&mut Chromosome, &mut Chromosome) {
        (self.haplotype1.get_mut(group), self.haplotype2.get_mut(group))
    }

    /// Chromosome of `group` carried by haplotype `copy` (0 or 1).
    pub fn chromosome(&self, group: LinkageGroup, copy: usize) -> Option<&Chromosome> {
        match copy {
            0 => Some(self.haplotype1.get(group)),
            1 => Some(self.haplotype2.get(group)),
            _ => None,
        }
    }

    /// Iterate over the four chromosomes in canonical order.
    pub fn chromosomes(&self) -> impl Iterator<Item = &Chromosome> + '_ {
        LinkageGroup::ALL.into_iter().flat_map(move |group| {
            let (first, second) = self.homologues(group);
            [first, second]
        })
    }

    /// Total number of elements carried.
    pub fn load(&self) -> usize {
        self.haplotype1.load() + self.haplotype2.load()
    }

    /// Recombine the homologues of `group` in place.
    ///
    /// Returns the number of crossovers.
    pub fn recombine<R: Rng + ?Sized>(
        &mut self,
        rng: &mut R,
        group: LinkageGroup,
        model: &RecombinationModel,
    ) -> Result<usize, SimulationError> {
        let (first, second) = self.homologues_mut(group);
        model.recombine(rng, first, second)
    }

    /// Produce a gamete.
    ///
    /// For each linkage group in turn, the pair is recombined in place and one
    /// of the two homologues is picked uniformly. The individual is left in
    /// its recombined state.
    pub fn gamete<R: Rng + ?Sized>(
        &mut self,
        rng: &mut R,
        model: &RecombinationModel,
    ) -> Result<Haplotype, SimulationError> {
        let group_a = self.recombined_copy(rng, LinkageGroup::A, model)?;
        let group_b = self.recombined_copy(rng, LinkageGroup::B, model)?;
        Ok(Haplotype::new(group_a, group_b))
    }

    // Recombine `group` and copy one of its homologues, picked uniformly.
    fn recombined_copy<R: Rng + ?Sized>(
        &mut self,
        rng: &mut R,
        group: LinkageGroup,
        model: &RecombinationModel,
    ) -> Result<Chromosome, SimulationError> {
        self.recombine(rng, group, model)?;
        let (first, second) = self.homologues(group);
        let picked = if rng.random_range(0..2) == 0 { first } else { second };
        Ok(picked.clone())
    }

    /// Apply element losses.
    ///
    /// The number of losses is Poisson with mean `q * load`. Each loss hits a
    /// chromosome chosen uniformly among those still carrying an element.
    /// Returns the number of losses.
    ///
    /// # Errors
    /// `SimulationError::LossMismatch` if the load afterwards is not exactly
    /// `load - losses` (including when more losses are drawn than elements).
    pub fn loss<R: Rng + ?Sized>(
        &mut self,
        rng: &mut R,
        model: &LossModel,
    ) -> Result<usize, SimulationError> {
        let before = self.load();
        if before == 0 {
            return Ok(0);
        }
        let events = random::poisson(rng, model.expected_events(before), "losses")?;
        for _ in 0..events {
            let Some(idx) = self.choose_chromosome(rng, |c| c.load() > 0) else {
                break;
            };
            let site = self.chromosome_at_mut(idx).loss(rng)?;
            trace!("loss at site {site} of chromosome {idx}");
        }
        let after = self.load();
        if before.checked_sub(events) != Some(after) {
            return Err(SimulationError::LossMismatch {
                before,
                events,
                after,
            });
        }
        Ok(events)
    }

    /// Apply transpositions.
    ///
    /// The number of transpositions is Poisson with mean `rate(load) * load`.
    /// Each one inserts into a chromosome chosen uniformly among those with
    /// at least one empty site. Returns the number of transpositions.
    ///
    /// # Errors
    /// `SimulationError::Saturation` if `load + events` reaches the number of
    /// sites, `SimulationError::TranspositionMismatch` if the load afterwards
    /// is not exactly `load + events`.
    pub fn transposition<R: Rng + ?Sized>(
        &mut self,
        rng: &mut R,
        model: &TranspositionModel,
    ) -> Result<usize, SimulationError> {
        let before = self.load();
        if before == 0 {
            return Ok(0);
        }
        let events = random::poisson(rng, model.expected_events(before), "transpositions")?;
        let capacity = self.capacity();
        if before + events >= capacity {
            return Err(SimulationError::Saturation {
                load: before,
                events,
                capacity,
            });
        }
        for _ in 0..events {
            let Some(idx) = self.choose_chromosome(rng, |c| !c.is_saturated()) else {
                break;
            };
            let site = self.chromosome_at_mut(idx).transposition(rng)?;
            trace!("transposition to site {site} of chromosome {idx}");
        }
        let after = self.load();
        if after != before + events {
            return Err(SimulationError::TranspositionMismatch {
                before,
                events,
                after,
            });
        }
        Ok(events)
    }

    /// Fitness of the individual under `function`.
    #[inline]
    pub fn fitness(&self, function: &impl IndividualFitness) -> f64 {
        function.individual_fitness(self)
    }

    /// Viability test under the population's selection settings.
    #[inline]
    pub fn is_viable<R: Rng + ?Sized>(&self, rng: &mut R, config: &FitnessConfig) -> bool {
        config.is_viable(rng, self)
    }

    /// Add the occupancy (0, 1 or 2 copies) of every locus to `out`.
    ///
    /// Loci of group A come first, then group B.
    ///
    /// # Errors
    /// `GenomeError::LengthMismatch` if `out.len() != n_loci()`.
    pub fn occupancy_per_locus(&self, out: &mut [usize]) -> Result<(), GenomeError> {
        let n_sites = self.sites_per_chromosome();
        if out.len() != self.n_loci() {
            return Err(GenomeError::LengthMismatch {
                expected: self.n_loci(),
                found: out.len(),
            });
        }
        for group in LinkageGroup::ALL {
            let (first, second) = self.homologues(group);
            let offset = group.index() * n_sites;
            let pairs = first.as_slice().iter().zip(second.as_slice());
            for (slot, (&x, &y)) in out[offset..offset + n_sites].iter_mut().zip(pairs) {
                *slot += usize::from(x) + usize::from(y);
            }
        }
        Ok(())
    }

    /// Occupancy vector of this individual alone.
    pub fn occupancy(&self) -> Vec<usize> {
        let mut out = vec![0; self.n_loci()];
        // Length matches by construction.
        let _ = self.occupancy_per_locus(&mut out);
        out
    }

    /// Number of occupied copies (0, 1 or 2) at `locus`.
    pub fn occupancy_at(&self, locus: Locus) -> Result<usize, GenomeError> {
        let (first, second) = self.homologues(locus.group);
        let x = first.is_occupied(locus.site)?;
        let y = second.is_occupied(locus.site)?;
        Ok(usize::from(x) + usize::from(y))
    }

    /// Number of occupied copies at a flattened locus index.
    pub fn occupancy_at_index(&self, index: usize) -> Result<usize, GenomeError> {
        let locus = Locus::from_index(index, self.sites_per_chromosome())?;
        self.occupancy_at(locus)
    }

    // Uniform choice among the chromosomes (canonical order) matching `eligible`.
    fn choose_chromosome<R, F>(&self, rng: &mut R, eligible: F) -> Option<usize>
    where
        R: Rng + ?Sized,
        F: Fn(&Chromosome) -> bool,
    {
        let flags: Vec<bool> = self.chromosomes().map(eligible).collect();
        random::choose_eligible(rng, flags.len(), |i| flags[i])
    }

    fn chromosome_at_mut(&mut self, idx: usize) -> &mut Chromosome {
        let group = LinkageGroup::ALL[idx / 2];
        if idx % 2 == 0 {
            self.haplotype1.get_mut(group)
        } else {
            self.haplotype2.get_mut(group)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::evolution::LoadFitness;
    use rand::SeedableRng;
    use rand_xoshiro::Xoshiro256PlusPlus;

    fn chr(s: &str) -> Chromosome {
        s.parse().unwrap()
    }

    fn from_canonical(g0: &str, g1: &str, g2: &str, g3: &str) -> Individual {
        Individual::new(
            Haplotype::new(chr(g0), chr(g2)),
            Haplotype::new(chr(g1), chr(g3)),
        )
    }

    #[test]
    fn test_canonical_order() {
        let ind = from_canonical("1000", "0100", "0010", "0001");
        let chrs: Vec<String> = ind.chromosomes().map(|c| c.to_string()).collect();
        assert_eq!(chrs, vec!["1000", "0100", "0010", "0001"]);
        assert_eq!(ind.chromosome(LinkageGroup::B, 1).unwrap().to_string(), "0001");
        assert!(ind.chromosome(LinkageGroup::A, 2).is_none());
        assert_eq!(ind.load(), 4);
        assert_eq!(ind.n_loci(), 8);
        assert_eq!(ind.capacity(), 16);
    }

    #[test]
    fn test_random_extremes() {
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(42);
        assert_eq!(Individual::random(&mut rng, 10, 0.0).unwrap().load(), 0);
        assert_eq!(Individual::random(&mut rng, 10, 40.0).unwrap().load(), 40);
        assert!(Individual::random(&mut rng, 10, 41.0).is_err());
    }

    #[test]
    fn test_random_expected_load() {
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(42);
        let total: usize = (0..500)
            .map(|_| Individual::random(&mut rng, 31, 10.0).unwrap().load())
            .sum();
        let mean = total as f64 / 500.0;
        assert!((mean - 10.0).abs() < 0.5, "mean = {mean}");
    }

    #[test]
    fn test_fecundation_layout() {
        let g1 = Haplotype::new(chr("1100"), chr("0000"));
        let g2 = Haplotype::new(chr("0011"), chr("1111"));
        let zygote = Individual::fecundation(g1, g2);
        let chrs: Vec<String> = zygote.chromosomes().map(|c| c.to_string()).collect();
        assert_eq!(chrs, vec!["1100", "0011", "0000", "1111"]);
    }

    #[test]
    fn test_gamete_without_recombination_is_a_parental_choice() {
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(42);
        let model = RecombinationModel::none();
        let parent = from_canonical("1111", "0000", "1010", "0101");
        for _ in 0..50 {
            let mut copy = parent.clone();
            let gamete = copy.gamete(&mut rng, &model).unwrap();
            assert_eq!(copy, parent);
            let a = gamete.get(LinkageGroup::A).to_string();
            let b = gamete.get(LinkageGroup::B).to_string();
            assert!(a == "1111" || a == "0000");
            assert!(b == "1010" || b == "0101");
        }
    }

    #[test]
    fn test_gamete_conserves_pair_loads() {
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(42);
        let model = RecombinationModel::new(2.0).unwrap();
        let mut parent = from_canonical("1111100000", "0000000000", "1010101010", "0000011111");
        for _ in 0..20 {
            parent.gamete(&mut rng, &model).unwrap();
            let (a1, a2) = parent.homologues(LinkageGroup::A);
            let (b1, b2) = parent.homologues(LinkageGroup::B);
            assert_eq!(a1.load() + a2.load(), 5);
            assert_eq!(b1.load() + b2.load(), 10);
        }
    }

    #[test]
    fn test_loss_postcondition() {
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(42);
        let model = LossModel::new(0.3).unwrap();
        for _ in 0..100 {
            let mut ind = from_canonical("1111100000", "0000000000", "1010101010", "0000011111");
            let before = ind.load();
            match ind.loss(&mut rng, &model) {
                Ok(n) => assert_eq!(ind.load(), before - n),
                Err(e) => assert!(matches!(e, SimulationError::LossMismatch { .. })),
            }
        }
    }

    #[test]
    fn test_loss_on_empty_individual_draws_nothing() {
        let mut a = Xoshiro256PlusPlus::seed_from_u64(42);
        let mut b = Xoshiro256PlusPlus::seed_from_u64(42);
        let mut ind = from_canonical("0000", "0000", "0000", "0000");
        let model = LossModel::new(1.0).unwrap();
        assert_eq!(ind.loss(&mut a, &model).unwrap(), 0);
        assert_eq!(a.random::<u64>(), b.random::<u64>());
    }

    #[test]
    fn test_loss_overdraw_is_fatal() {
        // With one element and q = 1, two or more losses are drawn often.
        let model = LossModel::new(1.0).unwrap();
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(42);
        let mut saw_overdraw = false;
        for _ in 0..200 {
            let mut ind = from_canonical("1000", "0000", "0000", "0000");
            if let Err(e) = ind.loss(&mut rng, &model) {
                let SimulationError::LossMismatch {
                    before,
                    events,
                    after,
                } = e
                else {
                    panic!("unexpected error {e}");
                };
                assert_eq!((before, after), (1, 0));
                assert!(events > 1);
                saw_overdraw = true;
            }
        }
        assert!(saw_overdraw);
    }

    #[test]
    fn test_transposition_postcondition() {
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(42);
        let model = TranspositionModel::new(0.2, 0.0).unwrap();
        for _ in 0..100 {
            let mut ind = from_canonical(
                "1000000000",
                "0100000000",
                "0010000000",
                "0001000000",
            );
            let n = ind.transposition(&mut rng, &model).unwrap();
            assert_eq!(ind.load(), 4 + n);
            assert!(ind.chromosomes().all(|c| c.len() == 10));
        }
    }

    #[test]
    fn test_transposition_saturation_refused() {
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(42);
        let model = TranspositionModel::new(1.0, 0.0).unwrap();
        let mut ind = from_canonical("1111", "1111", "1111", "1110");
        let before = ind.clone();
        let mut refused = false;
        for _ in 0..20 {
            match ind.transposition(&mut rng, &model) {
                Ok(0) => {}
                Ok(n) => panic!("unexpected {n} transpositions"),
                Err(SimulationError::Saturation { load, capacity, .. }) => {
                    assert_eq!(load, 15);
                    assert_eq!(capacity, 16);
                    assert_eq!(ind, before);
                    refused = true;
                }
                Err(e) => panic!("unexpected error {e}"),
            }
        }
        assert!(refused);
    }

    #[test]
    fn test_transposition_without_elements() {
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(42);
        let model = TranspositionModel::new(1.0, 0.0).unwrap();
        let mut ind = from_canonical("0000", "0000", "0000", "0000");
        assert_eq!(ind.transposition(&mut rng, &model).unwrap(), 0);
    }

    #[test]
    fn test_fitness() {
        let f = LoadFitness::new(0.001, 1.5).unwrap();
        let empty = from_canonical("0000", "0000", "0000", "0000");
        assert_eq!(empty.fitness(&f), 1.0);
        let loaded = from_canonical("1111", "0000", "0000", "0000");
        assert!((loaded.fitness(&f) - (1.0 - 0.001 * 8.0)).abs() < 1e-12);
    }

    #[test]
    fn test_occupancy_scenario() {
        // Two loci per group: A = {[1,0],[1,0]}, B = {[0,1],[0,0]}
        let ind = from_canonical("10", "10", "01", "00");
        let mut out = vec![0; 4];
        ind.occupancy_per_locus(&mut out).unwrap();
        assert_eq!(out, vec![2, 0, 0, 1]);

        ind.occupancy_per_locus(&mut out).unwrap();
        assert_eq!(out, vec![4, 0, 0, 2]);

        assert_eq!(ind.occupancy_at(Locus::new(LinkageGroup::A, 0)).unwrap(), 2);
        assert_eq!(ind.occupancy_at_index(3).unwrap(), 1);
        assert!(ind.occupancy_at_index(4).is_err());
        assert!(ind.occupancy_at(Locus::new(LinkageGroup::B, 2)).is_err());
    }

    #[test]
    fn test_occupancy_length_checked() {
        let ind = from_canonical("10", "10", "01", "00");
        let mut out = vec![0; 3];
        assert_eq!(
            ind.occupancy_per_locus(&mut out),
            Err(GenomeError::LengthMismatch {
                expected: 4,
                found: 3
            })
        );
    }
}
