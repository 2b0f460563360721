use crate::genome::{Chromosome, LinkageGroup};

/// A haplotype: one chromosome per linkage group.
///
/// An individual carries two haplotypes. A gamete is also a `Haplotype`, built
/// by picking one recombined homologue of each pair.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Haplotype {
    /// Chromosomes indexed by `LinkageGroup::index`
    chromosomes: [Chromosome; 2],
}

impl Haplotype {
    /// Create a haplotype from the chromosomes of groups A and B.
    pub fn new(group_a: Chromosome, group_b: Chromosome) -> Self {
        Self {
            chromosomes: [group_a, group_b],
        }
    }

    /// Create a haplotype with two empty chromosomes of `n_sites` sites.
    pub fn empty(n_sites: usize) -> Self {
        Self::new(Chromosome::new(n_sites), Chromosome::new(n_sites))
    }

    /// Borrow the chromosome of `group`.
    #[inline]
    pub fn get(&self, group: LinkageGroup) -> &Chromosome {
        &self.chromosomes[group.index()]
    }

    /// Borrow the chromosome of `group` mutably.
    #[inline]
    pub fn get_mut(&mut self, group: LinkageGroup) -> &mut Chromosome {
        &mut self.chromosomes[group.index()]
    }

    /// Borrow both chromosomes in group order.
    #[inline]
    pub fn chromosomes(&self) -> &[Chromosome; 2] {
        &self.chromosomes
    }

    /// Total number of elements carried by the haplotype.
    pub fn load(&self) -> usize {
        self.chromosomes.iter().map(Chromosome::load).sum()
    }

    /// Sites per chromosome (taken from group A).
    #[inline]
    pub fn sites_per_chromosome(&self) -> usize {
        self.chromosomes[0].len()
    }
}
