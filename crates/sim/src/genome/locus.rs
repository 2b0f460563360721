use crate::errors::GenomeError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// One of the two linkage groups (homologous chromosome pairs) of an
/// individual.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum LinkageGroup {
    A,
    B,
}

impl LinkageGroup {
    /// Both groups, in canonical order.
    pub const ALL: [LinkageGroup; 2] = [LinkageGroup::A, LinkageGroup::B];

    /// Position of the group in canonical order.
    #[inline]
    pub fn index(self) -> usize {
        match self {
            Self::A => 0,
            Self::B => 1,
        }
    }
}

impl fmt::Display for LinkageGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::A => write!(f, "A"),
            Self::B => write!(f, "B"),
        }
    }
}

/// A site position shared by the two homologous copies of a linkage group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Locus {
    pub group: LinkageGroup,
    pub site: usize,
}

impl Locus {
    pub fn new(group: LinkageGroup, site: usize) -> Self {
        Self { group, site }
    }

    /// Flattened index: loci of group A first, then group B.
    #[inline]
    pub fn index(&self, n_sites: usize) -> usize {
        self.group.index() * n_sites + self.site
    }

    /// Inverse of [`Locus::index`].
    ///
    /// # Errors
    /// Returns `GenomeError::LocusOutOfBounds` if `index >= 2 * n_sites`.
    pub fn from_index(index: usize, n_sites: usize) -> Result<Self, GenomeError> {
        let n_loci = 2 * n_sites;
        if index >= n_loci {
            return Err(GenomeError::LocusOutOfBounds {
                locus: index,
                n_loci,
            });
        }
        let group = if index < n_sites {
            LinkageGroup::A
        } else {
            LinkageGroup::B
        };
        Ok(Self::new(group, index - group.index() * n_sites))
    }
}

impl fmt::Display for Locus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.group, self.site)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_locus_index_round_trip() {
        let n = 7;
        for index in 0..2 * n {
            let locus = Locus::from_index(index, n).unwrap();
            assert_eq!(locus.index(n), index);
        }
        assert_eq!(Locus::from_index(7, 7).unwrap(), Locus::new(LinkageGroup::B, 0));
    }

    #[test]
    fn test_locus_out_of_bounds() {
        assert_eq!(
            Locus::from_index(14, 7),
            Err(GenomeError::LocusOutOfBounds {
                locus: 14,
                n_loci: 14
            })
        );
    }

    #[test]
    fn test_display() {
        assert_eq!(Locus::new(LinkageGroup::B, 3).to_string(), "B:3");
    }
}
