use rand::Rng;

use crate::genome::Chrom;

/// Gender of the simulated individual, controls ploidy of the sex
/// chromosomes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gender {
    Male,
    Female,
}

/// Parent-of-origin of one haplotype.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Parent {
    Paternal,
    Maternal,
}

impl Parent {
    pub fn name(self) -> &'static str {
        match self {
            Parent::Paternal => "paternal",
            Parent::Maternal => "maternal",
        }
    }
}

/// A pair of allele indices (paternal, maternal). 0 selects the reference
/// allele, 1.. select alternates, negative means unresolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Genotypes {
    pub paternal: i32,
    pub maternal: i32,
}

/// Proportion of randomized genotypes that come out heterozygous.
const PROP_HET: f64 = 0.6;

impl Genotypes {
    pub fn new(paternal: i32, maternal: i32) -> Self {
        Self { paternal, maternal }
    }

    /// Sample a genotype for a variant with `num_alt` alternate alleles.
    ///
    /// Haploid chromosomes always receive the first alternate on both slots;
    /// the orchestrator later drops the side that is not emitted. Diploid
    /// chromosomes are homozygous with probability `1 - PROP_HET`, otherwise
    /// two distinct indices are drawn.
    pub fn sample<R: Rng>(chrom: &Chrom, gender: Gender, num_alt: i32, rng: &mut R) -> Self {
        if chrom.is_haploid(gender) {
            return Self::new(1, 1);
        }

        if rng.gen::<f64>() > PROP_HET {
            let hom = rng.gen_range(1..=num_alt);
            return Self::new(hom, hom);
        }

        let first = rng.gen_range(0..=num_alt);
        let mut second = rng.gen_range(0..=num_alt);
        while second == first {
            second = rng.gen_range(0..=num_alt);
        }
        if rng.gen_range(0..2) == 0 {
            Self::new(first, second)
        } else {
            Self::new(second, first)
        }
    }

    pub fn is_non_ref(&self) -> bool {
        !(self.paternal == 0 && self.maternal == 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_xoshiro::Xoshiro256StarStar;

    #[test]
    fn haploid_chromosomes_get_first_alternate() {
        let mut rng = Xoshiro256StarStar::seed_from_u64(7);
        let g = Genotypes::sample(&Chrom::new("chrY"), Gender::Male, 2, &mut rng);
        assert_eq!(g, Genotypes::new(1, 1));
    }

    #[test]
    fn diploid_sampling_stays_in_range() {
        let mut rng = Xoshiro256StarStar::seed_from_u64(11);
        let chrom = Chrom::new("chr1");
        for _ in 0..200 {
            let g = Genotypes::sample(&chrom, Gender::Female, 2, &mut rng);
            assert!((0..=2).contains(&g.paternal));
            assert!((0..=2).contains(&g.maternal));
            assert!(g.is_non_ref());
        }
    }
}
