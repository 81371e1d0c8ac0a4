use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use crate::variant::Gender;

/// Chromosome name, compared and ordered by its string form.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Chrom(Arc<str>);

impl Chrom {
    pub fn new(name: impl Into<Arc<str>>) -> Self {
        Self(name.into())
    }

    pub fn name(&self) -> &str {
        &self.0
    }

    /// Name without a leading "chr" prefix.
    fn bare(&self) -> &str {
        self.0.strip_prefix("chr").unwrap_or(&self.0)
    }

    pub fn is_x(&self) -> bool {
        self.bare().eq_ignore_ascii_case("x")
    }

    pub fn is_y(&self) -> bool {
        self.bare().eq_ignore_ascii_case("y")
    }

    pub fn is_mt(&self) -> bool {
        let bare = self.bare();
        bare.eq_ignore_ascii_case("m") || bare.eq_ignore_ascii_case("mt")
    }

    /// Whether this chromosome is haploid in an individual of the given
    /// gender. chrX is diploid in females, chrY exists only in males, and
    /// the mitochondrial chromosome is always a single copy.
    pub fn is_haploid(&self, gender: Gender) -> bool {
        match gender {
            Gender::Male => self.is_x() || self.is_y() || self.is_mt(),
            Gender::Female => self.is_mt(),
        }
    }
}

impl fmt::Display for Chrom {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Complement of a single base, preserving case; N maps to N and anything
/// unrecognized passes through unchanged.
pub fn complement(base: u8) -> u8 {
    match base {
        b'a' => b't',
        b'c' => b'g',
        b'g' => b'c',
        b't' => b'a',
        b'A' => b'T',
        b'C' => b'G',
        b'G' => b'C',
        b'T' => b'A',
        other => other,
    }
}

/// Reverse-complement a base slice in place.
pub fn reverse_complement(bases: &mut [u8]) {
    bases.reverse();
    for b in bases.iter_mut() {
        *b = complement(*b);
    }
}

/// Named, immutable, 1-indexed chromosome sequence. Bytes are stored exactly
/// as read, so soft-masking case survives into the synthesized genome.
#[derive(Debug, Clone)]
pub struct ReferenceSequence {
    name: Chrom,
    header: String,
    seq: Vec<u8>,
}

impl ReferenceSequence {
    /// `header` is the FASTA header without the leading `>`; the chromosome
    /// name is its first whitespace-separated token.
    pub fn new(header: impl Into<String>, seq: Vec<u8>) -> Self {
        let header = header.into();
        let name = header.split_whitespace().next().unwrap_or("").to_string();
        Self {
            name: Chrom::new(name),
            header,
            seq,
        }
    }

    pub fn name(&self) -> &Chrom {
        &self.name
    }

    pub fn header(&self) -> &str {
        &self.header
    }

    pub fn len(&self) -> usize {
        self.seq.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seq.is_empty()
    }

    /// Base at a 1-based position.
    pub fn byte_at(&self, pos: usize) -> u8 {
        self.seq[pos - 1]
    }

    pub fn bytes(&self) -> &[u8] {
        &self.seq
    }

    /// Subsequence `[begin, end)` in 1-based coordinates.
    pub fn sub_seq(&self, begin: usize, end: usize) -> &[u8] {
        &self.seq[begin - 1..end - 1]
    }

    /// Reverse complement of `[begin, end)` in 1-based coordinates.
    pub fn rev_comp(&self, begin: usize, end: usize) -> Vec<u8> {
        let mut segment = self.seq[begin - 1..end - 1].to_vec();
        reverse_complement(&mut segment);
        segment
    }
}

/// All reference chromosomes of a run, keyed by name in deterministic order.
#[derive(Debug, Default)]
pub struct ReferenceGenome {
    sequences: BTreeMap<Chrom, ReferenceSequence>,
}

impl ReferenceGenome {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a chromosome; a duplicate name replaces the earlier entry.
    pub fn insert(&mut self, seq: ReferenceSequence) {
        self.sequences.insert(seq.name().clone(), seq);
    }

    pub fn get(&self, chrom: &Chrom) -> Option<&ReferenceSequence> {
        self.sequences.get(chrom)
    }

    pub fn chromosomes(&self) -> impl Iterator<Item = &ReferenceSequence> {
        self.sequences.values()
    }

    pub fn len(&self) -> usize {
        self.sequences.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sequences.is_empty()
    }
}
