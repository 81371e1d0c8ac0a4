use rand::Rng;

use crate::genome::Chrom;
use crate::variant::{Allele, AlleleKind, Gender, Genotypes, Parent};

/// Classification of one allele of a variant, derived from the allele's
/// payload and the reference span it replaces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VariantType {
    Reference,
    Snp,
    Insertion,
    Deletion,
    Mnp,
    Inversion,
    TandemDup,
    Translocation,
    Complex,
}

/// One genomic edit with its two allele slots.
///
/// Positions are 1-based into the chromosome's reference sequence. Allele
/// indices in the genotype are 0 for the reference allele and `1..=n` into
/// `alleles`; negative means the genotype is unresolved and must be sampled
/// before materialization.
#[derive(Debug, Clone)]
pub struct Variant {
    pub chrom: Chrom,
    /// 1-based start of the replaced reference span.
    pub pos: usize,
    /// Length of the replaced reference span ("del" length).
    pub ref_span: usize,
    /// Literal reference allele bytes, after leading-base trimming.
    pub ref_seq: Vec<u8>,
    /// Reference base(s) trimmed off the front during VCF parsing, kept for
    /// round-tripping the record.
    pub ref_deleted: String,
    /// Bases shared by the tail of REF and every ALT, clipped off during
    /// parsing and re-appended when the record is written back out.
    pub ref_clipped: String,
    pub alleles: Vec<Allele>,
    pub paternal: i32,
    pub maternal: i32,
    pub phased: bool,
    pub id: String,
    pub qual: String,
    pub filter: String,
    /// ISINV: the payload of a duplication/translocation is inverted.
    pub inverted: bool,
    /// Translocation group id, when this edit is one leg of a translocation.
    pub tra_id: Option<String>,
}

impl Variant {
    /// Allele index assigned to one parental side.
    pub fn allele_index(&self, side: Parent) -> i32 {
        match side {
            Parent::Paternal => self.paternal,
            Parent::Maternal => self.maternal,
        }
    }

    /// Allele at a 1-based genotype index; `None` for the reference slot or
    /// an out-of-range index.
    pub fn allele(&self, index: i32) -> Option<&Allele> {
        if index <= 0 {
            return None;
        }
        self.alleles.get(index as usize - 1)
    }

    /// True when both genotype slots select the reference allele.
    pub fn is_reference(&self) -> bool {
        self.paternal == 0 && self.maternal == 0
    }

    pub fn is_unresolved(&self) -> bool {
        self.paternal < 0 || self.maternal < 0
    }

    /// Classify the allele at `index`. Symbolic kinds classify directly from
    /// their tag; literal sequences compare lengths against the reference
    /// span.
    pub fn variant_type(&self, index: i32) -> VariantType {
        let allele = match self.allele(index) {
            Some(a) => a,
            None => return VariantType::Reference,
        };

        match &allele.kind {
            AlleleKind::Insertion { .. } => VariantType::Insertion,
            AlleleKind::Inversion { .. } => VariantType::Inversion,
            AlleleKind::TandemDup { .. } => VariantType::TandemDup,
            AlleleKind::Deletion => VariantType::Deletion,
            AlleleKind::Translocation { .. } => VariantType::Translocation,
            AlleleKind::Seq(bytes) => {
                let ins_len = bytes.len();
                let del_len = self.ref_span;
                if ins_len == 0 && del_len == 0 {
                    VariantType::Reference
                } else if ins_len == 1 && del_len == 1 {
                    VariantType::Snp
                } else if ins_len == 0 {
                    VariantType::Deletion
                } else if del_len == 0 {
                    VariantType::Insertion
                } else if ins_len == del_len {
                    VariantType::Mnp
                } else {
                    VariantType::Complex
                }
            }
        }
    }

    /// Maximum of the reference span and the allele's length.
    pub fn max_len(&self, index: i32) -> usize {
        match self.allele(index) {
            Some(a) => self.ref_span.max(a.len()),
            None => 0,
        }
    }

    pub fn copy_number(&self, index: i32) -> u32 {
        self.allele(index).map_or(1, Allele::copy_number)
    }

    /// True if any alternate allele carries a copy number above 1, which
    /// switches the emitted FORMAT from `GT` to `GT:CN`.
    pub fn has_copy_number(&self) -> bool {
        self.alleles.iter().any(|a| a.copy_number() > 1)
    }

    /// SVLEN values per alternate allele, VCF sign conventions: negative for
    /// deletions, positive for inserted content, omitted when zero.
    pub fn sv_lengths(&self) -> Vec<i64> {
        let mut out = Vec::new();
        for (i, allele) in self.alleles.iter().enumerate() {
            let alt_len = allele.len() as i64;
            let svlen = match self.variant_type(i as i32 + 1) {
                VariantType::Deletion | VariantType::Complex | VariantType::Insertion => {
                    alt_len - self.ref_span as i64
                }
                VariantType::Mnp | VariantType::Snp | VariantType::Reference => 0,
                _ => alt_len,
            };
            if svlen != 0 {
                out.push(svlen);
            }
        }
        out
    }

    /// Bases this variant touches: the reference span plus every alternate
    /// allele whose length differs from it. Used for progress accounting.
    pub fn variant_bases(&self) -> usize {
        let mut total = self.ref_span;
        for allele in &self.alleles {
            if allele.len() != self.ref_span {
                total += allele.len();
            }
        }
        total
    }

    /// Sort key: variants order by their position before leading-base
    /// trimming, so records that shared an anchor base stay in input order.
    pub fn sort_pos(&self) -> usize {
        self.pos.saturating_sub(self.ref_deleted.len())
    }

    /// Resolve ambiguous phasing by swapping the parental assignment with
    /// probability 0.5. Marks the variant phased either way, so the decision
    /// is made exactly once.
    pub fn randomize_haplotype<R: Rng>(&mut self, rng: &mut R) {
        self.phased = true;
        if rng.gen_bool(0.5) {
            std::mem::swap(&mut self.paternal, &mut self.maternal);
        }
    }

    /// Sample a genotype for a variant whose GT column was missing.
    pub fn randomize_genotype<R: Rng>(&mut self, gender: Gender, rng: &mut R) {
        let g = Genotypes::sample(&self.chrom, gender, self.alleles.len() as i32, rng);
        self.paternal = g.paternal;
        self.maternal = g.maternal;
        self.phased = true;
    }
}
