use rand::Rng;
use tracing::warn;

use crate::genome::{HaplotypeBuffer, InsertedSeq, InsertionShape, ReferenceGenome, ReferenceSequence};
use crate::variant::{AlleleKind, Parent, Variant, VariantType};

/// Result of applying a variant list onto one chromosome: the two mutated
/// parental buffers plus, in input order, whether each variant's allele was
/// incorporated on each side.
#[derive(Debug)]
pub struct Materialized {
    pub paternal: HaplotypeBuffer,
    pub maternal: HaplotypeBuffer,
    pub paternal_added: Vec<bool>,
    pub maternal_added: Vec<bool>,
}

impl Materialized {
    pub fn buffer(&self, side: Parent) -> &HaplotypeBuffer {
        match side {
            Parent::Paternal => &self.paternal,
            Parent::Maternal => &self.maternal,
        }
    }

    pub fn added(&self, side: Parent) -> &[bool] {
        match side {
            Parent::Paternal => &self.paternal_added,
            Parent::Maternal => &self.maternal_added,
        }
    }
}

/// Apply `variants` in order onto a copy of `reference`, once per parental
/// side.
///
/// Unphased variants have their parental assignment flipped with probability
/// 0.5 before either side is touched, so both haplotypes see the same
/// decision. Every rejection (out of bounds, overlap, duplicate insertion) is
/// logged, recorded as not-incorporated, and never aborts the run.
///
/// `genome` supplies secondary loci for translocation payloads.
pub fn apply_variants<R: Rng>(
    variants: &mut [Variant],
    reference: &ReferenceSequence,
    genome: &ReferenceGenome,
    rng: &mut R,
) -> Materialized {
    let mut paternal = HaplotypeBuffer::from_reference(reference);
    let mut maternal = HaplotypeBuffer::from_reference(reference);
    let mut paternal_added = Vec::with_capacity(variants.len());
    let mut maternal_added = Vec::with_capacity(variants.len());

    for variant in variants.iter_mut() {
        if !variant.phased {
            variant.randomize_haplotype(rng);
        }

        for (side, buffer, added) in [
            (Parent::Paternal, &mut paternal, &mut paternal_added),
            (Parent::Maternal, &mut maternal, &mut maternal_added),
        ] {
            let index = variant.allele_index(side);
            if index > 0 {
                added.push(add_variant(buffer, reference, genome, variant, index));
            } else {
                added.push(false);
            }
        }
    }

    Materialized {
        paternal,
        maternal,
        paternal_added,
        maternal_added,
    }
}

/// Apply one allele of one variant onto a haplotype buffer. Returns whether
/// the variant was incorporated.
fn add_variant(
    buffer: &mut HaplotypeBuffer,
    reference: &ReferenceSequence,
    genome: &ReferenceGenome,
    variant: &Variant,
    index: i32,
) -> bool {
    let allele = match variant.allele(index) {
        Some(a) => a.clone(),
        None => {
            warn!(
                "variant {} at {}:{} selects missing allele {}, skipping",
                variant.id, variant.chrom, variant.pos, index
            );
            return false;
        }
    };

    let pos = variant.pos;
    // Inversions and tandem duplications replace a span given by the
    // allele's declared length rather than the parsed reference span.
    let span = match &allele.kind {
        AlleleKind::Inversion { len } => *len,
        AlleleKind::TandemDup { unit_len, .. } => *unit_len,
        _ => variant.ref_span,
    };

    if pos < 1 || pos > buffer.len() || (span > 0 && pos + span - 1 > buffer.len()) {
        warn!(
            "variant {} out of chromosome bounds at {}:{} (span {}), skipping",
            variant.id, reference.name(), pos, span
        );
        return false;
    }

    // Variants in the same haplotype must not overlap: a span touching a
    // deleted position, or a base a prior variant rewrote, is rejected. A
    // zero-span insertion is only rejected when squeezed between deleted
    // bases on both sides.
    let overlap = if span == 0 {
        buffer.is_deleted(pos) && pos >= 2 && buffer.is_deleted(pos - 1)
    } else {
        (pos..pos + span)
            .any(|p| buffer.is_deleted(p) || buffer.base(p) != reference.byte_at(p))
    };
    if overlap {
        warn!(
            "variant {} overlaps an earlier variant at {}:{} (span {}), skipping",
            variant.id, reference.name(), pos, span
        );
        return false;
    }

    if let Some(alt) = allele.seq() {
        if span == 1 && alt.len() == 1 {
            buffer.set_base(pos, match_case(alt[0], reference.byte_at(pos)));
            return true;
        }
        if variant.variant_type(index) == VariantType::Mnp {
            // One base at a time, same as a run of SNPs. Later variants in
            // the input may land between the bytes of this span.
            for p in pos..pos + span {
                buffer.set_base(p, match_case(alt[p - pos], reference.byte_at(p)));
            }
            return true;
        }
    }

    // Everything else decomposes into deletion of the span plus an optional
    // insertion at its start.
    if buffer.insertions().contains(pos) {
        warn!(
            "variant {}: second insertion at {}:{}, skipping",
            variant.id, reference.name(), pos
        );
        return false;
    }

    let (content, shape) = match &allele.kind {
        AlleleKind::Seq(bytes) => (bytes.clone(), InsertionShape::Literal),
        AlleleKind::Insertion { .. } => (Vec::new(), InsertionShape::Literal),
        AlleleKind::Deletion => (Vec::new(), InsertionShape::Literal),
        AlleleKind::Inversion { len } => (
            reference.rev_comp(pos, pos + len),
            InsertionShape::Inversion,
        ),
        AlleleKind::TandemDup { unit_len, copies } => {
            let unit = reference.sub_seq(pos, pos + unit_len);
            let mut repeated = Vec::with_capacity(unit_len * *copies as usize);
            for _ in 0..*copies {
                repeated.extend_from_slice(unit);
            }
            (
                repeated,
                InsertionShape::TandemDup {
                    unit_len: *unit_len,
                    copies: *copies,
                },
            )
        }
        AlleleKind::Translocation { chr2, pos2, end2, .. } => {
            let source = match genome.get(chr2) {
                Some(s) => s,
                None => {
                    warn!(
                        "variant {}: unknown secondary chromosome {}, skipping",
                        variant.id, chr2
                    );
                    return false;
                }
            };
            let (lo, hi) = (*pos2.min(end2), *pos2.max(end2));
            if lo < 1 || hi > source.len() {
                warn!(
                    "variant {}: secondary locus {}:{}-{} out of bounds, skipping",
                    variant.id, chr2, pos2, end2
                );
                return false;
            }
            let content = if variant.inverted {
                source.rev_comp(lo, hi + 1)
            } else {
                source.sub_seq(lo, hi + 1).to_vec()
            };
            (
                content,
                InsertionShape::Translocation {
                    chr2: chr2.clone(),
                    pos2: *pos2,
                    end2: *end2,
                },
            )
        }
    };

    buffer.mark_deleted(pos, span);
    if !content.is_empty() {
        let inserted = InsertedSeq {
            seq: content,
            shape,
            var_id: variant.id.clone(),
        };
        let fresh = buffer.insertions_mut().try_insert(pos, inserted);
        debug_assert!(fresh, "occupancy was checked before dispatch");
    }
    true
}

/// Copy the case of the reference base onto the substituted base, so
/// soft-masking (lowercase repeat annotation) survives substitution.
fn match_case(alt: u8, reference: u8) -> u8 {
    if reference.is_ascii_lowercase() {
        alt.to_ascii_lowercase()
    } else {
        alt.to_ascii_uppercase()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::genome::Chrom;
    use crate::variant::Allele;
    use rand::SeedableRng;
    use rand_xoshiro::Xoshiro256StarStar;

    fn reference() -> ReferenceSequence {
        ReferenceSequence::new("chrT", b"ACGTACGT".to_vec())
    }

    fn variant(pos: usize, ref_span: usize, kind: AlleleKind) -> Variant {
        Variant {
            chrom: Chrom::new("chrT"),
            pos,
            ref_span,
            ref_seq: Vec::new(),
            ref_deleted: String::new(),
            ref_clipped: String::new(),
            alleles: vec![Allele::new(kind)],
            paternal: 0,
            maternal: 1,
            phased: true,
            id: "v".into(),
            qual: ".".into(),
            filter: "PASS".into(),
            inverted: false,
            tra_id: None,
        }
    }

    fn materialize(variants: &mut [Variant]) -> Materialized {
        let reference = reference();
        let genome = ReferenceGenome::new();
        let mut rng = Xoshiro256StarStar::seed_from_u64(0);
        apply_variants(variants, &reference, &genome, &mut rng)
    }

    #[test]
    fn heterozygous_deletion_only_touches_one_side() {
        let mut vars = vec![variant(3, 2, AlleleKind::Deletion)];
        let out = materialize(&mut vars);
        assert_eq!(out.maternal_added, vec![true]);
        assert_eq!(out.paternal_added, vec![false]);
        assert!(out.maternal.is_deleted(3));
        assert!(out.maternal.is_deleted(4));
        assert!(!out.paternal.is_deleted(3));
        assert_eq!(out.maternal.host_len(), 6);
        assert_eq!(out.paternal.host_len(), 8);
    }

    #[test]
    fn snp_preserves_soft_mask_case() {
        let reference = ReferenceSequence::new("chrT", b"acgtACGT".to_vec());
        let genome = ReferenceGenome::new();
        let mut rng = Xoshiro256StarStar::seed_from_u64(0);
        let mut vars = vec![
            variant(2, 1, AlleleKind::Seq(b"T".to_vec())),
            variant(6, 1, AlleleKind::Seq(b"t".to_vec())),
        ];
        let out = apply_variants(&mut vars, &reference, &genome, &mut rng);
        assert_eq!(out.maternal.base(2), b't');
        assert_eq!(out.maternal.base(6), b'T');
    }

    #[test]
    fn overlapping_variants_first_wins() {
        let mut vars = vec![
            variant(2, 3, AlleleKind::Deletion),
            variant(3, 2, AlleleKind::Deletion),
        ];
        let out = materialize(&mut vars);
        assert_eq!(out.maternal_added, vec![true, false]);
    }

    #[test]
    fn snp_on_top_of_substituted_base_is_rejected() {
        let mut vars = vec![
            variant(5, 1, AlleleKind::Seq(b"G".to_vec())),
            variant(5, 1, AlleleKind::Seq(b"C".to_vec())),
        ];
        let out = materialize(&mut vars);
        assert_eq!(out.maternal_added, vec![true, false]);
        assert_eq!(out.maternal.base(5), b'G');
    }

    #[test]
    fn out_of_bounds_variant_is_skipped() {
        let mut vars = vec![variant(7, 5, AlleleKind::Deletion)];
        let out = materialize(&mut vars);
        assert_eq!(out.maternal_added, vec![false]);
        assert_eq!(out.maternal.host_len(), 8);
    }

    #[test]
    fn inversion_inserts_reverse_complement() {
        let mut vars = vec![variant(3, 4, AlleleKind::Inversion { len: 4 })];
        let out = materialize(&mut vars);
        assert_eq!(out.maternal_added, vec![true]);
        for p in 3..=6 {
            assert!(out.maternal.is_deleted(p));
        }
        let ins = out.maternal.insertions().get(3).expect("payload recorded");
        // reference[3..=6] is GTAC, reverse complement GTAC
        assert_eq!(ins.seq, b"GTAC");
        assert_eq!(ins.shape, InsertionShape::Inversion);
    }

    #[test]
    fn tandem_duplication_repeats_unit() {
        let mut vars = vec![variant(
            2,
            0,
            AlleleKind::TandemDup {
                unit_len: 3,
                copies: 3,
            },
        )];
        let out = materialize(&mut vars);
        assert_eq!(out.maternal_added, vec![true]);
        let ins = out.maternal.insertions().get(2).expect("payload recorded");
        assert_eq!(ins.seq, b"CGTCGTCGT");
        // span is recomputed from the unit length
        assert!(out.maternal.is_deleted(2));
        assert!(out.maternal.is_deleted(4));
        assert!(!out.maternal.is_deleted(5));
        assert_eq!(out.maternal.host_len(), 8 - 3 + 9);
    }

    #[test]
    fn duplicate_insertion_position_is_rejected() {
        let mut vars = vec![
            variant(4, 0, AlleleKind::Seq(b"AA".to_vec())),
            variant(4, 0, AlleleKind::Seq(b"CC".to_vec())),
        ];
        // zero-span insertions: first lands, second hits the occupied slot
        let out = materialize(&mut vars);
        assert_eq!(out.maternal_added, vec![true, false]);
        assert_eq!(out.maternal.insertions().get(4).unwrap().seq, b"AA");
    }

    #[test]
    fn translocation_lifts_secondary_span() {
        let reference = reference();
        let mut genome = ReferenceGenome::new();
        genome.insert(ReferenceSequence::new("chrS", b"TTTTGGGG".to_vec()));
        let mut rng = Xoshiro256StarStar::seed_from_u64(0);
        let mut vars = vec![variant(
            2,
            0,
            AlleleKind::Translocation {
                len: 4,
                chr2: Chrom::new("chrS"),
                pos2: 3,
                end2: 6,
            },
        )];
        let out = apply_variants(&mut vars, &reference, &genome, &mut rng);
        assert_eq!(out.maternal_added, vec![true]);
        assert_eq!(out.maternal.insertions().get(2).unwrap().seq, b"TTGG");
    }

    #[test]
    fn unphased_variant_is_resolved_once() {
        let mut vars = vec![variant(3, 1, AlleleKind::Seq(b"A".to_vec()))];
        vars[0].phased = false;
        let out = materialize(&mut vars);
        assert!(vars[0].phased);
        // exactly one side carries the alternate after the flip
        let applied =
            out.paternal_added[0] as u32 + out.maternal_added[0] as u32;
        assert_eq!(applied, 1);
    }
}
