use std::fmt;

use crate::genome::{HaplotypeBuffer, InsertionShape, ReferenceSequence};

/// Block feature annotated in the host↔reference map.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Feature {
    Seq,
    Del,
    Ins,
    DupTandem,
    Inv,
    Translocation,
}

impl Feature {
    pub fn as_str(self) -> &'static str {
        match self {
            Feature::Seq => "SEQ",
            Feature::Del => "DEL",
            Feature::Ins => "INS",
            Feature::DupTandem => "DUP_TANDEM",
            Feature::Inv => "INV",
            Feature::Translocation => "TRANSLOCATION",
        }
    }
}

/// One block of the map file: a maximal run of positions with the same fate.
///
/// Host coordinates index the synthesized sequence, reference coordinates the
/// input chromosome, both 1-based at the first position of the block. A block
/// absent from one side (a deletion has no host bases, an insertion no
/// reference bases) points at the position just upstream on that side.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MapRecord {
    pub len: usize,
    pub host_chr: String,
    pub host_pos: usize,
    pub ref_chr: String,
    pub ref_pos: usize,
    pub forward: bool,
    pub feature: Feature,
    pub var_id: String,
}

impl fmt::Display for MapRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}",
            self.len,
            self.host_chr,
            self.host_pos,
            self.ref_chr,
            self.ref_pos,
            if self.forward { "+" } else { "-" },
            self.feature.as_str(),
            self.var_id
        )
    }
}

/// Column header line of the map file.
pub const MAP_HEADER: &str = "#Len\tHOST_chr\tHOST_pos\tREF_chr\tREF_pos\tDIRECTION\tFEATURE\tVAR_ID";

/// Running cursor over both coordinate systems during the map scan.
struct HostRefIndex {
    host: usize,
    reference: usize,
}

impl HostRefIndex {
    fn advance(&mut self, record: &MapRecord) {
        match record.feature {
            Feature::Seq => {
                self.host += record.len;
                self.reference += record.len;
            }
            Feature::Del => self.reference += record.len,
            Feature::Ins | Feature::DupTandem | Feature::Inv | Feature::Translocation => {
                self.host += record.len;
            }
        }
    }
}

/// Scan one materialized haplotype and emit its map blocks in host order.
///
/// Each reference position is either surviving (`SEQ`) or deleted (`DEL`);
/// runs of equal fate coalesce into one record. An insertion attached at a
/// position is emitted before that position's own block, and a `DEL` block
/// that starts where an insertion landed inherits the insertion's variant id
/// (the usual decomposition of a replacement into insert-plus-delete).
pub fn map_records(
    host_chr: &str,
    reference: &ReferenceSequence,
    buffer: &HaplotypeBuffer,
) -> Vec<MapRecord> {
    let ref_len = reference.len();
    let mut out = Vec::new();
    if ref_len == 0 {
        return out;
    }

    let mut cursor = HostRefIndex {
        host: 1,
        reference: 1,
    };
    let mut open = open_block(host_chr, reference, buffer, 1, &mut cursor, &mut out);

    for pos in 2..=ref_len {
        let same_block = match open.feature {
            Feature::Del => buffer.is_deleted(pos) && !buffer.insertions().contains(pos),
            Feature::Seq => !buffer.is_deleted(pos) && !buffer.insertions().contains(pos),
            _ => false,
        };
        if same_block {
            open.len += 1;
        } else {
            cursor.advance(&open);
            out.push(open);
            open = open_block(host_chr, reference, buffer, pos, &mut cursor, &mut out);
        }
    }
    out.push(open);
    out
}

/// Emit any insertion-derived records at `pos`, then open the `SEQ`/`DEL`
/// block starting there. The opened block has length 1 and grows as the scan
/// coalesces; the cursor is only advanced when it closes.
fn open_block(
    host_chr: &str,
    reference: &ReferenceSequence,
    buffer: &HaplotypeBuffer,
    pos: usize,
    cursor: &mut HostRefIndex,
    out: &mut Vec<MapRecord>,
) -> MapRecord {
    let ref_chr = reference.name().name();
    let mut inserted_var_id = None;

    if let Some(ins) = buffer.insertions().get(pos) {
        inserted_var_id = Some(ins.var_id.clone());
        match &ins.shape {
            InsertionShape::Literal => {
                let record = MapRecord {
                    len: ins.seq.len(),
                    host_chr: host_chr.to_string(),
                    host_pos: cursor.host,
                    ref_chr: ref_chr.to_string(),
                    ref_pos: cursor.reference - 1,
                    forward: true,
                    feature: Feature::Ins,
                    var_id: ins.var_id.clone(),
                };
                cursor.advance(&record);
                out.push(record);
            }
            InsertionShape::Inversion => {
                let record = MapRecord {
                    len: ins.seq.len(),
                    host_chr: host_chr.to_string(),
                    host_pos: cursor.host,
                    ref_chr: ref_chr.to_string(),
                    ref_pos: cursor.reference - 1,
                    forward: false,
                    feature: Feature::Inv,
                    var_id: ins.var_id.clone(),
                };
                cursor.advance(&record);
                out.push(record);
            }
            InsertionShape::TandemDup { unit_len, copies } => {
                // one block per copy of the duplicated unit
                for _ in 0..*copies {
                    let record = MapRecord {
                        len: *unit_len,
                        host_chr: host_chr.to_string(),
                        host_pos: cursor.host,
                        ref_chr: ref_chr.to_string(),
                        ref_pos: cursor.reference - 1,
                        forward: true,
                        feature: Feature::DupTandem,
                        var_id: ins.var_id.clone(),
                    };
                    cursor.advance(&record);
                    out.push(record);
                }
            }
            InsertionShape::Translocation { chr2, pos2, end2 } => {
                let record = MapRecord {
                    len: ins.seq.len(),
                    host_chr: host_chr.to_string(),
                    host_pos: cursor.host,
                    ref_chr: chr2.name().to_string(),
                    ref_pos: pos2.min(end2) - 1,
                    forward: pos2 <= end2,
                    feature: Feature::Translocation,
                    var_id: ins.var_id.clone(),
                };
                cursor.advance(&record);
                out.push(record);
            }
        }
    }

    if buffer.is_deleted(pos) {
        MapRecord {
            len: 1,
            host_chr: host_chr.to_string(),
            // no host bases: point at the last host position upstream
            host_pos: cursor.host - 1,
            ref_chr: ref_chr.to_string(),
            ref_pos: cursor.reference,
            forward: true,
            feature: Feature::Del,
            var_id: inserted_var_id.unwrap_or_else(|| ".".to_string()),
        }
    } else {
        MapRecord {
            len: 1,
            host_chr: host_chr.to_string(),
            host_pos: cursor.host,
            ref_chr: ref_chr.to_string(),
            ref_pos: cursor.reference,
            forward: true,
            feature: Feature::Seq,
            var_id: ".".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::genome::{Chrom, InsertedSeq};

    fn reference() -> ReferenceSequence {
        ReferenceSequence::new("chrT", b"ACGTACGT".to_vec())
    }

    fn render(records: &[MapRecord]) -> Vec<String> {
        records.iter().map(|r| r.to_string()).collect()
    }

    #[test]
    fn untouched_chromosome_is_one_seq_block() {
        let reference = reference();
        let buffer = HaplotypeBuffer::from_reference(&reference);
        let records = map_records("chrT_maternal", &reference, &buffer);
        assert_eq!(
            render(&records),
            vec!["8\tchrT_maternal\t1\tchrT\t1\t+\tSEQ\t."]
        );
    }

    #[test]
    fn interior_deletion_splits_into_three_blocks() {
        let reference = reference();
        let mut buffer = HaplotypeBuffer::from_reference(&reference);
        buffer.mark_deleted(3, 2);
        let records = map_records("chrT_maternal", &reference, &buffer);
        assert_eq!(
            render(&records),
            vec![
                "2\tchrT_maternal\t1\tchrT\t1\t+\tSEQ\t.",
                "2\tchrT_maternal\t2\tchrT\t3\t+\tDEL\t.",
                "4\tchrT_maternal\t3\tchrT\t5\t+\tSEQ\t.",
            ]
        );
    }

    #[test]
    fn insertion_record_precedes_block_and_skips_reference() {
        let reference = reference();
        let mut buffer = HaplotypeBuffer::from_reference(&reference);
        buffer.insertions_mut().try_insert(
            4,
            InsertedSeq {
                seq: b"TTT".to_vec(),
                shape: InsertionShape::Literal,
                var_id: "ins1".into(),
            },
        );
        let records = map_records("chrT_paternal", &reference, &buffer);
        assert_eq!(
            render(&records),
            vec![
                "3\tchrT_paternal\t1\tchrT\t1\t+\tSEQ\t.",
                "3\tchrT_paternal\t4\tchrT\t3\t+\tINS\tins1",
                "5\tchrT_paternal\t7\tchrT\t4\t+\tSEQ\t.",
            ]
        );
    }

    #[test]
    fn replacement_deletion_inherits_insertion_var_id() {
        let reference = reference();
        let mut buffer = HaplotypeBuffer::from_reference(&reference);
        buffer.mark_deleted(3, 2);
        buffer.insertions_mut().try_insert(
            3,
            InsertedSeq {
                seq: b"G".to_vec(),
                shape: InsertionShape::Literal,
                var_id: "sub1".into(),
            },
        );
        let records = map_records("chrT_maternal", &reference, &buffer);
        assert_eq!(
            render(&records),
            vec![
                "2\tchrT_maternal\t1\tchrT\t1\t+\tSEQ\t.",
                "1\tchrT_maternal\t3\tchrT\t2\t+\tINS\tsub1",
                "2\tchrT_maternal\t3\tchrT\t3\t+\tDEL\tsub1",
                "4\tchrT_maternal\t4\tchrT\t5\t+\tSEQ\t.",
            ]
        );
    }

    #[test]
    fn tandem_duplication_emits_one_block_per_copy() {
        let reference = reference();
        let mut buffer = HaplotypeBuffer::from_reference(&reference);
        buffer.mark_deleted(2, 3);
        buffer.insertions_mut().try_insert(
            2,
            InsertedSeq {
                seq: b"CGTCGTCGT".to_vec(),
                shape: InsertionShape::TandemDup {
                    unit_len: 3,
                    copies: 3,
                },
                var_id: "dup1".into(),
            },
        );
        let records = map_records("chrT_maternal", &reference, &buffer);
        assert_eq!(
            render(&records),
            vec![
                "1\tchrT_maternal\t1\tchrT\t1\t+\tSEQ\t.",
                "3\tchrT_maternal\t2\tchrT\t1\t+\tDUP_TANDEM\tdup1",
                "3\tchrT_maternal\t5\tchrT\t1\t+\tDUP_TANDEM\tdup1",
                "3\tchrT_maternal\t8\tchrT\t1\t+\tDUP_TANDEM\tdup1",
                "3\tchrT_maternal\t10\tchrT\t2\t+\tDEL\tdup1",
                "4\tchrT_maternal\t11\tchrT\t5\t+\tSEQ\t.",
            ]
        );
    }

    #[test]
    fn inversion_block_is_minus_strand() {
        let reference = reference();
        let mut buffer = HaplotypeBuffer::from_reference(&reference);
        buffer.mark_deleted(3, 4);
        buffer.insertions_mut().try_insert(
            3,
            InsertedSeq {
                seq: b"GTAC".to_vec(),
                shape: InsertionShape::Inversion,
                var_id: "inv1".into(),
            },
        );
        let records = map_records("chrT_maternal", &reference, &buffer);
        assert_eq!(
            render(&records),
            vec![
                "2\tchrT_maternal\t1\tchrT\t1\t+\tSEQ\t.",
                "4\tchrT_maternal\t3\tchrT\t2\t-\tINV\tinv1",
                "4\tchrT_maternal\t6\tchrT\t3\t+\tDEL\tinv1",
                "2\tchrT_maternal\t7\tchrT\t7\t+\tSEQ\t.",
            ]
        );
    }

    #[test]
    fn translocation_points_at_secondary_chromosome() {
        let reference = reference();
        let mut buffer = HaplotypeBuffer::from_reference(&reference);
        buffer.insertions_mut().try_insert(
            5,
            InsertedSeq {
                seq: b"TTGG".to_vec(),
                shape: InsertionShape::Translocation {
                    chr2: Chrom::new("chrS"),
                    pos2: 6,
                    end2: 3,
                },
                var_id: "tra1".into(),
            },
        );
        let records = map_records("chrT_paternal", &reference, &buffer);
        assert_eq!(
            render(&records),
            vec![
                "4\tchrT_paternal\t1\tchrT\t1\t+\tSEQ\t.",
                "4\tchrT_paternal\t5\tchrS\t2\t-\tTRANSLOCATION\ttra1",
                "4\tchrT_paternal\t9\tchrT\t5\t+\tSEQ\t.",
            ]
        );
    }

    #[test]
    fn length_sums_match_both_coordinate_systems() {
        let reference = reference();
        let mut buffer = HaplotypeBuffer::from_reference(&reference);
        buffer.mark_deleted(2, 2);
        buffer.insertions_mut().try_insert(
            6,
            InsertedSeq {
                seq: b"AA".to_vec(),
                shape: InsertionShape::Literal,
                var_id: "v".into(),
            },
        );
        let records = map_records("h", &reference, &buffer);
        let ref_total: usize = records
            .iter()
            .filter(|r| matches!(r.feature, Feature::Seq | Feature::Del))
            .map(|r| r.len)
            .sum();
        let host_total: usize = records
            .iter()
            .filter(|r| !matches!(r.feature, Feature::Del))
            .map(|r| r.len)
            .sum();
        assert_eq!(ref_total, reference.len());
        assert_eq!(host_total, buffer.host_len());
    }
}
