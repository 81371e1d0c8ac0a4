use std::collections::btree_map::{self, BTreeMap};

use bitvec::vec::BitVec;

use crate::genome::{Chrom, ReferenceSequence};

/// How an inserted payload projects into the coordinate map.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InsertionShape {
    /// Plain inserted bytes: one `INS` map record.
    Literal,
    /// Reverse-complemented reference span: one `INV` record on the minus
    /// strand.
    Inversion,
    /// `copies` repeats of a `unit_len` reference span: `copies` consecutive
    /// `DUP_TANDEM` records.
    TandemDup { unit_len: usize, copies: u32 },
    /// Payload lifted from a secondary locus: one `TRANSLOCATION` record
    /// whose reference side points at `chr2`.
    Translocation {
        chr2: Chrom,
        pos2: usize,
        end2: usize,
    },
}

/// One resolved insertion payload, keyed in the [`InsertionTable`] by the
/// 1-based reference position it attaches to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InsertedSeq {
    /// Literal bytes spliced into the host genome at this position.
    pub seq: Vec<u8>,
    pub shape: InsertionShape,
    pub var_id: String,
}

/// Per-haplotype map from 1-based reference position to inserted content.
///
/// This is the single source of truth for everything that does not literally
/// replace reference bytes. A position holds at most one entry; a second
/// insertion at the same position is rejected.
#[derive(Debug, Default)]
pub struct InsertionTable {
    entries: BTreeMap<usize, InsertedSeq>,
}

impl InsertionTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an insertion at `pos`. Returns false (leaving the table
    /// unchanged) when the position is already occupied.
    pub fn try_insert(&mut self, pos: usize, ins: InsertedSeq) -> bool {
        match self.entries.entry(pos) {
            btree_map::Entry::Occupied(_) => false,
            btree_map::Entry::Vacant(slot) => {
                slot.insert(ins);
                true
            }
        }
    }

    pub fn get(&self, pos: usize) -> Option<&InsertedSeq> {
        self.entries.get(&pos)
    }

    pub fn contains(&self, pos: usize) -> bool {
        self.entries.contains_key(&pos)
    }

    pub fn iter(&self) -> impl Iterator<Item = (usize, &InsertedSeq)> {
        self.entries.iter().map(|(p, e)| (*p, e))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Total number of inserted bytes across all entries.
    pub fn total_len(&self) -> usize {
        self.entries.values().map(|e| e.seq.len()).sum()
    }
}

/// Mutable working copy of one chromosome for one parental side.
///
/// Starts as a byte-for-byte copy of the reference. A parallel bit mask
/// tracks positions whose reference base was consumed by a deletion-like
/// event, so no reserved byte value needs to be carved out of the sequence
/// alphabet.
#[derive(Debug)]
pub struct HaplotypeBuffer {
    bases: Vec<u8>,
    deleted: BitVec,
    insertions: InsertionTable,
}

impl HaplotypeBuffer {
    pub fn from_reference(reference: &ReferenceSequence) -> Self {
        let len = reference.len();
        Self {
            bases: reference.bytes().to_vec(),
            deleted: BitVec::repeat(false, len),
            insertions: InsertionTable::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.bases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bases.is_empty()
    }

    /// Base at a 1-based position; meaningless when the position is deleted.
    pub fn base(&self, pos: usize) -> u8 {
        self.bases[pos - 1]
    }

    pub fn set_base(&mut self, pos: usize, base: u8) {
        self.bases[pos - 1] = base;
    }

    pub fn is_deleted(&self, pos: usize) -> bool {
        self.deleted[pos - 1]
    }

    /// Mark `[pos, pos + span)` as deleted (1-based).
    pub fn mark_deleted(&mut self, pos: usize, span: usize) {
        for p in pos..pos + span {
            self.deleted.set(p - 1, true);
        }
    }

    pub fn insertions(&self) -> &InsertionTable {
        &self.insertions
    }

    pub fn insertions_mut(&mut self) -> &mut InsertionTable {
        &mut self.insertions
    }

    /// Number of surviving (non-deleted) reference bases.
    pub fn surviving_len(&self) -> usize {
        self.bases.len() - self.deleted.count_ones()
    }

    /// Length of the host sequence this buffer will emit: surviving bases
    /// plus all inserted content.
    pub fn host_len(&self) -> usize {
        self.surviving_len() + self.insertions.total_len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn buffer() -> HaplotypeBuffer {
        HaplotypeBuffer::from_reference(&ReferenceSequence::new("chrT", b"ACGTACGT".to_vec()))
    }

    #[test]
    fn duplicate_insertion_is_rejected() {
        let mut table = InsertionTable::new();
        let first = InsertedSeq {
            seq: b"TT".to_vec(),
            shape: InsertionShape::Literal,
            var_id: "a".into(),
        };
        let second = InsertedSeq {
            seq: b"GG".to_vec(),
            shape: InsertionShape::Literal,
            var_id: "b".into(),
        };
        assert!(table.try_insert(4, first.clone()));
        assert!(!table.try_insert(4, second));
        assert_eq!(table.get(4), Some(&first));
        assert_eq!(table.total_len(), 2);
    }

    #[test]
    fn deletion_mask_tracks_host_length() {
        let mut buf = buffer();
        assert_eq!(buf.host_len(), 8);
        buf.mark_deleted(3, 2);
        assert!(buf.is_deleted(3));
        assert!(buf.is_deleted(4));
        assert!(!buf.is_deleted(5));
        assert_eq!(buf.surviving_len(), 6);
        buf.insertions_mut().try_insert(
            6,
            InsertedSeq {
                seq: b"AAA".to_vec(),
                shape: InsertionShape::Literal,
                var_id: "v".into(),
            },
        );
        assert_eq!(buf.host_len(), 9);
    }
}
