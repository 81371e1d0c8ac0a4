use crate::genome::Chrom;

/// Alternate-allele payload: either a literal byte sequence or a symbolic
/// structural descriptor carrying declared lengths.
///
/// Matched exhaustively by the materializer and the coordinate-map generator,
/// so adding a kind is a compile-time-checked change in both.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AlleleKind {
    /// Literal replacement bytes (SNP, MNP, indel, complex).
    Seq(Vec<u8>),
    /// Insertion of declared length whose content is filled by an upstream
    /// sampler; carries no bytes of its own.
    Insertion { len: usize },
    /// Inversion of `len` reference bases starting at the variant position.
    Inversion { len: usize },
    /// Tandem duplication of a `unit_len` reference span, `copies` times.
    TandemDup { unit_len: usize, copies: u32 },
    /// Plain deletion of the reference span.
    Deletion,
    /// Cut/paste of the span `chr2:[pos2, end2]` (1-based, inclusive) into
    /// the variant position.
    Translocation {
        len: usize,
        chr2: Chrom,
        pos2: usize,
        end2: usize,
    },
}

/// One alternate allele of a variant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Allele {
    pub kind: AlleleKind,
}

impl Allele {
    pub fn new(kind: AlleleKind) -> Self {
        Self { kind }
    }

    /// Literal byte length, or the declared symbolic length.
    pub fn len(&self) -> usize {
        match &self.kind {
            AlleleKind::Seq(bytes) => bytes.len(),
            AlleleKind::Insertion { len } => *len,
            AlleleKind::Inversion { len } => *len,
            AlleleKind::TandemDup { unit_len, .. } => *unit_len,
            AlleleKind::Deletion => 0,
            AlleleKind::Translocation { len, .. } => *len,
        }
    }

    /// Length accounting for copy number.
    pub fn var_len(&self) -> usize {
        match &self.kind {
            AlleleKind::TandemDup { unit_len, copies } => unit_len * *copies as usize,
            _ => self.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The literal bytes, if this allele carries any.
    pub fn seq(&self) -> Option<&[u8]> {
        match &self.kind {
            AlleleKind::Seq(bytes) => Some(bytes),
            _ => None,
        }
    }

    pub fn copy_number(&self) -> u32 {
        match &self.kind {
            AlleleKind::TandemDup { copies, .. } => *copies,
            _ => 1,
        }
    }

    /// Symbolic ALT-column rendering, `None` for literal sequences.
    pub fn symbol(&self) -> Option<&'static str> {
        match &self.kind {
            AlleleKind::Seq(_) => None,
            AlleleKind::Insertion { .. } => Some("<INS>"),
            AlleleKind::Inversion { .. } => Some("<INV>"),
            AlleleKind::TandemDup { .. } => Some("<DUP:TANDEM>"),
            AlleleKind::Deletion => Some("<DEL>"),
            AlleleKind::Translocation { .. } => Some("<DUP:TRA>"),
        }
    }
}
