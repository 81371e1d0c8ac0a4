//! Reference sequences and the machinery that perturbs them: per-haplotype
//! working buffers, variant application, and the host↔reference coordinate
//! map derived from the result.

mod haplotype;
mod map;
mod materializer;
mod reference;

pub use haplotype::{HaplotypeBuffer, InsertedSeq, InsertionShape, InsertionTable};
pub use map::{map_records, Feature, MapRecord, MAP_HEADER};
pub use materializer::{apply_variants, Materialized};
pub use reference::{complement, reverse_complement, Chrom, ReferenceGenome, ReferenceSequence};
