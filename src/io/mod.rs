//! Plain-text readers and writers: reference FASTA in, haplotype FASTA,
//! truth VCF and coordinate-map files out.

mod fasta;
mod mff;
mod vcf;

pub use fasta::{host_sequence, read_fasta, read_fasta_file, write_haplotype, FastaError};
pub use mff::write_map;
pub use vcf::{read_vcf, read_vcf_file, write_truth_vcf, VcfError, VcfOptions};
