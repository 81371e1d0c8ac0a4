//! Canonical in-memory representation of genomic edits: one [`Variant`] per
//! input record, each alternate allele a [`Allele`] that is either literal
//! bytes or a symbolic structural descriptor.

mod allele;
mod genotype;
mod model;

pub use allele::{Allele, AlleleKind};
pub use genotype::{Gender, Genotypes, Parent};
pub use model::{Variant, VariantType};
