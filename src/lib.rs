//! # hapsynth
//!
//! Synthesizes a personal diploid genome: variants from a VCF catalogue are
//! applied to a reference genome, producing one paternal and one maternal
//! FASTA per chromosome, a truth VCF of the variants actually incorporated,
//! and a coordinate map translating every host position back to the
//! reference.
//!
//! ## Pipeline
//!
//! 1. Load reference chromosomes and the sample's variants.
//! 2. Per chromosome: sort variants, resolve missing genotypes, apply each
//!    variant to both parental copies ([`genome::apply_variants`]).
//! 3. Scan the perturbed copies into map blocks ([`genome::map_records`])
//!    and serialize FASTA, truth VCF and the map file.
//!
//! Per-variant problems (out of bounds, overlap, colliding insertions) never
//! abort a run; the offending variant is skipped and the truth VCF reflects
//! what was actually built.
//!
//! ## Usage Example
//!
//! ```ignore
//! use hapsynth::{BuildConfig, DiploidBuilder};
//! use hapsynth::variant::Gender;
//!
//! let config = BuildConfig {
//!     gender: Gender::Female,
//!     reference_paths: vec!["chr21.fa".into()],
//!     vcf_paths: vec!["sample.vcf".into()],
//!     seed: 3333,
//!     sample_id: "NA12878".into(),
//!     pass_only: false,
//!     out_dir: "out".into(),
//! };
//! let report = DiploidBuilder::new(config).run()?;
//! println!("{} map records", report.map_records);
//! ```

pub mod genome;
pub mod io;
pub mod rng;
pub mod variant;

use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::BufWriter;
use std::path::PathBuf;

use thiserror::Error;
use tracing::info;

use crate::genome::{apply_variants, map_records, Chrom, MapRecord, ReferenceGenome};
use crate::io::{FastaError, VcfError, VcfOptions};
use crate::variant::{Gender, Parent, Variant};

/// Parameters of one synthesis run.
#[derive(Debug, Clone)]
pub struct BuildConfig {
    /// Gender of the simulated individual.
    pub gender: Gender,

    /// Reference FASTA files; each may hold several chromosomes.
    pub reference_paths: Vec<PathBuf>,

    /// VCF files with the variants to incorporate.
    pub vcf_paths: Vec<PathBuf>,

    /// Seed for phase flips and genotype sampling.
    pub seed: u64,

    /// Sample id, selects the VCF genotype column and names the outputs.
    pub sample_id: String,

    /// Keep only PASS-filtered VCF records.
    pub pass_only: bool,

    /// Directory receiving all output files.
    pub out_dir: PathBuf,
}

/// Summary of a finished run.
#[derive(Debug, Clone, Default)]
pub struct BuildReport {
    /// Chromosomes for which at least one haplotype was emitted.
    pub chromosomes: usize,

    /// Variants read from the input VCFs.
    pub variants_read: usize,

    /// Variants incorporated into the paternal genome.
    pub paternal_applied: usize,

    /// Variants incorporated into the maternal genome.
    pub maternal_applied: usize,

    /// Total map blocks written.
    pub map_records: usize,
}

/// Errors that abort a synthesis run.
#[derive(Error, Debug)]
pub enum BuildError {
    /// A reference FASTA could not be read.
    #[error("failed to read reference: {0}")]
    Fasta(#[from] FastaError),

    /// A variant file could not be read.
    #[error("failed to read variants: {0}")]
    Vcf(#[from] VcfError),

    /// An output file could not be created or written.
    #[error("I/O failure: {0}")]
    Io(#[from] std::io::Error),

    /// The reference paths yielded no sequences.
    #[error("no reference sequences were loaded")]
    EmptyReference,
}

/// Orchestrates the whole synthesis: load, per-chromosome materialization,
/// output emission.
#[derive(Debug)]
pub struct DiploidBuilder {
    config: BuildConfig,
}

impl DiploidBuilder {
    pub fn new(config: BuildConfig) -> Self {
        Self { config }
    }

    /// Run the synthesis end to end.
    pub fn run(&self) -> Result<BuildReport, BuildError> {
        let genome = self.load_reference()?;
        let mut by_chromosome = self.load_variants()?;
        fs::create_dir_all(&self.config.out_dir)?;

        let mut report = BuildReport {
            variants_read: by_chromosome.values().map(Vec::len).sum(),
            ..BuildReport::default()
        };
        let mut map: Vec<MapRecord> = Vec::new();

        for reference in genome.chromosomes() {
            let chrom = reference.name();
            info!("working on {}", chrom);

            let (output_paternal, output_maternal) = self.emitted_sides(chrom);
            if !output_paternal && !output_maternal {
                continue;
            }
            report.chromosomes += 1;

            let mut variants = by_chromosome.remove(chrom).unwrap_or_default();
            variants.sort_by_key(Variant::sort_pos);

            let mut rng = rng::chromosome_stream(self.config.seed, chrom);
            for variant in &mut variants {
                if variant.is_unresolved() {
                    variant.randomize_genotype(self.config.gender, &mut rng);
                }
            }

            let materialized = apply_variants(&mut variants, reference, &genome, &mut rng);

            self.write_truth_vcf(
                reference,
                &variants,
                &materialized,
                output_paternal,
                output_maternal,
            )?;

            // paternal blocks precede maternal blocks in the map file
            for (side, emit) in [
                (Parent::Paternal, output_paternal),
                (Parent::Maternal, output_maternal),
            ] {
                if !emit {
                    continue;
                }
                let host_name = format!("{}_{}", chrom, side.name());
                let buffer = materialized.buffer(side);
                map.extend(map_records(&host_name, reference, buffer));

                let file_name = format!("{}_{}_{}.fa", chrom, self.config.sample_id, side.name());
                let mut writer =
                    BufWriter::new(File::create(self.config.out_dir.join(file_name))?);
                io::write_haplotype(&mut writer, &host_name, buffer)?;

                let applied = materialized.added(side).iter().filter(|a| **a).count();
                let bases: usize = variants
                    .iter()
                    .zip(materialized.added(side))
                    .filter(|(_, added)| **added)
                    .map(|(v, _)| v.variant_bases())
                    .sum();
                info!(
                    "applied {} variants, {} bases to the {} copy of {}",
                    applied,
                    bases,
                    side.name(),
                    chrom
                );
                match side {
                    Parent::Paternal => report.paternal_applied += applied,
                    Parent::Maternal => report.maternal_applied += applied,
                }
            }
        }

        let map_path = self.config.out_dir.join(format!("{}.map", self.config.sample_id));
        let mut writer = BufWriter::new(File::create(map_path)?);
        io::write_map(&mut writer, &map)?;
        report.map_records = map.len();

        Ok(report)
    }

    fn load_reference(&self) -> Result<ReferenceGenome, BuildError> {
        let mut genome = ReferenceGenome::new();
        for path in &self.config.reference_paths {
            info!("reading reference {}", path.display());
            for sequence in io::read_fasta_file(path)? {
                genome.insert(sequence);
            }
        }
        if genome.is_empty() {
            return Err(BuildError::EmptyReference);
        }
        Ok(genome)
    }

    fn load_variants(&self) -> Result<BTreeMap<Chrom, Vec<Variant>>, BuildError> {
        let options = VcfOptions {
            sample_id: Some(self.config.sample_id.clone()),
            pass_only: self.config.pass_only,
        };
        let mut by_chromosome: BTreeMap<Chrom, Vec<Variant>> = BTreeMap::new();
        for path in &self.config.vcf_paths {
            let variants = io::read_vcf_file(path, &options)?;
            let bases: usize = variants.iter().map(Variant::variant_bases).sum();
            info!(
                "{}: {} variants, {} variant bases",
                path.display(),
                variants.len(),
                bases
            );
            for variant in variants {
                by_chromosome.entry(variant.chrom.clone()).or_default().push(variant);
            }
        }
        Ok(by_chromosome)
    }

    /// Which parental copies of a chromosome exist for this individual.
    fn emitted_sides(&self, chrom: &Chrom) -> (bool, bool) {
        let mut paternal = true;
        let mut maternal = true;
        match self.config.gender {
            Gender::Female => {
                if chrom.is_y() {
                    paternal = false;
                    maternal = false;
                }
            }
            Gender::Male => {
                if chrom.is_x() {
                    paternal = false;
                }
                if chrom.is_y() {
                    maternal = false;
                }
            }
        }
        // the mitochondrial genome is maternally inherited
        if chrom.is_mt() {
            paternal = false;
        }
        (paternal, maternal)
    }

    fn write_truth_vcf(
        &self,
        reference: &genome::ReferenceSequence,
        variants: &[Variant],
        materialized: &genome::Materialized,
        output_paternal: bool,
        output_maternal: bool,
    ) -> Result<(), BuildError> {
        let file_name = format!("{}_{}.vcf", reference.name(), self.config.sample_id);
        info!("writing the incorporated variants for {}", reference.name());
        let mut writer = BufWriter::new(File::create(self.config.out_dir.join(file_name))?);
        let reference_file = self
            .config
            .reference_paths
            .first()
            .map(|p| p.display().to_string())
            .unwrap_or_default();
        io::write_truth_vcf(
            &mut writer,
            &reference_file,
            &self.config.sample_id,
            reference,
            variants,
            &materialized.paternal_added,
            &materialized.maternal_added,
            output_paternal,
            output_maternal,
        )?;
        Ok(())
    }
}
