use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use tracing_subscriber::EnvFilter;

use hapsynth::variant::Gender;
use hapsynth::{BuildConfig, DiploidBuilder};

#[derive(Parser, Debug)]
#[command(
    name = "hapsynth",
    about = "Synthesize a personal diploid genome from a reference and a VCF"
)]
struct Cli {
    /// Gender of the simulated individual.
    #[arg(long, value_enum, default_value = "female")]
    gender: CliGender,

    /// Reference FASTA files (comma-separated), each may hold several
    /// chromosomes.
    #[arg(long = "chr", required = true, value_delimiter = ',')]
    reference: Vec<PathBuf>,

    /// VCF files with the variants to apply (comma-separated).
    #[arg(long = "vcf", required = true, value_delimiter = ',')]
    vcf: Vec<PathBuf>,

    /// Seed for phase flips and genotype sampling.
    #[arg(long, default_value_t = 3333)]
    seed: u64,

    /// Sample id: selects the VCF genotype column and names the outputs.
    #[arg(long)]
    id: String,

    /// Keep only PASS-filtered VCF records.
    #[arg(long)]
    pass_only: bool,

    /// Directory receiving the output files.
    #[arg(long, default_value = ".")]
    out_dir: PathBuf,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum CliGender {
    Male,
    Female,
}

impl From<CliGender> for Gender {
    fn from(g: CliGender) -> Self {
        match g {
            CliGender::Male => Gender::Male,
            CliGender::Female => Gender::Female,
        }
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();
    let config = BuildConfig {
        gender: cli.gender.into(),
        reference_paths: cli.reference,
        vcf_paths: cli.vcf,
        seed: cli.seed,
        sample_id: cli.id,
        pass_only: cli.pass_only,
        out_dir: cli.out_dir,
    };

    let report = DiploidBuilder::new(config)
        .run()
        .context("diploid genome synthesis failed")?;

    println!(
        "{} chromosomes, {} variants read, {} paternal / {} maternal applied, {} map records",
        report.chromosomes,
        report.variants_read,
        report.paternal_applied,
        report.maternal_applied,
        report.map_records
    );

    Ok(())
}
