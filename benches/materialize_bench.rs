//! Performance benchmarks for variant application and map generation.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use rand::SeedableRng;
use rand_xoshiro::Xoshiro256StarStar;

use hapsynth::genome::{apply_variants, map_records, ReferenceGenome, ReferenceSequence};
use hapsynth::variant::{Allele, AlleleKind, Variant};

const REF_LEN: usize = 1_000_000;
const N_VARIANTS: usize = 2_000;

fn reference() -> ReferenceSequence {
    let bases: Vec<u8> = b"ACGT".iter().cycle().take(REF_LEN).copied().collect();
    ReferenceSequence::new("chrB", bases)
}

fn variants() -> Vec<Variant> {
    let stride = REF_LEN / N_VARIANTS;
    (0..N_VARIANTS)
        .map(|i| {
            let pos = 1 + i * stride;
            let kind = match i % 3 {
                0 => AlleleKind::Seq(b"T".to_vec()),
                1 => AlleleKind::Deletion,
                _ => AlleleKind::Seq(b"GATTACA".to_vec()),
            };
            let ref_span = match kind {
                AlleleKind::Deletion => 10,
                AlleleKind::Seq(ref s) if s.len() == 1 => 1,
                _ => 0,
            };
            Variant {
                chrom: reference().name().clone(),
                pos,
                ref_span,
                ref_seq: Vec::new(),
                ref_deleted: String::new(),
                ref_clipped: String::new(),
                alleles: vec![Allele::new(kind)],
                paternal: 1,
                maternal: 1,
                phased: true,
                id: format!("v{i}"),
                qual: ".".into(),
                filter: "PASS".into(),
                inverted: false,
                tra_id: None,
            }
        })
        .collect()
}

fn benchmark_materializer(c: &mut Criterion) {
    let reference = reference();
    let genome = ReferenceGenome::new();
    let template = variants();

    c.bench_function("apply_2k_variants_to_1mb", |b| {
        b.iter(|| {
            let mut vars = template.clone();
            let mut rng = Xoshiro256StarStar::seed_from_u64(3333);
            black_box(apply_variants(&mut vars, &reference, &genome, &mut rng));
        });
    });

    let mut vars = template.clone();
    let mut rng = Xoshiro256StarStar::seed_from_u64(3333);
    let materialized = apply_variants(&mut vars, &reference, &genome, &mut rng);
    c.bench_function("map_records_1mb", |b| {
        b.iter(|| {
            black_box(map_records("chrB_maternal", &reference, &materialized.maternal));
        });
    });
}

criterion_group!(benches, benchmark_materializer);
criterion_main!(benches);
