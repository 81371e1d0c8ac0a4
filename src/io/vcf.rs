use std::collections::HashMap;
use std::fs::File;
use std::io::{self, BufRead, BufReader, Write};
use std::path::Path;

use thiserror::Error;
use tracing::{info, warn};

use crate::genome::{Chrom, ReferenceSequence};
use crate::variant::{Allele, AlleleKind, Genotypes, Variant, VariantType};

/// Errors from reading VCF files. Malformed individual records are not
/// errors: they are logged and skipped.
#[derive(Error, Debug)]
pub enum VcfError {
    #[error("I/O error reading VCF: {0}")]
    Io(#[from] io::Error),
}

/// Reader configuration: which sample column to use and whether to keep
/// only PASS records.
#[derive(Debug, Clone, Default)]
pub struct VcfOptions {
    /// Sample id selecting a genotype column; `None` takes the first sample.
    pub sample_id: Option<String>,
    /// Keep only records whose FILTER contains `PASS` (or is `.`).
    pub pass_only: bool,
}

/// First sample column in a VCF line, 0-based.
const FIRST_SAMPLE_COLUMN: usize = 9;

/// Parse every data line of a VCF stream into variants, in file order.
/// Records that cannot be represented are skipped with a warning.
pub fn read_vcf<R: BufRead>(reader: R, options: &VcfOptions) -> Result<Vec<Variant>, VcfError> {
    let mut parser = LineParser {
        sample_column: None,
        options: options.clone(),
    };
    let mut variants = Vec::new();
    for line in reader.lines() {
        let line = line?;
        if let Some(variant) = parser.parse_line(&line) {
            variants.push(variant);
        }
    }
    Ok(variants)
}

/// Read all variants from a VCF file on disk.
pub fn read_vcf_file(
    path: impl AsRef<Path>,
    options: &VcfOptions,
) -> Result<Vec<Variant>, VcfError> {
    info!("reading variants from {}", path.as_ref().display());
    let reader = BufReader::new(File::open(path)?);
    read_vcf(reader, options)
}

struct LineParser {
    sample_column: Option<usize>,
    options: VcfOptions,
}

impl LineParser {
    fn parse_line(&mut self, line: &str) -> Option<Variant> {
        let fields: Vec<&str> = line.split('\t').collect();

        if line.starts_with('#') {
            if line.starts_with("#CHROM") {
                self.sample_column = match &self.options.sample_id {
                    Some(id) => {
                        let found = fields.iter().position(|f| *f == id.as_str());
                        if found.is_none() {
                            warn!("sample {id} not found in VCF header, using first sample");
                        }
                        Some(found.unwrap_or(FIRST_SAMPLE_COLUMN))
                    }
                    None => Some(FIRST_SAMPLE_COLUMN),
                };
            }
            return None;
        }
        let sample_column = self.sample_column.unwrap_or(FIRST_SAMPLE_COLUMN);

        if fields.len() < 8 {
            warn!("truncated VCF record, skipping");
            return None;
        }

        let chrom = Chrom::new(fields[0]);
        let mut pos: usize = match fields[1].parse() {
            Ok(p) => p,
            Err(_) => {
                warn!("unparseable POS '{}', skipping record", fields[1]);
                return None;
            }
        };
        let var_id = fields[2].to_string();
        let mut ref_str = fields[3].to_string();
        let alt_str = fields[4].to_string();
        let qual = fields[5].to_string();
        let filter = fields[6].to_string();
        let info = InfoFields::parse(fields[7]);

        if self.options.pass_only && !(filter.contains("PASS") || filter == ".") {
            return None;
        }

        // genotype and copy number from the selected sample column
        let mut gt_field = None;
        let mut cn_field = None;
        if let (Some(format), Some(sample)) = (fields.get(8), fields.get(sample_column)) {
            let keys: Vec<&str> = format.split(':').collect();
            let values: Vec<&str> = sample.split(':').collect();
            gt_field = keys
                .iter()
                .position(|k| *k == "GT")
                .and_then(|i| values.get(i).copied());
            cn_field = keys
                .iter()
                .position(|k| *k == "CN")
                .and_then(|i| values.get(i).copied());
        }

        let (mut paternal, mut maternal, phased) = match gt_field {
            Some(gt) => match parse_genotype(gt, &chrom) {
                Some(g) => g,
                None => {
                    warn!("unrecognized genotype '{}' at {}:{}", gt, chrom, pos);
                    (-1, -1, false)
                }
            },
            // no GT column: sampled later from the run RNG
            None => (-1, -1, false),
        };
        if gt_field.is_some() && !Genotypes::new(paternal, maternal).is_non_ref() {
            // every selected allele is the reference
            return None;
        }
        let (cn_paternal, cn_maternal) = match cn_field {
            Some(cn) => match parse_genotype(cn, &chrom) {
                Some((p, m, _)) => (p, m),
                None => (0, 0),
            },
            None => (0, 0),
        };

        if !is_dna(&ref_str) {
            warn!("non-ACGTN REF '{}' at {}:{}, skipping", ref_str, chrom, pos);
            return None;
        }
        ref_str.make_ascii_uppercase();
        let alt_str = alt_str.to_ascii_uppercase();

        if alt_str.contains('<') {
            return self.parse_symbolic(
                chrom, pos, var_id, ref_str, &alt_str, qual, filter, &info, paternal, maternal,
                phased, cn_paternal, cn_maternal,
            );
        }
        if alt_str.contains('[') || alt_str.contains(']') {
            warn!("breakend record at {}:{} is not supported, skipping", chrom, pos);
            return None;
        }

        // literal alleles
        let mut alts: Vec<Vec<u8>> = alt_str.split(',').map(|a| a.as_bytes().to_vec()).collect();
        if alts.iter().any(|a| !is_dna(std::str::from_utf8(a).unwrap_or("!"))) {
            warn!("malformed ALT column at {}:{}, skipping", chrom, pos);
            return None;
        }
        for alt in &alts {
            let snp = ref_str.len() == 1 && alt.len() == 1;
            if !snp && (ref_str.is_empty() || alt.is_empty()) {
                warn!("empty allele without anchor base at {}:{}, skipping", chrom, pos);
                return None;
            }
        }

        // strip bases shared by the front of REF and every ALT, advancing POS
        let mut ref_bytes = ref_str.into_bytes();
        let mut ref_deleted = String::new();
        while !ref_bytes.is_empty() {
            let lead = ref_bytes[0];
            if alts.iter().any(|a| a.first() != Some(&lead)) {
                break;
            }
            pos += 1;
            ref_deleted = (lead as char).to_string();
            ref_bytes.remove(0);
            for alt in &mut alts {
                alt.remove(0);
            }
        }

        // clip bases shared by the tail of REF and every remaining ALT, so a
        // padded record like CGATG>CTG becomes the plain two-base deletion it
        // encodes; the clipped tail is kept for writing the record back out
        let mut ref_clipped = String::new();
        if !ref_bytes.is_empty() {
            let clip = alts
                .iter()
                .map(|alt| {
                    ref_bytes
                        .iter()
                        .rev()
                        .zip(alt.iter().rev())
                        .take_while(|(r, a)| r == a)
                        .count()
                })
                .min()
                .unwrap_or(0);
            if clip > 0 {
                let tail = ref_bytes.split_off(ref_bytes.len() - clip);
                for alt in &mut alts {
                    if alt.len() < clip || alt[alt.len() - clip..] != tail[..] {
                        warn!(
                            "clipped tails of REF and ALT disagree at {}:{}, skipping",
                            chrom, pos
                        );
                        return None;
                    }
                    alt.truncate(alt.len() - clip);
                }
                ref_clipped = String::from_utf8_lossy(&tail).into_owned();
            }
        }

        let ref_span = ref_bytes.len();
        Some(Variant {
            chrom,
            pos,
            ref_span,
            ref_seq: ref_bytes,
            ref_deleted,
            ref_clipped,
            alleles: alts
                .into_iter()
                .map(|a| Allele::new(AlleleKind::Seq(a)))
                .collect(),
            paternal,
            maternal,
            phased,
            id: var_id,
            qual,
            filter,
            inverted: false,
            tra_id: None,
        })
    }

    #[allow(clippy::too_many_arguments)]
    fn parse_symbolic(
        &self,
        chrom: Chrom,
        mut pos: usize,
        var_id: String,
        ref_str: String,
        alt_str: &str,
        qual: String,
        filter: String,
        info: &InfoFields,
        paternal: i32,
        maternal: i32,
        phased: bool,
        cn_paternal: i32,
        cn_maternal: i32,
    ) -> Option<Variant> {
        let tags: Vec<SymbolicTag> = match alt_str.split(',').map(SymbolicTag::parse).collect() {
            Some(tags) => tags,
            None => {
                warn!(
                    "symbolic and literal alleles mixed at {}:{}, skipping",
                    chrom, pos
                );
                return None;
            }
        };
        let svlen = info.ints("SVLEN");
        let end = info.ints("END").first().copied();
        if !svlen.is_empty() && svlen.len() != tags.len() {
            warn!(
                "allele count does not match SVLEN count at {}:{}, skipping",
                chrom, pos
            );
            return None;
        }

        // symbolic POS points at the base before the event
        let ref_deleted = ref_str;
        pos += 1;

        // copy number for the allele one parental slot selects, default 2
        let copies_for = |allele_index: i32| -> u32 {
            let mut copies = 2;
            if paternal == allele_index && cn_paternal > 0 {
                copies = cn_paternal;
            }
            if maternal == allele_index && cn_maternal > 0 {
                copies = cn_maternal;
            }
            copies.max(1) as u32
        };
        let span_from_end = |end: usize| end.saturating_sub(pos) + 1;

        let first = &tags[0];
        let mut inverted = false;
        let mut tra_id = None;
        let (alleles, ref_span) = match first.major.as_str() {
            "INV" => {
                if !svlen.is_empty() {
                    if svlen.windows(2).any(|w| w[0] != w[1]) {
                        warn!("multiple SVLEN values for <INV> at {}:{}, skipping", chrom, pos);
                        return None;
                    }
                    let len = (svlen[0].unsigned_abs() as usize).max(1);
                    let alleles = svlen
                        .iter()
                        .map(|_| Allele::new(AlleleKind::Inversion { len }))
                        .collect();
                    (alleles, svlen[0].unsigned_abs() as usize)
                } else if let Some(end) = end.filter(|e| *e > 0) {
                    let len = span_from_end(end as usize).max(1);
                    (vec![Allele::new(AlleleKind::Inversion { len })], len)
                } else {
                    warn!("no length information for <INV> at {}:{}, skipping", chrom, pos);
                    return None;
                }
            }
            "DUP" if first.is_tandem(info) => {
                if !svlen.is_empty() {
                    if svlen.windows(2).any(|w| w[0] != w[1]) {
                        warn!("multiple SVLEN values for <DUP> at {}:{}, skipping", chrom, pos);
                        return None;
                    }
                    let alleles = (0..svlen.len())
                        .map(|i| {
                            Allele::new(AlleleKind::TandemDup {
                                unit_len: (svlen[i].unsigned_abs() as usize).max(1),
                                copies: copies_for(i as i32 + 1),
                            })
                        })
                        .collect();
                    (alleles, svlen[0].unsigned_abs() as usize)
                } else if let Some(end) = end.filter(|e| *e > 0) {
                    let unit_len = span_from_end(end as usize).max(1);
                    let copies = cn_paternal.max(cn_maternal).max(1) as u32;
                    (
                        vec![Allele::new(AlleleKind::TandemDup { unit_len, copies })],
                        unit_len,
                    )
                } else {
                    warn!(
                        "no length information for <DUP:TANDEM> at {}:{}, skipping",
                        chrom, pos
                    );
                    return None;
                }
            }
            "INS" => {
                if !svlen.is_empty() {
                    let alleles = svlen
                        .iter()
                        .map(|l| {
                            Allele::new(AlleleKind::Insertion {
                                len: l.unsigned_abs() as usize,
                            })
                        })
                        .collect();
                    (alleles, 0)
                } else if let Some(end) = end.filter(|e| *e > 0) {
                    let len = (end as usize).saturating_sub(pos).max(1);
                    (vec![Allele::new(AlleleKind::Insertion { len })], 0)
                } else {
                    warn!("no length information for <INS> at {}:{}, skipping", chrom, pos);
                    return None;
                }
            }
            "DEL" => {
                tra_id = info.string("TRAID");
                if first.minor.as_deref() == Some("TRA") && tra_id.is_none() {
                    warn!("<DEL:TRA> without TRAID at {}:{}, skipping", chrom, pos);
                    return None;
                }
                if !svlen.is_empty() {
                    if svlen.windows(2).any(|w| w[0] != w[1]) {
                        warn!("multiple SVLEN values for <DEL> at {}:{}, skipping", chrom, pos);
                        return None;
                    }
                    let alleles = svlen.iter().map(|_| Allele::new(AlleleKind::Deletion)).collect();
                    (alleles, svlen[0].unsigned_abs() as usize)
                } else if let Some(end) = end.filter(|e| *e > 0) {
                    let span = span_from_end(end as usize);
                    (vec![Allele::new(AlleleKind::Deletion)], span)
                } else {
                    warn!("no length information for <DEL> at {}:{}, skipping", chrom, pos);
                    return None;
                }
            }
            "DUP" => {
                // DUP:TRA / DUP:ISP / DUP with a secondary locus
                tra_id = info.string("TRAID");
                if first.minor.as_deref() == Some("TRA") && tra_id.is_none() {
                    warn!("<DUP:TRA> without TRAID at {}:{}, skipping", chrom, pos);
                    return None;
                }
                inverted = info.flag("ISINV");
                let chr2 = match info.string("CHR2") {
                    Some(c) => Chrom::new(c.split(',').next().unwrap_or("").to_string()),
                    None => {
                        warn!("translocation without CHR2 at {}:{}, skipping", chrom, pos);
                        return None;
                    }
                };
                let pos2 = info.ints("POS2").first().map(|p| *p as usize);
                let end2 = info.ints("END2").first().map(|p| *p as usize);
                let (pos2, end2) = match (pos2, end2) {
                    (Some(p), Some(e)) => (p, e),
                    _ => {
                        warn!(
                            "translocation without POS2/END2 at {}:{}, skipping",
                            chrom, pos
                        );
                        return None;
                    }
                };
                if svlen.is_empty() {
                    warn!(
                        "no length information for <DUP:TRA> at {}:{}, skipping",
                        chrom, pos
                    );
                    return None;
                }
                if svlen.windows(2).any(|w| w[0] != w[1]) {
                    warn!("unequal SVLEN values at {}:{}, skipping", chrom, pos);
                    return None;
                }
                let alleles = svlen
                    .iter()
                    .map(|l| {
                        Allele::new(AlleleKind::Translocation {
                            len: (l.unsigned_abs() as usize).max(1),
                            chr2: chr2.clone(),
                            pos2,
                            end2,
                        })
                    })
                    .collect();
                (alleles, 0)
            }
            other => {
                warn!("unsupported symbolic allele <{}> at {}:{}, skipping", other, chrom, pos);
                return None;
            }
        };

        Some(Variant {
            chrom,
            pos,
            ref_span,
            ref_seq: Vec::new(),
            ref_deleted,
            ref_clipped: String::new(),
            alleles,
            paternal,
            maternal,
            phased,
            id: var_id,
            qual,
            filter,
            inverted,
            tra_id,
        })
    }
}

/// One `<MAJOR>` or `<MAJOR:MINOR>` symbolic allele tag.
struct SymbolicTag {
    major: String,
    minor: Option<String>,
}

impl SymbolicTag {
    fn parse(tag: &str) -> Option<Self> {
        let inner = tag.strip_prefix('<')?.strip_suffix('>')?;
        let mut parts = inner.splitn(2, ':');
        Some(Self {
            major: parts.next()?.to_string(),
            minor: parts.next().map(str::to_string),
        })
    }

    /// A `<DUP>` is tandem unless it is a translocation leg or carries a
    /// secondary locus.
    fn is_tandem(&self, info: &InfoFields) -> bool {
        match self.minor.as_deref() {
            Some("TANDEM") => true,
            Some("TRA") | Some("ISP") => false,
            _ => info.ints("POS2").is_empty(),
        }
    }
}

/// Minimal INFO column: `KEY=VALUE` entries plus bare flags.
struct InfoFields {
    entries: HashMap<String, Option<String>>,
}

impl InfoFields {
    fn parse(column: &str) -> Self {
        let mut entries = HashMap::new();
        for item in column.split(';') {
            if item.is_empty() || item == "." {
                continue;
            }
            match item.split_once('=') {
                Some((k, v)) => entries.insert(k.to_string(), Some(v.to_string())),
                None => entries.insert(item.to_string(), None),
            };
        }
        Self { entries }
    }

    fn ints(&self, key: &str) -> Vec<i64> {
        match self.entries.get(key) {
            Some(Some(v)) => v.split(',').filter_map(|x| x.parse().ok()).collect(),
            _ => Vec::new(),
        }
    }

    fn string(&self, key: &str) -> Option<String> {
        self.entries.get(key).and_then(|v| v.clone())
    }

    fn flag(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }
}

/// Split a GT-like field into (paternal, maternal, phased). A single value on
/// a sex or mitochondrial chromosome lands on the parent that carries it;
/// `.` becomes -1 (unresolved). Returns `None` for anything unparseable.
fn parse_genotype(field: &str, chrom: &Chrom) -> Option<(i32, i32, bool)> {
    let field = field.trim();
    let parts: Vec<&str> = field.split(['/', '|']).collect();
    let parse_one = |s: &str| -> Option<i32> {
        if s == "." {
            Some(-1)
        } else {
            s.parse::<i32>().ok().filter(|v| *v >= 0)
        }
    };
    match parts.len() {
        1 => {
            let val = parse_one(parts[0])?;
            if chrom.is_x() || chrom.is_mt() {
                Some((-1, val, true))
            } else if chrom.is_y() {
                Some((val, -1, true))
            } else {
                Some((val, val, false))
            }
        }
        2 => {
            let c1 = parse_one(parts[0])?;
            let c2 = parse_one(parts[1])?;
            if (c1 >= 0) != (c2 >= 0) {
                return None;
            }
            let phased = field.as_bytes().get(parts[0].len()) == Some(&b'|');
            Some((c1, c2, phased))
        }
        _ => None,
    }
}

fn is_dna(s: &str) -> bool {
    s.bytes().all(|b| matches!(b.to_ascii_uppercase(), b'A' | b'C' | b'G' | b'T' | b'N'))
}

/// Meta-information block of the emitted truth VCF.
fn truth_header(reference_file: &str, sample_id: &str) -> String {
    format!(
        "##fileformat=VCFv4.3\n\
         ##reference={reference_file}\n\
         ##INFO=<ID=SVLEN,Number=.,Type=Integer,Description=\"Difference in length between REF and ALT alleles\">\n\
         ##INFO=<ID=SVTYPE,Number=1,Type=String,Description=\"Type of structural variant\">\n\
         ##INFO=<ID=POS2,Number=1,Type=Integer,Description=\"1-based start position of source sequence\">\n\
         ##INFO=<ID=END2,Number=1,Type=Integer,Description=\"1-based end position of source sequence\">\n\
         ##INFO=<ID=END,Number=1,Type=Integer,Description=\"1-based end position of variant\">\n\
         ##INFO=<ID=CHR2,Number=1,Type=String,Description=\"Chromosome of source sequence\">\n\
         ##INFO=<ID=ISINV,Number=1,Type=Flag,Description=\"whether a duplication is inverted\">\n\
         ##INFO=<ID=TRAID,Number=1,Type=String,Description=\"translocation ID\">\n\
         ##FORMAT=<ID=GT,Number=1,Type=String,Description=\"Genotype\">\n\
         ##FORMAT=<ID=CN,Number=1,Type=String,Description=\"Copy number genotype.\">\n\
         ##ALT=<ID=DEL,Description=\"Deletion\">\n\
         ##ALT=<ID=DEL:TRA,Description=\"Deletion in translocation\">\n\
         ##ALT=<ID=DUP,Description=\"Duplication\">\n\
         ##ALT=<ID=DUP:TANDEM,Description=\"Tandem Duplication\">\n\
         ##ALT=<ID=DUP:ISP,Description=\"Interspersed duplication\">\n\
         ##ALT=<ID=DUP:TRA,Description=\"Duplication in translocation\">\n\
         ##ALT=<ID=INS,Description=\"Insertion of novel sequence\">\n\
         ##ALT=<ID=INV,Description=\"Inversion\">\n\
         #CHROM\tPOS\tID\tREF\tALT\tQUAL\tFILTER\tINFO\tFORMAT\t{sample_id}\n"
    )
}

/// Write the per-chromosome truth VCF: every variant with at least one
/// incorporated allele, with the genotype column reduced to what was actually
/// materialized (0 for a side that was rejected, omitted for a side this
/// chromosome does not carry).
#[allow(clippy::too_many_arguments)]
pub fn write_truth_vcf<W: Write>(
    writer: &mut W,
    reference_file: &str,
    sample_id: &str,
    reference: &ReferenceSequence,
    variants: &[Variant],
    paternal_added: &[bool],
    maternal_added: &[bool],
    output_paternal: bool,
    output_maternal: bool,
) -> io::Result<()> {
    writer.write_all(truth_header(reference_file, sample_id).as_bytes())?;

    for (i, variant) in variants.iter().enumerate() {
        if output_paternal && !output_maternal && !paternal_added[i] {
            continue;
        }
        if output_maternal && !output_paternal && !maternal_added[i] {
            continue;
        }
        if !(paternal_added[i] || maternal_added[i]) {
            continue;
        }
        let paternal = if output_paternal {
            if paternal_added[i] {
                variant.paternal
            } else {
                0
            }
        } else {
            -1
        };
        let maternal = if output_maternal {
            if maternal_added[i] {
                variant.maternal
            } else {
                0
            }
        } else {
            -1
        };
        let line = render_record(variant, reference, paternal, maternal);
        writer.write_all(line.as_bytes())?;
        writer.write_all(b"\n")?;
    }
    writer.flush()
}

/// Anchor base re-read from the reference when an allele or the reference
/// span lost all its bytes to trimming, so no emitted allele string is empty.
fn extra_base(variant: &Variant, reference: &ReferenceSequence) -> String {
    if !variant.ref_deleted.is_empty() {
        return String::new();
    }
    for allele in &variant.alleles {
        let empty_seq = matches!(&allele.kind, AlleleKind::Seq(s) if s.is_empty());
        if empty_seq && variant.pos + variant.ref_span < reference.len() {
            return (reference.byte_at(variant.pos + variant.ref_span) as char).to_string();
        }
    }
    if variant.ref_seq.is_empty() {
        return (reference.byte_at(variant.pos) as char).to_string();
    }
    String::new()
}

fn render_record(
    variant: &Variant,
    reference: &ReferenceSequence,
    paternal: i32,
    maternal: i32,
) -> String {
    let extra = extra_base(variant, reference);

    let mut ref_field = format!(
        "{}{}{}{}",
        variant.ref_deleted,
        String::from_utf8_lossy(&variant.ref_seq),
        extra,
        variant.ref_clipped
    );
    if ref_field.is_empty() {
        ref_field = "N".to_string();
    }

    let alt_field = variant
        .alleles
        .iter()
        .map(|allele| match allele.symbol() {
            Some(tag) => tag.to_string(),
            None => {
                let seq = allele.seq().unwrap_or(&[]);
                format!(
                    "{}{}{}{}",
                    variant.ref_deleted,
                    String::from_utf8_lossy(seq),
                    extra,
                    variant.ref_clipped
                )
            }
        })
        .collect::<Vec<_>>()
        .join(",");

    let info_field = render_info(variant);
    let format_field = if variant.has_copy_number() { "GT:CN" } else { "GT" };

    let sep = if variant.phased || paternal == maternal {
        "|"
    } else {
        "/"
    };
    let mut genotype = match (paternal >= 0, maternal >= 0) {
        (true, true) => format!("{paternal}{sep}{maternal}"),
        (true, false) => paternal.to_string(),
        (false, true) => maternal.to_string(),
        (false, false) => String::new(),
    };
    if variant.has_copy_number() {
        let cn = |index: i32| variant.copy_number(index);
        let cn_column = match (paternal >= 0, maternal >= 0) {
            (true, true) => format!("{}{}{}", cn(paternal), sep, cn(maternal)),
            (true, false) => cn(paternal).to_string(),
            (false, true) => cn(maternal).to_string(),
            (false, false) => String::new(),
        };
        genotype = format!("{genotype}:{cn_column}");
    }

    format!(
        "{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}",
        variant.chrom,
        variant.pos - variant.ref_deleted.len(),
        variant.id,
        ref_field.to_ascii_uppercase(),
        alt_field.to_ascii_uppercase(),
        variant.qual,
        variant.filter,
        info_field,
        format_field,
        genotype
    )
}

fn render_info(variant: &Variant) -> String {
    let mut fields: Vec<String> = Vec::new();
    let svlen = variant.sv_lengths();
    let svlen_field = if svlen.is_empty() {
        None
    } else {
        Some(format!(
            "SVLEN={}",
            svlen.iter().map(i64::to_string).collect::<Vec<_>>().join(",")
        ))
    };

    match variant.variant_type(1) {
        VariantType::TandemDup => {
            fields.push("SVTYPE=DUP".to_string());
            fields.extend(svlen_field);
            if variant.inverted {
                fields.push("ISINV".to_string());
            }
        }
        VariantType::Translocation => {
            fields.push("SVTYPE=DUP".to_string());
            if let Some(traid) = &variant.tra_id {
                fields.push(format!("TRAID={traid}"));
            }
            fields.extend(svlen_field);
            if let Some(AlleleKind::Translocation { chr2, pos2, end2, .. }) =
                variant.alleles.first().map(|a| &a.kind)
            {
                fields.push(format!("CHR2={chr2}"));
                fields.push(format!("POS2={pos2}"));
                fields.push(format!("END2={end2}"));
            }
            if variant.inverted {
                fields.push("ISINV".to_string());
            }
        }
        VariantType::Deletion => {
            fields.push("SVTYPE=DEL".to_string());
            if let Some(traid) = &variant.tra_id {
                fields.push(format!("TRAID={traid}"));
            }
            fields.extend(svlen_field);
        }
        VariantType::Inversion => {
            fields.push("SVTYPE=INV".to_string());
            fields.extend(svlen_field);
        }
        _ => fields.extend(svlen_field),
    }

    if fields.is_empty() {
        ".".to_string()
    } else {
        fields.join(";")
    }
}
