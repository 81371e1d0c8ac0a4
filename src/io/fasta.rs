use std::fs::File;
use std::io::{self, BufRead, BufReader, Write};
use std::path::Path;

use thiserror::Error;

use crate::genome::{HaplotypeBuffer, ReferenceSequence};

/// Line width of emitted FASTA bodies.
const LINE_WIDTH: usize = 50;

/// Errors from reading reference FASTA files.
#[derive(Error, Debug)]
pub enum FastaError {
    #[error("I/O error reading FASTA: {0}")]
    Io(#[from] io::Error),

    /// Sequence data appeared before any `>` header line.
    #[error("sequence data before first FASTA header")]
    MissingHeader,
}

/// Read every record of a (possibly multi-record) FASTA stream. Sequence
/// bytes are kept verbatim, so soft-masking case is preserved.
pub fn read_fasta<R: BufRead>(reader: R) -> Result<Vec<ReferenceSequence>, FastaError> {
    let mut records = Vec::new();
    let mut header: Option<String> = None;
    let mut seq: Vec<u8> = Vec::new();

    for line in reader.lines() {
        let line = line?;
        let line = line.trim_end();
        if line.is_empty() {
            continue;
        }
        if let Some(rest) = line.strip_prefix('>') {
            if let Some(h) = header.take() {
                records.push(ReferenceSequence::new(h, std::mem::take(&mut seq)));
            }
            header = Some(rest.to_string());
        } else {
            if header.is_none() {
                return Err(FastaError::MissingHeader);
            }
            seq.extend_from_slice(line.as_bytes());
        }
    }
    if let Some(h) = header {
        records.push(ReferenceSequence::new(h, seq));
    }
    Ok(records)
}

/// Read all records of a FASTA file on disk.
pub fn read_fasta_file(path: impl AsRef<Path>) -> Result<Vec<ReferenceSequence>, FastaError> {
    let reader = BufReader::new(File::open(path)?);
    read_fasta(reader)
}

/// Serialize one materialized haplotype as FASTA: header, then the host
/// sequence wrapped at 50 columns. At each reference position, inserted
/// content is emitted first, then the position's own base unless deleted.
pub fn write_haplotype<W: Write>(
    writer: &mut W,
    name: &str,
    buffer: &HaplotypeBuffer,
) -> io::Result<()> {
    writeln!(writer, ">{name}")?;

    let mut line: Vec<u8> = Vec::with_capacity(2 * LINE_WIDTH);
    for pos in 1..=buffer.len() {
        if let Some(ins) = buffer.insertions().get(pos) {
            line.extend_from_slice(&ins.seq);
        }
        if !buffer.is_deleted(pos) {
            line.push(buffer.base(pos));
        }
        while line.len() >= LINE_WIDTH {
            writer.write_all(&line[..LINE_WIDTH])?;
            writer.write_all(b"\n")?;
            line.drain(..LINE_WIDTH);
        }
    }
    if !line.is_empty() {
        writer.write_all(&line)?;
        writer.write_all(b"\n")?;
    }
    writer.flush()
}

/// Render a haplotype's host sequence without header or wrapping.
pub fn host_sequence(buffer: &HaplotypeBuffer) -> Vec<u8> {
    let mut out = Vec::with_capacity(buffer.host_len());
    for pos in 1..=buffer.len() {
        if let Some(ins) = buffer.insertions().get(pos) {
            out.extend_from_slice(&ins.seq);
        }
        if !buffer.is_deleted(pos) {
            out.push(buffer.base(pos));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::genome::{InsertedSeq, InsertionShape};
    use std::io::Cursor;

    #[test]
    fn parses_multi_record_fasta() {
        let input = ">chr1 assembly x\nACGT\nacgt\n>chr2\nTTTT\n";
        let records = read_fasta(Cursor::new(input)).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].name().name(), "chr1");
        assert_eq!(records[0].bytes(), b"ACGTacgt");
        assert_eq!(records[1].bytes(), b"TTTT");
    }

    #[test]
    fn data_before_header_is_an_error() {
        assert!(matches!(
            read_fasta(Cursor::new("ACGT\n")),
            Err(FastaError::MissingHeader)
        ));
    }

    #[test]
    fn writes_edits_in_host_order() {
        let reference = ReferenceSequence::new("chrT", b"ACGTACGT".to_vec());
        let mut buffer = HaplotypeBuffer::from_reference(&reference);
        buffer.mark_deleted(3, 2);
        buffer.insertions_mut().try_insert(
            6,
            InsertedSeq {
                seq: b"TT".to_vec(),
                shape: InsertionShape::Literal,
                var_id: "v".into(),
            },
        );
        let mut out = Vec::new();
        write_haplotype(&mut out, "chrT_maternal", &buffer).unwrap();
        assert_eq!(out, b">chrT_maternal\nACATTCGT\n");
        assert_eq!(host_sequence(&buffer), b"ACATTCGT");
    }

    #[test]
    fn wraps_at_fifty_columns() {
        let reference = ReferenceSequence::new("chrT", vec![b'A'; 120]);
        let buffer = HaplotypeBuffer::from_reference(&reference);
        let mut out = Vec::new();
        write_haplotype(&mut out, "chrT_paternal", &buffer).unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 4);
        assert_eq!(lines[1].len(), 50);
        assert_eq!(lines[2].len(), 50);
        assert_eq!(lines[3].len(), 20);
    }
}
