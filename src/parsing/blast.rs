//! BLAST/DIAMOND tabular output.
//!
//! Expected columns are the twelve `-outfmt 6` defaults followed by `qlen` and
//! `slen`:
//!
//! ```text
//! qseqid sseqid pident length mismatch gapopen qstart qend sstart send evalue bitscore qlen slen
//! ```
//!
//! Twelve-column files are accepted with both sequence lengths set to 0, which
//! makes every coverage 0.

use std::path::Path;

use crate::core::hit::AlignmentHit;
use crate::parsing::tsv::{ensure_record_capacity, read_text, records, Record};
use crate::parsing::ParseError;

const HEADER_NAMES: &[&str] = &["qseqid", "query", "query_id"];

/// Parse a (possibly gzipped) BLAST tabular file
///
/// # Errors
///
/// Returns `ParseError::Io` if the file cannot be read, or other parse errors
/// if the content is invalid.
pub fn parse_blast_file(path: &Path) -> Result<Vec<AlignmentHit>, ParseError> {
    let text = read_text(path)?;
    parse_blast_text(&text)
}

/// Parse BLAST tabular text
///
/// # Errors
///
/// Returns `ParseError::InvalidFormat` for short lines or unparsable numbers,
/// or `ParseError::TooManyRecords` if the limit is exceeded. An input with no
/// hits is not an error.
pub fn parse_blast_text(text: &str) -> Result<Vec<AlignmentHit>, ParseError> {
    let mut hits = Vec::new();
    for record in records(text, HEADER_NAMES) {
        ensure_record_capacity(hits.len())?;
        hits.push(parse_record(&record)?);
    }
    Ok(hits)
}

fn parse_record(record: &Record<'_>) -> Result<AlignmentHit, ParseError> {
    record.require(12)?;

    let (query_len, subject_len) = if record.fields.len() >= 14 {
        (record.parse(12, "qlen")?, record.parse(13, "slen")?)
    } else {
        (0, 0)
    };

    Ok(
        AlignmentHit::new(record.field(0, "qseqid")?, record.field(1, "sseqid")?)
            .with_identity(record.parse(2, "pident")?)
            .with_alignment_length(record.parse(3, "length")?)
            .with_query_span(record.parse(6, "qstart")?, record.parse(7, "qend")?, query_len)
            .with_subject_span(
                record.parse(8, "sstart")?,
                record.parse(9, "send")?,
                subject_len,
            )
            .with_evalue(record.parse(10, "evalue")?)
            .with_bitscore(record.parse(11, "bitscore")?),
    )
}
