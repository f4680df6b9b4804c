//! Gene coordinate tables.
//!
//! Two layouts are accepted:
//!
//! - **TSV**: `id chrom start end strand [length]`, 1-based inclusive
//! - **BED6**: `chrom start end name score strand`, 0-based half-open
//!
//! Both are stored 1-based inclusive.

use std::path::Path;

use crate::core::gene::{Gene, GeneTable, Strand};
use crate::parsing::tsv::{ensure_record_capacity, read_text, records, Record};
use crate::parsing::ParseError;

/// Layout of a gene coordinate file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GeneFormat {
    Tsv,
    Bed,
}

impl GeneFormat {
    /// Guess the layout from the file name; `.bed` (optionally gzipped) is BED
    pub fn from_path(path: &Path) -> Self {
        let name = path.to_string_lossy().to_lowercase();
        let name = name
            .strip_suffix(".gz")
            .or_else(|| name.strip_suffix(".bgz"))
            .unwrap_or(&name);
        if name.ends_with(".bed") {
            Self::Bed
        } else {
            Self::Tsv
        }
    }

    fn header_names(self) -> &'static [&'static str] {
        match self {
            Self::Tsv => &["id", "gene_id", "gene"],
            Self::Bed => &["chrom", "track", "browser"],
        }
    }
}

/// Parse a gene table, choosing the layout from the file name
///
/// # Errors
///
/// Returns `ParseError::Io` if the file cannot be read, or other parse errors
/// if the content is invalid.
pub fn parse_gene_file(path: &Path) -> Result<GeneTable, ParseError> {
    let text = read_text(path)?;
    parse_gene_text(&text, GeneFormat::from_path(path))
}

/// Parse gene table text in the given layout
///
/// # Errors
///
/// Returns `ParseError::InvalidFormat` for short lines or bad coordinates,
/// `ParseError::Gene` for inverted intervals or duplicate ids, or
/// `ParseError::TooManyRecords` if the limit is exceeded.
pub fn parse_gene_text(text: &str, format: GeneFormat) -> Result<GeneTable, ParseError> {
    let mut table = GeneTable::new();
    for record in records(text, format.header_names()) {
        ensure_record_capacity(table.len())?;
        let gene = match format {
            GeneFormat::Tsv => parse_tsv_record(&record)?,
            GeneFormat::Bed => parse_bed_record(&record)?,
        };
        table.insert(gene).map_err(|source| ParseError::Gene {
            line: record.line,
            source,
        })?;
    }
    Ok(table)
}

fn parse_tsv_record(record: &Record<'_>) -> Result<Gene, ParseError> {
    record.require(4)?;
    let strand = record
        .fields
        .get(4)
        .map_or(Strand::Unknown, |s| Strand::parse(s));

    let gene = Gene::new(
        record.field(0, "id")?,
        record.field(1, "chrom")?,
        record.parse(2, "start")?,
        record.parse(3, "end")?,
        strand,
    )
    .map_err(|source| ParseError::Gene {
        line: record.line,
        source,
    })?;

    match record.fields.get(5).filter(|s| !s.is_empty()) {
        Some(_) => Ok(gene.with_sequence_length(record.parse(5, "length")?)),
        None => Ok(gene),
    }
}

fn parse_bed_record(record: &Record<'_>) -> Result<Gene, ParseError> {
    record.require(4)?;
    let start: u64 = record.parse(1, "start")?;
    let end: u64 = record.parse(2, "end")?;
    let strand = record
        .fields
        .get(5)
        .map_or(Strand::Unknown, |s| Strand::parse(s));

    // 0-based half-open -> 1-based inclusive; an empty BED interval comes out inverted
    let start = start.checked_add(1).ok_or_else(|| {
        ParseError::InvalidFormat(format!(
            "Line {}: BED start {start} is out of range",
            record.line
        ))
    })?;
    Gene::new(
        record.field(3, "name")?,
        record.field(0, "chrom")?,
        start,
        end,
        strand,
    )
    .map_err(|source| ParseError::Gene {
        line: record.line,
        source,
    })
}
