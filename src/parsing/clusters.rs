//! Cluster pair tables: `representative<TAB>member`, one pair per line.
//!
//! This is the layout written by `mmseqs createtsv` and by CD-HIT converters.

use std::path::Path;

use crate::parsing::tsv::{ensure_record_capacity, read_text, records};
use crate::parsing::ParseError;

const HEADER_ROW: [&str; 2] = ["representative", "member"];

fn is_header(fields: &[&str]) -> bool {
    fields.len() == HEADER_ROW.len()
        && fields
            .iter()
            .zip(HEADER_ROW)
            .all(|(field, name)| field.eq_ignore_ascii_case(name))
}

/// Parse a (possibly gzipped) cluster pair table
///
/// # Errors
///
/// Returns `ParseError::Io` if the file cannot be read, or other parse errors
/// if the content is invalid.
pub fn parse_cluster_pairs_file(path: &Path) -> Result<Vec<(String, String)>, ParseError> {
    let text = read_text(path)?;
    parse_cluster_pairs_text(&text)
}

/// Parse cluster pair text
///
/// # Errors
///
/// Returns `ParseError::InvalidFormat` for lines with fewer than 2 fields, or
/// `ParseError::TooManyRecords` if the limit is exceeded.
pub fn parse_cluster_pairs_text(text: &str) -> Result<Vec<(String, String)>, ParseError> {
    let mut pairs = Vec::new();
    // Ids such as `rep` or `cluster` are data; only the full header row is skipped
    for (i, record) in records(text, &[]).enumerate() {
        if i == 0 && is_header(&record.fields) {
            continue;
        }
        record.require(2)?;
        ensure_record_capacity(pairs.len())?;
        pairs.push((
            record.field(0, "representative")?.to_string(),
            record.field(1, "member")?.to_string(),
        ));
    }
    Ok(pairs)
}
