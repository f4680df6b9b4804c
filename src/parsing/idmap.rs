//! Transcript -> gene identifier maps (two columns, tab-separated).

use std::path::Path;

use tracing::warn;

use crate::matching::adjacency::IdMap;
use crate::parsing::tsv::{ensure_record_capacity, read_text, records};
use crate::parsing::ParseError;

const HEADER_NAMES: &[&str] = &["transcript", "transcript_id", "from", "source"];

/// Parse a (possibly gzipped) identifier map
///
/// # Errors
///
/// Returns `ParseError::Io` if the file cannot be read, or other parse errors
/// if the content is invalid.
pub fn parse_idmap_file(path: &Path) -> Result<IdMap, ParseError> {
    let text = read_text(path)?;
    parse_idmap_text(&text)
}

/// Parse identifier map text.
///
/// A key mapped twice keeps its last value; a warning is logged.
///
/// # Errors
///
/// Returns `ParseError::InvalidFormat` for lines with fewer than 2 fields, or
/// `ParseError::TooManyRecords` if the limit is exceeded.
pub fn parse_idmap_text(text: &str) -> Result<IdMap, ParseError> {
    let mut map = IdMap::new();
    for record in records(text, HEADER_NAMES) {
        record.require(2)?;
        ensure_record_capacity(map.len())?;
        let from = record.field(0, "from")?;
        let to = record.field(1, "to")?;
        if let Some(previous) = map.insert(from.to_string(), to.to_string()) {
            if previous != to {
                warn!(
                    "Line {}: '{}' remapped from '{}' to '{}'",
                    record.line, from, previous, to
                );
            }
        }
    }
    Ok(map)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_idmap() {
        let text = "transcript_id\tgene_id\nG1.t1\tG1\nG1.t2\tG1\nG2.t1\tG2\n";
        let map = parse_idmap_text(text).unwrap();
        assert_eq!(map.len(), 3);
        assert_eq!(map["G1.t2"], "G1");
    }

    #[test]
    fn test_last_mapping_wins() {
        let map = parse_idmap_text("T1\tA\nT1\tB\n").unwrap();
        assert_eq!(map["T1"], "B");
    }

    #[test]
    fn test_single_column_rejected() {
        assert!(parse_idmap_text("T1\n").is_err());
    }
}
