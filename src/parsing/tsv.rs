//! Shared helpers for the tab-separated inputs.

use std::io::{BufReader, Read};
use std::path::Path;
use std::str::{FromStr, Lines};

use flate2::read::MultiGzDecoder;

use crate::parsing::ParseError;
use crate::utils::validation::check_record_limit;

/// Check if the path is a gzipped file
#[allow(clippy::case_sensitive_file_extension_comparisons)] // Already lowercased
pub fn is_gzipped(path: &Path) -> bool {
    let path_str = path.to_string_lossy().to_lowercase();
    path_str.ends_with(".gz") || path_str.ends_with(".bgz")
}

/// Read a whole text file, decompressing `.gz`/`.bgz` inputs.
///
/// # Errors
///
/// Returns `ParseError::Io` if the file cannot be opened, decompressed or is
/// not valid UTF-8.
pub fn read_text(path: &Path) -> Result<String, ParseError> {
    if !is_gzipped(path) {
        return Ok(std::fs::read_to_string(path)?);
    }
    let file = std::fs::File::open(path)?;
    // bgzip output is a series of gzip members
    let mut reader = BufReader::new(MultiGzDecoder::new(file));
    let mut text = String::new();
    reader.read_to_string(&mut text)?;
    Ok(text)
}

/// One data line, split on tabs
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record<'a> {
    /// 1-based line number in the input
    pub line: usize,
    pub fields: Vec<&'a str>,
}

impl<'a> Record<'a> {
    /// Field `index`, or an error naming the missing column
    ///
    /// # Errors
    ///
    /// Returns `ParseError::InvalidFormat` if the line is too short.
    pub fn field(&self, index: usize, name: &str) -> Result<&'a str, ParseError> {
        self.fields.get(index).copied().ok_or_else(|| {
            ParseError::InvalidFormat(format!("Line {} is missing column '{name}'", self.line))
        })
    }

    /// Parse field `index` into `T`
    ///
    /// # Errors
    ///
    /// Returns `ParseError::InvalidFormat` if the column is missing or unparsable.
    pub fn parse<T: FromStr>(&self, index: usize, name: &str) -> Result<T, ParseError> {
        let raw = self.field(index, name)?;
        raw.parse().map_err(|_| {
            ParseError::InvalidFormat(format!("Invalid {name} on line {}: '{raw}'", self.line))
        })
    }

    /// Require at least `n` columns
    ///
    /// # Errors
    ///
    /// Returns `ParseError::InvalidFormat` if the line is shorter.
    pub fn require(&self, n: usize) -> Result<(), ParseError> {
        if self.fields.len() < n {
            return Err(ParseError::InvalidFormat(format!(
                "Line {} has {} fields, expected at least {n}",
                self.line,
                self.fields.len()
            )));
        }
        Ok(())
    }
}

/// Iterator over the data lines of a tab-separated text.
///
/// Blank lines and `#` comments are skipped. If the first data line starts
/// with one of `header_names` (case-insensitive), it is treated as a header.
pub struct Records<'a> {
    lines: std::iter::Enumerate<Lines<'a>>,
    header_names: &'a [&'a str],
    first_data_line: bool,
}

impl<'a> Iterator for Records<'a> {
    type Item = Record<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        for (i, line) in self.lines.by_ref() {
            let line = line.trim_end_matches(['\r', '\n']);
            if line.trim().is_empty() || line.starts_with('#') {
                continue;
            }

            let fields: Vec<&str> = line.split('\t').map(str::trim).collect();

            if self.first_data_line {
                self.first_data_line = false;
                let first = fields.first().map(|s| s.to_lowercase()).unwrap_or_default();
                if self.header_names.contains(&first.as_str()) {
                    continue;
                }
            }

            return Some(Record {
                line: i + 1,
                fields,
            });
        }
        None
    }
}

/// Iterate the data lines of `text`
pub fn records<'a>(text: &'a str, header_names: &'a [&'a str]) -> Records<'a> {
    Records {
        lines: text.lines().enumerate(),
        header_names,
        first_data_line: true,
    }
}

/// Fail once a parser has collected the maximum number of records
///
/// # Errors
///
/// Returns `ParseError::TooManyRecords` when `count` is at the limit.
pub fn ensure_record_capacity(count: usize) -> Result<(), ParseError> {
    if check_record_limit(count).is_some() {
        return Err(ParseError::TooManyRecords(count));
    }
    Ok(())
}
