//! Parsers for the tabular inputs of an annotation comparison.
//!
//! This module provides parsers for:
//!
//! - **BLAST tabular output** (`-outfmt "6 std qlen slen"`): alignment hits
//! - **Gene coordinate tables**: TSV (`id chrom start end strand [length]`) or BED6
//! - **Identifier maps**: two-column transcript -> gene tables
//! - **Cluster pair tables**: two-column `representative member` tables
//!
//! Any input ending in `.gz` or `.bgz` is decompressed on the fly.
//!
//! ## Example
//!
//! ```rust,no_run
//! use gene_remap::parsing::blast::parse_blast_file;
//! use gene_remap::parsing::genes::parse_gene_file;
//! use std::path::Path;
//!
//! let hits = parse_blast_file(Path::new("ref_vs_new.tsv.gz")).unwrap();
//! let genes = parse_gene_file(Path::new("reference_genes.bed")).unwrap();
//! println!("{} hits over {} genes", hits.len(), genes.len());
//! ```

use thiserror::Error;

use crate::core::gene::GeneError;

pub mod blast;
pub mod clusters;
pub mod genes;
pub mod idmap;
pub mod tsv;

#[derive(Error, Debug)]
pub enum ParseError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid format: {0}")]
    InvalidFormat(String),

    #[error("Line {line}: {source}")]
    Gene {
        line: usize,
        #[source]
        source: GeneError,
    },

    #[error("Too many records: {0} exceeds maximum allowed (50000000)")]
    TooManyRecords(usize),
}
