//! # gene-remap
//!
//! A library for detecting gene structure changes between two annotations.
//!
//! When a genome is re-annotated, gene models rarely map one-to-one onto the
//! previous release. A gene may be split into several new genes, several genes
//! may be merged into one, and identifiers change throughout.
//!
//! `gene-remap` works from all-vs-all similarity searches run in both
//! directions (reference against updated, updated against reference) and the
//! gene coordinates of both annotations.
//!
//! ## Features
//!
//! - **Hit filtering**: Identity, coverage and e-value thresholds
//! - **Ortholog detection**: Reciprocal best hits, with per-gene classification
//! - **Split/merge detection**: Weighted confidence from reciprocity, adjacency and length coverage
//! - **Synteny**: Conservation of flanking genes around each ortholog pair
//! - **Clustering**: Union-Find resolution of representative/member tables
//!
//! ## Example
//!
//! ```rust,no_run
//! use gene_remap::{GeneStructureEngine, IdMaps};
//! use gene_remap::parsing::blast::parse_blast_file;
//! use gene_remap::parsing::genes::parse_gene_file;
//! use std::path::Path;
//!
//! let ref_genes = parse_gene_file(Path::new("reference.bed")).unwrap();
//! let new_genes = parse_gene_file(Path::new("updated.bed")).unwrap();
//! let forward = parse_blast_file(Path::new("ref_vs_new.tsv")).unwrap();
//! let reverse = parse_blast_file(Path::new("new_vs_ref.tsv")).unwrap();
//!
//! let engine = GeneStructureEngine::new(&ref_genes, &new_genes);
//! let report = engine.run(&forward, &reverse, IdMaps::default()).unwrap();
//!
//! for rel in &report.classification.relationships {
//!     println!("{} {} -> {}", rel.kind, rel.anchor_id, rel.partner_ids.join(","));
//! }
//! ```
//!
//! ## Modules
//!
//! - [`core`]: Core data types for genes, hits, relationships and clusters
//! - [`matching`]: Filtering, reciprocal best hits, synteny and classification
//! - [`clustering`]: Union-Find sequence clustering
//! - [`parsing`]: Parsers for BLAST tabular, gene tables, id maps and cluster tables
//! - [`cli`]: Command-line interface implementation

pub mod cli;
pub mod clustering;
pub mod core;
pub mod matching;
pub mod parsing;
pub mod utils;

// Re-export commonly used types for convenience
pub use clustering::{parse_clusters, ClusterSet};
pub use core::gene::{Gene, GeneTable, Strand};
pub use core::hit::AlignmentHit;
pub use core::relationship::{ReciprocalPair, Relationship};
pub use core::types::*;
pub use matching::engine::{EngineConfig, EngineReport, GeneStructureEngine, IdMaps};
