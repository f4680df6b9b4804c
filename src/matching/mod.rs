//! Hit filtering, ortholog matching and split/merge detection.
//!
//! This module provides the core comparison between two annotations:
//!
//! - [`HitFilter`]: Drops alignment hits below identity/coverage/e-value thresholds
//! - [`AdjacencyMap`]: Query -> subject link tables, with transcript-to-gene translation
//! - [`find_bbh`]: Reciprocal best-hit ortholog pairs
//! - [`SyntenyScorer`]: Gene adjacency and flanking-gene conservation
//! - [`RelationshipClassifier`]: Split and merge calls with weighted confidence
//! - [`GeneStructureEngine`]: Runs the whole pipeline
//!
//! ## Detection
//!
//! A **split** is one reference gene whose hits land on two or more updated
//! genes; a **merge** is two or more reference genes hitting one updated gene.
//! Every link is required in both search directions.
//!
//! ## Scoring
//!
//! Confidence combines three components, weighted 0.4/0.3/0.3 by default:
//!
//! - **Reciprocal**: all partner links present in both directions
//! - **Adjacency**: partners on one chromosome, consecutive gaps within `max_gap`
//! - **Coverage**: length ratio between anchor and partners, capped at 1.0
//!
//! ## Example
//!
//! ```rust,no_run
//! use gene_remap::core::gene::GeneTable;
//! use gene_remap::matching::{GeneStructureEngine, IdMaps};
//!
//! let ref_genes = GeneTable::new();
//! let target_genes = GeneTable::new();
//! let engine = GeneStructureEngine::new(&ref_genes, &target_genes);
//! let report = engine.run(&[], &[], IdMaps::default()).unwrap();
//!
//! for rel in &report.classification.relationships {
//!     println!("{} {} -> {:?} ({:.2})", rel.kind, rel.anchor_id, rel.partner_ids, rel.confidence);
//! }
//! ```

pub mod adjacency;
pub mod classifier;
pub mod engine;
pub mod filter;
pub mod reciprocal;
pub mod scoring;
pub mod synteny;

pub use adjacency::{build_bidirectional, AdjacencyMap, IdMap};
pub use classifier::{ClassificationReport, RelationshipClassifier};
pub use engine::{EngineConfig, EngineReport, GeneStructureEngine, IdMaps, ScoringWeights};
pub use filter::HitFilter;
pub use reciprocal::{find_bbh, OrthologCall};
pub use scoring::RelationshipScore;
pub use synteny::SyntenyScorer;
