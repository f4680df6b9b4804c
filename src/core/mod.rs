//! Core data types for gene structure comparison.
//!
//! - [`Gene`], [`GeneTable`]: genes of one annotation and their id lookup
//! - [`Located`]: chromosome/start/end capability used by synteny checks
//! - [`AlignmentHit`]: one precomputed similarity hit
//! - [`ReciprocalPair`]: a bidirectional best hit
//! - [`Relationship`]: a detected split or merge with its evidence
//! - [`ClusterAssignment`], [`ClusterStats`]: sequence clustering output
//! - [`RelationshipKind`], [`OrthologClass`], [`Annotation`]: classification types
//!
//! ## Coordinates
//!
//! Gene intervals are 1-based and inclusive, as in GFF3. BED input is
//! converted on parse.
//!
//! [`Gene`]: gene::Gene
//! [`GeneTable`]: gene::GeneTable
//! [`Located`]: gene::Located
//! [`AlignmentHit`]: hit::AlignmentHit
//! [`ReciprocalPair`]: relationship::ReciprocalPair
//! [`Relationship`]: relationship::Relationship
//! [`ClusterAssignment`]: cluster::ClusterAssignment
//! [`ClusterStats`]: cluster::ClusterStats
//! [`RelationshipKind`]: types::RelationshipKind
//! [`OrthologClass`]: types::OrthologClass
//! [`Annotation`]: types::Annotation

pub mod cluster;
pub mod gene;
pub mod hit;
pub mod relationship;
pub mod types;
