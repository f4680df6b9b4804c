//! Split and merge detection.
//!
//! A candidate is an anchor gene linked to two or more partner genes in the
//! other annotation. Links come from two adjacency maps, one per search
//! direction; a link counts only when it is present in both (the anchor hits
//! the partner and the partner hits the anchor). A candidate whose partner
//! set contains a one-directional link is not emitted.
//!
//! Each emitted relationship carries a confidence combining reciprocity,
//! partner adjacency and length coverage with [`ScoringWeights`].

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::core::gene::{Gene, GeneTable};
use crate::core::relationship::{Evidence, Relationship};
use crate::core::types::{Annotation, RelationshipKind};
use crate::matching::adjacency::AdjacencyMap;
use crate::matching::engine::ScoringWeights;
use crate::matching::scoring::{merge_coverage, split_coverage, RelationshipScore};
use crate::matching::synteny::are_adjacent;
use crate::utils::validation::{validate_fraction, ConfigError};

/// Relationships plus the bookkeeping needed to report dropped candidates
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClassificationReport {
    pub relationships: Vec<Relationship>,
    /// Candidates dropped because a gene was absent from a gene table
    pub skipped_candidates: usize,
    /// Candidates with two or more partners where some link was one-directional
    pub non_reciprocal_candidates: usize,
}

impl ClassificationReport {
    pub fn splits(&self) -> impl Iterator<Item = &Relationship> {
        self.relationships
            .iter()
            .filter(|r| r.kind == RelationshipKind::Split)
    }

    pub fn merges(&self) -> impl Iterator<Item = &Relationship> {
        self.relationships
            .iter()
            .filter(|r| r.kind == RelationshipKind::Merge)
    }
}

/// Detects splits and merges between a reference and an updated annotation
pub struct RelationshipClassifier<'a> {
    ref_genes: &'a GeneTable,
    target_genes: &'a GeneTable,
    /// reference -> target links from the forward search
    forward: &'a AdjacencyMap,
    /// target -> reference links from the reverse search
    reverse: &'a AdjacencyMap,
    weights: ScoringWeights,
    max_gap: u64,
    skipped: usize,
    non_reciprocal: usize,
}

impl<'a> RelationshipClassifier<'a> {
    /// Create a classifier over two gene tables and their link maps.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a weight is outside [0, 1] or the weights do
    /// not sum to 1.0.
    pub fn new(
        ref_genes: &'a GeneTable,
        target_genes: &'a GeneTable,
        forward: &'a AdjacencyMap,
        reverse: &'a AdjacencyMap,
        weights: ScoringWeights,
        max_gap: u64,
    ) -> Result<Self, ConfigError> {
        weights.validate()?;
        Ok(Self {
            ref_genes,
            target_genes,
            forward,
            reverse,
            weights,
            max_gap,
            skipped: 0,
            non_reciprocal: 0,
        })
    }

    /// Candidates dropped so far because a gene was missing from a table
    pub fn skipped(&self) -> usize {
        self.skipped
    }

    /// Candidates rejected so far for a one-directional link
    pub fn non_reciprocal(&self) -> usize {
        self.non_reciprocal
    }

    /// One reference gene, several updated genes.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidThreshold` if `min_confidence` is outside [0, 1].
    pub fn detect_splits(
        &mut self,
        min_confidence: f64,
        require_adjacency: bool,
    ) -> Result<Vec<Relationship>, ConfigError> {
        let min_confidence = validate_fraction("min_confidence", min_confidence)?;
        Ok(self.detect(RelationshipKind::Split, min_confidence, require_adjacency))
    }

    /// Several reference genes, one updated gene.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidThreshold` if `min_confidence` is outside [0, 1].
    pub fn detect_merges(
        &mut self,
        min_confidence: f64,
        require_adjacency: bool,
    ) -> Result<Vec<Relationship>, ConfigError> {
        let min_confidence = validate_fraction("min_confidence", min_confidence)?;
        Ok(self.detect(RelationshipKind::Merge, min_confidence, require_adjacency))
    }

    /// Splits followed by merges, with the counters for this call.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidThreshold` if `min_confidence` is outside [0, 1].
    pub fn detect_all(
        &mut self,
        min_confidence: f64,
        require_adjacency: bool,
    ) -> Result<ClassificationReport, ConfigError> {
        let skipped_before = self.skipped;
        let non_reciprocal_before = self.non_reciprocal;

        let mut relationships = self.detect_splits(min_confidence, require_adjacency)?;
        relationships.extend(self.detect_merges(min_confidence, require_adjacency)?);

        let report = ClassificationReport {
            relationships,
            skipped_candidates: self.skipped - skipped_before,
            non_reciprocal_candidates: self.non_reciprocal - non_reciprocal_before,
        };
        if report.skipped_candidates > 0 {
            warn!(
                "Skipped {} split/merge candidates referencing genes missing from the gene tables",
                report.skipped_candidates
            );
        }
        Ok(report)
    }

    fn detect(
        &mut self,
        kind: RelationshipKind,
        min_confidence: f64,
        require_adjacency: bool,
    ) -> Vec<Relationship> {
        // Anchor side and partner side swap between splits and merges
        let (anchor_links, partner_links, anchor_table, partner_table, anchor_side, partner_side) =
            match kind {
                RelationshipKind::Split => (
                    self.forward,
                    self.reverse,
                    self.ref_genes,
                    self.target_genes,
                    Annotation::Reference,
                    Annotation::Updated,
                ),
                RelationshipKind::Merge => (
                    self.reverse,
                    self.forward,
                    self.target_genes,
                    self.ref_genes,
                    Annotation::Updated,
                    Annotation::Reference,
                ),
            };

        let mut relationships = Vec::new();
        for anchor_id in anchor_links.sorted_keys() {
            let partner_ids = AdjacencyMap::sorted_neighbors(&anchor_links.forward, anchor_id);
            if partner_ids.len() < 2 {
                continue;
            }

            let reciprocal = partner_ids.iter().all(|partner| {
                partner_links
                    .subjects_of(partner)
                    .is_some_and(|back| back.contains(anchor_id))
            });
            if !reciprocal {
                debug!(%kind, anchor = anchor_id, "Candidate has a one-directional link");
                self.non_reciprocal += 1;
                continue;
            }

            let Some(anchor) = anchor_table.get(anchor_id) else {
                debug!(%kind, gene = anchor_id, annotation = %anchor_side, "Anchor gene missing");
                self.skipped += 1;
                continue;
            };
            let partners: Option<Vec<&Gene>> =
                partner_ids.iter().map(|id| partner_table.get(id)).collect();
            let Some(partners) = partners else {
                debug!(%kind, anchor = anchor_id, annotation = %partner_side, "Partner gene missing");
                self.skipped += 1;
                continue;
            };

            let anchor_length = anchor.effective_length();
            let partner_lengths: Vec<u64> = partners.iter().map(|g| g.effective_length()).collect();
            let coverage = match kind {
                RelationshipKind::Split => split_coverage(anchor_length, &partner_lengths),
                RelationshipKind::Merge => merge_coverage(anchor_length, &partner_lengths),
            };
            let adjacent = are_adjacent(&partners, self.max_gap);
            let score =
                RelationshipScore::calculate_with_weights(reciprocal, adjacent, coverage, &self.weights);

            if score.confidence < min_confidence || (require_adjacency && !adjacent) {
                continue;
            }

            relationships.push(Relationship {
                kind,
                anchor_id: anchor_id.to_string(),
                partner_ids: partner_ids.iter().map(ToString::to_string).collect(),
                confidence: score.confidence,
                evidence: Evidence {
                    reciprocal: score.reciprocal,
                    adjacent: score.adjacent,
                    coverage: score.coverage,
                    anchor_length,
                    partner_lengths,
                },
            });
        }

        debug!(%kind, found = relationships.len(), "Relationship detection finished");
        relationships
    }
}
