use serde::{Deserialize, Serialize};

use crate::core::hit::AlignmentHit;
use crate::core::types::RelationshipKind;

/// Per-direction statistics carried by a reciprocal pair
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HitStats {
    pub percent_identity: f64,
    pub query_coverage: f64,
    pub subject_coverage: f64,
    pub e_value: f64,
    pub bitscore: f64,
}

impl From<&AlignmentHit> for HitStats {
    fn from(hit: &AlignmentHit) -> Self {
        Self {
            percent_identity: hit.percent_identity,
            query_coverage: hit.query_coverage(),
            subject_coverage: hit.subject_coverage(),
            e_value: hit.e_value,
            bitscore: hit.bitscore,
        }
    }
}

/// A bidirectional best hit between a reference gene and a target gene.
///
/// Field order is the export column order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReciprocalPair {
    pub ref_gene: String,
    pub target_gene: String,
    pub avg_identity: f64,
    pub avg_coverage: f64,
    /// Best hit of `ref_gene` searched against the target annotation
    pub forward: HitStats,
    /// Best hit of `target_gene` searched against the reference annotation
    pub reverse: HitStats,
}

impl ReciprocalPair {
    pub fn new(forward_hit: &AlignmentHit, reverse_hit: &AlignmentHit) -> Self {
        let forward = HitStats::from(forward_hit);
        let reverse = HitStats::from(reverse_hit);
        let avg_identity = (forward.percent_identity + reverse.percent_identity) / 2.0;
        let avg_coverage = (forward.query_coverage
            + forward.subject_coverage
            + reverse.query_coverage
            + reverse.subject_coverage)
            / 4.0;

        Self {
            ref_gene: forward_hit.query_id.clone(),
            target_gene: forward_hit.subject_id.clone(),
            avg_identity,
            avg_coverage,
            forward,
            reverse,
        }
    }

    /// The same pair with the roles of the two annotations exchanged
    #[must_use]
    pub fn swapped(&self) -> Self {
        Self {
            ref_gene: self.target_gene.clone(),
            target_gene: self.ref_gene.clone(),
            avg_identity: self.avg_identity,
            avg_coverage: self.avg_coverage,
            forward: self.reverse,
            reverse: self.forward,
        }
    }
}

/// Evidence behind a split or merge call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Evidence {
    /// Every partner passed the mutual-membership check
    pub reciprocal: bool,
    /// Partners sit on one chromosome within the configured gap
    pub adjacent: bool,
    /// Length coverage ratio, capped at 1.0
    pub coverage: f64,
    pub anchor_length: u64,
    /// Lengths of the partners, in the same order as `partner_ids`
    pub partner_lengths: Vec<u64>,
}

/// A detected split or merge.
///
/// For a split the anchor is the single reference gene and the partners are
/// the updated genes; for a merge the anchor is the updated gene and the
/// partners are the reference genes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Relationship {
    pub kind: RelationshipKind,
    pub anchor_id: String,
    pub partner_ids: Vec<String>,
    /// Weighted confidence in [0, 1]
    pub confidence: f64,
    pub evidence: Evidence,
}

impl Relationship {
    /// Column names for tabular export, matching [`Relationship::tsv_row`]
    pub const TSV_HEADER: &'static str =
        "kind\tanchor\tpartners\tconfidence\treciprocal\tadjacent\tcoverage\tanchor_length\tpartner_lengths";

    pub fn tsv_row(&self) -> String {
        let lengths: Vec<String> = self
            .evidence
            .partner_lengths
            .iter()
            .map(ToString::to_string)
            .collect();
        format!(
            "{}\t{}\t{}\t{:.4}\t{}\t{}\t{:.4}\t{}\t{}",
            self.kind,
            self.anchor_id,
            self.partner_ids.join(","),
            self.confidence,
            self.evidence.reciprocal,
            self.evidence.adjacent,
            self.evidence.coverage,
            self.evidence.anchor_length,
            lengths.join(","),
        )
    }
}
