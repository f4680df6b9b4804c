use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::core::gene::GeneTable;
use crate::core::hit::AlignmentHit;
use crate::core::relationship::ReciprocalPair;
use crate::matching::adjacency::{build_bidirectional, translate_hits, IdMap};
use crate::matching::classifier::{ClassificationReport, RelationshipClassifier};
use crate::matching::filter::{HitFilter, DEFAULT_MAX_EVALUE};
use crate::matching::reciprocal::{classify_all, find_bbh, OrthologCall};
use crate::matching::synteny::{PairSynteny, SyntenyScorer};
use crate::utils::validation::{
    validate_fraction, validate_non_negative, validate_percent, validate_weights, ConfigError,
};

/// Default maximum gap (bp) between partner genes for them to count as adjacent
pub const DEFAULT_MAX_GAP: u64 = 10_000;

/// Default number of genes compared on each side for synteny
pub const DEFAULT_FLANK_WINDOW: usize = 5;

/// Default minimum confidence for emitting a split or merge
pub const DEFAULT_MIN_CONFIDENCE: f64 = 0.5;

/// Weights combining the evidence behind a split or merge
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoringWeights {
    /// Weight for all partner links being reciprocal
    pub reciprocal: f64,
    /// Weight for partners being adjacent on one chromosome
    pub adjacency: f64,
    /// Weight for length coverage
    pub coverage: f64,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            reciprocal: 0.4, // 40%
            adjacency: 0.3,  // 30%
            coverage: 0.3,   // 30%
        }
    }
}

impl ScoringWeights {
    /// Create weights, checking that each is in [0, 1] and that they sum to 1.0
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a weight is out of range or the sum is not 1.0.
    pub fn new(reciprocal: f64, adjacency: f64, coverage: f64) -> Result<Self, ConfigError> {
        let weights = Self {
            reciprocal,
            adjacency,
            coverage,
        };
        weights.validate()?;
        Ok(weights)
    }

    /// Check the weights; useful after deserializing
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a weight is out of range or the sum is not 1.0.
    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_weights(&[
            ("reciprocal_weight", self.reciprocal),
            ("adjacency_weight", self.adjacency),
            ("coverage_weight", self.coverage),
        ])
    }
}

/// Hit quality thresholds applied before any matching
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HitThresholds {
    /// Minimum percent identity
    pub min_identity: f64,
    /// Minimum query coverage, percent
    pub min_coverage: f64,
    pub max_evalue: f64,
}

impl Default for HitThresholds {
    fn default() -> Self {
        Self {
            min_identity: 0.0,
            min_coverage: 0.0,
            max_evalue: DEFAULT_MAX_EVALUE,
        }
    }
}

/// Configuration for the gene structure engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub hits: HitThresholds,
    /// Maximum gap (bp) between adjacent partner genes
    pub max_gap: u64,
    /// Genes compared on each side for synteny
    pub flank_window: usize,
    /// Minimum confidence for emitting a split or merge
    pub min_confidence: f64,
    /// Only emit splits and merges whose partners are adjacent
    pub require_adjacency: bool,
    /// Minimum average identity for high-confidence orthologs, percent
    pub min_avg_identity: f64,
    /// Minimum average coverage for high-confidence orthologs, percent
    pub min_avg_coverage: f64,
    pub scoring_weights: ScoringWeights,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            hits: HitThresholds::default(),
            max_gap: DEFAULT_MAX_GAP,
            flank_window: DEFAULT_FLANK_WINDOW,
            min_confidence: DEFAULT_MIN_CONFIDENCE,
            require_adjacency: false,
            min_avg_identity: 0.0,
            min_avg_coverage: 0.0,
            scoring_weights: ScoringWeights::default(),
        }
    }
}

impl EngineConfig {
    /// Check every threshold and the weights
    ///
    /// # Errors
    ///
    /// Returns the first `ConfigError` found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_percent("min_identity", self.hits.min_identity)?;
        validate_percent("min_coverage", self.hits.min_coverage)?;
        validate_non_negative("max_evalue", self.hits.max_evalue)?;
        validate_fraction("min_confidence", self.min_confidence)?;
        validate_percent("min_avg_identity", self.min_avg_identity)?;
        validate_percent("min_avg_coverage", self.min_avg_coverage)?;
        self.scoring_weights.validate()
    }

    /// Build the hit filter for these thresholds
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidThreshold` for bad hit thresholds.
    pub fn hit_filter(&self) -> Result<HitFilter, ConfigError> {
        HitFilter::new(
            self.hits.min_identity,
            self.hits.min_coverage,
            self.hits.max_evalue,
        )
    }
}

/// Optional transcript -> gene translation for each annotation
#[derive(Debug, Clone, Copy, Default)]
pub struct IdMaps<'m> {
    pub reference: Option<&'m IdMap>,
    pub updated: Option<&'m IdMap>,
}

/// Everything one comparison run produces
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EngineReport {
    pub forward_hits_kept: usize,
    pub forward_hits_rejected: usize,
    pub reverse_hits_kept: usize,
    pub reverse_hits_rejected: usize,
    pub bbh: Vec<ReciprocalPair>,
    pub orthologs: Vec<OrthologCall>,
    pub classification: ClassificationReport,
}

/// Runs the full pipeline: filter, translate, BBH, classify, detect
/// splits and merges
pub struct GeneStructureEngine<'a> {
    ref_genes: &'a GeneTable,
    target_genes: &'a GeneTable,
    config: EngineConfig,
    filter: HitFilter,
}

impl<'a> GeneStructureEngine<'a> {
    /// Create an engine with default configuration
    pub fn new(ref_genes: &'a GeneTable, target_genes: &'a GeneTable) -> Self {
        Self {
            ref_genes,
            target_genes,
            config: EngineConfig::default(),
            filter: HitFilter::default(),
        }
    }

    /// Create an engine with custom configuration
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the configuration is invalid.
    pub fn with_config(
        ref_genes: &'a GeneTable,
        target_genes: &'a GeneTable,
        config: EngineConfig,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        let filter = config.hit_filter()?;
        Ok(Self {
            ref_genes,
            target_genes,
            config,
            filter,
        })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn synteny_scorer(&self) -> SyntenyScorer {
        SyntenyScorer::new(self.config.max_gap, self.config.flank_window)
    }

    /// Compare the annotations.
    ///
    /// `forward_hits` are reference sequences searched against the updated
    /// annotation, `reverse_hits` the other way round.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` only for invalid configuration; missing genes are
    /// counted in the report.
    pub fn run(
        &self,
        forward_hits: &[AlignmentHit],
        reverse_hits: &[AlignmentHit],
        id_maps: IdMaps<'_>,
    ) -> Result<EngineReport, ConfigError> {
        let (forward, forward_rejected) = self.filter.filter_with_stats(forward_hits);
        let (reverse, reverse_rejected) = self.filter.filter_with_stats(reverse_hits);

        let forward = translate_hits(&forward, id_maps.reference, id_maps.updated);
        let reverse = translate_hits(&reverse, id_maps.updated, id_maps.reference);

        let bbh = find_bbh(&forward, &reverse);
        let orthologs = classify_all(&forward, &bbh);

        let (forward_links, reverse_links) = build_bidirectional(&forward, &reverse, None, None);
        let mut classifier = RelationshipClassifier::new(
            self.ref_genes,
            self.target_genes,
            &forward_links,
            &reverse_links,
            self.config.scoring_weights,
            self.config.max_gap,
        )?;
        let classification =
            classifier.detect_all(self.config.min_confidence, self.config.require_adjacency)?;

        info!(
            "Compared {} reference and {} updated genes: {} BBH pairs, {} splits, {} merges",
            self.ref_genes.len(),
            self.target_genes.len(),
            bbh.len(),
            classification.splits().count(),
            classification.merges().count(),
        );
        debug!(
            skipped = classification.skipped_candidates,
            non_reciprocal = classification.non_reciprocal_candidates,
            "Candidate bookkeeping"
        );

        Ok(EngineReport {
            forward_hits_kept: forward.len(),
            forward_hits_rejected: forward_rejected,
            reverse_hits_kept: reverse.len(),
            reverse_hits_rejected: reverse_rejected,
            bbh,
            orthologs,
            classification,
        })
    }

    /// Synteny for each reciprocal pair; also returns the number of pairs
    /// skipped for missing genes
    pub fn synteny(&self, pairs: &[ReciprocalPair]) -> (Vec<PairSynteny>, usize) {
        self.synteny_scorer()
            .score_pairs(pairs, self.ref_genes, self.target_genes)
    }
}
