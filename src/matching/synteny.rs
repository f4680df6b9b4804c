//! Chromosomal adjacency and flanking-gene conservation.
//!
//! Chromosomes are independent of each other here; every check first
//! restricts to one chromosome and sorts by start.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::core::gene::{GeneTable, Located};
use crate::core::relationship::ReciprocalPair;

/// Helper function to convert usize count to f64 with explicit precision loss allowance
#[inline]
fn count_to_f64(count: usize) -> f64 {
    #[allow(clippy::cast_precision_loss)]
    {
        count as f64
    }
}

/// True if all genes share one chromosome and, sorted by start, no gap
/// between consecutive genes exceeds `max_gap`.
///
/// Empty and single-gene inputs are trivially adjacent. Overlapping genes
/// count as a gap of zero.
pub fn are_adjacent<G: Located + ?Sized>(genes: &[&G], max_gap: u64) -> bool {
    let Some(first) = genes.first() else {
        return true;
    };
    let chromosome = first.chromosome();
    if genes.iter().any(|g| g.chromosome() != chromosome) {
        return false;
    }

    let mut sorted: Vec<&G> = genes.to_vec();
    sorted.sort_by(|a, b| a.start().cmp(&b.start()).then_with(|| a.end().cmp(&b.end())));

    sorted
        .windows(2)
        .all(|w| w[1].start().saturating_sub(w[0].end()) <= max_gap)
}

/// Gene ids on either side of a gene, in genomic order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Flanks {
    /// Preceding genes, nearest last
    pub upstream: Vec<String>,
    /// Following genes, nearest first
    pub downstream: Vec<String>,
}

impl Flanks {
    pub fn len(&self) -> usize {
        self.upstream.len() + self.downstream.len()
    }

    pub fn is_empty(&self) -> bool {
        self.upstream.is_empty() && self.downstream.is_empty()
    }
}

/// Up to `window` genes upstream and downstream of `target` on its chromosome.
///
/// Returns empty flanks if `target` is not among `all_genes`.
pub fn flanking<'a, G, I>(target: &G, all_genes: I, window: usize) -> Flanks
where
    G: Located + 'a,
    I: IntoIterator<Item = &'a G>,
{
    let mut same_chrom: Vec<&G> = all_genes
        .into_iter()
        .filter(|g| g.chromosome() == target.chromosome())
        .collect();
    same_chrom.sort_by(|a, b| a.start().cmp(&b.start()).then_with(|| a.id().cmp(b.id())));

    let Some(idx) = same_chrom.iter().position(|g| g.id() == target.id()) else {
        return Flanks::default();
    };

    let upstream_start = idx.saturating_sub(window);
    let downstream_end = (idx + 1 + window).min(same_chrom.len());

    Flanks {
        upstream: same_chrom[upstream_start..idx]
            .iter()
            .map(|g| g.id().to_string())
            .collect(),
        downstream: same_chrom[idx + 1..downstream_end]
            .iter()
            .map(|g| g.id().to_string())
            .collect(),
    }
}

/// Match counts behind a synteny score
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SyntenyCounts {
    pub upstream_matches: usize,
    pub downstream_matches: usize,
    /// Number of reference flanking genes compared
    pub compared: usize,
}

impl SyntenyCounts {
    /// Fraction of compared reference flanks that are conserved; 0.0 when
    /// nothing was compared
    pub fn score(&self) -> f64 {
        if self.compared == 0 {
            return 0.0;
        }
        count_to_f64(self.upstream_matches + self.downstream_matches) / count_to_f64(self.compared)
    }
}

/// Count how many reference flanking genes map into the target's flanks on
/// the same side. Unmapped reference genes never match.
pub fn synteny_counts(
    ref_flanking: &Flanks,
    target_flanking: &Flanks,
    ref_to_target_map: &HashMap<String, String>,
) -> SyntenyCounts {
    let target_up: HashSet<&str> = target_flanking.upstream.iter().map(String::as_str).collect();
    let target_down: HashSet<&str> = target_flanking
        .downstream
        .iter()
        .map(String::as_str)
        .collect();

    let count_side = |ids: &[String], side: &HashSet<&str>| {
        ids.iter()
            .filter_map(|id| ref_to_target_map.get(id))
            .filter(|mapped| side.contains(mapped.as_str()))
            .count()
    };

    SyntenyCounts {
        upstream_matches: count_side(&ref_flanking.upstream, &target_up),
        downstream_matches: count_side(&ref_flanking.downstream, &target_down),
        compared: ref_flanking.len(),
    }
}

/// Fraction of reference flanking genes whose mapped partner flanks the
/// target on the same side
pub fn synteny_score(
    ref_flanking: &Flanks,
    target_flanking: &Flanks,
    ref_to_target_map: &HashMap<String, String>,
) -> f64 {
    synteny_counts(ref_flanking, target_flanking, ref_to_target_map).score()
}

/// Reference -> target lookup from reciprocal pairs.
///
/// If several pairs share a reference gene, the first one wins; pairs from
/// [`crate::matching::reciprocal::find_bbh`] are one per reference gene.
pub fn ref_to_target_map(pairs: &[ReciprocalPair]) -> HashMap<String, String> {
    let mut map = HashMap::with_capacity(pairs.len());
    for pair in pairs {
        map.entry(pair.ref_gene.clone())
            .or_insert_with(|| pair.target_gene.clone());
    }
    map
}

/// Synteny result for one reference/target pair
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PairSynteny {
    pub ref_gene: String,
    pub target_gene: String,
    pub score: f64,
    pub upstream_matches: usize,
    pub downstream_matches: usize,
    pub compared: usize,
}

/// Adjacency and flank checks with configured gap and window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SyntenyScorer {
    pub max_gap: u64,
    pub window: usize,
}

impl SyntenyScorer {
    pub fn new(max_gap: u64, window: usize) -> Self {
        Self { max_gap, window }
    }

    pub fn are_adjacent<G: Located + ?Sized>(&self, genes: &[&G]) -> bool {
        are_adjacent(genes, self.max_gap)
    }

    /// Score flank conservation for one pair. `None` if either gene is
    /// missing from its table.
    pub fn score_pair(
        &self,
        ref_gene: &str,
        target_gene: &str,
        ref_genes: &GeneTable,
        target_genes: &GeneTable,
        ref_to_target: &HashMap<String, String>,
    ) -> Option<PairSynteny> {
        let ref_g = ref_genes.get(ref_gene)?;
        let target_g = target_genes.get(target_gene)?;

        let ref_flanks = flanking(ref_g, ref_genes.iter(), self.window);
        let target_flanks = flanking(target_g, target_genes.iter(), self.window);
        let counts = synteny_counts(&ref_flanks, &target_flanks, ref_to_target);

        Some(PairSynteny {
            ref_gene: ref_gene.to_string(),
            target_gene: target_gene.to_string(),
            score: counts.score(),
            upstream_matches: counts.upstream_matches,
            downstream_matches: counts.downstream_matches,
            compared: counts.compared,
        })
    }

    /// Score every pair; pairs with a gene missing from either table are
    /// skipped and counted.
    pub fn score_pairs(
        &self,
        pairs: &[ReciprocalPair],
        ref_genes: &GeneTable,
        target_genes: &GeneTable,
    ) -> (Vec<PairSynteny>, usize) {
        let lookup = ref_to_target_map(pairs);
        let mut skipped = 0usize;
        let scores = pairs
            .iter()
            .filter_map(|p| {
                let scored = self.score_pair(
                    &p.ref_gene,
                    &p.target_gene,
                    ref_genes,
                    target_genes,
                    &lookup,
                );
                if scored.is_none() {
                    tracing::debug!(
                        ref_gene = %p.ref_gene,
                        target_gene = %p.target_gene,
                        "Skipping synteny for pair with a gene missing from the gene table"
                    );
                    skipped += 1;
                }
                scored
            })
            .collect();
        (scores, skipped)
    }
}
