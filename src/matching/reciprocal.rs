//! Reciprocal best hit (BBH) matching and ortholog classification.
//!
//! Best hits are chosen by a total order so results never depend on the
//! order hits arrive in: highest bitscore, then lowest e-value, then the
//! lexicographically smallest subject id.

use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap, HashSet};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::hit::AlignmentHit;
use crate::core::relationship::ReciprocalPair;
use crate::core::types::OrthologClass;
use crate::utils::validation::{validate_percent, ConfigError};

/// Rank two hits from the same query; `Less` means `a` is the better hit
fn rank_hits(a: &AlignmentHit, b: &AlignmentHit) -> Ordering {
    b.bitscore
        .total_cmp(&a.bitscore)
        .then_with(|| a.e_value.total_cmp(&b.e_value))
        .then_with(|| a.subject_id.cmp(&b.subject_id))
        // Duplicate rows for the same pair: prefer the stronger alignment
        .then_with(|| b.percent_identity.total_cmp(&a.percent_identity))
        .then_with(|| b.alignment_length.cmp(&a.alignment_length))
}

/// Best hit for every query id
pub fn best_hit_per_query(hits: &[AlignmentHit]) -> HashMap<&str, &AlignmentHit> {
    let mut best: HashMap<&str, &AlignmentHit> = HashMap::new();
    for hit in hits {
        best.entry(hit.query_id.as_str())
            .and_modify(|current| {
                if rank_hits(hit, *current) == Ordering::Less {
                    *current = hit;
                }
            })
            .or_insert(hit);
    }
    best
}

/// Number of distinct subjects hit by each query id
pub fn distinct_subjects_per_query(hits: &[AlignmentHit]) -> HashMap<String, usize> {
    let mut subjects: HashMap<&str, HashSet<&str>> = HashMap::new();
    for hit in hits {
        subjects
            .entry(hit.query_id.as_str())
            .or_default()
            .insert(hit.subject_id.as_str());
    }
    subjects
        .into_iter()
        .map(|(query, set)| (query.to_string(), set.len()))
        .collect()
}

/// Bidirectional best hits.
///
/// `forward_hits` are reference queries against the target annotation and
/// `reverse_hits` are target queries against the reference annotation. A pair
/// is kept when each gene is the other's best hit. Sorted by average identity
/// descending, then reference id, then target id.
pub fn find_bbh(forward_hits: &[AlignmentHit], reverse_hits: &[AlignmentHit]) -> Vec<ReciprocalPair> {
    let forward_best = best_hit_per_query(forward_hits);
    let reverse_best = best_hit_per_query(reverse_hits);

    let mut pairs: Vec<ReciprocalPair> = forward_best
        .values()
        .filter_map(|fwd| {
            let rev = reverse_best.get(fwd.subject_id.as_str())?;
            (rev.subject_id == fwd.query_id).then(|| ReciprocalPair::new(fwd, rev))
        })
        .collect();

    sort_pairs(&mut pairs);
    debug!(
        forward_queries = forward_best.len(),
        reverse_queries = reverse_best.len(),
        pairs = pairs.len(),
        "Found reciprocal best hits"
    );
    pairs
}

fn sort_pairs(pairs: &mut [ReciprocalPair]) {
    pairs.sort_by(|a, b| {
        b.avg_identity
            .total_cmp(&a.avg_identity)
            .then_with(|| a.ref_gene.cmp(&b.ref_gene))
            .then_with(|| a.target_gene.cmp(&b.target_gene))
    });
}

/// BBH pairs clearing both averaged thresholds (percentages).
///
/// The result is not forced to be one-to-one: if two reference genes both
/// pair with the same target and both clear the thresholds, both pairs are
/// returned. Use [`shared_targets`] to find such targets.
///
/// # Errors
///
/// Returns `ConfigError::InvalidThreshold` if a threshold is outside [0, 100].
pub fn high_confidence_orthologs(
    bbh: &[ReciprocalPair],
    min_avg_identity: f64,
    min_avg_coverage: f64,
) -> Result<Vec<ReciprocalPair>, ConfigError> {
    let min_avg_identity = validate_percent("min_avg_identity", min_avg_identity)?;
    let min_avg_coverage = validate_percent("min_avg_coverage", min_avg_coverage)?;

    Ok(bbh
        .iter()
        .filter(|p| p.avg_identity >= min_avg_identity && p.avg_coverage >= min_avg_coverage)
        .cloned()
        .collect())
}

/// Targets claimed by more than one reference gene, with the sorted claimants
pub fn shared_targets(pairs: &[ReciprocalPair]) -> BTreeMap<String, Vec<String>> {
    let mut claims: BTreeMap<String, Vec<String>> = BTreeMap::new();
    for pair in pairs {
        claims
            .entry(pair.target_gene.clone())
            .or_default()
            .push(pair.ref_gene.clone());
    }
    claims.retain(|_, refs| {
        refs.sort_unstable();
        refs.dedup();
        refs.len() > 1
    });
    claims
}

/// Classification of one reference gene
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrthologCall {
    pub ref_gene: String,
    pub class: OrthologClass,
    pub confidence: f64,
    /// Subject of the best forward hit
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub best_target: Option<String>,
}

fn classify_with<F>(
    ref_gene: &str,
    forward_hits_for_gene: &[AlignmentHit],
    is_bbh: F,
    hit_count_per_ref: &HashMap<String, usize>,
) -> (OrthologClass, Option<String>)
where
    F: Fn(&str, &str) -> bool,
{
    let best = forward_hits_for_gene
        .iter()
        .filter(|h| h.query_id == ref_gene)
        .min_by(|a, b| rank_hits(a, b));

    let best_target = best.map(|h| h.subject_id.clone());
    if best.is_some_and(|h| is_bbh(ref_gene, &h.subject_id)) {
        return (OrthologClass::BbhOrtholog, best_target);
    }
    if hit_count_per_ref.get(ref_gene).copied() == Some(1) {
        return (OrthologClass::BestHitOnly, best_target);
    }
    (OrthologClass::MultiHit, best_target)
}

/// Classify a reference gene from its forward hits.
///
/// - `bbh_ortholog` (1.0): its best forward hit forms a BBH pair
/// - `best_hit_only` (0.7): otherwise, if it hits exactly one distinct subject
/// - `multi_hit` (0.5): anything else
pub fn classify(
    ref_gene: &str,
    forward_hits_for_gene: &[AlignmentHit],
    bbh_pairs: &[ReciprocalPair],
    hit_count_per_ref: &HashMap<String, usize>,
) -> (OrthologClass, f64) {
    let is_bbh = |r: &str, t: &str| {
        bbh_pairs
            .iter()
            .any(|p| p.ref_gene == r && p.target_gene == t)
    };
    let (class, _) = classify_with(ref_gene, forward_hits_for_gene, is_bbh, hit_count_per_ref);
    (class, class.confidence())
}

/// Classify every reference gene that has forward hits, sorted by gene id
pub fn classify_all(forward_hits: &[AlignmentHit], bbh_pairs: &[ReciprocalPair]) -> Vec<OrthologCall> {
    let mut bbh_index: HashMap<&str, HashSet<&str>> = HashMap::new();
    for pair in bbh_pairs {
        bbh_index
            .entry(pair.ref_gene.as_str())
            .or_default()
            .insert(pair.target_gene.as_str());
    }
    let counts = distinct_subjects_per_query(forward_hits);

    let mut by_ref: BTreeMap<&str, Vec<AlignmentHit>> = BTreeMap::new();
    for hit in forward_hits {
        by_ref
            .entry(hit.query_id.as_str())
            .or_default()
            .push(hit.clone());
    }

    by_ref
        .into_iter()
        .map(|(ref_gene, hits)| {
            let (class, best_target) = classify_with(
                ref_gene,
                &hits,
                |r, t| bbh_index.get(r).is_some_and(|targets| targets.contains(t)),
                &counts,
            );
            OrthologCall {
                ref_gene: ref_gene.to_string(),
                class,
                confidence: class.confidence(),
                best_target,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hit(q: &str, s: &str, identity: f64, bitscore: f64, evalue: f64) -> AlignmentHit {
        AlignmentHit::new(q, s)
            .with_identity(identity)
            .with_alignment_length(100)
            .with_query_span(1, 100, 100)
            .with_subject_span(1, 100, 100)
            .with_bitscore(bitscore)
            .with_evalue(evalue)
    }

    #[test]
    fn test_best_hit_by_bitscore() {
        let hits = vec![
            hit("R1", "T1", 90.0, 100.0, 1e-10),
            hit("R1", "T2", 95.0, 200.0, 1e-5),
        ];
        let best = best_hit_per_query(&hits);
        assert_eq!(best["R1"].subject_id, "T2");
    }

    #[test]
    fn test_best_hit_tie_breaks() {
        // Equal bitscore: lower e-value wins
        let hits = vec![
            hit("R1", "T1", 90.0, 100.0, 1e-10),
            hit("R1", "T2", 90.0, 100.0, 1e-20),
        ];
        assert_eq!(best_hit_per_query(&hits)["R1"].subject_id, "T2");

        // Equal bitscore and e-value: smallest subject id wins, in any order
        let mut hits = vec![
            hit("R1", "T9", 90.0, 100.0, 1e-10),
            hit("R1", "T3", 90.0, 100.0, 1e-10),
            hit("R1", "T5", 90.0, 100.0, 1e-10),
        ];
        assert_eq!(best_hit_per_query(&hits)["R1"].subject_id, "T3");
        hits.reverse();
        assert_eq!(best_hit_per_query(&hits)["R1"].subject_id, "T3");
    }

    #[test]
    fn test_find_bbh() {
        let forward = vec![
            hit("R1", "T1", 90.0, 200.0, 0.0),
            hit("R1", "T2", 80.0, 100.0, 0.0),
            hit("R2", "T2", 70.0, 150.0, 0.0),
            hit("R3", "T1", 99.0, 50.0, 0.0),
        ];
        let reverse = vec![
            hit("T1", "R1", 92.0, 200.0, 0.0),
            hit("T2", "R2", 72.0, 150.0, 0.0),
            hit("T2", "R1", 80.0, 100.0, 0.0),
        ];
        let pairs = find_bbh(&forward, &reverse);
        assert_eq!(pairs.len(), 2);
        assert_eq!(pairs[0].ref_gene, "R1");
        assert_eq!(pairs[0].target_gene, "T1");
        assert!((pairs[0].avg_identity - 91.0).abs() < 1e-9);
        assert!((pairs[0].avg_coverage - 100.0).abs() < 1e-9);
        assert_eq!(pairs[1].ref_gene, "R2");
        assert_eq!(pairs[1].target_gene, "T2");
    }

    #[test]
    fn test_find_bbh_direction_symmetry() {
        let forward = vec![
            hit("R1", "T1", 90.0, 200.0, 0.0),
            hit("R2", "T2", 70.0, 150.0, 0.0),
            hit("R3", "T2", 60.0, 10.0, 0.0),
        ];
        let reverse = vec![
            hit("T1", "R1", 92.0, 200.0, 0.0),
            hit("T2", "R2", 72.0, 150.0, 0.0),
        ];
        let mut a: Vec<(String, String)> = find_bbh(&forward, &reverse)
            .into_iter()
            .map(|p| (p.ref_gene, p.target_gene))
            .collect();
        let mut b: Vec<(String, String)> = find_bbh(&reverse, &forward)
            .into_iter()
            .map(|p| (p.target_gene, p.ref_gene))
            .collect();
        a.sort();
        b.sort();
        assert_eq!(a, b);
    }

    #[test]
    fn test_find_bbh_empty() {
        assert!(find_bbh(&[], &[]).is_empty());
        assert!(find_bbh(&[hit("R1", "T1", 90.0, 1.0, 0.0)], &[]).is_empty());
    }

    #[test]
    fn test_high_confidence_orthologs_not_injective() {
        let forward = vec![
            hit("R1", "T1", 90.0, 200.0, 0.0),
            hit("R2", "T2", 95.0, 200.0, 0.0),
        ];
        let reverse = vec![
            hit("T1", "R1", 90.0, 200.0, 0.0),
            hit("T2", "R2", 95.0, 200.0, 0.0),
        ];
        let mut bbh = find_bbh(&forward, &reverse);
        // A second reference claiming T1 independently
        let mut extra = bbh[1].clone();
        extra.ref_gene = "R9".to_string();
        extra.target_gene = "T1".to_string();
        bbh.push(extra);

        let kept = high_confidence_orthologs(&bbh, 85.0, 50.0).unwrap();
        assert_eq!(kept.len(), 3);
        let shared = shared_targets(&kept);
        assert_eq!(shared.len(), 1);
        assert_eq!(shared["T1"], vec!["R1".to_string(), "R9".to_string()]);

        // Only R2-T2 (95%) clears 92%; R1-T1 and its copy sit at 90%
        let strict = high_confidence_orthologs(&bbh, 92.0, 50.0).unwrap();
        assert_eq!(strict.len(), 1);
        assert_eq!(strict[0].ref_gene, "R2");
        assert!(high_confidence_orthologs(&bbh, -1.0, 50.0).is_err());
    }

    #[test]
    fn test_classify() {
        let forward = vec![
            hit("R1", "T1", 90.0, 200.0, 0.0),
            hit("R1", "T2", 80.0, 100.0, 0.0),
            hit("R2", "T3", 70.0, 150.0, 0.0),
            hit("R3", "T1", 60.0, 50.0, 0.0),
            hit("R3", "T4", 60.0, 40.0, 0.0),
        ];
        let reverse = vec![hit("T1", "R1", 90.0, 200.0, 0.0)];
        let bbh = find_bbh(&forward, &reverse);
        let counts = distinct_subjects_per_query(&forward);

        let r1: Vec<AlignmentHit> = forward.iter().filter(|h| h.query_id == "R1").cloned().collect();
        assert_eq!(
            classify("R1", &r1, &bbh, &counts),
            (OrthologClass::BbhOrtholog, 1.0)
        );
        let r2: Vec<AlignmentHit> = forward.iter().filter(|h| h.query_id == "R2").cloned().collect();
        assert_eq!(
            classify("R2", &r2, &bbh, &counts),
            (OrthologClass::BestHitOnly, 0.7)
        );
        let r3: Vec<AlignmentHit> = forward.iter().filter(|h| h.query_id == "R3").cloned().collect();
        assert_eq!(
            classify("R3", &r3, &bbh, &counts),
            (OrthologClass::MultiHit, 0.5)
        );

        let calls = classify_all(&forward, &bbh);
        let ids: Vec<&str> = calls.iter().map(|c| c.ref_gene.as_str()).collect();
        assert_eq!(ids, vec!["R1", "R2", "R3"]);
        assert_eq!(calls[0].best_target.as_deref(), Some("T1"));
        assert_eq!(calls[2].class, OrthologClass::MultiHit);
    }
}
