use serde::{Deserialize, Serialize};

use crate::matching::engine::ScoringWeights;

/// Helper function to convert a length to f64 with explicit precision loss allowance
#[inline]
fn length_to_f64(length: u64) -> f64 {
    #[allow(clippy::cast_precision_loss)]
    {
        length as f64
    }
}

/// Scores behind a split or merge call
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RelationshipScore {
    /// Every partner is a mutual hit of the anchor
    pub reciprocal: bool,

    /// Partners are on one chromosome within the maximum gap
    pub adjacent: bool,

    /// Length coverage ratio in [0, 1]
    pub coverage: f64,

    /// Weighted composite in [0, 1]
    pub confidence: f64,
}

impl RelationshipScore {
    /// Combine the three evidence components with the given weights
    #[must_use]
    pub fn calculate_with_weights(
        reciprocal: bool,
        adjacent: bool,
        coverage: f64,
        weights: &ScoringWeights,
    ) -> Self {
        let coverage = coverage.clamp(0.0, 1.0);
        let indicator = |b: bool| if b { 1.0 } else { 0.0 };

        let confidence = (weights.reciprocal * indicator(reciprocal)
            + weights.adjacency * indicator(adjacent)
            + weights.coverage * coverage)
            .clamp(0.0, 1.0);

        Self {
            reciprocal,
            adjacent,
            coverage,
            confidence,
        }
    }
}

/// Coverage for a split: summed partner length over the anchor length, capped at 1.0.
///
/// Returns 0.0 for a zero-length anchor.
pub fn split_coverage(anchor_length: u64, partner_lengths: &[u64]) -> f64 {
    if anchor_length == 0 {
        return 0.0;
    }
    let total: u64 = partner_lengths.iter().sum();
    (length_to_f64(total) / length_to_f64(anchor_length)).min(1.0)
}

/// Coverage for a merge: anchor length over the summed partner length, capped at 1.0.
///
/// Returns 0.0 when the partners have no length.
pub fn merge_coverage(anchor_length: u64, partner_lengths: &[u64]) -> f64 {
    let total: u64 = partner_lengths.iter().sum();
    if total == 0 {
        return 0.0;
    }
    (length_to_f64(anchor_length) / length_to_f64(total)).min(1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_confidence() {
        let score =
            RelationshipScore::calculate_with_weights(true, true, 1.0, &ScoringWeights::default());
        assert!((score.confidence - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_partial_confidence() {
        let weights = ScoringWeights::default();
        let score = RelationshipScore::calculate_with_weights(true, false, 0.5, &weights);
        // 0.4 + 0.0 + 0.3 * 0.5
        assert!((score.confidence - 0.55).abs() < 1e-9);

        let score = RelationshipScore::calculate_with_weights(false, false, 0.0, &weights);
        assert!(score.confidence.abs() < 1e-9);
    }

    #[test]
    fn test_confidence_bounded() {
        let weights = ScoringWeights::default();
        for reciprocal in [true, false] {
            for adjacent in [true, false] {
                for coverage in [-1.0, 0.0, 0.3, 1.0, 7.5] {
                    let s = RelationshipScore::calculate_with_weights(
                        reciprocal, adjacent, coverage, &weights,
                    );
                    assert!((0.0..=1.0).contains(&s.confidence));
                    assert!((0.0..=1.0).contains(&s.coverage));
                }
            }
        }
    }

    #[test]
    fn test_custom_weights() {
        let coverage_heavy = ScoringWeights::new(0.1, 0.1, 0.8).unwrap();
        let adjacency_heavy = ScoringWeights::new(0.1, 0.8, 0.1).unwrap();

        // Adjacent but poorly covered
        let a = RelationshipScore::calculate_with_weights(true, true, 0.2, &coverage_heavy);
        let b = RelationshipScore::calculate_with_weights(true, true, 0.2, &adjacency_heavy);
        assert!(b.confidence > a.confidence);
    }

    #[test]
    fn test_split_coverage() {
        assert!((split_coverage(3000, &[1000, 1000]) - 2.0 / 3.0).abs() < 1e-9);
        assert!((split_coverage(1000, &[800, 800]) - 1.0).abs() < 1e-9);
        assert!(split_coverage(0, &[100]).abs() < 1e-9);
    }

    #[test]
    fn test_merge_coverage() {
        assert!((merge_coverage(3901, &[1901, 1901]) - 1.0).abs() < 1e-9);
        assert!((merge_coverage(1900, &[1900, 1900]) - 0.5).abs() < 1e-9);
        assert!(merge_coverage(100, &[]).abs() < 1e-9);
    }
}
