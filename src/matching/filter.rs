//! Quality gate over alignment hits.

use tracing::debug;

use crate::core::hit::AlignmentHit;
use crate::utils::validation::{validate_non_negative, validate_percent, ConfigError};

/// Default maximum e-value for a hit to be kept
pub const DEFAULT_MAX_EVALUE: f64 = 1e-5;

/// Keeps hits that clear identity, query-coverage and e-value thresholds
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HitFilter {
    min_identity: f64,
    min_coverage: f64,
    max_evalue: f64,
}

impl Default for HitFilter {
    /// No identity or coverage floor, e-value at most [`DEFAULT_MAX_EVALUE`]
    fn default() -> Self {
        Self {
            min_identity: 0.0,
            min_coverage: 0.0,
            max_evalue: DEFAULT_MAX_EVALUE,
        }
    }
}

impl HitFilter {
    /// Create a filter.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidThreshold` if any threshold is negative or
    /// not finite, or if identity/coverage exceed 100.
    pub fn new(min_identity: f64, min_coverage: f64, max_evalue: f64) -> Result<Self, ConfigError> {
        Ok(Self {
            min_identity: validate_percent("min_identity", min_identity)?,
            min_coverage: validate_percent("min_coverage", min_coverage)?,
            max_evalue: validate_non_negative("max_evalue", max_evalue)?,
        })
    }

    /// A filter that keeps every hit with a finite e-value
    pub fn permissive() -> Self {
        Self {
            min_identity: 0.0,
            min_coverage: 0.0,
            max_evalue: f64::MAX,
        }
    }

    pub fn min_identity(&self) -> f64 {
        self.min_identity
    }

    pub fn min_coverage(&self) -> f64 {
        self.min_coverage
    }

    pub fn max_evalue(&self) -> f64 {
        self.max_evalue
    }

    /// Does a single hit pass all three thresholds?
    pub fn passes(&self, hit: &AlignmentHit) -> bool {
        hit.percent_identity >= self.min_identity
            && hit.query_coverage() >= self.min_coverage
            && hit.e_value <= self.max_evalue
    }

    /// Keep the hits that pass, preserving input order
    pub fn filter(&self, hits: &[AlignmentHit]) -> Vec<AlignmentHit> {
        self.filter_with_stats(hits).0
    }

    /// Like [`HitFilter::filter`], also returning how many hits were rejected
    pub fn filter_with_stats(&self, hits: &[AlignmentHit]) -> (Vec<AlignmentHit>, usize) {
        let kept: Vec<AlignmentHit> = hits.iter().filter(|h| self.passes(h)).cloned().collect();
        let rejected = hits.len() - kept.len();
        debug!(
            kept = kept.len(),
            rejected,
            min_identity = self.min_identity,
            min_coverage = self.min_coverage,
            max_evalue = self.max_evalue,
            "Filtered alignment hits"
        );
        (kept, rejected)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hit(identity: f64, aln: u64, qlen: u64, evalue: f64) -> AlignmentHit {
        AlignmentHit::new("q", "s")
            .with_identity(identity)
            .with_alignment_length(aln)
            .with_query_span(1, aln, qlen)
            .with_subject_span(1, aln, qlen)
            .with_evalue(evalue)
    }

    #[test]
    fn test_filter_thresholds() {
        let filter = HitFilter::new(80.0, 70.0, 1e-10).unwrap();

        // Identity below threshold
        assert!(!filter.passes(&hit(75.0, 90, 100, 1e-50)));
        // Everything passes
        assert!(filter.passes(&hit(85.0, 90, 100, 1e-50)));
        // Coverage too low
        assert!(!filter.passes(&hit(85.0, 60, 100, 1e-50)));
        // E-value too high
        assert!(!filter.passes(&hit(85.0, 90, 100, 1e-5)));
        // Boundaries are inclusive
        assert!(filter.passes(&hit(80.0, 80, 100, 1e-10)));
    }

    #[test]
    fn test_zero_query_length() {
        let strict = HitFilter::new(0.0, 1.0, 1.0).unwrap();
        let lax = HitFilter::new(0.0, 0.0, 1.0).unwrap();
        let h = hit(99.0, 90, 0, 0.0);
        assert!(!strict.passes(&h));
        assert!(lax.passes(&h));
    }

    #[test]
    fn test_filter_preserves_order_and_counts() {
        let filter = HitFilter::new(50.0, 0.0, 1.0).unwrap();
        let hits = vec![
            hit(90.0, 10, 10, 0.0).with_bitscore(1.0),
            hit(10.0, 10, 10, 0.0),
            hit(60.0, 10, 10, 0.0).with_bitscore(2.0),
        ];
        let (kept, rejected) = filter.filter_with_stats(&hits);
        assert_eq!(rejected, 1);
        assert_eq!(kept.len(), 2);
        assert!((kept[0].bitscore - 1.0).abs() < 1e-9);
        assert!((kept[1].bitscore - 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_invalid_thresholds() {
        assert!(HitFilter::new(-1.0, 0.0, 1.0).is_err());
        assert!(HitFilter::new(0.0, -1.0, 1.0).is_err());
        assert!(HitFilter::new(0.0, 0.0, -1.0).is_err());
        assert!(HitFilter::new(101.0, 0.0, 1.0).is_err());
    }

    #[test]
    fn test_empty_input() {
        assert!(HitFilter::permissive().filter(&[]).is_empty());
    }
}
