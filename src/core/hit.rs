use serde::{Deserialize, Serialize};

/// Helper function to convert a length to f64 with explicit precision loss allowance
#[inline]
fn length_to_f64(length: u64) -> f64 {
    #[allow(clippy::cast_precision_loss)]
    {
        length as f64
    }
}

/// One side of an alignment: start, end and full sequence length
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Span {
    pub start: u64,
    pub end: u64,
    /// Length of the whole sequence (qlen / slen), 0 when unknown
    pub len: u64,
}

impl Span {
    pub fn new(start: u64, end: u64, len: u64) -> Self {
        Self { start, end, len }
    }
}

/// A single pairwise similarity hit between a query and a subject sequence
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlignmentHit {
    pub query_id: String,
    pub subject_id: String,

    /// Percent identity, 0-100
    pub percent_identity: f64,

    pub alignment_length: u64,

    pub query: Span,
    pub subject: Span,

    pub e_value: f64,
    pub bitscore: f64,
}

impl AlignmentHit {
    pub fn new(query_id: impl Into<String>, subject_id: impl Into<String>) -> Self {
        Self {
            query_id: query_id.into(),
            subject_id: subject_id.into(),
            percent_identity: 0.0,
            alignment_length: 0,
            query: Span::default(),
            subject: Span::default(),
            e_value: 0.0,
            bitscore: 0.0,
        }
    }

    #[must_use]
    pub fn with_identity(mut self, percent_identity: f64) -> Self {
        self.percent_identity = percent_identity;
        self
    }

    #[must_use]
    pub fn with_alignment_length(mut self, alignment_length: u64) -> Self {
        self.alignment_length = alignment_length;
        self
    }

    #[must_use]
    pub fn with_query_span(mut self, start: u64, end: u64, len: u64) -> Self {
        self.query = Span::new(start, end, len);
        self
    }

    #[must_use]
    pub fn with_subject_span(mut self, start: u64, end: u64, len: u64) -> Self {
        self.subject = Span::new(start, end, len);
        self
    }

    #[must_use]
    pub fn with_evalue(mut self, e_value: f64) -> Self {
        self.e_value = e_value;
        self
    }

    #[must_use]
    pub fn with_bitscore(mut self, bitscore: f64) -> Self {
        self.bitscore = bitscore;
        self
    }

    /// Percent of the query sequence covered by the alignment, in [0, 100].
    /// Zero when the query length is unknown.
    pub fn query_coverage(&self) -> f64 {
        coverage(self.alignment_length, self.query.len)
    }

    /// Percent of the subject sequence covered by the alignment, in [0, 100].
    /// Zero when the subject length is unknown.
    pub fn subject_coverage(&self) -> f64 {
        coverage(self.alignment_length, self.subject.len)
    }

    /// The same hit seen from the subject's side
    #[must_use]
    pub fn swapped(&self) -> Self {
        Self {
            query_id: self.subject_id.clone(),
            subject_id: self.query_id.clone(),
            percent_identity: self.percent_identity,
            alignment_length: self.alignment_length,
            query: self.subject,
            subject: self.query,
            e_value: self.e_value,
            bitscore: self.bitscore,
        }
    }
}

// Gapped alignments can be longer than the sequence; clamp so coverage stays a percentage.
fn coverage(alignment_length: u64, sequence_length: u64) -> f64 {
    if sequence_length == 0 {
        return 0.0;
    }
    (length_to_f64(alignment_length) / length_to_f64(sequence_length) * 100.0).min(100.0)
}
