use serde::{Deserialize, Serialize};

/// Which annotation a gene belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Annotation {
    /// The original annotation being compared against
    Reference,
    /// The updated annotation (query)
    Updated,
}

impl std::fmt::Display for Annotation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Reference => write!(f, "reference"),
            Self::Updated => write!(f, "updated"),
        }
    }
}

/// Type of structural change between the annotations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RelationshipKind {
    /// One reference gene corresponds to several updated genes
    Split,
    /// Several reference genes correspond to one updated gene
    Merge,
}

impl std::fmt::Display for RelationshipKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Split => write!(f, "split"),
            Self::Merge => write!(f, "merge"),
        }
    }
}

/// Orthology class assigned to a reference gene from its hits
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrthologClass {
    /// Hits several distinct subjects and its best hit is not reciprocal
    MultiHit,
    /// Hits exactly one subject, but not reciprocally
    BestHitOnly,
    /// Best forward hit is a reciprocal best hit
    BbhOrtholog,
}

impl OrthologClass {
    /// Fixed confidence attached to each class
    #[must_use]
    pub fn confidence(self) -> f64 {
        match self {
            Self::BbhOrtholog => 1.0,
            Self::BestHitOnly => 0.7,
            Self::MultiHit => 0.5,
        }
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::BbhOrtholog => "bbh_ortholog",
            Self::BestHitOnly => "best_hit_only",
            Self::MultiHit => "multi_hit",
        }
    }
}

impl std::fmt::Display for OrthologClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}
