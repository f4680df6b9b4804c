use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GeneError {
    #[error("Invalid interval for gene {id}: start {start} > end {end}")]
    InvalidInterval { id: String, start: u64, end: u64 },

    #[error("Duplicate gene id: {0}")]
    DuplicateGene(String),
}

/// Strand of a gene feature
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Strand {
    #[serde(rename = "+")]
    Forward,
    #[serde(rename = "-")]
    Reverse,
    #[serde(rename = ".")]
    #[default]
    Unknown,
}

impl Strand {
    /// Parse a strand column value; anything other than `+`/`-` is unknown
    pub fn parse(s: &str) -> Self {
        match s.trim() {
            "+" => Strand::Forward,
            "-" => Strand::Reverse,
            _ => Strand::Unknown,
        }
    }
}

impl std::fmt::Display for Strand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Forward => write!(f, "+"),
            Self::Reverse => write!(f, "-"),
            Self::Unknown => write!(f, "."),
        }
    }
}

/// Anything placed on a chromosome by a 1-based inclusive interval.
///
/// Synteny and adjacency checks only need these three accessors, so they are
/// written against this trait rather than against [`Gene`] directly.
pub trait Located {
    fn id(&self) -> &str;
    fn chromosome(&self) -> &str;
    fn start(&self) -> u64;
    fn end(&self) -> u64;
}

/// A gene from one of the two annotations
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Gene {
    pub id: String,

    pub chromosome: String,

    /// 1-based inclusive start
    pub start: u64,

    /// 1-based inclusive end
    pub end: u64,

    #[serde(default)]
    pub strand: Strand,

    /// Sequence length (e.g. protein or CDS length), when known
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sequence_length: Option<u64>,
}

impl Gene {
    /// Create a gene, rejecting intervals with `start > end`
    ///
    /// # Errors
    ///
    /// Returns `GeneError::InvalidInterval` if `start > end`.
    pub fn new(
        id: impl Into<String>,
        chromosome: impl Into<String>,
        start: u64,
        end: u64,
        strand: Strand,
    ) -> Result<Self, GeneError> {
        let id = id.into();
        if start > end {
            return Err(GeneError::InvalidInterval { id, start, end });
        }
        Ok(Self {
            id,
            chromosome: chromosome.into(),
            start,
            end,
            strand,
            sequence_length: None,
        })
    }

    #[must_use]
    pub fn with_sequence_length(mut self, length: u64) -> Self {
        self.sequence_length = Some(length);
        self
    }

    /// Interval length, `end - start + 1`
    pub fn length(&self) -> u64 {
        self.end - self.start + 1
    }

    /// Length used for coverage ratios: the sequence length when known,
    /// otherwise the genomic interval length
    pub fn effective_length(&self) -> u64 {
        self.sequence_length.unwrap_or_else(|| self.length())
    }

    pub fn midpoint(&self) -> f64 {
        #[allow(clippy::cast_precision_loss)]
        {
            (self.start as f64 + self.end as f64) / 2.0
        }
    }
}

impl Located for Gene {
    fn id(&self) -> &str {
        &self.id
    }

    fn chromosome(&self) -> &str {
        &self.chromosome
    }

    fn start(&self) -> u64 {
        self.start
    }

    fn end(&self) -> u64 {
        self.end
    }
}

/// Read-only lookup of genes by id for one annotation
#[derive(Debug, Clone, Default)]
pub struct GeneTable {
    genes: Vec<Gene>,

    /// Index: gene id -> index in genes vec
    id_to_index: HashMap<String, usize>,
}

impl GeneTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a table from a list of genes
    ///
    /// # Errors
    ///
    /// Returns `GeneError::DuplicateGene` if two genes share an id.
    pub fn from_genes(genes: impl IntoIterator<Item = Gene>) -> Result<Self, GeneError> {
        let mut table = Self::new();
        for gene in genes {
            table.insert(gene)?;
        }
        Ok(table)
    }

    /// Add a gene to the table
    ///
    /// # Errors
    ///
    /// Returns `GeneError::DuplicateGene` if the id is already present.
    pub fn insert(&mut self, gene: Gene) -> Result<(), GeneError> {
        if self.id_to_index.contains_key(&gene.id) {
            return Err(GeneError::DuplicateGene(gene.id));
        }
        self.id_to_index.insert(gene.id.clone(), self.genes.len());
        self.genes.push(gene);
        Ok(())
    }

    pub fn get(&self, id: &str) -> Option<&Gene> {
        self.id_to_index.get(id).map(|&idx| &self.genes[idx])
    }

    pub fn contains(&self, id: &str) -> bool {
        self.id_to_index.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.genes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.genes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Gene> {
        self.genes.iter()
    }

    pub fn as_slice(&self) -> &[Gene] {
        &self.genes
    }

    /// Genes on one chromosome, sorted by start (ties by id)
    pub fn on_chromosome(&self, chromosome: &str) -> Vec<&Gene> {
        let mut genes: Vec<&Gene> = self
            .genes
            .iter()
            .filter(|g| g.chromosome == chromosome)
            .collect();
        genes.sort_by(|a, b| a.start.cmp(&b.start).then_with(|| a.id.cmp(&b.id)));
        genes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gene_length_and_midpoint() {
        let gene = Gene::new("G1", "chr1", 100, 2000, Strand::Forward).unwrap();
        assert_eq!(gene.length(), 1901);
        assert!((gene.midpoint() - 1050.0).abs() < 1e-9);
        assert_eq!(gene.effective_length(), 1901);

        let gene = gene.with_sequence_length(600);
        assert_eq!(gene.effective_length(), 600);
        assert_eq!(gene.length(), 1901);
    }

    #[test]
    fn test_single_base_gene() {
        let gene = Gene::new("G1", "chr1", 5, 5, Strand::Unknown).unwrap();
        assert_eq!(gene.length(), 1);
    }

    #[test]
    fn test_invalid_interval_rejected() {
        let err = Gene::new("G1", "chr1", 10, 5, Strand::Forward).unwrap_err();
        assert!(matches!(err, GeneError::InvalidInterval { start: 10, end: 5, .. }));
    }

    #[test]
    fn test_strand_parse() {
        assert_eq!(Strand::parse("+"), Strand::Forward);
        assert_eq!(Strand::parse("-"), Strand::Reverse);
        assert_eq!(Strand::parse("."), Strand::Unknown);
        assert_eq!(Strand::parse("?"), Strand::Unknown);
        assert_eq!(Strand::Reverse.to_string(), "-");
    }

    #[test]
    fn test_gene_table_lookup_and_duplicates() {
        let mut table = GeneTable::from_genes(vec![
            Gene::new("G2", "chr1", 500, 900, Strand::Forward).unwrap(),
            Gene::new("G1", "chr1", 100, 200, Strand::Forward).unwrap(),
            Gene::new("G3", "chr2", 1, 50, Strand::Reverse).unwrap(),
        ])
        .unwrap();

        assert_eq!(table.len(), 3);
        assert!(table.contains("G1"));
        assert_eq!(table.get("G3").unwrap().chromosome, "chr2");
        assert!(table.get("missing").is_none());

        let chr1: Vec<&str> = table
            .on_chromosome("chr1")
            .iter()
            .map(|g| g.id.as_str())
            .collect();
        assert_eq!(chr1, vec!["G1", "G2"]);

        let dup = Gene::new("G1", "chr9", 1, 2, Strand::Forward).unwrap();
        assert_eq!(
            table.insert(dup).unwrap_err(),
            GeneError::DuplicateGene("G1".to_string())
        );
    }
}
