//! Command-line interface for gene-remap.
//!
//! This module implements the CLI using clap. Available commands:
//!
//! - **orthologs**: Reciprocal best-hit ortholog pairs between two annotations
//! - **relationships**: Gene splits and merges between two annotations
//! - **synteny**: Flanking-gene conservation for each ortholog pair
//! - **cluster**: Resolve a representative/member pair table into clusters
//!
//! ## Usage
//!
//! ```text
//! # Ortholog pairs from an all-vs-all search in both directions
//! gene-remap orthologs ref_vs_new.tsv new_vs_ref.tsv
//!
//! # Splits and merges, JSON for scripting
//! gene-remap relationships ref_vs_new.tsv new_vs_ref.tsv \
//!     --ref-genes ref.bed --updated-genes new.bed --format json
//!
//! # Cluster sizes from an mmseqs createtsv table
//! gene-remap cluster clusters.tsv --stats
//! ```

use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};

use crate::core::hit::AlignmentHit;
use crate::matching::adjacency::IdMap;
use crate::matching::engine::EngineConfig;
use crate::parsing;

pub mod cluster;
pub mod orthologs;
pub mod relationships;
pub mod synteny;

#[derive(Parser)]
#[command(name = "gene-remap")]
#[command(author = "Fulcrum Genomics")]
#[command(version)]
#[command(about = "Detect gene splits, merges and orthologs between two annotations")]
#[command(
    long_about = "gene-remap compares two gene annotations of the same genome (or of two close genomes) using all-vs-all similarity searches run in both directions.\n\nIt reports:\n- Reciprocal best-hit ortholog pairs\n- Genes split into several updated genes, and genes merged into one\n- Flanking-gene conservation for each ortholog pair\n- Clusters from representative/member tables"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output format
    #[arg(short, long, global = true, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Find reciprocal best-hit ortholog pairs
    Orthologs(orthologs::OrthologsArgs),

    /// Detect gene splits and merges
    Relationships(relationships::RelationshipsArgs),

    /// Score flanking-gene conservation of ortholog pairs
    Synteny(synteny::SyntenyArgs),

    /// Cluster sequences from a representative/member table
    Cluster(cluster::ClusterArgs),
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
    Tsv,
}

/// Hit inputs and hit-level thresholds shared by the comparison commands
#[derive(Args)]
pub struct HitArgs {
    /// Hits of reference sequences against the updated annotation
    /// (BLAST tabular, 12 or 14 columns, optionally gzipped)
    #[arg(required = true)]
    pub forward: PathBuf,

    /// Hits of updated sequences against the reference annotation
    #[arg(required = true)]
    pub reverse: PathBuf,

    /// Transcript -> gene map for reference sequence ids
    #[arg(long)]
    pub ref_id_map: Option<PathBuf>,

    /// Transcript -> gene map for updated (query) sequence ids
    #[arg(long)]
    pub query_id_map: Option<PathBuf>,

    /// Minimum percent identity (0-100)
    #[arg(long)]
    pub min_identity: Option<f64>,

    /// Minimum query coverage, percent (0-100)
    #[arg(long)]
    pub min_coverage: Option<f64>,

    /// Maximum e-value
    #[arg(long)]
    pub max_evalue: Option<f64>,

    /// JSON engine configuration; flags given on the command line take precedence
    #[arg(long)]
    pub config: Option<PathBuf>,
}

/// Parsed hit files and id maps
pub struct LoadedHits {
    pub forward: Vec<AlignmentHit>,
    pub reverse: Vec<AlignmentHit>,
    pub ref_map: Option<IdMap>,
    pub query_map: Option<IdMap>,
}

impl HitArgs {
    /// Load the configuration file (or defaults) and apply hit-level flags
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration file cannot be read or parsed.
    pub fn engine_config(&self) -> anyhow::Result<EngineConfig> {
        let mut config = load_config(self.config.as_deref())?;
        if let Some(v) = self.min_identity {
            config.hits.min_identity = v;
        }
        if let Some(v) = self.min_coverage {
            config.hits.min_coverage = v;
        }
        if let Some(v) = self.max_evalue {
            config.hits.max_evalue = v;
        }
        Ok(config)
    }

    /// Parse both hit files and any id maps
    ///
    /// # Errors
    ///
    /// Returns an error if any input is missing or malformed.
    pub fn load(&self, verbose: bool) -> anyhow::Result<LoadedHits> {
        let forward = read_input(&self.forward, parsing::blast::parse_blast_file)?;
        let reverse = read_input(&self.reverse, parsing::blast::parse_blast_file)?;
        let ref_map = self
            .ref_id_map
            .as_deref()
            .map(|p| read_input(p, parsing::idmap::parse_idmap_file))
            .transpose()?;
        let query_map = self
            .query_id_map
            .as_deref()
            .map(|p| read_input(p, parsing::idmap::parse_idmap_file))
            .transpose()?;

        if verbose {
            eprintln!(
                "Hits: {} forward, {} reverse",
                forward.len(),
                reverse.len()
            );
        }

        Ok(LoadedHits {
            forward,
            reverse,
            ref_map,
            query_map,
        })
    }
}

/// Read an `EngineConfig` from JSON, or the defaults when no path is given
///
/// # Errors
///
/// Returns an error if the file cannot be read or is not a valid configuration.
pub fn load_config(path: Option<&Path>) -> anyhow::Result<EngineConfig> {
    let Some(path) = path else {
        return Ok(EngineConfig::default());
    };
    if !path.exists() {
        anyhow::bail!("Config file not found: {}", path.display());
    }
    let text = std::fs::read_to_string(path)?;
    let config: EngineConfig = serde_json::from_str(&text)
        .map_err(|e| anyhow::anyhow!("Invalid config {}: {e}", path.display()))?;
    Ok(config)
}

/// Run a parser, naming the file in any error
fn read_input<T>(
    path: &Path,
    parse: impl FnOnce(&Path) -> Result<T, parsing::ParseError>,
) -> anyhow::Result<T> {
    if !path.exists() {
        anyhow::bail!("Input file not found: {}", path.display());
    }
    parse(path).map_err(|e| anyhow::anyhow!("{}: {e}", path.display()))
}

/// Parse a gene coordinate file
///
/// # Errors
///
/// Returns an error if the file is missing or malformed.
pub fn read_genes(path: &Path) -> anyhow::Result<crate::core::gene::GeneTable> {
    read_input(path, parsing::genes::parse_gene_file)
}
