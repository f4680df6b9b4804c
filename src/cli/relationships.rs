//! Relationships command - gene splits and merges between two annotations.

use std::path::PathBuf;

use clap::Args;

use crate::cli::{read_genes, HitArgs, OutputFormat};
use crate::core::relationship::Relationship;
use crate::matching::engine::{EngineReport, GeneStructureEngine, IdMaps, ScoringWeights};

#[derive(Args)]
pub struct RelationshipsArgs {
    #[command(flatten)]
    pub hits: HitArgs,

    /// Reference gene coordinates (TSV or BED)
    #[arg(long, required = true)]
    pub ref_genes: PathBuf,

    /// Updated gene coordinates (TSV or BED)
    #[arg(long, required = true)]
    pub updated_genes: PathBuf,

    /// Minimum confidence to report a split or merge (0-1)
    #[arg(long)]
    pub min_confidence: Option<f64>,

    /// Only report splits and merges whose partners are adjacent
    #[arg(long)]
    pub require_adjacency: bool,

    /// Maximum gap in bp between adjacent partner genes
    #[arg(long)]
    pub max_gap: Option<u64>,

    // === Scoring weight options ===
    /// Weight for all partner links being reciprocal (0-100, default 40)
    #[arg(long, value_parser = clap::value_parser!(u32).range(0..=100))]
    pub weight_reciprocal: Option<u32>,

    /// Weight for partners being adjacent (0-100, default 30)
    #[arg(long, value_parser = clap::value_parser!(u32).range(0..=100))]
    pub weight_adjacency: Option<u32>,

    /// Weight for length coverage (0-100, default 30)
    /// The three weights must add up to 100
    #[arg(long, value_parser = clap::value_parser!(u32).range(0..=100))]
    pub weight_coverage: Option<u32>,
}

/// Execute the relationships command
///
/// # Errors
///
/// Returns an error if inputs cannot be parsed or the configuration is invalid.
#[allow(clippy::needless_pass_by_value)]
pub fn run(args: RelationshipsArgs, format: OutputFormat, verbose: bool) -> anyhow::Result<()> {
    let mut config = args.hits.engine_config()?;
    if let Some(v) = args.min_confidence {
        config.min_confidence = v;
    }
    if args.require_adjacency {
        config.require_adjacency = true;
    }
    if let Some(v) = args.max_gap {
        config.max_gap = v;
    }
    let weights = config.scoring_weights;
    let percent = |w: Option<u32>, default: f64| w.map_or(default, |v| f64::from(v) / 100.0);
    config.scoring_weights = ScoringWeights::new(
        percent(args.weight_reciprocal, weights.reciprocal),
        percent(args.weight_adjacency, weights.adjacency),
        percent(args.weight_coverage, weights.coverage),
    )?;

    if verbose {
        let w = config.scoring_weights;
        eprintln!(
            "Scoring weights: {:.0}% reciprocal, {:.0}% adjacency, {:.0}% coverage",
            w.reciprocal * 100.0,
            w.adjacency * 100.0,
            w.coverage * 100.0,
        );
    }

    let ref_genes = read_genes(&args.ref_genes)?;
    let updated_genes = read_genes(&args.updated_genes)?;
    if verbose {
        eprintln!(
            "Genes: {} reference, {} updated",
            ref_genes.len(),
            updated_genes.len()
        );
    }

    let loaded = args.hits.load(verbose)?;
    let engine = GeneStructureEngine::with_config(&ref_genes, &updated_genes, config)?;
    let report = engine.run(
        &loaded.forward,
        &loaded.reverse,
        IdMaps {
            reference: loaded.ref_map.as_ref(),
            updated: loaded.query_map.as_ref(),
        },
    )?;

    match format {
        OutputFormat::Text => print_text_report(&report),
        OutputFormat::Json => print_json_report(&report)?,
        OutputFormat::Tsv => print_tsv_report(&report.classification.relationships),
    }

    if !matches!(format, OutputFormat::Json) {
        eprintln!(
            "Skipped candidates: {} missing gene, {} non-reciprocal",
            report.classification.skipped_candidates,
            report.classification.non_reciprocal_candidates
        );
    }

    Ok(())
}

fn print_text_report(report: &EngineReport) {
    let classification = &report.classification;

    println!("Gene Structure Changes");
    println!("{}", "=".repeat(60));
    println!("\nOrtholog pairs: {}", report.bbh.len());
    println!("Splits: {}", classification.splits().count());
    println!("Merges: {}", classification.merges().count());

    if classification.relationships.is_empty() {
        println!("\nNo splits or merges found.");
        return;
    }

    println!();
    for rel in &classification.relationships {
        let side = if rel.evidence.adjacent {
            "adjacent"
        } else {
            "dispersed"
        };
        println!(
            "  {:<6} {} -> {}  confidence {:.2}  coverage {:.2}  {}",
            rel.kind.to_string(),
            rel.anchor_id,
            rel.partner_ids.join(", "),
            rel.confidence,
            rel.evidence.coverage,
            side
        );
    }
}

fn print_json_report(report: &EngineReport) -> anyhow::Result<()> {
    let classification = &report.classification;
    let output = serde_json::json!({
        "relationships": classification.relationships,
        "skipped_candidates": classification.skipped_candidates,
        "non_reciprocal_candidates": classification.non_reciprocal_candidates,
        "ortholog_pairs": report.bbh.len(),
        "hits": {
            "forward_kept": report.forward_hits_kept,
            "forward_rejected": report.forward_hits_rejected,
            "reverse_kept": report.reverse_hits_kept,
            "reverse_rejected": report.reverse_hits_rejected,
        },
    });
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

fn print_tsv_report(relationships: &[Relationship]) {
    println!("{}", Relationship::TSV_HEADER);
    for rel in relationships {
        println!("{}", rel.tsv_row());
    }
}
