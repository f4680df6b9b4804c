//! Synteny command - flanking-gene conservation of reciprocal best-hit pairs.

use std::path::PathBuf;

use clap::Args;

use crate::cli::{read_genes, HitArgs, OutputFormat};
use crate::matching::adjacency::translate_hits;
use crate::matching::reciprocal::find_bbh;
use crate::matching::synteny::{PairSynteny, SyntenyScorer};

#[derive(Args)]
pub struct SyntenyArgs {
    #[command(flatten)]
    pub hits: HitArgs,

    /// Reference gene coordinates (TSV or BED)
    #[arg(long, required = true)]
    pub ref_genes: PathBuf,

    /// Updated gene coordinates (TSV or BED)
    #[arg(long, required = true)]
    pub updated_genes: PathBuf,

    /// Number of flanking genes compared on each side
    #[arg(long)]
    pub window: Option<usize>,
}

/// Execute the synteny command
///
/// # Errors
///
/// Returns an error if inputs cannot be parsed or a threshold is invalid.
#[allow(clippy::needless_pass_by_value)]
pub fn run(args: SyntenyArgs, format: OutputFormat, verbose: bool) -> anyhow::Result<()> {
    let mut config = args.hits.engine_config()?;
    if let Some(window) = args.window {
        config.flank_window = window;
    }
    config.validate()?;

    let ref_genes = read_genes(&args.ref_genes)?;
    let updated_genes = read_genes(&args.updated_genes)?;
    let loaded = args.hits.load(verbose)?;

    let filter = config.hit_filter()?;
    let forward = translate_hits(
        &filter.filter(&loaded.forward),
        loaded.ref_map.as_ref(),
        loaded.query_map.as_ref(),
    );
    let reverse = translate_hits(
        &filter.filter(&loaded.reverse),
        loaded.query_map.as_ref(),
        loaded.ref_map.as_ref(),
    );
    let bbh = find_bbh(&forward, &reverse);

    let scorer = SyntenyScorer::new(config.max_gap, config.flank_window);
    let (scores, skipped) = scorer.score_pairs(&bbh, &ref_genes, &updated_genes);

    match format {
        OutputFormat::Text => print_text_scores(&scores, config.flank_window),
        OutputFormat::Json => {
            let output = serde_json::json!({
                "window": config.flank_window,
                "pairs": scores,
                "skipped_pairs": skipped,
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Tsv => print_tsv_scores(&scores),
    }

    if skipped > 0 && !matches!(format, OutputFormat::Json) {
        eprintln!("Skipped {skipped} pairs with a gene missing from the gene tables");
    }

    Ok(())
}

fn print_text_scores(scores: &[PairSynteny], window: usize) {
    println!("Synteny (window {window})");
    println!("{}", "=".repeat(60));
    for s in scores {
        println!(
            "{:<24} {:<24} {:>6.2}  ({} up, {} down of {})",
            s.ref_gene,
            s.target_gene,
            s.score,
            s.upstream_matches,
            s.downstream_matches,
            s.compared
        );
    }
    if !scores.is_empty() {
        #[allow(clippy::cast_precision_loss)]
        let mean = scores.iter().map(|s| s.score).sum::<f64>() / scores.len() as f64;
        println!("\nMean synteny: {mean:.3} over {} pairs", scores.len());
    }
}

fn print_tsv_scores(scores: &[PairSynteny]) {
    println!("ref_gene\ttarget_gene\tscore\tupstream_matches\tdownstream_matches\tcompared");
    for s in scores {
        println!(
            "{}\t{}\t{:.4}\t{}\t{}\t{}",
            s.ref_gene,
            s.target_gene,
            s.score,
            s.upstream_matches,
            s.downstream_matches,
            s.compared
        );
    }
}
