//! Orthologs command - reciprocal best-hit pairs between two annotations.

use clap::Args;

use crate::cli::{HitArgs, OutputFormat};
use crate::core::relationship::ReciprocalPair;
use crate::matching::adjacency::translate_hits;
use crate::matching::reciprocal::{
    classify_all, find_bbh, high_confidence_orthologs, shared_targets, OrthologCall,
};

#[derive(Args)]
pub struct OrthologsArgs {
    #[command(flatten)]
    pub hits: HitArgs,

    /// Minimum average identity of a pair, percent (0-100)
    #[arg(long)]
    pub min_avg_identity: Option<f64>,

    /// Minimum average coverage of a pair, percent (0-100)
    #[arg(long)]
    pub min_avg_coverage: Option<f64>,

    /// Classify every reference gene (bbh_ortholog, best_hit_only, multi_hit)
    /// instead of listing pairs
    #[arg(long)]
    pub classify: bool,
}

/// Execute the orthologs command
///
/// # Errors
///
/// Returns an error if inputs cannot be parsed or a threshold is invalid.
#[allow(clippy::needless_pass_by_value)]
pub fn run(args: OrthologsArgs, format: OutputFormat, verbose: bool) -> anyhow::Result<()> {
    let mut config = args.hits.engine_config()?;
    if let Some(v) = args.min_avg_identity {
        config.min_avg_identity = v;
    }
    if let Some(v) = args.min_avg_coverage {
        config.min_avg_coverage = v;
    }
    config.validate()?;

    let loaded = args.hits.load(verbose)?;
    let filter = config.hit_filter()?;
    let (forward, forward_rejected) = filter.filter_with_stats(&loaded.forward);
    let (reverse, reverse_rejected) = filter.filter_with_stats(&loaded.reverse);
    if verbose {
        eprintln!(
            "Filtered hits: {} forward and {} reverse rejected",
            forward_rejected, reverse_rejected
        );
    }

    let forward = translate_hits(&forward, loaded.ref_map.as_ref(), loaded.query_map.as_ref());
    let reverse = translate_hits(&reverse, loaded.query_map.as_ref(), loaded.ref_map.as_ref());

    let bbh = find_bbh(&forward, &reverse);

    if args.classify {
        let calls = classify_all(&forward, &bbh);
        match format {
            OutputFormat::Text => print_text_calls(&calls),
            OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&calls)?),
            OutputFormat::Tsv => print_tsv_calls(&calls),
        }
        return Ok(());
    }

    let pairs = high_confidence_orthologs(&bbh, config.min_avg_identity, config.min_avg_coverage)?;
    let shared = shared_targets(&pairs);

    match format {
        OutputFormat::Text => {
            print_text_pairs(&pairs);
            if !shared.is_empty() {
                eprintln!(
                    "Note: {} updated genes are the ortholog of more than one reference gene",
                    shared.len()
                );
            }
        }
        OutputFormat::Json => {
            let output = serde_json::json!({
                "pairs": pairs,
                "shared_targets": shared,
                "forward_hits_rejected": forward_rejected,
                "reverse_hits_rejected": reverse_rejected,
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Tsv => print_tsv_pairs(&pairs),
    }

    Ok(())
}

fn print_text_pairs(pairs: &[ReciprocalPair]) {
    println!("Reciprocal Best Hits");
    println!("{}", "=".repeat(60));
    println!(
        "{:<24} {:<24} {:>8} {:>8}",
        "Reference", "Updated", "Ident%", "Cov%"
    );
    for p in pairs {
        println!(
            "{:<24} {:<24} {:>8.2} {:>8.2}",
            p.ref_gene, p.target_gene, p.avg_identity, p.avg_coverage
        );
    }
    println!("\n{} pairs", pairs.len());
}

fn print_tsv_pairs(pairs: &[ReciprocalPair]) {
    println!("ref_gene\ttarget_gene\tavg_identity\tavg_coverage\tforward_bitscore\treverse_bitscore");
    for p in pairs {
        println!(
            "{}\t{}\t{:.4}\t{:.4}\t{}\t{}",
            p.ref_gene,
            p.target_gene,
            p.avg_identity,
            p.avg_coverage,
            p.forward.bitscore,
            p.reverse.bitscore
        );
    }
}

fn print_text_calls(calls: &[OrthologCall]) {
    println!("Ortholog Classification");
    println!("{}", "=".repeat(60));
    for c in calls {
        println!(
            "{:<24} {:<14} {:.2}  {}",
            c.ref_gene,
            c.class.label(),
            c.confidence,
            c.best_target.as_deref().unwrap_or("-")
        );
    }
}

fn print_tsv_calls(calls: &[OrthologCall]) {
    println!("ref_gene\tclass\tconfidence\tbest_target");
    for c in calls {
        println!(
            "{}\t{}\t{:.2}\t{}",
            c.ref_gene,
            c.class,
            c.confidence,
            c.best_target.as_deref().unwrap_or("")
        );
    }
}
