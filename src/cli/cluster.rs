//! Cluster command - resolve representative/member pairs into clusters.

use std::path::PathBuf;

use clap::Args;

use crate::cli::OutputFormat;
use crate::clustering::{parse_clusters, ClusterSet};
use crate::core::cluster::ClusterAssignment;
use crate::parsing::clusters::parse_cluster_pairs_file;

#[derive(Args)]
pub struct ClusterArgs {
    /// Two-column representative/member table (e.g. mmseqs createtsv output)
    #[arg(required = true)]
    pub input: PathBuf,

    /// Print per-cluster sizes and members instead of one row per sequence
    #[arg(long)]
    pub stats: bool,
}

/// Execute the cluster command
///
/// # Errors
///
/// Returns an error if the input cannot be parsed.
#[allow(clippy::needless_pass_by_value)]
pub fn run(args: ClusterArgs, format: OutputFormat, verbose: bool) -> anyhow::Result<()> {
    if !args.input.exists() {
        anyhow::bail!("Input file not found: {}", args.input.display());
    }
    let pairs = parse_cluster_pairs_file(&args.input)
        .map_err(|e| anyhow::anyhow!("{}: {e}", args.input.display()))?;
    if verbose {
        eprintln!("Read {} pairs from {}", pairs.len(), args.input.display());
    }

    let clusters = parse_clusters(pairs);

    if args.stats {
        print_stats(&clusters, format)?;
    } else {
        print_assignments(&clusters, format)?;
    }
    Ok(())
}

fn print_assignments(clusters: &ClusterSet, format: OutputFormat) -> anyhow::Result<()> {
    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(clusters.assignments())?);
        }
        OutputFormat::Tsv => {
            println!("{}", ClusterAssignment::TSV_HEADER);
            for a in clusters.assignments() {
                println!("{}", a.tsv_row());
            }
        }
        OutputFormat::Text => {
            println!(
                "{} sequences in {} clusters ({} singletons)",
                clusters.sequence_count(),
                clusters.len(),
                clusters.singleton_count()
            );
            println!("{}", "=".repeat(60));
            for a in clusters.assignments() {
                println!(
                    "{:>6}  {:<30} {:<30} {:>6}",
                    a.cluster_number, a.sequence_id, a.representative, a.cluster_size
                );
            }
        }
    }
    Ok(())
}

fn print_stats(clusters: &ClusterSet, format: OutputFormat) -> anyhow::Result<()> {
    let stats = clusters.stats();
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&stats)?),
        OutputFormat::Tsv => {
            println!("cluster\trepresentative\tsize\tmembers");
            for s in &stats {
                println!(
                    "{}\t{}\t{}\t{}",
                    s.cluster_number,
                    s.representative,
                    s.size,
                    s.members.join(",")
                );
            }
        }
        OutputFormat::Text => {
            println!("Cluster Summary");
            println!("{}", "=".repeat(60));
            println!("Clusters: {}", clusters.len());
            println!("Sequences: {}", clusters.sequence_count());
            println!("Singletons: {}", clusters.singleton_count());
            if let Some(largest) = stats.first() {
                println!(
                    "Largest: cluster {} ({} members, representative {})",
                    largest.cluster_number, largest.size, largest.representative
                );
            }
            println!();
            for s in &stats {
                println!(
                    "{:>6}  {:<30} {:>6}",
                    s.cluster_number, s.representative, s.size
                );
            }
        }
    }
    Ok(())
}
