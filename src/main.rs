use clap::Parser;
use tracing_subscriber::EnvFilter;

mod cli;
mod clustering;
mod core;
mod matching;
mod parsing;
mod utils;

fn main() -> anyhow::Result<()> {
    let cli = cli::Cli::parse();

    // Initialize logging based on verbosity flag
    let filter = if cli.verbose {
        EnvFilter::new("gene_remap=debug,info")
    } else {
        EnvFilter::new("gene_remap=warn")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .init();

    match cli.command {
        cli::Commands::Orthologs(args) => {
            cli::orthologs::run(args, cli.format, cli.verbose)?;
        }
        cli::Commands::Relationships(args) => {
            cli::relationships::run(args, cli.format, cli.verbose)?;
        }
        cli::Commands::Synteny(args) => {
            cli::synteny::run(args, cli.format, cli.verbose)?;
        }
        cli::Commands::Cluster(args) => {
            cli::cluster::run(args, cli.format, cli.verbose)?;
        }
    }

    Ok(())
}
