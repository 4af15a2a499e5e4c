use std::fs::File;
use std::io;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use spend_aggregator::category::{CategoryResolver, CategoryTable};
use spend_aggregator::config::{AggregatorConfig, Strategy, DEFAULT_PARTITIONS};
use spend_aggregator::{summarize_ledger, summarize_months};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Sum a transaction ledger per spending category or per month.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Input ledger CSV file
    input: PathBuf,

    /// Owner whose spending is summed per category (not used with --monthly)
    #[arg(long, required_unless_present = "monthly")]
    owner: Option<i64>,

    /// Aggregation strategy: sequential, reduce-merge, fan-in or direct-shared
    #[arg(long, default_value_t = Strategy::default())]
    strategy: Strategy,

    /// Number of ledger partitions processed in parallel
    #[arg(long, default_value_t = DEFAULT_PARTITIONS)]
    partitions: usize,

    /// CSV file with `code,label` rows layered over the built-in categories
    #[arg(long)]
    categories: Option<PathBuf>,

    /// Sum all owners per calendar month instead of per category
    #[arg(long)]
    monthly: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();

    let file = File::open(&cli.input)
        .with_context(|| format!("Failed to open input file '{}'", cli.input.display()))?;

    if cli.monthly {
        summarize_months(file, io::stdout())
            .await
            .context("Failed to aggregate ledger by month")?;
        return Ok(());
    }

    // Present whenever --monthly is absent (`required_unless_present`)
    let owner_id = cli
        .owner
        .context("--owner is required unless --monthly is set")?;

    let table = match &cli.categories {
        Some(path) => CategoryTable::from_csv_path(path)
            .with_context(|| format!("Failed to load categories from '{}'", path.display()))?,
        None => CategoryTable::default(),
    };
    let resolver = Arc::new(CategoryResolver::new(table));
    let config = AggregatorConfig::new(cli.strategy, cli.partitions);

    summarize_ledger(file, io::stdout(), owner_id, &config, resolver)
        .await
        .context("Failed to aggregate ledger and write output")?;

    Ok(())
}
