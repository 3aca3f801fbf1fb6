// =============================================================================
// Lazy sequence generator demo
// =============================================================================
//
// Drains a counting producer that fails once its next value would overflow,
// printing each value as it is pulled.
//
// Run with: cargo run --bin complete_03_coroutine_generator -- --upper-bound 15

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use colored::Colorize;
use itertools::Itertools;
use tracing_subscriber::EnvFilter;

use lazyseq::config::DemoConfig;
use lazyseq::demo::{counting_with_limit, drain};

#[derive(Parser, Debug)]
#[command(name = "complete_03_coroutine_generator", version, about)]
struct Args {
    /// TOML file with `upper_bound` / `overflow_limit`
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Last value the producer tries to yield
    #[arg(long)]
    upper_bound: Option<u64>,

    /// Largest value allowed before the producer fails
    #[arg(long)]
    overflow_limit: Option<u64>,
}

fn resolve_config(args: &Args) -> anyhow::Result<DemoConfig> {
    let mut config = match &args.config {
        Some(path) => DemoConfig::load(path)
            .with_context(|| format!("loading demo config from {}", path.display()))?,
        None => DemoConfig::default(),
    };
    if let Some(upper_bound) = args.upper_bound {
        config.upper_bound = upper_bound;
    }
    if let Some(overflow_limit) = args.overflow_limit {
        config.overflow_limit = overflow_limit;
    }
    Ok(config)
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("lazyseq=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let config = resolve_config(&args)?;

    println!(
        "{}",
        format!("Lazy sequence generator example version {}", lazyseq::VERSION).bold()
    );
    tracing::info!(
        upper_bound = config.upper_bound,
        overflow_limit = config.overflow_limit,
        "draining counting sequence"
    );

    let mut seq = counting_with_limit(config.upper_bound, config.overflow_limit);
    let report = drain(&mut seq, |i, value| println!("foo({})={}", i, value));

    match report.failure {
        None => println!(
            "{} [{}]",
            "✓ Sequence drained:".green(),
            report.values.iter().join(", ")
        ),
        Some(e) => eprintln!("{} {}", "Exception:".red().bold(), e),
    }

    Ok(())
}
