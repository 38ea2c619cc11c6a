mod config;
mod invoker;
mod logging;
mod pipeline;
mod prompt;
mod report;

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use tracing::info;

#[derive(Parser)]
#[command(name = "upgrade-triage")]
#[command(about = "Classify the impact of library upgrades on flagged code references")]
struct Cli {
    /// Input CSV of flagged references with old/target coordinates
    input: PathBuf,

    /// Directory that input file paths are resolved against
    #[arg(long)]
    source_root: Option<PathBuf>,

    /// Config file to use instead of the standard hierarchy
    #[arg(long)]
    config: Option<PathBuf>,

    /// Enable debug output
    #[arg(long)]
    debug: bool,

    /// Suppress normal output
    #[arg(long)]
    quiet: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init_logging(cli.debug, cli.quiet);

    dotenvy::dotenv().ok();

    let mut config = config::TriageConfig::load(cli.config.as_deref())?;
    if let Some(root) = cli.source_root {
        config.defaults.source_root = root;
    }
    if let Ok(key) = std::env::var("GROQ_API_KEY") {
        config.fill_missing_api_keys(&key);
    }

    let chain = invoker::FallbackChain::from_config(&config);
    anyhow::ensure!(!chain.is_empty(), "no enabled backends configured");

    let files = report::load_rows(
        &cli.input,
        &config.defaults.source_root,
        config.defaults.content_limit,
    )
    .with_context(|| format!("reading input table {}", cli.input.display()))?;
    info!(
        "loaded {} rows, fallback chain of {} backends",
        files.len(),
        chain.len()
    );

    let writer = report::ReportWriter::create(&cli.input)?;
    let summary =
        pipeline::process_rows(&files, &chain, &writer, config.defaults.max_attempts).await;

    info!(
        written = summary.written,
        skipped = summary.skipped,
        write_failures = summary.write_failures,
        "report written to {}",
        writer.path().display()
    );

    Ok(())
}
