//! CLI entry point for the AntWeb scraper.

use anyhow::{Context, Result};
use antweb_core::{BatchRunner, read_specimen_rows};
use clap::Parser;
use tracing::{debug, info, warn};

mod app_config;
mod cli;

use cli::Args;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // Parse CLI arguments first (before tracing, so --help works without logs)
    let args = Args::parse();

    // Priority: RUST_LOG env var > quiet flag > verbose flag > default (info)
    let default_level = if args.quiet {
        "error"
    } else {
        match args.verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    };

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level));

    tracing_subscriber::fmt().with_env_filter(filter).init();

    debug!(?args, "CLI arguments parsed");
    info!("AntWeb scraper starting");

    let config = app_config::resolve_config(&args)?;
    debug!(?config, "Configuration resolved");

    let input = read_specimen_rows(&args.input)
        .with_context(|| format!("Failed to load specimens from '{}'", args.input.display()))?;
    info!(
        rows = input.len(),
        skipped = input.skipped.len(),
        "Parsed input"
    );
    for index in &input.skipped {
        warn!(index, "Skipped row without genus or species");
    }

    let rows: Vec<_> = input
        .rows
        .into_iter()
        .filter(|row| row.index >= args.start)
        .take(args.limit.unwrap_or(usize::MAX))
        .collect();

    if rows.is_empty() {
        info!("No specimens to process");
        return Ok(());
    }

    let runner = BatchRunner::from_config(&config)?;
    std::fs::create_dir_all(runner.image_dir()).with_context(|| {
        format!(
            "Failed to create image directory '{}'",
            runner.image_dir().display()
        )
    })?;

    let report = runner.run(&rows).await;

    info!(
        succeeded = report.succeeded(),
        skipped = report.skipped(),
        failed = report.failed(),
        errored = report.errored(),
        total = report.total(),
        "Done"
    );

    Ok(())
}
