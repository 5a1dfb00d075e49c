//! Layout command - analyze page layouts and persist layout records.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use clap::Args;
use console::style;
use tracing::info;

use broadsheet_cloud::{load_sdk_config, TextractService};
use broadsheet_core::layout::{run_layout_batch, LayoutExtractor};
use broadsheet_core::models::config::StorageBackend;
use broadsheet_core::models::layout::LayoutRecord;

use super::{build_store, load_config, page_progress};

/// Arguments for the layout command.
#[derive(Args)]
pub struct LayoutArgs {
    /// Key prefix of the page images to analyze
    #[arg(short, long)]
    prefix: Option<String>,

    /// S3 bucket holding the page images
    #[arg(short, long, conflicts_with = "local_root")]
    bucket: Option<String>,

    /// Use a local directory as the bucket instead of S3
    #[arg(long)]
    local_root: Option<PathBuf>,

    /// Analyze a single page image instead of the whole prefix
    #[arg(short, long)]
    document: Option<String>,

    /// Save an annotated preview next to the layout record
    #[arg(long, requires = "document")]
    preview: bool,

    /// Directory for layout records
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Number of pages analyzed concurrently
    #[arg(short = 'j', long)]
    jobs: Option<usize>,
}

pub async fn run(args: LayoutArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();

    let mut config = load_config(config_path)?;
    if let Some(prefix) = args.prefix {
        config.storage.prefix = prefix;
    }
    if let Some(bucket) = args.bucket {
        config.storage.backend = StorageBackend::S3;
        config.storage.bucket = bucket;
    }
    if let Some(root) = args.local_root {
        config.storage.backend = StorageBackend::Local;
        config.storage.root = root;
    }
    if let Some(output_dir) = args.output_dir {
        config.layout.output_dir = output_dir;
    }
    config.validate()?;

    let sdk = load_sdk_config(config.storage.region.as_deref()).await;
    let store = build_store(&config.storage, &sdk);
    let extractor = LayoutExtractor::new(
        store,
        Arc::new(TextractService::new(&sdk)),
        config.layout.clone(),
    );

    if let Some(document) = args.document {
        let record = extractor.extract(&document, args.preview).await;
        if let Some(error) = record.error() {
            anyhow::bail!("Layout extraction failed for {}: {}", document, error);
        }

        println!(
            "{} {} regions detected in {} ({:?})",
            style("✓").green(),
            record.regions().map_or(0, <[_]>::len),
            document,
            start.elapsed()
        );
        return Ok(());
    }

    let concurrency = args.jobs.unwrap_or(config.layout.concurrency);
    info!("Analyzing pages with {} concurrent requests", concurrency);

    let pb = page_progress()?;
    let records = run_layout_batch(&extractor, &config.storage, concurrency, |record| {
        pb.inc(1);
        pb.set_message(record.document.clone());
    })
    .await?;
    pb.finish_and_clear();

    print_summary(&records, start);
    Ok(())
}

fn print_summary(records: &[LayoutRecord], start: Instant) {
    let degraded: Vec<&LayoutRecord> = records.iter().filter(|r| r.is_degraded()).collect();

    println!(
        "{} Analyzed {} pages in {:?}",
        style("✓").green(),
        records.len(),
        start.elapsed()
    );
    println!(
        "   {} successful, {} failed",
        style(records.len() - degraded.len()).green(),
        style(degraded.len()).red()
    );

    if !degraded.is_empty() {
        println!();
        println!("{}", style("Failed pages:").red());
        for record in degraded {
            println!(
                "  - {}: {}",
                record.document,
                record.error().unwrap_or("unknown error")
            );
        }
    }
}
