//! OCR command - recognize the text of every layout region.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use clap::Args;
use console::style;

use broadsheet_cloud::{load_sdk_config, TextractService};
use broadsheet_core::batch::ItemOutcome;
use broadsheet_core::models::config::StorageBackend;
use broadsheet_core::ocr::{run_ocr_batch, BlockOcrExtractor};

use super::{build_store, load_config, page_progress};

/// Arguments for the ocr command.
#[derive(Args)]
pub struct OcrArgs {
    /// Read page images from a local directory instead of the configured store
    #[arg(short, long)]
    images: Option<PathBuf>,

    /// Key prefix of the page images
    #[arg(short, long)]
    prefix: Option<String>,

    /// Directory for OCR output
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Number of pages processed concurrently
    #[arg(short = 'j', long)]
    jobs: Option<usize>,

    /// Number of regions recognized concurrently within a page
    #[arg(long)]
    region_jobs: Option<usize>,

    /// Stop at the first failed page
    #[arg(long)]
    fail_fast: bool,
}

pub async fn run(args: OcrArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();

    let mut config = load_config(config_path)?;
    if let Some(images) = args.images {
        config.storage.backend = StorageBackend::Local;
        config.storage.root = images;
    }
    if let Some(prefix) = args.prefix {
        config.storage.prefix = prefix;
    }
    if let Some(output_dir) = args.output_dir {
        config.ocr.output_dir = output_dir;
    }
    if let Some(jobs) = args.jobs {
        config.ocr.page_concurrency = jobs;
    }
    if let Some(jobs) = args.region_jobs {
        config.ocr.region_concurrency = jobs;
    }
    config.ocr.fail_fast |= args.fail_fast;
    config.validate()?;

    let sdk = load_sdk_config(config.storage.region.as_deref()).await;
    let pages = build_store(&config.storage, &sdk);
    let extractor = BlockOcrExtractor::new(Arc::new(TextractService::new(&sdk)), config.ocr.clone());

    let pb = page_progress()?;
    let report = run_ocr_batch(&extractor, pages.as_ref(), &config, |outcome| {
        pb.inc(1);
        if let ItemOutcome::Failed { key, error } = outcome {
            pb.println(format!("{} {}: {}", style("✗").red(), key, error));
        } else {
            pb.set_message(outcome.key().to_string());
        }
    })
    .await?;
    pb.finish_and_clear();

    let blocks: usize = report.succeeded().map(|(_, page)| page.blocks.len()).sum();
    println!(
        "{} Processed {} pages in {:?}",
        style("✓").green(),
        report.outcomes.len(),
        start.elapsed()
    );
    println!(
        "   {} successful ({} blocks), {} failed",
        style(report.outcomes.len() - report.failure_count()).green(),
        blocks,
        style(report.failure_count()).red()
    );

    if report.aborted {
        let (document, error) = report
            .failed()
            .next()
            .map(|(key, error)| (key.to_string(), error.to_string()))
            .unwrap_or_default();
        anyhow::bail!("OCR stopped after {} failed: {}", document, error);
    }

    Ok(())
}
