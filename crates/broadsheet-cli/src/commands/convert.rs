//! Convert command - turn archival TIFF scans into JPEG page images.

use std::path::PathBuf;

use clap::Args;
use console::style;

use broadsheet_core::convert::batch_convert;

use super::load_config;

/// Arguments for the convert command.
#[derive(Args)]
pub struct ConvertArgs {
    /// Directory holding the TIFF files
    source: PathBuf,

    /// Directory for the JPEG files (created if missing)
    destination: PathBuf,

    /// JPEG quality
    #[arg(short, long, value_parser = clap::value_parser!(u8).range(1..=100))]
    quality: Option<u8>,
}

pub async fn run(args: ConvertArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let config = load_config(config_path)?;
    let quality = args.quality.unwrap_or(config.convert.jpeg_quality);

    let source = args.source.clone();
    let destination = args.destination.clone();
    let report =
        tokio::task::spawn_blocking(move || batch_convert(&source, &destination, quality)).await??;

    println!(
        "{} Converted {} files into {}",
        style("✓").green(),
        report.converted.len(),
        args.destination.display()
    );

    if !report.failed.is_empty() {
        println!();
        println!("{}", style("Failed files:").red());
        for (path, error) in &report.failed {
            println!("  - {}: {}", path.display(), error);
        }
    }

    Ok(())
}
