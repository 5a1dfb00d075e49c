//! CLI application for newspaper page layout analysis and block OCR.

mod commands;

use clap::{Parser, Subcommand};
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use commands::{config, convert, layout, ocr};

/// Broadsheet - Digitize newspaper pages into layout regions and text
#[derive(Parser)]
#[command(name = "broadsheet")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Path to config file
    #[arg(short, long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Detect page layouts and store layout records
    Layout(layout::LayoutArgs),

    /// Recognize the text of every layout region
    Ocr(ocr::OcrArgs),

    /// Convert TIFF scans to JPEG page images
    Convert(convert::ConvertArgs),

    /// Manage configuration
    Config(config::ConfigArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Set up logging based on verbosity
    let level = match cli.verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    match cli.command {
        Commands::Layout(args) => layout::run(args, cli.config.as_deref()).await,
        Commands::Ocr(args) => ocr::run(args, cli.config.as_deref()).await,
        Commands::Convert(args) => convert::run(args, cli.config.as_deref()).await,
        Commands::Config(args) => config::run(args, cli.config.as_deref()).await,
    }
}
