//! Core library for the broadsheet newspaper digitization pipeline.
//!
//! This crate provides:
//! - Layout extraction of page images into persisted layout records
//! - Coordinate mapping from normalized boxes to padded pixel rectangles
//! - Annotated layout previews
//! - Block OCR over the regions of each layout record
//! - TIFF to JPEG conversion of archival scans
//! - Bounded-concurrency batch execution with per-item failure isolation

pub mod batch;
pub mod convert;
pub mod error;
pub mod geometry;
pub mod layout;
pub mod models;
pub mod ocr;
pub mod paths;

pub use batch::{BatchReport, BatchRunner, FailurePolicy, ItemOutcome};
pub use convert::{batch_convert, convert_tiff_to_jpeg, ConvertReport};
pub use error::{BroadsheetError, Result};
pub use geometry::{map_bounding_box, CropWindow, PixelRect, DEFAULT_PADDING};
pub use layout::{list_pages, run_layout_batch, LayoutExtractor, LayoutPalette};
pub use models::{BroadsheetConfig, LayoutRecord, LayoutRegion, OcrBlockResult};
pub use ocr::{process_page, run_ocr_batch, BlockOcrExtractor, PageOcrSummary};

/// Re-export service types.
pub use broadsheet_cloud::{
    AnalysisBlock, BoundingBox, CloudError, LayoutAnalyzer, LocalStore, ObjectStore, TextFragment,
    TextRecognizer,
};

#[cfg(feature = "aws")]
pub use broadsheet_cloud::{load_sdk_config, S3Store, TextractService};
