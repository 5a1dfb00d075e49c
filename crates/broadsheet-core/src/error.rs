//! Error types for the broadsheet-core library.

use std::path::PathBuf;

use thiserror::Error;

/// Main error type for the broadsheet library.
#[derive(Error, Debug)]
pub enum BroadsheetError {
    /// Storage or analysis service error.
    #[error("service error: {0}")]
    Cloud(#[from] broadsheet_cloud::CloudError),

    /// Image decoding, encoding, or saving error.
    #[error("image error: {0}")]
    Image(#[from] image::ImageError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON (de)serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),

    /// No layout record exists for a page.
    #[error("layout record not found: {}", .0.display())]
    MissingLayout(PathBuf),

    /// The layout record was written for a page whose analysis failed.
    #[error("layout record for {document} is degraded: {error}")]
    DegradedLayout { document: String, error: String },

    /// The layout record found for a page describes another page.
    #[error("layout record for {page} describes {recorded}")]
    RecordMismatch { page: String, recorded: String },

    /// A region index beyond the layout record.
    #[error("region index {index} out of range for {len} regions")]
    RegionIndex { index: usize, len: usize },

    /// The region lies entirely outside the image.
    #[error("region {layout_type} #{reading_order} does not overlap the image")]
    EmptyCrop {
        layout_type: String,
        reading_order: usize,
    },
}

/// Result type for the broadsheet library.
pub type Result<T> = std::result::Result<T, BroadsheetError>;
