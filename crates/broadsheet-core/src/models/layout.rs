//! Layout records persisted by the layout phase and read by the OCR phase.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{BroadsheetError, Result};
use crate::geometry::PixelRect;

/// One detected structural element on a page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutRegion {
    /// Identifier assigned by the analysis service.
    pub id: String,

    /// Layout type tag, e.g. `LAYOUT_TITLE`.
    pub layout_type: String,

    /// Pixel rectangle `[x1, y1, x2, y2]`, padding applied, not clamped.
    pub coordinates: PixelRect,

    /// Annotation color of the type.
    pub block_color: [u8; 3],

    /// 1-based position among the kept regions of the page.
    pub reading_order: usize,
}

/// Either the regions of a page, or why they could not be produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LayoutOutcome {
    Layout { layout: Vec<LayoutRegion> },
    Error { error: String },
}

/// Layout analysis result for one page image.
///
/// Serialized as `{bucket, document, layout: [...]}` or
/// `{bucket, document, error}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutRecord {
    /// Storage container the page was read from.
    pub bucket: String,

    /// Key of the page image.
    pub document: String,

    #[serde(flatten)]
    pub outcome: LayoutOutcome,
}

impl LayoutRecord {
    pub fn new(bucket: impl Into<String>, document: impl Into<String>, layout: Vec<LayoutRegion>) -> Self {
        Self {
            bucket: bucket.into(),
            document: document.into(),
            outcome: LayoutOutcome::Layout { layout },
        }
    }

    /// A degraded record carrying only identifiers and an error message.
    pub fn failed(
        bucket: impl Into<String>,
        document: impl Into<String>,
        error: impl Into<String>,
    ) -> Self {
        Self {
            bucket: bucket.into(),
            document: document.into(),
            outcome: LayoutOutcome::Error {
                error: error.into(),
            },
        }
    }

    /// Regions of a successful record.
    pub fn regions(&self) -> Option<&[LayoutRegion]> {
        match &self.outcome {
            LayoutOutcome::Layout { layout } => Some(layout),
            LayoutOutcome::Error { .. } => None,
        }
    }

    /// Error message of a degraded record.
    pub fn error(&self) -> Option<&str> {
        match &self.outcome {
            LayoutOutcome::Layout { .. } => None,
            LayoutOutcome::Error { error } => Some(error),
        }
    }

    pub fn is_degraded(&self) -> bool {
        self.error().is_some()
    }

    /// Regions of the record, or `DegradedLayout` when analysis had failed.
    pub fn require_regions(&self) -> Result<&[LayoutRegion]> {
        match &self.outcome {
            LayoutOutcome::Layout { layout } => Ok(layout),
            LayoutOutcome::Error { error } => Err(BroadsheetError::DegradedLayout {
                document: self.document.clone(),
                error: error.clone(),
            }),
        }
    }
}

/// Read a persisted layout record.
pub fn load_layout_record(path: &Path) -> Result<LayoutRecord> {
    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(BroadsheetError::MissingLayout(path.to_path_buf()));
        }
        Err(e) => return Err(e.into()),
    };
    Ok(serde_json::from_str(&content)?)
}

/// Write a layout record as JSON, creating the parent directory if needed.
pub fn save_layout_record(record: &LayoutRecord, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, serde_json::to_string(record)?)?;
    Ok(())
}
