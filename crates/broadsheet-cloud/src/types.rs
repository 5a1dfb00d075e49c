//! Data returned by the analysis services.

use serde::{Deserialize, Serialize};

/// A region's position and size as fractions of the image dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl BoundingBox {
    pub fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }
}

/// One block from a layout-analysis response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisBlock {
    /// Opaque identifier assigned by the service.
    pub id: String,

    /// Type tag, e.g. `LAYOUT_TITLE` or `LINE`.
    pub block_type: String,

    /// Normalized geometry of the block.
    pub bounding_box: BoundingBox,
}

/// One fragment from a text-recognition response.
///
/// Fragments such as pages carry no text; lines and words do.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TextFragment {
    pub text: Option<String>,
}

impl TextFragment {
    pub fn with_text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
        }
    }

    pub fn empty() -> Self {
        Self { text: None }
    }
}
