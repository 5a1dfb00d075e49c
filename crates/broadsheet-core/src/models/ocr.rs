//! Per-region OCR results.

use serde::{Deserialize, Serialize};

/// Recognized text of one layout region.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OcrBlockResult {
    /// Layout type tag of the region.
    pub block_type: String,

    /// Reading order of the region in its layout record.
    pub reading_order: usize,

    /// Text fragments joined with single spaces, in response order.
    pub ocr_result: String,
}
