//! OCR of a single layout region.

use std::path::Path;
use std::sync::Arc;

use image::codecs::jpeg::JpegEncoder;
use image::{DynamicImage, GenericImageView};
use tracing::debug;

use broadsheet_cloud::{TextFragment, TextRecognizer};

use crate::error::{BroadsheetError, Result};
use crate::models::config::OcrConfig;
use crate::models::layout::LayoutRecord;
use crate::models::ocr::OcrBlockResult;
use crate::paths::crop_file_name;

/// Crops layout regions out of a page and recognizes their text.
pub struct BlockOcrExtractor {
    recognizer: Arc<dyn TextRecognizer>,
    config: OcrConfig,
}

impl BlockOcrExtractor {
    pub fn new(recognizer: Arc<dyn TextRecognizer>, config: OcrConfig) -> Self {
        Self { recognizer, config }
    }

    /// Recognize the text of region `index` of `record`.
    ///
    /// The crop is clipped to the page, written to `crops_dir` as
    /// `<type>_<order>.jpeg`, and the same JPEG bytes are sent for recognition.
    /// Errors propagate; nothing is retried.
    pub async fn extract(
        &self,
        page: &DynamicImage,
        record: &LayoutRecord,
        index: usize,
        crops_dir: &Path,
    ) -> Result<OcrBlockResult> {
        let regions = record.require_regions()?;
        let region = regions.get(index).ok_or(BroadsheetError::RegionIndex {
            index,
            len: regions.len(),
        })?;

        let (width, height) = page.dimensions();
        let window = region
            .coordinates
            .clamp_to(width, height)
            .ok_or_else(|| BroadsheetError::EmptyCrop {
                layout_type: region.layout_type.clone(),
                reading_order: region.reading_order,
            })?;

        let crop = page.crop_imm(window.x, window.y, window.width, window.height);
        let bytes = encode_jpeg(&crop, self.config.crop_quality)?;

        let crop_path = crops_dir.join(crop_file_name(&region.layout_type, region.reading_order));
        tokio::fs::write(&crop_path, &bytes).await?;
        debug!(
            "Cropped region {} ({}x{}) to {}",
            region.reading_order,
            window.width,
            window.height,
            crop_path.display()
        );

        let fragments = self.recognizer.detect_text(&bytes).await?;

        Ok(OcrBlockResult {
            block_type: region.layout_type.clone(),
            reading_order: region.reading_order,
            ocr_result: join_fragments(&fragments),
        })
    }
}

/// Join fragment texts with single spaces, skipping fragments without text.
pub fn join_fragments(fragments: &[TextFragment]) -> String {
    fragments
        .iter()
        .filter_map(|f| f.text.as_deref())
        .filter(|text| !text.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

fn encode_jpeg(image: &DynamicImage, quality: u8) -> Result<Vec<u8>> {
    let rgb = image.to_rgb8();
    let mut bytes = Vec::new();
    JpegEncoder::new_with_quality(&mut bytes, quality).encode_image(&rgb)?;
    Ok(bytes)
}
