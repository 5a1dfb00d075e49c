//! Layout extraction for a single page image.

use std::io::Cursor;
use std::sync::Arc;

use image::ImageReader;
use tracing::{debug, error, info};

use broadsheet_cloud::{AnalysisBlock, LayoutAnalyzer, ObjectStore};

use crate::error::Result;
use crate::geometry::map_bounding_box;
use crate::models::config::LayoutConfig;
use crate::models::layout::{save_layout_record, LayoutRecord, LayoutRegion};
use crate::paths::{layout_record_key, layout_record_path, preview_path};

use super::preview::{render_preview, save_preview};

/// Produces one layout record per page image.
pub struct LayoutExtractor {
    store: Arc<dyn ObjectStore>,
    analyzer: Arc<dyn LayoutAnalyzer>,
    config: LayoutConfig,
}

impl LayoutExtractor {
    pub fn new(
        store: Arc<dyn ObjectStore>,
        analyzer: Arc<dyn LayoutAnalyzer>,
        config: LayoutConfig,
    ) -> Self {
        Self {
            store,
            analyzer,
            config,
        }
    }

    pub fn store(&self) -> &dyn ObjectStore {
        self.store.as_ref()
    }

    /// Analyze one page and persist its layout record locally and in storage.
    ///
    /// Never fails: any storage, decoding, analysis or persistence error is
    /// captured in a degraded record holding only identifiers and the message.
    pub async fn extract(&self, document: &str, render_preview: bool) -> LayoutRecord {
        match self.try_extract(document, render_preview).await {
            Ok(record) => record,
            Err(e) => {
                error!("Error processing {}: {}", document, e);
                LayoutRecord::failed(self.store.name(), document, e.to_string())
            }
        }
    }

    async fn try_extract(&self, document: &str, with_preview: bool) -> Result<LayoutRecord> {
        let bytes = self.store.get(document).await?;

        let (width, height) = ImageReader::new(Cursor::new(&bytes))
            .with_guessed_format()?
            .into_dimensions()?;
        debug!("Page {} is {}x{}", document, width, height);

        let blocks = self.analyzer.analyze_layout(&bytes).await?;
        info!("Detecting document layout for {}", document);

        let layout = build_regions(&blocks, width, height, &self.config);
        debug!(
            "Kept {} of {} blocks for {}",
            layout.len(),
            blocks.len(),
            document
        );

        if with_preview {
            let page = image::load_from_memory(&bytes)?;
            let annotated = render_preview(&page, &layout, self.config.preview_line_width);
            let path = preview_path(document, &self.config);
            save_preview(&annotated, &path)?;
            info!("Layout preview for {} written to {}", document, path.display());
        }

        let record = LayoutRecord::new(self.store.name(), document, layout);

        let local_path = layout_record_path(document, &self.config);
        save_layout_record(&record, &local_path)?;

        let key = layout_record_key(document, &self.config);
        self.store.put_file(&key, &local_path).await?;
        debug!("Layout record for {} stored at {}", document, key);

        Ok(record)
    }
}

/// Map recognized blocks to layout regions in response order.
///
/// Blocks whose type is not in the palette are dropped and do not advance
/// the reading order, so kept regions are numbered `1..=N` without gaps.
pub fn build_regions(
    blocks: &[AnalysisBlock],
    width: u32,
    height: u32,
    config: &LayoutConfig,
) -> Vec<LayoutRegion> {
    let mut layout = Vec::new();

    for block in blocks {
        let Some(color) = config.palette.color_for(&block.block_type) else {
            continue;
        };

        layout.push(LayoutRegion {
            id: block.id.clone(),
            layout_type: block.block_type.clone(),
            coordinates: map_bounding_box(&block.bounding_box, width, height, config.padding),
            block_color: color.rgb(),
            reading_order: layout.len() + 1,
        });
    }

    layout
}
