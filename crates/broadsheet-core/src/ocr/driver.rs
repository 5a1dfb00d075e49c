//! Batch OCR over every page that has a layout record.

use std::path::PathBuf;

use tracing::{debug, info};

use broadsheet_cloud::ObjectStore;

use crate::batch::{BatchReport, BatchRunner, FailurePolicy, ItemOutcome};
use crate::error::{BroadsheetError, Result};
use crate::layout::list_pages;
use crate::models::config::BroadsheetConfig;
use crate::models::layout::load_layout_record;
use crate::models::ocr::OcrBlockResult;
use crate::paths::{layout_record_path, page_crops_dir, page_ocr_dir, page_ocr_result_path};

use super::BlockOcrExtractor;

/// OCR output of one page.
#[derive(Debug, Clone)]
pub struct PageOcrSummary {
    pub document: String,
    pub output_path: PathBuf,
    pub blocks: Vec<OcrBlockResult>,
}

/// Run block OCR over one page and persist its result list.
///
/// Output folders are created before any region is processed. Regions run
/// with `ocr.region_concurrency` and the page is all-or-nothing: the first
/// failing region aborts it and no result file is written.
pub async fn process_page(
    extractor: &BlockOcrExtractor,
    pages: &dyn ObjectStore,
    config: &BroadsheetConfig,
    document: &str,
) -> Result<PageOcrSummary> {
    let record = load_layout_record(&layout_record_path(document, &config.layout))?;
    if record.document != document {
        return Err(BroadsheetError::RecordMismatch {
            page: document.to_string(),
            recorded: record.document,
        });
    }
    let region_count = record.require_regions()?.len();

    let bytes = pages.get(document).await?;
    let page = image::load_from_memory(&bytes)?;

    let crops_dir = page_crops_dir(document, &config.ocr);
    tokio::fs::create_dir_all(page_ocr_dir(document, &config.ocr)).await?;
    tokio::fs::create_dir_all(&crops_dir).await?;

    debug!("Recognizing {} regions of {}", region_count, document);
    let runner = BatchRunner::new(config.ocr.region_concurrency, FailurePolicy::Abort);
    let blocks = runner
        .run(0..region_count, |index| {
            extractor.extract(&page, &record, index, &crops_dir)
        })
        .await
        .into_result()?;

    let output_path = page_ocr_result_path(document, &config.ocr);
    tokio::fs::write(&output_path, serde_json::to_vec(&blocks)?).await?;
    info!("Saved OCR output to {}", output_path.display());

    Ok(PageOcrSummary {
        document: document.to_string(),
        output_path,
        blocks,
    })
}

/// Run block OCR over every page image listed in `pages`.
///
/// Pages run with `ocr.page_concurrency`. A failed page is reported and the
/// batch continues, unless `ocr.fail_fast` is set.
pub async fn run_ocr_batch<P>(
    extractor: &BlockOcrExtractor,
    pages: &dyn ObjectStore,
    config: &BroadsheetConfig,
    mut on_page_done: P,
) -> Result<BatchReport<PageOcrSummary>>
where
    P: FnMut(&ItemOutcome<PageOcrSummary>),
{
    let documents = list_pages(pages, &config.storage.prefix, &config.storage.image_suffix).await?;
    info!("Running block OCR over {} pages from {}", documents.len(), pages.name());

    let policy = if config.ocr.fail_fast {
        FailurePolicy::Abort
    } else {
        FailurePolicy::Isolate
    };

    let runner = BatchRunner::new(config.ocr.page_concurrency, policy);
    let report = runner
        .run_with_progress(
            documents,
            |document: String| async move {
                process_page(extractor, pages, config, &document).await
            },
            |outcome| on_page_done(outcome),
        )
        .await;

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;
    use std::sync::Arc;

    use async_trait::async_trait;
    use broadsheet_cloud::{CloudError, LocalStore, TextFragment, TextRecognizer};
    use image::{ImageFormat, Rgb, RgbImage};
    use pretty_assertions::assert_eq;

    use crate::geometry::PixelRect;
    use crate::models::config::StorageBackend;
    use crate::models::layout::{save_layout_record, LayoutRecord, LayoutRegion};

    /// Answers by crop width: 30px crops read "Hello", 50px crops "World" "!".
    struct WidthKeyedRecognizer;

    #[async_trait]
    impl TextRecognizer for WidthKeyedRecognizer {
        async fn detect_text(&self, image: &[u8]) -> broadsheet_cloud::Result<Vec<TextFragment>> {
            let crop = image::load_from_memory(image)
                .map_err(|e| CloudError::InvalidResponse(e.to_string()))?;
            match crop.width() {
                30 => Ok(vec![TextFragment::empty(), TextFragment::with_text("Hello")]),
                50 => Ok(vec![TextFragment::with_text("World"), TextFragment::with_text("!")]),
                w => Err(CloudError::request("detect_document_text", format!("bad crop width {}", w))),
            }
        }
    }

    fn region(layout_type: &str, order: usize, coordinates: [f64; 4]) -> LayoutRegion {
        LayoutRegion {
            id: format!("id-{}", order),
            layout_type: layout_type.to_string(),
            coordinates: PixelRect::from(coordinates),
            block_color: [0, 0, 0],
            reading_order: order,
        }
    }

    fn write_page(root: &Path, key: &str) {
        let path = root.join(key);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        RgbImage::from_pixel(100, 60, Rgb([255, 255, 255]))
            .save_with_format(&path, ImageFormat::Jpeg)
            .unwrap();
    }

    fn config_in(dir: &Path) -> BroadsheetConfig {
        let mut config = BroadsheetConfig::default();
        config.storage.backend = StorageBackend::Local;
        config.storage.root = dir.join("images");
        config.layout.output_dir = dir.join("layout");
        config.ocr.output_dir = dir.join("ocr");
        config
    }

    fn write_record(config: &BroadsheetConfig, document: &str, regions: Vec<LayoutRegion>) {
        let record = LayoutRecord::new("archive", document, regions);
        save_layout_record(&record, &layout_record_path(document, &config.layout)).unwrap();
    }

    #[tokio::test]
    async fn test_page_results_in_region_order() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_in(dir.path());
        write_page(&config.storage.root, "p1.jpeg");
        write_record(
            &config,
            "p1.jpeg",
            vec![
                region("LAYOUT_TITLE", 1, [0.0, 0.0, 30.0, 10.0]),
                region("LAYOUT_TEXT", 2, [0.0, 10.0, 50.0, 40.0]),
            ],
        );

        let store = LocalStore::new(&config.storage.root);
        let extractor = BlockOcrExtractor::new(Arc::new(WidthKeyedRecognizer), config.ocr.clone());

        let report = run_ocr_batch(&extractor, &store, &config, |_| {}).await.unwrap();
        let summaries = report.into_result().unwrap();
        assert_eq!(summaries.len(), 1);

        let written = std::fs::read_to_string(&summaries[0].output_path).unwrap();
        let written: serde_json::Value = serde_json::from_str(&written).unwrap();
        assert_eq!(
            written,
            serde_json::json!([
                {"block_type": "LAYOUT_TITLE", "reading_order": 1, "ocr_result": "Hello"},
                {"block_type": "LAYOUT_TEXT", "reading_order": 2, "ocr_result": "World !"}
            ])
        );

        let crops = dir.path().join("ocr/p1/block_images");
        assert!(crops.join("layout_title_1.jpeg").exists());
        assert!(crops.join("layout_text_2.jpeg").exists());
    }

    #[tokio::test]
    async fn test_failed_region_leaves_no_result_file() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = config_in(dir.path());
        config.ocr.region_concurrency = 4;
        write_page(&config.storage.root, "p1.jpeg");
        write_record(
            &config,
            "p1.jpeg",
            vec![
                region("LAYOUT_TITLE", 1, [0.0, 0.0, 30.0, 10.0]),
                region("LAYOUT_TABLE", 2, [0.0, 10.0, 70.0, 40.0]),
            ],
        );

        let store = LocalStore::new(&config.storage.root);
        let extractor = BlockOcrExtractor::new(Arc::new(WidthKeyedRecognizer), config.ocr.clone());

        let err = process_page(&extractor, &store, &config, "p1.jpeg").await.unwrap_err();
        assert!(matches!(err, BroadsheetError::Cloud(_)));
        assert!(dir.path().join("ocr/p1/block_images").is_dir());
        assert!(!dir.path().join("ocr/p1/block_ocr.json").exists());
    }

    #[tokio::test]
    async fn test_missing_layout_isolated_per_page() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_in(dir.path());
        write_page(&config.storage.root, "p1.jpeg");
        write_page(&config.storage.root, "p2.jpeg");
        write_record(&config, "p2.jpeg", vec![region("LAYOUT_TITLE", 1, [0.0, 0.0, 30.0, 10.0])]);

        let store = LocalStore::new(&config.storage.root);
        let extractor = BlockOcrExtractor::new(Arc::new(WidthKeyedRecognizer), config.ocr.clone());

        let mut done = Vec::new();
        let report = run_ocr_batch(&extractor, &store, &config, |o| done.push(o.key().to_string()))
            .await
            .unwrap();

        assert_eq!(done, vec!["p1.jpeg", "p2.jpeg"]);
        assert!(!report.aborted);
        let failed: Vec<&str> = report.failed().map(|(k, _)| k).collect();
        assert_eq!(failed, vec!["p1.jpeg"]);
        assert!(matches!(
            report.failed().next().unwrap().1,
            BroadsheetError::MissingLayout(_)
        ));
        assert_eq!(report.succeeded().count(), 1);
    }

    #[tokio::test]
    async fn test_fail_fast_stops_batch() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = config_in(dir.path());
        config.ocr.fail_fast = true;
        write_page(&config.storage.root, "p1.jpeg");
        write_page(&config.storage.root, "p2.jpeg");
        write_record(
            &config,
            "p1.jpeg",
            vec![],
        );
        std::fs::write(
            layout_record_path("p2.jpeg", &config.layout),
            r#"{"bucket": "archive", "document": "p2.jpeg", "error": "throttled"}"#,
        )
        .unwrap();
        write_page(&config.storage.root, "p3.jpeg");

        let store = LocalStore::new(&config.storage.root);
        let extractor = BlockOcrExtractor::new(Arc::new(WidthKeyedRecognizer), config.ocr.clone());

        let report = run_ocr_batch(&extractor, &store, &config, |_| {}).await.unwrap();
        assert!(report.aborted);
        assert_eq!(report.outcomes.len(), 2);
        assert!(matches!(
            report.failed().next().unwrap().1,
            BroadsheetError::DegradedLayout { .. }
        ));

        let empty: Vec<OcrBlockResult> =
            serde_json::from_slice(&std::fs::read(dir.path().join("ocr/p1/block_ocr.json")).unwrap())
                .unwrap();
        assert!(empty.is_empty());
    }

    #[tokio::test]
    async fn test_pages_sharing_a_file_name_stay_apart() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_in(dir.path());
        write_page(&config.storage.root, "dec/page_01.jpeg");
        write_page(&config.storage.root, "nov/page_01.jpeg");
        write_record(&config, "dec/page_01.jpeg", vec![region("LAYOUT_TITLE", 1, [0.0, 0.0, 30.0, 10.0])]);
        write_record(&config, "nov/page_01.jpeg", vec![region("LAYOUT_TEXT", 1, [0.0, 10.0, 50.0, 40.0])]);

        let store = LocalStore::new(&config.storage.root);
        let extractor = BlockOcrExtractor::new(Arc::new(WidthKeyedRecognizer), config.ocr.clone());

        let report = run_ocr_batch(&extractor, &store, &config, |_| {}).await.unwrap();
        let summaries = report.into_result().unwrap();
        let results: Vec<(&str, &str)> = summaries
            .iter()
            .map(|s| (s.document.as_str(), s.blocks[0].ocr_result.as_str()))
            .collect();
        assert_eq!(
            results,
            vec![("dec/page_01.jpeg", "Hello"), ("nov/page_01.jpeg", "World !")]
        );
        assert!(dir.path().join("ocr/dec/page_01/block_ocr.json").exists());
        assert!(dir.path().join("ocr/nov/page_01/block_ocr.json").exists());
    }

    #[tokio::test]
    async fn test_record_of_another_page_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_in(dir.path());
        write_page(&config.storage.root, "p1.jpeg");
        let record = LayoutRecord::new(
            "archive",
            "elsewhere/p1.jpeg",
            vec![region("LAYOUT_TITLE", 1, [0.0, 0.0, 30.0, 10.0])],
        );
        save_layout_record(&record, &layout_record_path("p1.jpeg", &config.layout)).unwrap();

        let store = LocalStore::new(&config.storage.root);
        let extractor = BlockOcrExtractor::new(Arc::new(WidthKeyedRecognizer), config.ocr.clone());

        let err = process_page(&extractor, &store, &config, "p1.jpeg").await.unwrap_err();
        assert!(matches!(
            err,
            BroadsheetError::RecordMismatch { ref recorded, .. } if recorded == "elsewhere/p1.jpeg"
        ));
        assert!(!dir.path().join("ocr/p1").exists());
    }
}
