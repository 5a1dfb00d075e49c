//! Deterministic artifact locations derived from a page's document key.

use std::path::{Path, PathBuf};

use crate::models::config::{LayoutConfig, OcrConfig};

/// File name of a document key without directories or extension.
///
/// `jpeg/december_1994/page_01.jpeg` becomes `page_01`.
pub fn document_stem(document: &str) -> &str {
    let name = document.rsplit('/').next().unwrap_or(document);
    match name.rsplit_once('.') {
        Some((stem, _)) if !stem.is_empty() => stem,
        _ => name,
    }
}

/// Storage key of the layout record mirroring a page image.
///
/// Every `image_segment` directory becomes `layout_segment` and the file
/// extension is replaced by the record suffix:
/// `data/jpeg/dec/p1.jpeg` becomes `data/layout/dec/p1_layout.json`.
pub fn layout_record_key(document: &str, config: &LayoutConfig) -> String {
    let mut segments: Vec<&str> = document.split('/').collect();
    let file_name = format!("{}{}", document_stem(document), config.record_suffix);
    segments.pop();

    segments
        .into_iter()
        .map(|segment| {
            if segment == config.image_segment {
                config.layout_segment.as_str()
            } else {
                segment
            }
        })
        .chain(std::iter::once(file_name.as_str()))
        .collect::<Vec<_>>()
        .join("/")
}

/// Local folder mirroring the directories of a document key under `base`.
///
/// `jpeg/dec/page_01.jpeg` maps to `<base>/jpeg/dec`, so pages sharing a file
/// name in different folders never share an artifact. `.` and `..` segments
/// are dropped.
fn mirrored_dir(base: &Path, document: &str) -> PathBuf {
    let mut segments: Vec<&str> = document.split('/').collect();
    segments.pop();

    segments
        .into_iter()
        .filter(|segment| !matches!(*segment, "" | "." | ".."))
        .fold(base.to_path_buf(), |dir, segment| dir.join(segment))
}

/// Local path of the layout record for a page.
pub fn layout_record_path(document: &str, config: &LayoutConfig) -> PathBuf {
    mirrored_dir(&config.output_dir, document)
        .join(format!("{}{}", document_stem(document), config.record_suffix))
}

/// Local path of the annotated preview for a page.
pub fn preview_path(document: &str, config: &LayoutConfig) -> PathBuf {
    mirrored_dir(&config.output_dir, document)
        .join(format!("{}_preview.jpeg", document_stem(document)))
}

/// Per-page OCR output folder.
pub fn page_ocr_dir(document: &str, config: &OcrConfig) -> PathBuf {
    mirrored_dir(&config.output_dir, document).join(document_stem(document))
}

/// Per-page folder receiving region crops.
pub fn page_crops_dir(document: &str, config: &OcrConfig) -> PathBuf {
    page_ocr_dir(document, config).join(&config.crops_dir_name)
}

/// Per-page OCR result file.
pub fn page_ocr_result_path(document: &str, config: &OcrConfig) -> PathBuf {
    page_ocr_dir(document, config).join(&config.result_file_name)
}

/// Crop file name for a region, e.g. `layout_title_1.jpeg`.
pub fn crop_file_name(layout_type: &str, reading_order: usize) -> String {
    format!("{}_{}.jpeg", layout_type.to_lowercase(), reading_order)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_document_stem() {
        assert_eq!(document_stem("jpeg/december_1994/page_01.jpeg"), "page_01");
        assert_eq!(document_stem("page.v2.jpeg"), "page.v2");
        assert_eq!(document_stem("scan"), "scan");
        assert_eq!(document_stem("dir/.hidden"), ".hidden");
    }

    #[test]
    fn test_layout_record_key() {
        let config = LayoutConfig::default();
        assert_eq!(
            layout_record_key(
                "projects/newspaper-ocr/data/jpeg/december_1994/page_01.jpeg",
                &config
            ),
            "projects/newspaper-ocr/data/layout/december_1994/page_01_layout.json"
        );
        assert_eq!(layout_record_key("page_01.jpeg", &config), "page_01_layout.json");
        assert_eq!(
            layout_record_key("scans/jpegs/p.jpeg", &config),
            "scans/jpegs/p_layout.json"
        );
    }

    #[test]
    fn test_local_paths() {
        let layout = LayoutConfig::default();
        assert_eq!(
            layout_record_path("data/jpeg/p1.jpeg", &layout),
            PathBuf::from("layout/data/jpeg/p1_layout.json")
        );
        assert_eq!(
            preview_path("data/jpeg/p1.jpeg", &layout),
            PathBuf::from("layout/data/jpeg/p1_preview.jpeg")
        );
        assert_eq!(
            layout_record_path("p1.jpeg", &layout),
            PathBuf::from("layout/p1_layout.json")
        );

        let ocr = OcrConfig::default();
        assert_eq!(page_ocr_dir("p1.jpeg", &ocr), PathBuf::from("ocr/p1"));
        assert_eq!(
            page_crops_dir("p1.jpeg", &ocr),
            PathBuf::from("ocr/p1/block_images")
        );
        assert_eq!(
            page_ocr_result_path("p1.jpeg", &ocr),
            PathBuf::from("ocr/p1/block_ocr.json")
        );
    }

    #[test]
    fn test_same_stem_in_different_folders() {
        let layout = LayoutConfig::default();
        let ocr = OcrConfig::default();

        assert_ne!(
            layout_record_path("jpeg/dec/page_01.jpeg", &layout),
            layout_record_path("jpeg/nov/page_01.jpeg", &layout)
        );
        assert_ne!(
            preview_path("jpeg/dec/page_01.jpeg", &layout),
            preview_path("jpeg/nov/page_01.jpeg", &layout)
        );
        assert_eq!(
            page_ocr_dir("jpeg/nov/page_01.jpeg", &ocr),
            PathBuf::from("ocr/jpeg/nov/page_01")
        );
        assert_eq!(
            page_ocr_result_path("/jpeg/../dec//page_01.jpeg", &ocr),
            PathBuf::from("ocr/jpeg/dec/page_01/block_ocr.json")
        );
    }

    #[test]
    fn test_crop_file_name() {
        assert_eq!(crop_file_name("LAYOUT_SECTION_HEADER", 7), "layout_section_header_7.jpeg");
    }
}
