//! Configuration structures for the layout and OCR pipeline.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::layout::LayoutPalette;

/// Environment variable overriding `storage.bucket`.
pub const BUCKET_ENV: &str = "BROADSHEET_BUCKET";

/// Environment variable overriding `storage.prefix`.
pub const PREFIX_ENV: &str = "BROADSHEET_PREFIX";

/// Main configuration for the broadsheet pipeline.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BroadsheetConfig {
    /// Where page images live and artifacts are mirrored.
    pub storage: StorageConfig,

    /// Layout phase configuration.
    pub layout: LayoutConfig,

    /// OCR phase configuration.
    pub ocr: OcrConfig,

    /// TIFF conversion configuration.
    pub convert: ConvertConfig,
}

/// Storage backend selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    /// Amazon S3 bucket.
    S3,
    /// Local directory acting as a bucket.
    Local,
}

/// Storage configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Backend kind.
    pub backend: StorageBackend,

    /// Bucket name (S3 backend).
    pub bucket: String,

    /// Root directory (local backend).
    pub root: PathBuf,

    /// Key prefix under which page images are listed.
    pub prefix: String,

    /// Only keys ending with this suffix are treated as page images.
    pub image_suffix: String,

    /// AWS region; the provider chain decides when unset.
    pub region: Option<String>,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackend::S3,
            bucket: String::new(),
            root: PathBuf::from("data"),
            prefix: String::new(),
            image_suffix: ".jpeg".to_string(),
            region: None,
        }
    }
}

/// Layout phase configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Horizontal padding as a fraction of image width, applied to both sides.
    pub padding: f64,

    /// Number of pages analyzed concurrently.
    pub concurrency: usize,

    /// Local folder for layout records.
    pub output_dir: PathBuf,

    /// Key segment holding page images, replaced when deriving record keys.
    pub image_segment: String,

    /// Key segment holding layout records.
    pub layout_segment: String,

    /// Suffix replacing the image extension in record file names.
    pub record_suffix: String,

    /// Recognized layout types and their annotation colors.
    pub palette: LayoutPalette,

    /// Outline thickness in pixels for preview rendering.
    pub preview_line_width: u32,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            padding: 0.005,
            concurrency: 8,
            output_dir: PathBuf::from("layout"),
            image_segment: "jpeg".to_string(),
            layout_segment: "layout".to_string(),
            record_suffix: "_layout.json".to_string(),
            palette: LayoutPalette::default(),
            preview_line_width: 3,
        }
    }
}

/// OCR phase configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OcrConfig {
    /// Folder receiving one sub-folder per page.
    pub output_dir: PathBuf,

    /// Name of the per-page folder holding region crops.
    pub crops_dir_name: String,

    /// Name of the per-page OCR result file.
    pub result_file_name: String,

    /// Number of pages processed concurrently.
    pub page_concurrency: usize,

    /// Number of regions of one page recognized concurrently.
    pub region_concurrency: usize,

    /// Stop the whole batch at the first failed page.
    pub fail_fast: bool,

    /// JPEG quality (1-100) for region crops.
    pub crop_quality: u8,
}

impl Default for OcrConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("ocr"),
            crops_dir_name: "block_images".to_string(),
            result_file_name: "block_ocr.json".to_string(),
            page_concurrency: 1,
            region_concurrency: 1,
            fail_fast: false,
            crop_quality: 90,
        }
    }
}

/// TIFF to JPEG conversion configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ConvertConfig {
    /// JPEG quality (1-100).
    pub jpeg_quality: u8,
}

impl Default for ConvertConfig {
    fn default() -> Self {
        Self { jpeg_quality: 90 }
    }
}

impl BroadsheetConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &std::path::Path) -> Result<Self, std::io::Error> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content).map_err(|e| {
            std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string())
        })
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &std::path::Path) -> Result<(), std::io::Error> {
        let content = serde_json::to_string_pretty(self).map_err(|e| {
            std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string())
        })?;
        std::fs::write(path, content)
    }

    /// Apply `BROADSHEET_BUCKET` / `BROADSHEET_PREFIX` overrides.
    pub fn apply_env(&mut self) {
        self.apply_overrides(
            std::env::var(BUCKET_ENV).ok(),
            std::env::var(PREFIX_ENV).ok(),
        );
    }

    fn apply_overrides(&mut self, bucket: Option<String>, prefix: Option<String>) {
        if let Some(bucket) = bucket.filter(|b| !b.is_empty()) {
            self.storage.bucket = bucket;
        }
        if let Some(prefix) = prefix {
            self.storage.prefix = prefix;
        }
    }

    /// Check values that would otherwise fail deep inside a batch.
    pub fn validate(&self) -> crate::Result<()> {
        if self.storage.backend == StorageBackend::S3 && self.storage.bucket.is_empty() {
            return Err(crate::BroadsheetError::Config(format!(
                "storage.bucket is required for the s3 backend (or set {})",
                BUCKET_ENV
            )));
        }
        if self.layout.padding < 0.0 {
            return Err(crate::BroadsheetError::Config(
                "layout.padding must not be negative".to_string(),
            ));
        }
        if !(1..=100).contains(&self.ocr.crop_quality)
            || !(1..=100).contains(&self.convert.jpeg_quality)
        {
            return Err(crate::BroadsheetError::Config(
                "JPEG quality must be between 1 and 100".to_string(),
            ));
        }
        Ok(())
    }
}
