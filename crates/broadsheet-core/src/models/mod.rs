//! Data models for layout records, OCR results and configuration.

pub mod config;
pub mod layout;
pub mod ocr;

pub use config::BroadsheetConfig;
pub use layout::{load_layout_record, save_layout_record, LayoutOutcome, LayoutRecord, LayoutRegion};
pub use ocr::OcrBlockResult;
