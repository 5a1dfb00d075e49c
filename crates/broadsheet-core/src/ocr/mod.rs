//! OCR phase: crop layout regions and recognize their text.

mod block;
mod driver;

pub use block::{join_fragments, BlockOcrExtractor};
pub use driver::{process_page, run_ocr_batch, PageOcrSummary};
