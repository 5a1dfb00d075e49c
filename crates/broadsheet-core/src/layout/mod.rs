//! Layout phase: analyze page images into persisted layout records.

mod driver;
mod extractor;
mod palette;
mod preview;

pub use driver::{list_pages, run_layout_batch};
pub use extractor::{build_regions, LayoutExtractor};
pub use palette::{HexColor, LayoutPalette, LayoutStyle};
pub use preview::{render_preview, save_preview};
