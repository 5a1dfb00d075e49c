//! Annotated page previews.

use std::path::Path;

use image::{DynamicImage, Rgb, RgbImage};
use imageproc::drawing::draw_hollow_rect_mut;
use imageproc::rect::Rect;

use crate::error::Result;
use crate::models::layout::LayoutRegion;

/// Draw every region's outline in its color onto a copy of the page.
///
/// Outlines are `line_width` pixels thick, growing inward from the region edge.
/// Parts falling outside the page are clipped.
pub fn render_preview(page: &DynamicImage, regions: &[LayoutRegion], line_width: u32) -> RgbImage {
    let mut canvas = page.to_rgb8();

    for region in regions {
        let rect = region.coordinates;
        let x = rect.x1.round() as i32;
        let y = rect.y1.round() as i32;
        let width = rect.width().round() as i64;
        let height = rect.height().round() as i64;
        let color = Rgb(region.block_color);

        for offset in 0..line_width.max(1) as i64 {
            let w = width - 2 * offset;
            let h = height - 2 * offset;
            if w <= 0 || h <= 0 {
                break;
            }
            let outline = Rect::at(x + offset as i32, y + offset as i32).of_size(w as u32, h as u32);
            draw_hollow_rect_mut(&mut canvas, outline, color);
        }
    }

    canvas
}

/// Save a preview; the format follows the file extension.
pub fn save_preview(preview: &RgbImage, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    preview.save(path)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::PixelRect;

    fn region(coordinates: [f64; 4], color: [u8; 3]) -> LayoutRegion {
        LayoutRegion {
            id: "r".to_string(),
            layout_type: "LAYOUT_TABLE".to_string(),
            coordinates: PixelRect::from(coordinates),
            block_color: color,
            reading_order: 1,
        }
    }

    #[test]
    fn test_outline_drawn_inward() {
        let page = DynamicImage::ImageRgb8(RgbImage::from_pixel(40, 40, Rgb([0, 0, 0])));
        let preview = render_preview(&page, &[region([10.0, 10.0, 30.0, 30.0], [255, 0, 0])], 3);

        assert_eq!(preview.get_pixel(10, 20), &Rgb([255, 0, 0]));
        assert_eq!(preview.get_pixel(12, 20), &Rgb([255, 0, 0]));
        assert_eq!(preview.get_pixel(13, 20), &Rgb([0, 0, 0]));
        assert_eq!(preview.get_pixel(9, 20), &Rgb([0, 0, 0]));
        assert_eq!(preview.get_pixel(20, 20), &Rgb([0, 0, 0]));
    }

    #[test]
    fn test_outline_outside_page_is_clipped() {
        let page = DynamicImage::ImageRgb8(RgbImage::from_pixel(20, 20, Rgb([0, 0, 0])));
        let preview = render_preview(&page, &[region([-5.0, 2.0, 25.0, 10.0], [0, 255, 0])], 1);

        assert_eq!(preview.dimensions(), (20, 20));
        assert_eq!(preview.get_pixel(5, 2), &Rgb([0, 255, 0]));
    }

    #[test]
    fn test_degenerate_region_skipped() {
        let page = DynamicImage::ImageRgb8(RgbImage::from_pixel(10, 10, Rgb([0, 0, 0])));
        let preview = render_preview(&page, &[region([5.0, 5.0, 5.0, 9.0], [0, 0, 255])], 3);
        assert!(preview.pixels().all(|p| *p == Rgb([0, 0, 0])));
    }
}
