//! Mapping normalized bounding boxes to pixel coordinates.

use serde::{Deserialize, Serialize};

use broadsheet_cloud::BoundingBox;

/// Default horizontal padding, as a fraction of image width.
pub const DEFAULT_PADDING: f64 = 0.005;

/// Absolute pixel rectangle `(x1, y1, x2, y2)`.
///
/// Serialized as a four-element array. Values are not clamped, so `x1` may be
/// negative and `x2` may exceed the image width once padding is applied.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; 4]", into = "[f64; 4]")]
pub struct PixelRect {
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
}

impl From<[f64; 4]> for PixelRect {
    fn from([x1, y1, x2, y2]: [f64; 4]) -> Self {
        Self { x1, y1, x2, y2 }
    }
}

impl From<PixelRect> for [f64; 4] {
    fn from(rect: PixelRect) -> Self {
        [rect.x1, rect.y1, rect.x2, rect.y2]
    }
}

/// Integer crop window lying fully inside an image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CropWindow {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl PixelRect {
    pub fn width(&self) -> f64 {
        self.x2 - self.x1
    }

    pub fn height(&self) -> f64 {
        self.y2 - self.y1
    }

    /// Round to whole pixels and clip to a `width` x `height` image.
    ///
    /// Returns `None` when nothing of the rectangle remains inside the image.
    pub fn clamp_to(&self, width: u32, height: u32) -> Option<CropWindow> {
        let clip = |v: f64, max: u32| v.round().clamp(0.0, f64::from(max)) as u32;

        let x1 = clip(self.x1, width);
        let y1 = clip(self.y1, height);
        let x2 = clip(self.x2, width);
        let y2 = clip(self.y2, height);

        if x2 <= x1 || y2 <= y1 {
            return None;
        }

        Some(CropWindow {
            x: x1,
            y: y1,
            width: x2 - x1,
            height: y2 - y1,
        })
    }
}

/// Convert a normalized box into pixel coordinates for a `width` x `height` image.
///
/// `pad` widens the box by that fraction of the image width on the left and
/// on the right; top and bottom are untouched. No validation or clamping is
/// done, out-of-range inputs propagate as-is.
pub fn map_bounding_box(bbox: &BoundingBox, width: u32, height: u32, pad: f64) -> PixelRect {
    let width = f64::from(width);
    let height = f64::from(height);

    let x1 = width * (bbox.left - pad);
    let y1 = height * bbox.top;
    let x2 = x1 + width * (bbox.width + 2.0 * pad);
    let y2 = y1 + height * bbox.height;

    PixelRect { x1, y1, x2, y2 }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_map_with_default_padding() {
        let bbox = BoundingBox::new(0.1, 0.2, 0.5, 0.25);
        let rect = map_bounding_box(&bbox, 1000, 2000, DEFAULT_PADDING);

        assert!(approx(rect.x1, 95.0));
        assert!(approx(rect.y1, 400.0));
        assert!(approx(rect.x2, 605.0));
        assert!(approx(rect.y2, 900.0));
    }

    #[test]
    fn test_extent_matches_padding() {
        let boxes = [
            BoundingBox::new(0.0, 0.0, 1.0, 1.0),
            BoundingBox::new(0.3, 0.7, 0.05, 0.2),
            BoundingBox::new(0.99, 0.5, 0.01, 0.0),
        ];

        for bbox in &boxes {
            for pad in [0.0, 0.005, 0.1, -0.02] {
                let rect = map_bounding_box(bbox, 2480, 3508, pad);
                assert!(approx(rect.width(), 2480.0 * (bbox.width + 2.0 * pad)));
                assert!(approx(rect.height(), 3508.0 * bbox.height));
            }
        }
    }

    #[test]
    fn test_padding_is_not_clamped() {
        let bbox = BoundingBox::new(0.0, 0.0, 1.0, 1.0);
        let rect = map_bounding_box(&bbox, 1000, 500, DEFAULT_PADDING);

        assert!(approx(rect.x1, -5.0));
        assert!(approx(rect.x2, 1005.0));
    }

    #[test]
    fn test_clamp_clips_to_image() {
        let rect = PixelRect::from([-5.0, 10.4, 1005.0, 200.6]);
        let window = rect.clamp_to(1000, 150).unwrap();

        assert_eq!(
            window,
            CropWindow {
                x: 0,
                y: 10,
                width: 1000,
                height: 140
            }
        );
    }

    #[test]
    fn test_clamp_outside_image() {
        let rect = PixelRect::from([1200.0, 10.0, 1300.0, 20.0]);
        assert_eq!(rect.clamp_to(1000, 1000), None);

        let flat = PixelRect::from([10.0, 10.0, 20.0, 10.2]);
        assert_eq!(flat.clamp_to(100, 100), None);
    }

    #[test]
    fn test_serializes_as_array() {
        let rect = PixelRect::from([1.5, 2.0, 3.25, 4.0]);
        let json = serde_json::to_string(&rect).unwrap();
        assert_eq!(json, "[1.5,2.0,3.25,4.0]");

        let back: PixelRect = serde_json::from_str(&json).unwrap();
        assert_eq!(back, rect);
    }
}
