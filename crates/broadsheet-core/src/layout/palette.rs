//! Recognized layout types and their annotation colors.

use serde::{Deserialize, Serialize};

use crate::error::BroadsheetError;

/// An RGB color written as `#rrggbb` in configuration files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct HexColor(pub [u8; 3]);

impl HexColor {
    /// Parse `#rrggbb` (the leading `#` is optional).
    pub fn parse(value: &str) -> crate::Result<Self> {
        let digits = value.trim().trim_start_matches('#');
        if digits.len() != 6 || !digits.is_ascii() {
            return Err(BroadsheetError::Config(format!("invalid color: {:?}", value)));
        }

        let channel = |range: std::ops::Range<usize>| {
            u8::from_str_radix(&digits[range], 16)
                .map_err(|_| BroadsheetError::Config(format!("invalid color: {:?}", value)))
        };

        Ok(Self([channel(0..2)?, channel(2..4)?, channel(4..6)?]))
    }

    pub fn rgb(&self) -> [u8; 3] {
        self.0
    }
}

impl TryFrom<String> for HexColor {
    type Error = BroadsheetError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<HexColor> for String {
    fn from(color: HexColor) -> Self {
        let [r, g, b] = color.0;
        format!("#{:02x}{:02x}{:02x}", r, g, b)
    }
}

/// One recognized layout type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayoutStyle {
    /// Type tag as reported by the analysis service.
    pub tag: String,
    /// Outline color used for previews and recorded with each region.
    pub color: HexColor,
}

/// The set of layout types kept by the extractor, in configuration order.
///
/// Blocks whose tag is not listed here are dropped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LayoutPalette {
    styles: Vec<LayoutStyle>,
}

const DEFAULT_STYLES: [(&str, [u8; 3]); 10] = [
    ("LAYOUT_TITLE", [0xe4, 0x1a, 0x1c]),
    ("LAYOUT_HEADER", [0x37, 0x7e, 0xb8]),
    ("LAYOUT_FOOTER", [0x4d, 0xaf, 0x4a]),
    ("LAYOUT_SECTION_HEADER", [0x98, 0x4e, 0xa3]),
    ("LAYOUT_PAGE_NUMBER", [0xff, 0x7f, 0x00]),
    ("LAYOUT_LIST", [0xff, 0xff, 0x33]),
    ("LAYOUT_FIGURE", [0xa6, 0x56, 0x28]),
    ("LAYOUT_TABLE", [0xf7, 0x81, 0xbf]),
    ("LAYOUT_KEY_VALUE", [0x99, 0x99, 0x99]),
    ("LAYOUT_TEXT", [0xff, 0xff, 0x00]),
];

impl Default for LayoutPalette {
    fn default() -> Self {
        Self {
            styles: DEFAULT_STYLES
                .iter()
                .map(|(tag, color)| LayoutStyle {
                    tag: (*tag).to_string(),
                    color: HexColor(*color),
                })
                .collect(),
        }
    }
}

impl LayoutPalette {
    /// Color for a recognized tag, `None` for anything else.
    pub fn color_for(&self, tag: &str) -> Option<HexColor> {
        self.styles.iter().find(|s| s.tag == tag).map(|s| s.color)
    }
}
