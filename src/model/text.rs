//! Text runs and comparable text units.

use super::{BBox, Rgb};
use serde::{Deserialize, Serialize};

/// A raw run of text as reported by the PDF decoder, one per
/// text-showing operation. Text is untrimmed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextRun {
    pub text: String,
    pub bbox: BBox,
    pub font_name: String,
    pub font_size: f32,
    pub color: Rgb,
}

impl TextRun {
    pub fn new(
        text: impl Into<String>,
        bbox: BBox,
        font_name: impl Into<String>,
        font_size: f32,
        color: Rgb,
    ) -> Self {
        Self {
            text: text.into(),
            bbox,
            font_name: font_name.into(),
            font_size,
            color,
        }
    }

    /// Whether the run shares font, size and colour with another run.
    pub fn same_style(&self, other: &TextRun) -> bool {
        self.font_name == other.font_name
            && self.font_size == other.font_size
            && self.color == other.color
    }
}

/// An extracted span of text with position and formatting metadata,
/// the unit the comparison engine matches across documents.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextUnit {
    /// Trimmed text; never empty when produced by the extractor
    pub text: String,
    /// Bounding box in page points (top-left origin)
    pub bbox: BBox,
    /// Normalized font name (e.g., "Helvetica-Bold")
    pub font_name: String,
    /// Effective font size in points
    pub font_size: f32,
    /// Fill colour
    pub color: Rgb,
}

impl TextUnit {
    /// Create a black text unit.
    pub fn new(
        text: impl Into<String>,
        bbox: BBox,
        font_name: impl Into<String>,
        font_size: f32,
    ) -> Self {
        Self {
            text: text.into(),
            bbox,
            font_name: font_name.into(),
            font_size,
            color: Rgb::BLACK,
        }
    }

    /// Set the fill colour.
    pub fn with_color(mut self, color: Rgb) -> Self {
        self.color = color;
        self
    }
}
