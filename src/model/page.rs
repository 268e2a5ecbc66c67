//! Page-level types.

use super::TextRun;
use serde::{Deserialize, Serialize};

/// A single decoded page: its size and the text runs found on it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecodedPage {
    /// Page number (1-indexed)
    pub number: u32,

    /// Page width in points (1 point = 1/72 inch)
    pub width: f32,

    /// Page height in points
    pub height: f32,

    /// Text runs in content-stream order
    pub runs: Vec<TextRun>,
}

impl DecodedPage {
    /// Create an empty page with the given dimensions.
    pub fn new(number: u32, width: f32, height: f32) -> Self {
        Self {
            number,
            width,
            height,
            runs: Vec::new(),
        }
    }

    /// Create an empty page with standard Letter size (8.5 x 11 inches).
    pub fn letter(number: u32) -> Self {
        Self::new(number, 612.0, 792.0)
    }

    /// Add a run to the page.
    pub fn add_run(&mut self, run: TextRun) {
        self.runs.push(run);
    }

    /// Builder-style variant of [`DecodedPage::add_run`].
    pub fn with_run(mut self, run: TextRun) -> Self {
        self.runs.push(run);
        self
    }

    /// Check if the page has no text runs.
    pub fn is_empty(&self) -> bool {
        self.runs.is_empty()
    }

    /// Get page dimensions as (width, height) tuple.
    pub fn dimensions(&self) -> (f32, f32) {
        (self.width, self.height)
    }
}
