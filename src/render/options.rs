//! Rendering options and configuration.

use crate::error::{Error, Result};

/// Default rasterization scale in pixels per point.
pub const DEFAULT_SCALE: f32 = 3.0;

/// Options for rendering difference images.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderOptions {
    /// Pixels per PDF point
    pub scale: f32,

    /// Which document's page is drawn beneath the highlights
    pub background: BackgroundPolicy,

    /// Highlight colours and outline width
    pub style: HighlightStyle,
}

impl RenderOptions {
    /// Create new render options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the rasterization scale.
    pub fn with_scale(mut self, scale: f32) -> Self {
        self.scale = scale;
        self
    }

    /// Set the background policy.
    pub fn with_background(mut self, background: BackgroundPolicy) -> Self {
        self.background = background;
        self
    }

    /// Set the highlight style.
    pub fn with_style(mut self, style: HighlightStyle) -> Self {
        self.style = style;
        self
    }

    /// Check that the scale is a positive finite number.
    pub fn validate(&self) -> Result<()> {
        if !self.scale.is_finite() || self.scale <= 0.0 {
            return Err(Error::InvalidConfig(format!(
                "render scale must be positive, got {}",
                self.scale
            )));
        }
        if !self.style.outline_width.is_finite() || self.style.outline_width < 0.0 {
            return Err(Error::InvalidConfig(format!(
                "outline width must be non-negative, got {}",
                self.style.outline_width
            )));
        }
        Ok(())
    }
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            scale: DEFAULT_SCALE,
            background: BackgroundPolicy::default(),
            style: HighlightStyle::default(),
        }
    }
}

/// Which page a difference image is drawn on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BackgroundPolicy {
    /// The modified page, or the original one when the modified document
    /// has no such page
    #[default]
    PreferModified,
    /// The original page, or the modified one when the original document
    /// has no such page
    PreferOriginal,
}

/// Highlight colours as straight (non-premultiplied) RGBA.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HighlightStyle {
    /// Fill for changed text and formatting
    pub change_fill: [u8; 4],
    /// Outline drawn around every region
    pub outline: [u8; 4],
    /// Outline width in pixels
    pub outline_width: f32,
}

impl Default for HighlightStyle {
    fn default() -> Self {
        Self {
            change_fill: [255, 255, 0, 80],
            outline: [255, 0, 0, 255],
            outline_width: 3.0,
        }
    }
}
