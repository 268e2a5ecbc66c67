//! Page geometry and colour primitives.

use serde::{Deserialize, Serialize};

/// An axis-aligned bounding box in page points.
///
/// Coordinates use a top-left origin with y growing downward, so `(x0, y0)`
/// is the top-left corner and `(x1, y1)` the bottom-right corner.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct BBox {
    pub x0: f32,
    pub y0: f32,
    pub x1: f32,
    pub y1: f32,
}

impl BBox {
    /// Create a box from two corners, normalizing their order.
    pub fn new(x0: f32, y0: f32, x1: f32, y1: f32) -> Self {
        Self {
            x0: x0.min(x1),
            y0: y0.min(y1),
            x1: x0.max(x1),
            y1: y0.max(y1),
        }
    }

    /// Width in points.
    pub fn width(&self) -> f32 {
        self.x1 - self.x0
    }

    /// Height in points.
    pub fn height(&self) -> f32 {
        self.y1 - self.y0
    }

    /// The top-left corner, the anchor used for distances and ordering.
    pub fn top_left(&self) -> (f32, f32) {
        (self.x0, self.y0)
    }

    /// Smallest box containing both boxes.
    pub fn union(&self, other: &BBox) -> BBox {
        BBox {
            x0: self.x0.min(other.x0),
            y0: self.y0.min(other.y0),
            x1: self.x1.max(other.x1),
            y1: self.y1.max(other.y1),
        }
    }

    /// Scale every coordinate by `factor` (points to pixels).
    pub fn scaled(&self, factor: f32) -> BBox {
        BBox {
            x0: self.x0 * factor,
            y0: self.y0 * factor,
            x1: self.x1 * factor,
            y1: self.y1 * factor,
        }
    }
}

/// An RGB fill colour with components in `0.0..=1.0`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rgb {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Rgb {
    pub const BLACK: Rgb = Rgb::new(0.0, 0.0, 0.0);

    pub const fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    /// DeviceGray value.
    pub fn from_gray(gray: f32) -> Self {
        Self::new(gray, gray, gray)
    }

    /// Naive DeviceCMYK to RGB conversion.
    pub fn from_cmyk(c: f32, m: f32, y: f32, k: f32) -> Self {
        Self::new((1.0 - c) * (1.0 - k), (1.0 - m) * (1.0 - k), (1.0 - y) * (1.0 - k))
    }
}

impl Default for Rgb {
    fn default() -> Self {
        Self::BLACK
    }
}
