//! Difference highlighting and image output.

use std::path::Path;

use image::{ImageFormat, RgbaImage};
use tiny_skia::{Paint, PathBuilder, Pixmap, Rect, Stroke, Transform};

use super::options::HighlightStyle;
use super::rasterizer::{image_to_pixmap, pixmap_to_image};
use crate::error::Result;
use crate::model::HighlightRegion;

/// File name of a page's difference image.
pub fn output_file_name(page: u32) -> String {
    format!("page_{}_differences.png", page)
}

/// Draws highlight regions over a page image.
///
/// Text and formatting changes get a translucent fill; every region gets an
/// outline. Regions are given in page points and scaled to pixels.
#[derive(Debug, Clone)]
pub struct HighlightRenderer {
    style: HighlightStyle,
    scale: f32,
}

impl HighlightRenderer {
    pub fn new(style: HighlightStyle, scale: f32) -> Self {
        Self { style, scale }
    }

    /// Return a copy of `image` with every region highlighted.
    pub fn draw_regions(&self, image: &RgbaImage, regions: &[HighlightRegion]) -> Result<RgbaImage> {
        let mut pixmap = image_to_pixmap(image)?;
        for region in regions {
            self.draw_highlight(&mut pixmap, region);
        }
        Ok(pixmap_to_image(&pixmap))
    }

    /// Draw a single region.
    pub fn draw_highlight(&self, pixmap: &mut Pixmap, region: &HighlightRegion) {
        let Some(rect) = self.pixel_rect(region) else {
            return;
        };

        if region.kind.is_change() {
            let [r, g, b, a] = self.style.change_fill;
            let mut fill = Paint::default();
            fill.set_color_rgba8(r, g, b, a);
            pixmap.fill_rect(rect, &fill, Transform::identity(), None);
        }

        if self.style.outline_width > 0.0 {
            let [r, g, b, a] = self.style.outline;
            let mut outline = Paint::default();
            outline.set_color_rgba8(r, g, b, a);
            let stroke = Stroke {
                width: self.style.outline_width,
                ..Stroke::default()
            };
            let path = PathBuilder::from_rect(rect);
            pixmap.stroke_path(&path, &outline, &stroke, Transform::identity(), None);
        }
    }

    /// Highlight and write a PNG.
    pub fn render_to_file(
        &self,
        image: &RgbaImage,
        regions: &[HighlightRegion],
        path: &Path,
    ) -> Result<()> {
        let highlighted = self.draw_regions(image, regions)?;
        save(&highlighted, path)
    }

    /// Region in pixels, widened to at least one pixel per side.
    fn pixel_rect(&self, region: &HighlightRegion) -> Option<Rect> {
        let b = region.bbox.scaled(self.scale);
        let x1 = b.x1.max(b.x0 + 1.0);
        let y1 = b.y1.max(b.y0 + 1.0);
        Rect::from_ltrb(b.x0, b.y0, x1, y1)
    }
}

/// Write an image as PNG.
pub fn save(image: &RgbaImage, path: &Path) -> Result<()> {
    image.save_with_format(path, ImageFormat::Png)?;
    log::debug!("wrote {}", path.display());
    Ok(())
}
