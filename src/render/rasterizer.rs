//! Page rasterization.

use std::sync::Arc;

use image::RgbaImage;
use tiny_skia::{Color, Paint, PathBuilder, Pixmap, Rect, Stroke, Transform};

use crate::error::{Error, Result};
use crate::model::DecodedPage;

/// Produces the background image a page's highlights are drawn on.
///
/// `document` holds the raw bytes of the PDF the page was decoded from,
/// when the parser kept them.
pub trait PageRasterizer: Send + Sync {
    /// Render a page at `scale` pixels per point.
    fn render_page_image(
        &self,
        page: &DecodedPage,
        document: Option<&[u8]>,
        scale: f32,
    ) -> Result<RgbaImage>;
}

impl<R: PageRasterizer + ?Sized> PageRasterizer for Arc<R> {
    fn render_page_image(
        &self,
        page: &DecodedPage,
        document: Option<&[u8]>,
        scale: f32,
    ) -> Result<RgbaImage> {
        (**self).render_page_image(page, document, scale)
    }
}

/// The rasterizer a comparison uses unless told otherwise: pdfium when
/// built with the `pdfium` feature and the library can be bound, the layout
/// wireframe otherwise.
#[cfg(feature = "pdfium")]
pub fn default_rasterizer() -> Box<dyn PageRasterizer> {
    match super::pdfium::PdfiumRasterizer::shared() {
        Some(rasterizer) => Box::new(rasterizer),
        None => Box::new(LayoutRasterizer::new()),
    }
}

/// The rasterizer a comparison uses unless told otherwise.
#[cfg(not(feature = "pdfium"))]
pub fn default_rasterizer() -> Box<dyn PageRasterizer> {
    Box::new(LayoutRasterizer::new())
}

/// Fallback rasterizer that draws a layout wireframe: a white page with
/// every text run's box outlined in light grey. Needs no document bytes.
#[derive(Debug, Clone, Copy)]
pub struct LayoutRasterizer {
    run_outline: [u8; 4],
}

impl LayoutRasterizer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the run outline colour.
    pub fn with_run_outline(mut self, rgba: [u8; 4]) -> Self {
        self.run_outline = rgba;
        self
    }
}

impl Default for LayoutRasterizer {
    fn default() -> Self {
        Self {
            run_outline: [200, 200, 200, 255],
        }
    }
}

impl PageRasterizer for LayoutRasterizer {
    fn render_page_image(
        &self,
        page: &DecodedPage,
        _document: Option<&[u8]>,
        scale: f32,
    ) -> Result<RgbaImage> {
        let width = pixel_extent(page.width, scale);
        let height = pixel_extent(page.height, scale);
        let mut pixmap = Pixmap::new(width, height).ok_or_else(|| {
            Error::Render(format!(
                "cannot allocate {}x{} image for page {}",
                width, height, page.number
            ))
        })?;
        pixmap.fill(Color::WHITE);

        let [r, g, b, a] = self.run_outline;
        let mut paint = Paint::default();
        paint.set_color_rgba8(r, g, b, a);
        let stroke = Stroke {
            width: 1.0,
            ..Stroke::default()
        };

        for run in &page.runs {
            let bbox = run.bbox.scaled(scale);
            let Some(rect) = Rect::from_ltrb(bbox.x0, bbox.y0, bbox.x1, bbox.y1) else {
                continue;
            };
            let path = PathBuilder::from_rect(rect);
            pixmap.stroke_path(&path, &paint, &stroke, Transform::identity(), None);
        }

        Ok(pixmap_to_image(&pixmap))
    }
}

/// Image size in pixels for a page extent in points; at least one pixel.
pub(crate) fn pixel_extent(points: f32, scale: f32) -> u32 {
    ((points * scale).ceil() as u32).max(1)
}

/// Convert a premultiplied pixmap to a straight-alpha RGBA image.
pub(crate) fn pixmap_to_image(pixmap: &Pixmap) -> RgbaImage {
    let data: Vec<u8> = pixmap
        .pixels()
        .iter()
        .flat_map(|p| {
            let c = p.demultiply();
            [c.red(), c.green(), c.blue(), c.alpha()]
        })
        .collect();
    // Buffer length always matches the pixmap dimensions
    RgbaImage::from_raw(pixmap.width(), pixmap.height(), data)
        .unwrap_or_else(|| RgbaImage::new(pixmap.width(), pixmap.height()))
}

/// Convert a straight-alpha RGBA image to a premultiplied pixmap.
pub(crate) fn image_to_pixmap(image: &RgbaImage) -> Result<Pixmap> {
    let mut pixmap = Pixmap::new(image.width(), image.height()).ok_or_else(|| {
        Error::Render(format!(
            "cannot allocate {}x{} pixmap",
            image.width(),
            image.height()
        ))
    })?;
    for (dst, src) in pixmap.pixels_mut().iter_mut().zip(image.pixels()) {
        let [r, g, b, a] = src.0;
        *dst = tiny_skia::ColorU8::from_rgba(r, g, b, a).premultiply();
    }
    Ok(pixmap)
}
