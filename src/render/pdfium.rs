//! Page rasterization through the pdfium library.

use std::sync::{Arc, Mutex, OnceLock};

use image::{imageops, Rgba, RgbaImage};
use pdfium_render::prelude::*;

use super::rasterizer::{pixel_extent, PageRasterizer};
use crate::error::{Error, Result};
use crate::model::DecodedPage;

/// Renders the real page content with pdfium.
///
/// Needs the bytes of the document the page came from; pages of a parser
/// built without a source cannot be rendered.
pub struct PdfiumRasterizer {
    pdfium: Mutex<Bound>,
}

struct Bound(Pdfium);

// SAFETY: the bindings are only reached while holding the mutex in
// PdfiumRasterizer, so calls into pdfium never overlap
unsafe impl Send for Bound {}

impl PdfiumRasterizer {
    /// Bind to pdfium in the working directory, then the system library.
    pub fn new() -> Result<Self> {
        let bindings = Pdfium::bind_to_library(Pdfium::pdfium_platform_library_name_at_path("./"))
            .or_else(|_| Pdfium::bind_to_system_library())
            .map_err(render_error)?;
        Ok(Self::with_pdfium(Pdfium::new(bindings)))
    }

    /// Bind to the pdfium library found in `dir`.
    pub fn from_library_dir(dir: &str) -> Result<Self> {
        let bindings = Pdfium::bind_to_library(Pdfium::pdfium_platform_library_name_at_path(dir))
            .map_err(render_error)?;
        Ok(Self::with_pdfium(Pdfium::new(bindings)))
    }

    /// Wrap an already bound pdfium instance.
    pub fn with_pdfium(pdfium: Pdfium) -> Self {
        Self {
            pdfium: Mutex::new(Bound(pdfium)),
        }
    }

    /// Process-wide instance, bound on first use. `None` when the library
    /// cannot be found.
    pub fn shared() -> Option<Arc<PdfiumRasterizer>> {
        static SHARED: OnceLock<Option<Arc<PdfiumRasterizer>>> = OnceLock::new();
        SHARED
            .get_or_init(|| match PdfiumRasterizer::new() {
                Ok(rasterizer) => Some(Arc::new(rasterizer)),
                Err(e) => {
                    log::warn!("pdfium unavailable: {}", e);
                    None
                }
            })
            .clone()
    }
}

impl PageRasterizer for PdfiumRasterizer {
    fn render_page_image(
        &self,
        page: &DecodedPage,
        document: Option<&[u8]>,
        scale: f32,
    ) -> Result<RgbaImage> {
        let bytes = document.ok_or_else(|| {
            Error::Render(format!("page {}: no source document to render", page.number))
        })?;
        let index = u16::try_from(page.number.saturating_sub(1)).map_err(|_| {
            Error::Render(format!("page {} exceeds pdfium's page limit", page.number))
        })?;

        let bound = self
            .pdfium
            .lock()
            .map_err(|_| Error::Render("pdfium lock poisoned".to_string()))?;
        let pdf = bound
            .0
            .load_pdf_from_byte_slice(bytes, None)
            .map_err(render_error)?;
        let pdf_page = pdf.pages().get(index).map_err(render_error)?;

        let config = PdfRenderConfig::new()
            .scale_page_by_factor(scale)
            .render_form_data(true);
        let bitmap = pdf_page.render_with_config(&config).map_err(render_error)?;
        let rendered = bitmap.as_image().into_rgba8();

        log::trace!(
            "page {}: pdfium rendered {}x{}",
            page.number,
            rendered.width(),
            rendered.height()
        );
        Ok(fit_to_page(rendered, page, scale))
    }
}

/// Place a rendered bitmap on a white canvas of the decoded page's pixel
/// size, so highlight coordinates line up even when pdfium rounds or uses
/// a different page box.
fn fit_to_page(rendered: RgbaImage, page: &DecodedPage, scale: f32) -> RgbaImage {
    let width = pixel_extent(page.width, scale);
    let height = pixel_extent(page.height, scale);
    if rendered.dimensions() == (width, height) {
        return rendered;
    }
    let mut canvas = RgbaImage::from_pixel(width, height, Rgba([255, 255, 255, 255]));
    imageops::overlay(&mut canvas, &rendered, 0, 0);
    canvas
}

fn render_error(err: PdfiumError) -> Error {
    Error::Render(format!("pdfium: {}", err))
}
