//! Difference image rendering and report output.

mod highlight;
mod json;
mod options;
#[cfg(feature = "pdfium")]
mod pdfium;
mod rasterizer;

pub use highlight::{output_file_name, save, HighlightRenderer};
pub use json::{to_json, JsonFormat};
pub use options::{BackgroundPolicy, HighlightStyle, RenderOptions, DEFAULT_SCALE};
#[cfg(feature = "pdfium")]
pub use pdfium::PdfiumRasterizer;
pub use rasterizer::{default_rasterizer, LayoutRasterizer, PageRasterizer};
