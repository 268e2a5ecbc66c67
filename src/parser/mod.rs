//! PDF parsing module.

mod backend;
mod content;
mod extractor;
mod fonts;
mod options;
mod pdf_parser;

pub use backend::{
    decode_text_simple, BackendFontInfo, ContentOp, LopdfBackend, PageId, PdfBackend, PdfValue,
};
pub use content::{ContentInterpreter, Matrix};
pub use extractor::TextUnitExtractor;
pub use fonts::{FontMetrics, FontNameTable};
pub use options::{ErrorMode, PageSelection, ParseOptions};
pub use pdf_parser::PdfParser;
