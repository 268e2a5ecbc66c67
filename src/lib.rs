//! # pdfdiff
//!
//! Page-level content diff for PDF documents.
//!
//! Two versions of a document are decoded into positioned text units, the
//! units of each page pair are matched by text similarity and position, and
//! every page with differences gets a PNG with the changed, added and
//! removed regions highlighted.
//!
//! ## Quick Start
//!
//! ```no_run
//! use pdfdiff::PdfDiff;
//!
//! fn main() -> pdfdiff::Result<()> {
//!     let report = PdfDiff::new()
//!         .with_similarity_threshold(0.8)
//!         .with_position_tolerance(5.0)
//!         .run("original.pdf", "modified.pdf", "diff-output")?;
//!
//!     for page in report.pages_with_differences() {
//!         println!("page {}: {} differences", page.page, page.differences.len());
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - **Text matching**: normalized edit-distance similarity plus position tolerance
//! - **Formatting checks**: font, size and colour changes, optionally ignored
//! - **Highlight images**: one PNG per page with differences, drawn over the
//!   pdfium-rendered page with the `pdfium` feature or a layout wireframe
//!   without it
//! - **JSON reports**: serializable per-page difference lists
//! - **Parallel processing**: optional Rayon dispatch over pages

pub mod compare;
pub mod detect;
pub mod error;
pub mod model;
pub mod parser;
pub mod render;

// Re-export commonly used types
pub use compare::{compare_documents, CompareOptions, GreedyMatcher, PageMatcher};
pub use detect::{detect_header_from_bytes, detect_header_from_path, is_pdf_bytes, PdfHeader};
pub use error::{Error, Result};
pub use model::{
    BBox, ComparisonReport, DecodedPage, Difference, DifferenceDetail, DifferenceKind,
    FailureStage, FormatAttribute, HighlightRegion, PageFailure, PageResult, PageSummary, Rgb,
    TextRun, TextUnit,
};
pub use parser::{ErrorMode, FontNameTable, PageSelection, ParseOptions, PdfBackend, PdfParser};
pub use render::{
    BackgroundPolicy, HighlightRenderer, HighlightStyle, JsonFormat, LayoutRasterizer,
    PageRasterizer, RenderOptions,
};
#[cfg(feature = "pdfium")]
pub use render::PdfiumRasterizer;

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use rayon::prelude::*;

/// Compare two PDF files with default options, writing difference images
/// into `output_dir`.
///
/// # Example
///
/// ```no_run
/// use pdfdiff::compare_files;
///
/// let report = compare_files("v1.pdf", "v2.pdf", "out").unwrap();
/// println!("{} differences", report.difference_count());
/// ```
pub fn compare_files<P, Q, R>(original: P, modified: Q, output_dir: R) -> Result<ComparisonReport>
where
    P: AsRef<Path>,
    Q: AsRef<Path>,
    R: AsRef<Path>,
{
    PdfDiff::new().run(original, modified, output_dir)
}

/// Extract the text units of one page (1-indexed) of a PDF file.
pub fn extract_units<P: AsRef<Path>>(path: P, page: u32) -> Result<Vec<TextUnit>> {
    PdfParser::open(path)?.extract_units(page)
}

/// Builder for a full comparison run.
pub struct PdfDiff {
    parse_options: ParseOptions,
    compare_options: CompareOptions,
    render_options: RenderOptions,
    rasterizer: Box<dyn PageRasterizer>,
    matcher: Box<dyn PageMatcher>,
}

impl PdfDiff {
    /// Create a new builder with default options.
    pub fn new() -> Self {
        Self {
            parse_options: ParseOptions::default(),
            compare_options: CompareOptions::default(),
            render_options: RenderOptions::default(),
            rasterizer: render::default_rasterizer(),
            matcher: Box::new(GreedyMatcher::new()),
        }
    }

    /// Record pages that fail to decode instead of aborting.
    pub fn lenient(mut self) -> Self {
        self.parse_options = self.parse_options.lenient();
        self
    }

    /// Set the minimum text similarity for pairing units.
    pub fn with_similarity_threshold(mut self, threshold: f64) -> Self {
        self.compare_options = self.compare_options.with_similarity_threshold(threshold);
        self
    }

    /// Set the maximum top-left distance, in points, for pairing units.
    pub fn with_position_tolerance(mut self, tolerance: f64) -> Self {
        self.compare_options = self.compare_options.with_position_tolerance(tolerance);
        self
    }

    /// Do not report font, size or colour changes.
    pub fn ignore_formatting(mut self) -> Self {
        self.compare_options = self.compare_options.ignore_formatting();
        self
    }

    /// Process pages in parallel.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.compare_options = self.compare_options.with_parallel(parallel);
        self
    }

    /// Set page selection.
    pub fn with_pages(mut self, pages: PageSelection) -> Self {
        self.parse_options = self.parse_options.with_pages(pages);
        self
    }

    /// Set the rasterization scale in pixels per point.
    pub fn with_scale(mut self, scale: f32) -> Self {
        self.render_options = self.render_options.with_scale(scale);
        self
    }

    /// Set which page is drawn beneath the highlights.
    pub fn with_background(mut self, background: BackgroundPolicy) -> Self {
        self.render_options = self.render_options.with_background(background);
        self
    }

    /// Set the font name table.
    pub fn with_font_names(mut self, table: FontNameTable) -> Self {
        self.parse_options = self.parse_options.with_font_names(table);
        self
    }

    /// Replace the parse options.
    pub fn with_parse_options(mut self, options: ParseOptions) -> Self {
        self.parse_options = options;
        self
    }

    /// Replace the compare options.
    pub fn with_compare_options(mut self, options: CompareOptions) -> Self {
        self.compare_options = options;
        self
    }

    /// Replace the render options.
    pub fn with_render_options(mut self, options: RenderOptions) -> Self {
        self.render_options = options;
        self
    }

    /// Use a different page rasterizer.
    pub fn with_rasterizer<T: PageRasterizer + 'static>(mut self, rasterizer: T) -> Self {
        self.rasterizer = Box::new(rasterizer);
        self
    }

    /// Use a different matching strategy.
    pub fn with_matcher<T: PageMatcher + 'static>(mut self, matcher: T) -> Self {
        self.matcher = Box::new(matcher);
        self
    }

    /// Compare two PDF files, writing difference images into `output_dir`.
    ///
    /// Options are validated before either file is opened.
    pub fn run<P, Q, R>(&self, original: P, modified: Q, output_dir: R) -> Result<ComparisonReport>
    where
        P: AsRef<Path>,
        Q: AsRef<Path>,
        R: AsRef<Path>,
    {
        self.validate()?;
        let original = PdfParser::open_with_options(original, self.parse_options.clone())?;
        let modified = PdfParser::open_with_options(modified, self.parse_options.clone())?;
        self.compare_parsers(&original, &modified, output_dir.as_ref())
    }

    /// Compare two in-memory PDF documents.
    pub fn run_bytes<R: AsRef<Path>>(
        &self,
        original: &[u8],
        modified: &[u8],
        output_dir: R,
    ) -> Result<ComparisonReport> {
        self.validate()?;
        let original = PdfParser::from_bytes_with_options(original, self.parse_options.clone())?;
        let modified = PdfParser::from_bytes_with_options(modified, self.parse_options.clone())?;
        self.compare_parsers(&original, &modified, output_dir.as_ref())
    }

    /// Compare two opened documents page by page.
    pub fn compare_parsers<A: PdfBackend, B: PdfBackend>(
        &self,
        original: &PdfParser<A>,
        modified: &PdfParser<B>,
        output_dir: &Path,
    ) -> Result<ComparisonReport> {
        self.validate()?;
        std::fs::create_dir_all(output_dir)?;

        let pages: Vec<u32> = original
            .page_numbers()
            .into_iter()
            .chain(modified.page_numbers())
            .filter(|n| self.parse_options.pages.includes(*n))
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();

        log::info!(
            "comparing {} pages ({} original, {} modified)",
            pages.len(),
            original.page_count(),
            modified.page_count()
        );

        let process = |page: u32| self.process_page(page, original, modified, output_dir);
        let outcomes: Vec<PageOutcome> = if self.compare_options.parallel {
            pages
                .into_par_iter()
                .map(process)
                .collect::<Vec<_>>()
                .into_iter()
                .collect::<Result<_>>()?
        } else {
            pages.into_iter().map(process).collect::<Result<_>>()?
        };

        let mut report = ComparisonReport {
            original_pages: original.page_count(),
            modified_pages: modified.page_count(),
            ..ComparisonReport::default()
        };
        for outcome in outcomes {
            report.pages.extend(outcome.summary);
            report.failures.extend(outcome.failure);
        }

        log::info!(
            "{} differences on {} pages, {} images written, {} failures",
            report.difference_count(),
            report.pages_with_differences().count(),
            report.images().len(),
            report.failures.len()
        );
        Ok(report)
    }

    fn validate(&self) -> Result<()> {
        self.compare_options.validate()?;
        self.render_options.validate()
    }

    /// Decode, compare and (if needed) render one page pair.
    fn process_page<A: PdfBackend, B: PdfBackend>(
        &self,
        page: u32,
        original: &PdfParser<A>,
        modified: &PdfParser<B>,
        output_dir: &Path,
    ) -> Result<PageOutcome> {
        let (original_page, modified_page) = match decode_pair(original, modified, page) {
            Ok(pages) => pages,
            Err(e) if self.parse_options.error_mode == ErrorMode::Lenient => {
                log::warn!("page {}: decode failed: {}", page, e);
                return Ok(PageOutcome::failed(page, FailureStage::Decode, &e));
            }
            Err(e) => return Err(e),
        };

        let original_units = original_page
            .as_ref()
            .map(|p| original.extractor().extract(p))
            .unwrap_or_default();
        let modified_units = modified_page
            .as_ref()
            .map(|p| modified.extractor().extract(p))
            .unwrap_or_default();

        let differences = compare::compare_pages_with(
            &*self.matcher,
            &original_units,
            &modified_units,
            &self.compare_options,
        );
        let result = compare::decide(page, differences);

        let mut outcome = PageOutcome {
            summary: None,
            failure: None,
        };
        let mut image = None;
        if result.has_differences {
            let original_side = original_page.as_ref().map(|p| (p, original.source()));
            let modified_side = modified_page.as_ref().map(|p| (p, modified.source()));
            let background = match self.render_options.background {
                BackgroundPolicy::PreferModified => modified_side.or(original_side),
                BackgroundPolicy::PreferOriginal => original_side.or(modified_side),
            };
            let rendered =
                background.map(|(bg, source)| self.render_page(bg, source, &result, output_dir));
            match rendered {
                Some(Ok(path)) => image = Some(path),
                Some(Err(e)) => {
                    log::warn!("page {}: render failed: {}", page, e);
                    outcome.failure = Some(PageFailure {
                        page,
                        stage: FailureStage::Render,
                        message: e.to_string(),
                    });
                }
                None => {}
            }
        }

        outcome.summary = Some(PageSummary {
            page,
            differences: result.differences,
            image,
        });
        Ok(outcome)
    }

    fn render_page(
        &self,
        background: &DecodedPage,
        source: Option<&[u8]>,
        result: &PageResult,
        output_dir: &Path,
    ) -> Result<PathBuf> {
        let scale = self.render_options.scale;
        let image = self.rasterizer.render_page_image(background, source, scale)?;
        let path = output_dir.join(render::output_file_name(result.page));
        HighlightRenderer::new(self.render_options.style, scale).render_to_file(
            &image,
            &result.regions(),
            &path,
        )?;
        Ok(path)
    }
}

impl Default for PdfDiff {
    fn default() -> Self {
        Self::new()
    }
}

/// Per-page contribution to the report.
struct PageOutcome {
    summary: Option<PageSummary>,
    failure: Option<PageFailure>,
}

impl PageOutcome {
    fn failed(page: u32, stage: FailureStage, error: &Error) -> Self {
        Self {
            summary: None,
            failure: Some(PageFailure {
                page,
                stage,
                message: error.to_string(),
            }),
        }
    }
}

/// Decode a page from both documents.
fn decode_pair<A: PdfBackend, B: PdfBackend>(
    original: &PdfParser<A>,
    modified: &PdfParser<B>,
    page: u32,
) -> Result<(Option<DecodedPage>, Option<DecodedPage>)> {
    Ok((decode_side(original, page)?, decode_side(modified, page)?))
}

/// Decode a page if the document has it; a missing page is `None`.
fn decode_side<B: PdfBackend>(parser: &PdfParser<B>, page: u32) -> Result<Option<DecodedPage>> {
    if page > parser.page_count() {
        return Ok(None);
    }
    parser.decode_page(page).map(Some)
}
