//! Page and document comparison entry points.

use rayon::prelude::*;

use super::classifier::classify;
use super::decider::decide;
use super::matcher::{GreedyMatcher, PageMatcher};
use super::options::CompareOptions;
use crate::error::Result;
use crate::model::{Difference, PageResult, TextUnit};

/// Compare the units of one original page against one modified page.
///
/// Assumes validated options; never fails.
pub fn compare_pages(
    original: &[TextUnit],
    modified: &[TextUnit],
    options: &CompareOptions,
) -> Vec<Difference> {
    compare_pages_with(&GreedyMatcher::new(), original, modified, options)
}

/// [`compare_pages`] with a caller-supplied matching strategy.
pub fn compare_pages_with<M: PageMatcher + ?Sized>(
    matcher: &M,
    original: &[TextUnit],
    modified: &[TextUnit],
    options: &CompareOptions,
) -> Vec<Difference> {
    let matching = matcher.match_units(original, modified, options);
    classify(&matching, original, modified, options)
}

/// Compare one page pair and decide whether it needs rendering.
pub fn compare_page(
    page: u32,
    original: &[TextUnit],
    modified: &[TextUnit],
    options: &CompareOptions,
) -> PageResult {
    decide(page, compare_pages(original, modified, options))
}

/// Compare two documents given as per-page unit sequences.
///
/// Page `n` (1-indexed) of the result compares `original_pages[n - 1]` with
/// `modified_pages[n - 1]`; a page missing from one side is compared against
/// an empty page. Options are validated before any page is processed.
///
/// # Example
///
/// ```
/// use pdfdiff::compare::{compare_documents, CompareOptions};
/// use pdfdiff::model::{BBox, TextUnit};
///
/// let original = vec![vec![TextUnit::new("Hello World", BBox::new(0.0, 0.0, 50.0, 10.0), "Arial", 12.0)]];
/// let modified = vec![vec![TextUnit::new("Hello World!", BBox::new(0.0, 0.0, 50.0, 10.0), "Arial", 12.0)]];
///
/// let results = compare_documents(&original, &modified, &CompareOptions::default()).unwrap();
/// assert!(results[0].has_differences);
/// ```
pub fn compare_documents(
    original_pages: &[Vec<TextUnit>],
    modified_pages: &[Vec<TextUnit>],
    options: &CompareOptions,
) -> Result<Vec<PageResult>> {
    compare_documents_with(&GreedyMatcher::new(), original_pages, modified_pages, options)
}

/// [`compare_documents`] with a caller-supplied matching strategy.
pub fn compare_documents_with<M: PageMatcher + ?Sized>(
    matcher: &M,
    original_pages: &[Vec<TextUnit>],
    modified_pages: &[Vec<TextUnit>],
    options: &CompareOptions,
) -> Result<Vec<PageResult>> {
    options.validate()?;

    let page_count = original_pages.len().max(modified_pages.len());
    let compare = |index: usize| {
        let original = original_pages.get(index).map(Vec::as_slice).unwrap_or(&[]);
        let modified = modified_pages.get(index).map(Vec::as_slice).unwrap_or(&[]);
        let page = index as u32 + 1;
        decide(page, compare_pages_with(matcher, original, modified, options))
    };

    let results: Vec<PageResult> = if options.parallel {
        (0..page_count).into_par_iter().map(compare).collect()
    } else {
        (0..page_count).map(compare).collect()
    };

    log::info!(
        "compared {} pages, {} with differences",
        results.len(),
        results.iter().filter(|r| r.has_differences).count()
    );
    Ok(results)
}
