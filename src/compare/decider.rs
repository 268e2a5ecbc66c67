//! Per-page rendering decision.

use crate::model::{Difference, PageResult};

/// Wrap a page's differences into a [`PageResult`].
///
/// A page is queued for rendering iff it has at least one difference; pages
/// without differences never produce an output file.
pub fn decide(page: u32, differences: Vec<Difference>) -> PageResult {
    let has_differences = !differences.is_empty();
    if has_differences {
        log::debug!("page {}: {} differences", page, differences.len());
    }
    PageResult {
        page,
        differences,
        has_differences,
    }
}
