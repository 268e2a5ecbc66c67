//! Per-page comparison results and the run-level report.

use std::path::PathBuf;

use super::{BBox, Difference, DifferenceKind};
use serde::{Deserialize, Serialize};

/// A region to highlight on a rendered page.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HighlightRegion {
    pub bbox: BBox,
    pub kind: DifferenceKind,
}

/// Outcome of comparing one page pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageResult {
    /// Page number (1-indexed)
    pub page: u32,
    /// Differences ordered by region top-left y, then x
    pub differences: Vec<Difference>,
    /// Whether the page needs a difference image
    pub has_differences: bool,
}

impl PageResult {
    /// Regions the renderer should draw, in difference order.
    pub fn regions(&self) -> Vec<HighlightRegion> {
        self.differences
            .iter()
            .map(|d| HighlightRegion {
                bbox: d.region,
                kind: d.kind,
            })
            .collect()
    }

    /// Number of differences of a given kind.
    pub fn count(&self, kind: DifferenceKind) -> usize {
        self.differences.iter().filter(|d| d.kind == kind).count()
    }
}

/// Pipeline stage at which a page failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureStage {
    /// Decoding the page's content from either document
    Decode,
    /// Rasterizing, highlighting or writing the image
    Render,
}

/// A page that could not be fully processed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageFailure {
    pub page: u32,
    pub stage: FailureStage,
    pub message: String,
}

/// Report entry for a compared page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageSummary {
    pub page: u32,
    pub differences: Vec<Difference>,
    /// Path of the written difference image, if any
    pub image: Option<PathBuf>,
}

/// Result of comparing two documents end to end.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ComparisonReport {
    /// Page count of the original document
    pub original_pages: u32,
    /// Page count of the modified document
    pub modified_pages: u32,
    /// Every compared page, in page order
    pub pages: Vec<PageSummary>,
    /// Pages that failed to decode or render
    pub failures: Vec<PageFailure>,
}

impl ComparisonReport {
    /// Pages with at least one difference.
    pub fn pages_with_differences(&self) -> impl Iterator<Item = &PageSummary> {
        self.pages.iter().filter(|p| !p.differences.is_empty())
    }

    /// Total number of differences across all pages.
    pub fn difference_count(&self) -> usize {
        self.pages.iter().map(|p| p.differences.len()).sum()
    }

    /// Paths of all written difference images.
    pub fn images(&self) -> Vec<&PathBuf> {
        self.pages.iter().filter_map(|p| p.image.as_ref()).collect()
    }

    /// No differences and no failures.
    pub fn is_identical(&self) -> bool {
        self.difference_count() == 0 && self.failures.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_result() -> PageResult {
        PageResult {
            page: 2,
            differences: vec![
                Difference::removed(BBox::new(0.0, 0.0, 10.0, 10.0), "a"),
                Difference::added(BBox::new(0.0, 20.0, 10.0, 30.0), "b"),
            ],
            has_differences: true,
        }
    }

    #[test]
    fn test_regions_follow_differences() {
        let regions = sample_result().regions();
        assert_eq!(regions.len(), 2);
        assert_eq!(regions[0].kind, DifferenceKind::Removed);
        assert_eq!(regions[1].bbox, BBox::new(0.0, 20.0, 10.0, 30.0));
    }

    #[test]
    fn test_report_counts() {
        let result = sample_result();
        let report = ComparisonReport {
            original_pages: 2,
            modified_pages: 2,
            pages: vec![
                PageSummary {
                    page: 1,
                    differences: vec![],
                    image: None,
                },
                PageSummary {
                    page: 2,
                    differences: result.differences,
                    image: Some(PathBuf::from("out/page_2_differences.png")),
                },
            ],
            failures: vec![],
        };
        assert_eq!(report.difference_count(), 2);
        assert_eq!(report.pages_with_differences().count(), 1);
        assert_eq!(report.images().len(), 1);
        assert!(!report.is_identical());
    }
}
