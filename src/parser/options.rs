//! Parsing options and configuration.

use std::ops::RangeInclusive;

use super::fonts::FontNameTable;
use crate::error::{Error, Result};

/// Options for decoding PDF documents into text units.
#[derive(Debug, Clone)]
pub struct ParseOptions {
    /// Error handling mode
    pub error_mode: ErrorMode,

    /// Page selection (which pages to compare)
    pub pages: PageSelection,

    /// Font name normalization applied to every run
    pub font_names: FontNameTable,

    /// Merge adjacent runs of one style into a single unit
    pub coalesce_runs: bool,
}

impl ParseOptions {
    /// Create new parse options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set error mode.
    pub fn with_error_mode(mut self, mode: ErrorMode) -> Self {
        self.error_mode = mode;
        self
    }

    /// Enable lenient mode: a page that fails to decode is recorded and
    /// skipped instead of aborting the run.
    pub fn lenient(mut self) -> Self {
        self.error_mode = ErrorMode::Lenient;
        self
    }

    /// Set page selection.
    pub fn with_pages(mut self, pages: PageSelection) -> Self {
        self.pages = pages;
        self
    }

    /// Set the font name table.
    pub fn with_font_names(mut self, table: FontNameTable) -> Self {
        self.font_names = table;
        self
    }

    /// Enable or disable run coalescing.
    pub fn with_coalesce_runs(mut self, coalesce: bool) -> Self {
        self.coalesce_runs = coalesce;
        self
    }
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            error_mode: ErrorMode::Strict,
            pages: PageSelection::All,
            font_names: FontNameTable::default(),
            coalesce_runs: true,
        }
    }
}

/// Error handling mode during parsing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ErrorMode {
    /// Fail on any error
    #[default]
    Strict,
    /// Skip invalid pages and continue
    Lenient,
}

/// Page selection (1-indexed).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum PageSelection {
    /// All pages
    #[default]
    All,
    /// A range of pages (inclusive)
    Range(RangeInclusive<u32>),
    /// Specific pages
    Pages(Vec<u32>),
}

impl PageSelection {
    /// Check if a page number should be included.
    pub fn includes(&self, page: u32) -> bool {
        match self {
            PageSelection::All => true,
            PageSelection::Range(range) => range.contains(&page),
            PageSelection::Pages(pages) => pages.contains(&page),
        }
    }

    /// Parse a page selection string (e.g., "1-10", "1,3,5,7-10").
    pub fn parse(s: &str) -> Result<Self> {
        let s = s.trim();

        if s.is_empty() || s == "all" {
            return Ok(PageSelection::All);
        }

        // Simple range (e.g., "1-10")
        if let Some((start, end)) = s.split_once('-') {
            if !start.contains(',') && !end.contains(',') {
                let (start, end) = parse_range(s, start, end)?;
                return Ok(PageSelection::Range(start..=end));
            }
        }

        // Comma-separated list with possible ranges
        let mut pages = Vec::new();
        for part in s.split(',') {
            let part = part.trim();
            if let Some((start, end)) = part.split_once('-') {
                let (start, end) = parse_range(s, start, end)?;
                pages.extend(start..=end);
            } else {
                pages.push(parse_page(s, part)?);
            }
        }

        pages.sort_unstable();
        pages.dedup();
        Ok(PageSelection::Pages(pages))
    }
}

fn parse_page(input: &str, part: &str) -> Result<u32> {
    match part.trim().parse::<u32>() {
        Ok(0) | Err(_) => Err(Error::InvalidPageRange(input.to_string())),
        Ok(page) => Ok(page),
    }
}

fn parse_range(input: &str, start: &str, end: &str) -> Result<(u32, u32)> {
    let start = parse_page(input, start)?;
    let end = parse_page(input, end)?;
    if start > end {
        return Err(Error::InvalidPageRange(input.to_string()));
    }
    Ok((start, end))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_options_builder() {
        let options = ParseOptions::new()
            .lenient()
            .with_coalesce_runs(false)
            .with_pages(PageSelection::Pages(vec![2]));

        assert_eq!(options.error_mode, ErrorMode::Lenient);
        assert!(!options.coalesce_runs);
        assert!(options.pages.includes(2));
        assert!(!options.pages.includes(1));
    }

    #[test]
    fn test_default_options() {
        let options = ParseOptions::default();
        assert_eq!(options.error_mode, ErrorMode::Strict);
        assert_eq!(options.pages, PageSelection::All);
        assert!(options.coalesce_runs);
    }

    #[test]
    fn test_page_selection_parse() {
        assert_eq!(PageSelection::parse("all").unwrap(), PageSelection::All);
        assert_eq!(PageSelection::parse("2-4").unwrap(), PageSelection::Range(2..=4));
        assert_eq!(
            PageSelection::parse("5, 1,3-4,3").unwrap(),
            PageSelection::Pages(vec![1, 3, 4, 5])
        );
    }

    #[test]
    fn test_page_selection_rejects_bad_input() {
        assert!(matches!(
            PageSelection::parse("0-3"),
            Err(Error::InvalidPageRange(_))
        ));
        assert!(PageSelection::parse("5-2").is_err());
        assert!(PageSelection::parse("1,x").is_err());
    }
}
