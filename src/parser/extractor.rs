//! Turns decoded text runs into comparable text units.

use unicode_normalization::UnicodeNormalization;

use crate::model::{DecodedPage, TextRun, TextUnit};

/// Runs whose baselines differ by less than this share a line.
const BASELINE_TOLERANCE: f32 = 0.5;

/// Gap bounds, as a fraction of the font size, for merging two runs.
const MAX_OVERLAP: f32 = 0.25;
const MAX_GAP: f32 = 1.0;

/// Gaps wider than this fraction of the font size read as a word break.
const WORD_GAP: f32 = 0.15;

/// Extracts [`TextUnit`]s from a [`DecodedPage`].
///
/// Units keep content-stream order. Text is NFC-normalized and trimmed;
/// runs that are empty after trimming are dropped.
#[derive(Debug, Clone, Copy)]
pub struct TextUnitExtractor {
    coalesce: bool,
}

impl TextUnitExtractor {
    /// Extractor that merges adjacent runs of one style on one line.
    pub fn new() -> Self {
        Self { coalesce: true }
    }

    /// Extractor that maps every run to its own unit.
    pub fn per_run() -> Self {
        Self { coalesce: false }
    }

    /// Enable or disable run coalescing.
    pub fn with_coalesce(mut self, coalesce: bool) -> Self {
        self.coalesce = coalesce;
        self
    }

    /// Extract the page's units.
    pub fn extract(&self, page: &DecodedPage) -> Vec<TextUnit> {
        let runs = if self.coalesce {
            coalesce_runs(&page.runs)
        } else {
            page.runs.clone()
        };

        runs.into_iter().filter_map(to_unit).collect()
    }
}

impl Default for TextUnitExtractor {
    fn default() -> Self {
        Self::new()
    }
}

fn to_unit(run: TextRun) -> Option<TextUnit> {
    let text: String = run.text.nfc().collect();
    let text = text.trim();
    if text.is_empty() {
        return None;
    }
    Some(TextUnit::new(text, run.bbox, run.font_name, run.font_size).with_color(run.color))
}

/// Whether `next` continues `current` on the same line.
fn continues(current: &TextRun, next: &TextRun) -> bool {
    if !current.same_style(next) {
        return false;
    }
    let size = current.font_size.max(f32::EPSILON);
    let gap = next.bbox.x0 - current.bbox.x1;
    (current.bbox.y1 - next.bbox.y1).abs() < BASELINE_TOLERANCE
        && gap >= -MAX_OVERLAP * size
        && gap <= MAX_GAP * size
}

fn coalesce_runs(runs: &[TextRun]) -> Vec<TextRun> {
    let mut merged: Vec<TextRun> = Vec::with_capacity(runs.len());

    for run in runs {
        if let Some(current) = merged.last_mut() {
            if continues(current, run) {
                let gap = run.bbox.x0 - current.bbox.x1;
                let needs_space = gap > WORD_GAP * current.font_size
                    && !current.text.ends_with(char::is_whitespace)
                    && !run.text.starts_with(char::is_whitespace);
                if needs_space {
                    current.text.push(' ');
                }
                current.text.push_str(&run.text);
                current.bbox = current.bbox.union(&run.bbox);
                continue;
            }
        }
        merged.push(run.clone());
    }

    merged
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{BBox, Rgb};

    fn run(text: &str, x0: f32, x1: f32, y: f32) -> TextRun {
        TextRun::new(text, BBox::new(x0, y, x1, y + 10.0), "Helvetica", 10.0, Rgb::BLACK)
    }

    fn page(runs: Vec<TextRun>) -> DecodedPage {
        let mut page = DecodedPage::letter(1);
        for r in runs {
            page.add_run(r);
        }
        page
    }

    #[test]
    fn test_adjacent_runs_merge() {
        let units = TextUnitExtractor::new().extract(&page(vec![
            run("Hel", 0.0, 15.0, 100.0),
            run("lo", 15.0, 25.0, 100.0),
            run("World", 30.0, 55.0, 100.0),
        ]));
        assert_eq!(units.len(), 1);
        assert_eq!(units[0].text, "Hello World");
        assert_eq!(units[0].bbox, BBox::new(0.0, 100.0, 55.0, 110.0));
    }

    #[test]
    fn test_style_or_line_change_splits() {
        let mut bold = run("Bold", 25.0, 45.0, 100.0);
        bold.font_name = "Helvetica-Bold".to_string();
        let units = TextUnitExtractor::new().extract(&page(vec![
            run("Plain", 0.0, 25.0, 100.0),
            bold,
            run("Next line", 0.0, 45.0, 114.0),
            run("Far away", 300.0, 340.0, 114.0),
        ]));
        let texts: Vec<&str> = units.iter().map(|u| u.text.as_str()).collect();
        assert_eq!(texts, vec!["Plain", "Bold", "Next line", "Far away"]);
    }

    #[test]
    fn test_per_run_keeps_runs() {
        let units = TextUnitExtractor::per_run().extract(&page(vec![
            run("Hel", 0.0, 15.0, 100.0),
            run("lo", 15.0, 25.0, 100.0),
        ]));
        assert_eq!(units.len(), 2);
    }

    #[test]
    fn test_whitespace_runs_dropped_and_text_trimmed() {
        let units = TextUnitExtractor::per_run().extract(&page(vec![
            run("   ", 0.0, 15.0, 100.0),
            run("  padded  ", 0.0, 50.0, 200.0),
        ]));
        assert_eq!(units.len(), 1);
        assert_eq!(units[0].text, "padded");
    }

    #[test]
    fn test_nfc_normalization() {
        // "e" + combining acute accent
        let units = TextUnitExtractor::per_run().extract(&page(vec![run(
            "caf\u{0065}\u{0301}",
            0.0,
            20.0,
            100.0,
        )]));
        assert_eq!(units[0].text, "caf\u{00E9}");
    }

    #[test]
    fn test_colour_carried_to_unit() {
        let mut red = run("Alert", 0.0, 25.0, 100.0);
        red.color = Rgb::new(1.0, 0.0, 0.0);
        let units = TextUnitExtractor::new().extract(&page(vec![red]));
        assert_eq!(units[0].color, Rgb::new(1.0, 0.0, 0.0));
    }
}
