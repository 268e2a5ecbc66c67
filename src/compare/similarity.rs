//! Similarity and distance scores between two text units.
//!
//! These scores are independent of the matching strategy; the matcher only
//! compares them against thresholds and uses them for ordering.

use crate::model::{FormatAttribute, TextUnit};

/// Normalized Levenshtein ratio between the texts of two units.
///
/// Returns `1 - distance / max(len_a, len_b)` over Unicode scalar values, so
/// identical texts score 1.0 and texts sharing nothing score 0.0.
/// Case-sensitive.
pub fn text_similarity(a: &TextUnit, b: &TextUnit) -> f64 {
    similarity_ratio(&a.text, &b.text)
}

/// [`text_similarity`] on plain strings.
pub fn similarity_ratio(a: &str, b: &str) -> f64 {
    if a == b {
        return 1.0;
    }

    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    let longest = a.len().max(b.len());
    if longest == 0 {
        return 1.0;
    }

    1.0 - levenshtein(&a, &b) as f64 / longest as f64
}

/// Edit distance with unit costs, two-row dynamic programming.
fn levenshtein(a: &[char], b: &[char]) -> usize {
    if a.is_empty() {
        return b.len();
    }
    if b.is_empty() {
        return a.len();
    }

    let mut previous: Vec<usize> = (0..=b.len()).collect();
    let mut current = vec![0; b.len() + 1];

    for (i, ca) in a.iter().enumerate() {
        current[0] = i + 1;
        for (j, cb) in b.iter().enumerate() {
            let substitution = previous[j] + usize::from(ca != cb);
            let insertion = current[j] + 1;
            let deletion = previous[j + 1] + 1;
            current[j + 1] = substitution.min(insertion).min(deletion);
        }
        std::mem::swap(&mut previous, &mut current);
    }

    previous[b.len()]
}

/// Euclidean distance in points between the top-left corners of two units.
pub fn position_distance(a: &TextUnit, b: &TextUnit) -> f64 {
    let (ax, ay) = a.bbox.top_left();
    let (bx, by) = b.bbox.top_left();
    let dx = f64::from(ax) - f64::from(bx);
    let dy = f64::from(ay) - f64::from(by);
    dx.hypot(dy)
}

/// True iff font name, font size (exact) and colour are all equal.
pub fn formatting_equal(a: &TextUnit, b: &TextUnit) -> bool {
    a.font_name == b.font_name && a.font_size == b.font_size && a.color == b.color
}

/// Attributes that differ between two units, in font, size, colour order.
pub fn formatting_changes(a: &TextUnit, b: &TextUnit) -> Vec<FormatAttribute> {
    let mut changes = Vec::new();
    if a.font_name != b.font_name {
        changes.push(FormatAttribute::Font);
    }
    if a.font_size != b.font_size {
        changes.push(FormatAttribute::Size);
    }
    if a.color != b.color {
        changes.push(FormatAttribute::Color);
    }
    changes
}
