//! Classification of a page matching into difference records.

use std::cmp::Ordering;

use super::matcher::Matching;
use super::options::CompareOptions;
use super::similarity::formatting_changes;
use crate::model::{Difference, TextUnit};

/// Turn a matching into differences, ordered by region top-left y, then x.
///
/// Pairings whose formatting differs produce one `FormattingChanged` naming
/// every changed attribute (unless formatting is ignored); otherwise pairings
/// whose text differs produce a `TextChanged` over the union of both boxes.
/// Unmatched originals are `Removed`, unmatched modifieds are `Added`.
pub fn classify(
    matching: &Matching,
    original: &[TextUnit],
    modified: &[TextUnit],
    options: &CompareOptions,
) -> Vec<Difference> {
    let mut differences = Vec::new();

    for &(i, j) in &matching.pairs {
        let (old, new) = (&original[i], &modified[j]);

        let attributes = if options.ignore_formatting {
            Vec::new()
        } else {
            formatting_changes(old, new)
        };

        if !attributes.is_empty() {
            differences.push(Difference::formatting_changed(
                new.bbox,
                attributes,
                old.text.as_str(),
                new.text.as_str(),
            ));
        } else if old.text != new.text {
            differences.push(Difference::text_changed(
                old.bbox.union(&new.bbox),
                old.text.as_str(),
                new.text.as_str(),
            ));
        }
    }

    for &i in &matching.unmatched_original {
        let unit = &original[i];
        differences.push(Difference::removed(unit.bbox, unit.text.as_str()));
    }

    for &j in &matching.unmatched_modified {
        let unit = &modified[j];
        differences.push(Difference::added(unit.bbox, unit.text.as_str()));
    }

    // sort_by is stable: equal anchors keep emission order
    differences.sort_by(reading_order);
    differences
}

fn reading_order(a: &Difference, b: &Difference) -> Ordering {
    a.region
        .y0
        .total_cmp(&b.region.y0)
        .then_with(|| a.region.x0.total_cmp(&b.region.x0))
}
