//! Per-page assignment of original units to modified units.
//!
//! The provided strategy, [`GreedyMatcher`], is a deterministic heuristic
//! standing in for an exact minimum-dissimilarity assignment. Candidates are
//! accepted best-first; an augmenting-path pass then recovers pairings the
//! greedy order blocked, which makes the accepted set maximum-cardinality
//! over the candidate graph. An exact solver (e.g. Hungarian) can be plugged
//! in by implementing [`PageMatcher`].

use std::cmp::Ordering;

use super::options::CompareOptions;
use super::similarity::{formatting_equal, position_distance, text_similarity};
use crate::model::TextUnit;

/// A potential pairing of one original unit with one modified unit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MatchCandidate {
    pub original: usize,
    pub modified: usize,
    /// Text similarity in `0.0..=1.0`
    pub similarity: f64,
    /// Top-left corner distance in points
    pub distance: f64,
    /// Whether font, size and colour are equal (only consulted when
    /// formatting is not ignored)
    pub same_formatting: bool,
}

/// Accepted pairings for one page plus the unmatched remainders.
///
/// Every original and modified index appears in at most one pairing, and
/// every pairing satisfied both thresholds.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Matching {
    /// `(original_index, modified_index)` pairs, ascending by original index
    pub pairs: Vec<(usize, usize)>,
    /// Original indices without a partner, ascending
    pub unmatched_original: Vec<usize>,
    /// Modified indices without a partner, ascending
    pub unmatched_modified: Vec<usize>,
}

impl Matching {
    /// Build a matching from a partner table of the original side.
    fn from_partners(partners: &[Option<usize>], modified_len: usize) -> Self {
        let mut taken = vec![false; modified_len];
        let mut pairs = Vec::new();
        let mut unmatched_original = Vec::new();

        for (i, partner) in partners.iter().enumerate() {
            match partner {
                Some(j) => {
                    taken[*j] = true;
                    pairs.push((i, *j));
                }
                None => unmatched_original.push(i),
            }
        }

        let unmatched_modified = (0..modified_len).filter(|j| !taken[*j]).collect();

        Self {
            pairs,
            unmatched_original,
            unmatched_modified,
        }
    }

    /// Number of accepted pairings.
    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    /// Whether no pairing was accepted.
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}

/// Strategy that pairs the units of an original page with those of a
/// modified page. Implementations must be pure and deterministic.
pub trait PageMatcher: Send + Sync {
    fn match_units(
        &self,
        original: &[TextUnit],
        modified: &[TextUnit],
        options: &CompareOptions,
    ) -> Matching;
}

/// Build every pairing that passes both thresholds, in acceptance order.
///
/// Order: descending similarity, ascending distance, equal formatting first
/// (unless formatting is ignored), then ascending `(original, modified)`.
pub fn candidates(
    original: &[TextUnit],
    modified: &[TextUnit],
    options: &CompareOptions,
) -> Vec<MatchCandidate> {
    let mut candidates = Vec::new();

    for (i, a) in original.iter().enumerate() {
        for (j, b) in modified.iter().enumerate() {
            let distance = position_distance(a, b);
            if distance > options.position_tolerance {
                continue;
            }
            let similarity = text_similarity(a, b);
            if similarity < options.similarity_threshold {
                continue;
            }
            candidates.push(MatchCandidate {
                original: i,
                modified: j,
                similarity,
                distance,
                same_formatting: !options.ignore_formatting && formatting_equal(a, b),
            });
        }
    }

    candidates.sort_by(acceptance_order);
    candidates
}

fn acceptance_order(a: &MatchCandidate, b: &MatchCandidate) -> Ordering {
    b.similarity
        .total_cmp(&a.similarity)
        .then_with(|| a.distance.total_cmp(&b.distance))
        .then_with(|| b.same_formatting.cmp(&a.same_formatting))
        .then_with(|| (a.original, a.modified).cmp(&(b.original, b.modified)))
}

/// Greedy best-first matcher with optional augmenting-path completion.
#[derive(Debug, Clone, Copy)]
pub struct GreedyMatcher {
    complete: bool,
}

impl GreedyMatcher {
    /// Greedy acceptance followed by augmenting-path completion.
    pub fn new() -> Self {
        Self { complete: true }
    }

    /// Pure greedy acceptance, no completion pass.
    pub fn without_completion() -> Self {
        Self { complete: false }
    }
}

impl Default for GreedyMatcher {
    fn default() -> Self {
        Self::new()
    }
}

impl PageMatcher for GreedyMatcher {
    fn match_units(
        &self,
        original: &[TextUnit],
        modified: &[TextUnit],
        options: &CompareOptions,
    ) -> Matching {
        if original.is_empty() || modified.is_empty() {
            return Matching {
                pairs: Vec::new(),
                unmatched_original: (0..original.len()).collect(),
                unmatched_modified: (0..modified.len()).collect(),
            };
        }

        let candidates = candidates(original, modified, options);

        let mut partner_of_original: Vec<Option<usize>> = vec![None; original.len()];
        let mut partner_of_modified: Vec<Option<usize>> = vec![None; modified.len()];

        for c in &candidates {
            if partner_of_original[c.original].is_none() && partner_of_modified[c.modified].is_none()
            {
                partner_of_original[c.original] = Some(c.modified);
                partner_of_modified[c.modified] = Some(c.original);
            }
        }

        let greedy_pairs = partner_of_original.iter().filter(|p| p.is_some()).count();

        if self.complete && greedy_pairs < original.len().min(modified.len()) {
            // Edges per original, in acceptance order
            let mut edges: Vec<Vec<usize>> = vec![Vec::new(); original.len()];
            for c in &candidates {
                edges[c.original].push(c.modified);
            }

            let mut augmenter = Augmenter {
                edges: &edges,
                partner_of_original: &mut partner_of_original,
                partner_of_modified: &mut partner_of_modified,
                visited: vec![false; modified.len()],
            };
            for i in 0..original.len() {
                if augmenter.partner_of_original[i].is_none() && !edges[i].is_empty() {
                    augmenter.visited.iter_mut().for_each(|v| *v = false);
                    augmenter.augment(i);
                }
            }
        }

        let matching = Matching::from_partners(&partner_of_original, modified.len());
        log::debug!(
            "matched {} of {} original / {} modified units ({} candidates, {} greedy)",
            matching.len(),
            original.len(),
            modified.len(),
            candidates.len(),
            greedy_pairs
        );
        matching
    }
}

/// Kuhn-style augmenting path search over the candidate graph.
struct Augmenter<'a> {
    edges: &'a [Vec<usize>],
    partner_of_original: &'a mut [Option<usize>],
    partner_of_modified: &'a mut [Option<usize>],
    visited: Vec<bool>,
}

impl Augmenter<'_> {
    /// Try to pair original `root`, re-routing already paired originals
    /// along an alternating path. Paired indices stay paired.
    ///
    /// Depth-first with an explicit stack; paths can be as long as the page
    /// has units.
    fn augment(&mut self, root: usize) -> bool {
        let edges = self.edges;
        // (original, next edge to try)
        let mut stack: Vec<(usize, usize)> = vec![(root, 0)];
        // path[k] is the modified unit stack[k] is trying to take
        let mut path: Vec<usize> = Vec::new();

        while let Some(frame) = stack.last_mut() {
            let (i, next) = *frame;
            let Some(&j) = edges[i].get(next) else {
                stack.pop();
                path.pop();
                continue;
            };
            frame.1 += 1;

            if self.visited[j] {
                continue;
            }
            self.visited[j] = true;
            path.push(j);

            match self.partner_of_modified[j] {
                Some(other) => stack.push((other, 0)),
                None => {
                    for (&(original, _), &modified) in stack.iter().zip(&path) {
                        self.partner_of_original[original] = Some(modified);
                        self.partner_of_modified[modified] = Some(original);
                    }
                    return true;
                }
            }
        }
        false
    }
}
