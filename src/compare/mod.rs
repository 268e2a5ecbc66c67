//! Page-level content-diff engine.
//!
//! Pure functions over [`TextUnit`](crate::model::TextUnit) sequences: score
//! unit pairs, match units across the two pages, classify the matching into
//! differences and decide which pages need a rendered image. Nothing here
//! touches files or shares state across pages.

mod classifier;
mod decider;
mod engine;
mod matcher;
mod options;
mod similarity;

pub use classifier::classify;
pub use decider::decide;
pub use engine::{
    compare_documents, compare_documents_with, compare_page, compare_pages, compare_pages_with,
};
pub use matcher::{candidates, GreedyMatcher, MatchCandidate, Matching, PageMatcher};
pub use options::{CompareOptions, DEFAULT_POSITION_TOLERANCE, DEFAULT_SIMILARITY_THRESHOLD};
pub use similarity::{
    formatting_changes, formatting_equal, position_distance, similarity_ratio, text_similarity,
};
