//! Data model shared by the decoder, the comparison engine and the renderer.
//!
//! Records are created once and never mutated by later stages; each stage
//! builds new values from the previous stage's output.

mod difference;
mod geometry;
mod page;
mod result;
mod text;

pub use difference::{Difference, DifferenceDetail, DifferenceKind, FormatAttribute};
pub use geometry::{BBox, Rgb};
pub use page::DecodedPage;
pub use result::{
    ComparisonReport, FailureStage, HighlightRegion, PageFailure, PageResult, PageSummary,
};
pub use text::{TextRun, TextUnit};
