//! Classified differences between two pages.

use std::fmt;

use super::BBox;
use serde::{Deserialize, Serialize};

/// What kind of discrepancy a [`Difference`] describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DifferenceKind {
    /// Matched units whose text differs
    TextChanged,
    /// Matched units whose font, size or colour differs
    FormattingChanged,
    /// A unit present only in the modified page
    Added,
    /// A unit present only in the original page
    Removed,
}

impl DifferenceKind {
    /// Whether the region should be filled (not just outlined) when drawn.
    pub fn is_change(&self) -> bool {
        matches!(
            self,
            DifferenceKind::TextChanged | DifferenceKind::FormattingChanged
        )
    }
}

impl fmt::Display for DifferenceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            DifferenceKind::TextChanged => "text changed",
            DifferenceKind::FormattingChanged => "formatting changed",
            DifferenceKind::Added => "added",
            DifferenceKind::Removed => "removed",
        };
        f.write_str(label)
    }
}

/// A formatting attribute compared between matched units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FormatAttribute {
    Font,
    Size,
    Color,
}

impl fmt::Display for FormatAttribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FormatAttribute::Font => "font",
            FormatAttribute::Size => "size",
            FormatAttribute::Color => "color",
        };
        f.write_str(name)
    }
}

/// Human-readable payload of a difference.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DifferenceDetail {
    /// Text of a matched pair changed.
    Text { old: String, new: String },
    /// Formatting of a matched pair changed. `old_text` and `new_text` are
    /// equal unless the text changed as well.
    Formatting {
        attributes: Vec<FormatAttribute>,
        old_text: String,
        new_text: String,
    },
    /// Text found only in the modified page.
    Added { text: String },
    /// Text found only in the original page.
    Removed { text: String },
}

/// A single classified discrepancy localized to a page region.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Difference {
    pub kind: DifferenceKind,
    pub region: BBox,
    pub detail: DifferenceDetail,
}

impl Difference {
    pub fn text_changed(region: BBox, old: impl Into<String>, new: impl Into<String>) -> Self {
        Self {
            kind: DifferenceKind::TextChanged,
            region,
            detail: DifferenceDetail::Text {
                old: old.into(),
                new: new.into(),
            },
        }
    }

    pub fn formatting_changed(
        region: BBox,
        attributes: Vec<FormatAttribute>,
        old_text: impl Into<String>,
        new_text: impl Into<String>,
    ) -> Self {
        Self {
            kind: DifferenceKind::FormattingChanged,
            region,
            detail: DifferenceDetail::Formatting {
                attributes,
                old_text: old_text.into(),
                new_text: new_text.into(),
            },
        }
    }

    pub fn added(region: BBox, text: impl Into<String>) -> Self {
        Self {
            kind: DifferenceKind::Added,
            region,
            detail: DifferenceDetail::Added { text: text.into() },
        }
    }

    pub fn removed(region: BBox, text: impl Into<String>) -> Self {
        Self {
            kind: DifferenceKind::Removed,
            region,
            detail: DifferenceDetail::Removed { text: text.into() },
        }
    }

    /// Changed attributes for a formatting difference, empty otherwise.
    pub fn attributes(&self) -> &[FormatAttribute] {
        match &self.detail {
            DifferenceDetail::Formatting { attributes, .. } => attributes,
            _ => &[],
        }
    }
}

impl fmt::Display for Difference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.detail {
            DifferenceDetail::Text { old, new } => write!(f, "text changed: {:?} -> {:?}", old, new),
            DifferenceDetail::Formatting {
                attributes,
                new_text,
                ..
            } => {
                let names: Vec<String> = attributes.iter().map(|a| a.to_string()).collect();
                write!(f, "formatting changed ({}): {:?}", names.join(", "), new_text)
            }
            DifferenceDetail::Added { text } => write!(f, "added: {:?}", text),
            DifferenceDetail::Removed { text } => write!(f, "removed: {:?}", text),
        }
    }
}
