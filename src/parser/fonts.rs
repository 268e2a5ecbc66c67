//! Font name normalization and glyph metrics.

use std::collections::HashMap;
use std::sync::OnceLock;

use regex::Regex;

/// Subset fonts carry a six-letter tag, e.g. `ABCDEF+Helvetica`.
fn subset_tag() -> &'static Regex {
    static SUBSET_TAG: OnceLock<Regex> = OnceLock::new();
    SUBSET_TAG.get_or_init(|| Regex::new(r"^[A-Z]{6}\+").expect("valid subset tag pattern"))
}

/// Lookup table that maps raw font names to the names compared by the
/// engine.
///
/// Passed explicitly through [`ParseOptions`](super::ParseOptions) so that
/// extraction stays free of global state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FontNameTable {
    strip_subset_tags: bool,
    aliases: HashMap<String, String>,
}

impl FontNameTable {
    /// Table that strips subset tags and has no aliases.
    pub fn new() -> Self {
        Self::default()
    }

    /// Table that keeps names exactly as the document spells them.
    pub fn verbatim() -> Self {
        Self {
            strip_subset_tags: false,
            aliases: HashMap::new(),
        }
    }

    /// Treat `from` as the same font as `to` (compared after subset-tag
    /// stripping).
    pub fn with_alias(mut self, from: impl Into<String>, to: impl Into<String>) -> Self {
        self.aliases.insert(from.into(), to.into());
        self
    }

    /// Normalize a raw font name.
    pub fn normalize(&self, raw: &str) -> String {
        let name = if self.strip_subset_tags {
            subset_tag().replace(raw, "")
        } else {
            raw.into()
        };

        match self.aliases.get(&*name) {
            Some(alias) => alias.clone(),
            None => name.into_owned(),
        }
    }
}

impl Default for FontNameTable {
    fn default() -> Self {
        Self {
            strip_subset_tags: true,
            aliases: HashMap::new(),
        }
    }
}

/// Advance used for codes without a declared width, in 1/1000 em.
const FALLBACK_WIDTH: f32 = 500.0;

/// Horizontal glyph metrics of a font, in 1/1000 text space units.
#[derive(Debug, Clone, PartialEq)]
pub struct FontMetrics {
    first_char: u32,
    widths: Vec<f32>,
    missing_width: f32,
    /// 1 for simple fonts, 2 for composite (Type0) fonts
    bytes_per_code: usize,
}

impl FontMetrics {
    /// Metrics of a simple font from its `FirstChar` and `Widths` entries.
    pub fn simple(first_char: u32, widths: Vec<f32>, missing_width: Option<f32>) -> Self {
        Self {
            first_char,
            widths,
            missing_width: missing_width.unwrap_or(FALLBACK_WIDTH),
            bytes_per_code: 1,
        }
    }

    /// Metrics of a composite font with two-byte codes and a default width.
    pub fn composite(default_width: Option<f32>) -> Self {
        Self {
            first_char: 0,
            widths: Vec::new(),
            missing_width: default_width.unwrap_or(1000.0),
            bytes_per_code: 2,
        }
    }

    /// Split a string into glyph codes with their widths.
    ///
    /// Returns `(width, is_single_byte_space)` per code; word spacing applies
    /// only to the single-byte space code.
    pub fn glyphs(&self, bytes: &[u8]) -> Vec<(f32, bool)> {
        bytes
            .chunks(self.bytes_per_code)
            .map(|chunk| {
                let code = chunk.iter().fold(0u32, |acc, b| (acc << 8) | u32::from(*b));
                let width = code
                    .checked_sub(self.first_char)
                    .and_then(|idx| self.widths.get(idx as usize))
                    .copied()
                    .filter(|w| *w > 0.0)
                    .unwrap_or(self.missing_width);
                (width, self.bytes_per_code == 1 && code == 32)
            })
            .collect()
    }
}

impl Default for FontMetrics {
    fn default() -> Self {
        Self::simple(0, Vec::new(), None)
    }
}
