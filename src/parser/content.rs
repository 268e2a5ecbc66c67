//! Content stream interpretation.
//!
//! Walks the decoded operations of a page and emits one [`TextRun`] per
//! text-showing operator, tracking the graphics state (CTM, fill colour)
//! and the text state (font, size, spacing, matrices) needed to place it.

use std::collections::HashMap;

use super::backend::{get_number_from_value, BackendFontInfo, ContentOp, PdfValue};
use super::fonts::{FontMetrics, FontNameTable};
use crate::model::{BBox, Rgb, TextRun};

/// TJ adjustments beyond this many 1/1000 em are read as a word break.
const SPACE_THRESHOLD: f32 = 200.0;

/// Ascender and descender as a fraction of the font size.
const ASCENT: f32 = 0.8;
const DESCENT: f32 = 0.2;

/// A 2D affine transform `[a b c d e f]` in PDF row-vector convention.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Matrix {
    pub a: f32,
    pub b: f32,
    pub c: f32,
    pub d: f32,
    pub e: f32,
    pub f: f32,
}

impl Matrix {
    pub const IDENTITY: Matrix = Matrix::new(1.0, 0.0, 0.0, 1.0, 0.0, 0.0);

    pub const fn new(a: f32, b: f32, c: f32, d: f32, e: f32, f: f32) -> Self {
        Self { a, b, c, d, e, f }
    }

    pub fn translation(tx: f32, ty: f32) -> Self {
        Self::new(1.0, 0.0, 0.0, 1.0, tx, ty)
    }

    /// `self × other`: apply `self` first, then `other`.
    pub fn multiply(&self, other: &Matrix) -> Matrix {
        Matrix {
            a: self.a * other.a + self.b * other.c,
            b: self.a * other.b + self.b * other.d,
            c: self.c * other.a + self.d * other.c,
            d: self.c * other.b + self.d * other.d,
            e: self.e * other.a + self.f * other.c + other.e,
            f: self.e * other.b + self.f * other.d + other.f,
        }
    }

    /// Transform a point.
    pub fn apply(&self, x: f32, y: f32) -> (f32, f32) {
        (
            x * self.a + y * self.c + self.e,
            x * self.b + y * self.d + self.f,
        )
    }

    /// Length of the transformed unit vertical vector.
    fn vertical_scale(&self) -> f32 {
        (self.c * self.c + self.d * self.d).sqrt()
    }

    fn from_operands(operands: &[PdfValue]) -> Option<Matrix> {
        if operands.len() < 6 {
            return None;
        }
        let n: Vec<f32> = operands[..6]
            .iter()
            .map(|v| get_number_from_value(v).unwrap_or(0.0))
            .collect();
        Some(Matrix::new(n[0], n[1], n[2], n[3], n[4], n[5]))
    }
}

impl Default for Matrix {
    fn default() -> Self {
        Self::IDENTITY
    }
}

#[derive(Debug, Clone)]
struct GraphicsState {
    ctm: Matrix,
    fill: Rgb,
    text: TextState,
}

/// Text state parameters; saved and restored with the graphics state.
#[derive(Debug, Clone)]
struct TextState {
    font: Vec<u8>,
    size: f32,
    char_spacing: f32,
    word_spacing: f32,
    /// Horizontal scaling as a fraction (Tz / 100)
    scale: f32,
    leading: f32,
    rise: f32,
}

impl Default for TextState {
    fn default() -> Self {
        Self {
            font: Vec::new(),
            size: 12.0,
            char_spacing: 0.0,
            word_spacing: 0.0,
            scale: 1.0,
            leading: 0.0,
            rise: 0.0,
        }
    }
}

impl Default for GraphicsState {
    fn default() -> Self {
        Self {
            ctm: Matrix::IDENTITY,
            fill: Rgb::BLACK,
            text: TextState::default(),
        }
    }
}

/// Interprets one page's content stream into text runs.
pub struct ContentInterpreter<'a> {
    fonts: &'a HashMap<Vec<u8>, BackendFontInfo>,
    font_names: &'a FontNameTable,
    media_box: [f32; 4],
    fallback_metrics: FontMetrics,
}

impl<'a> ContentInterpreter<'a> {
    /// Create an interpreter for a page with the given font resources and
    /// media box `[llx, lly, urx, ury]`.
    pub fn new(
        fonts: &'a HashMap<Vec<u8>, BackendFontInfo>,
        font_names: &'a FontNameTable,
        media_box: [f32; 4],
    ) -> Self {
        Self {
            fonts,
            font_names,
            media_box,
            fallback_metrics: FontMetrics::default(),
        }
    }

    /// Run the operations, decoding shown strings with `decode(font, bytes)`.
    ///
    /// Runs are returned in content-stream order with boxes in page points,
    /// top-left origin.
    pub fn run<D>(&self, ops: &[ContentOp], mut decode: D) -> Vec<TextRun>
    where
        D: FnMut(&[u8], &[u8]) -> String,
    {
        let mut runs = Vec::new();
        let mut stack: Vec<GraphicsState> = Vec::new();
        let mut gs = GraphicsState::default();
        let mut tm = Matrix::IDENTITY;
        let mut tlm = Matrix::IDENTITY;
        let mut in_text_block = false;

        for op in ops {
            let operands = op.operands.as_slice();
            let num = |i: usize| operands.get(i).and_then(get_number_from_value);

            match op.operator.as_str() {
                "q" => stack.push(gs.clone()),
                "Q" => {
                    if let Some(saved) = stack.pop() {
                        gs = saved;
                    }
                }
                "cm" => {
                    if let Some(m) = Matrix::from_operands(operands) {
                        gs.ctm = m.multiply(&gs.ctm);
                    }
                }
                "BT" => {
                    in_text_block = true;
                    tm = Matrix::IDENTITY;
                    tlm = Matrix::IDENTITY;
                }
                "ET" => in_text_block = false,
                "Tf" => {
                    if let Some(PdfValue::Name(name)) = operands.first() {
                        gs.text.font = name.clone();
                    }
                    if let Some(size) = num(1) {
                        gs.text.size = size;
                    }
                }
                "Tc" => gs.text.char_spacing = num(0).unwrap_or(0.0),
                "Tw" => gs.text.word_spacing = num(0).unwrap_or(0.0),
                "Tz" => gs.text.scale = num(0).unwrap_or(100.0) / 100.0,
                "TL" => gs.text.leading = num(0).unwrap_or(0.0),
                "Ts" => gs.text.rise = num(0).unwrap_or(0.0),
                "Td" | "TD" => {
                    let tx = num(0).unwrap_or(0.0);
                    let ty = num(1).unwrap_or(0.0);
                    if op.operator == "TD" {
                        gs.text.leading = -ty;
                    }
                    tlm = Matrix::translation(tx, ty).multiply(&tlm);
                    tm = tlm;
                }
                "Tm" => {
                    if let Some(m) = Matrix::from_operands(operands) {
                        tlm = m;
                        tm = m;
                    }
                }
                "T*" => {
                    tlm = Matrix::translation(0.0, -gs.text.leading).multiply(&tlm);
                    tm = tlm;
                }
                "Tj" | "TJ" | "'" | "\"" => {
                    if !in_text_block {
                        continue;
                    }

                    let shown = match op.operator.as_str() {
                        "\"" => {
                            gs.text.word_spacing = num(0).unwrap_or(gs.text.word_spacing);
                            gs.text.char_spacing = num(1).unwrap_or(gs.text.char_spacing);
                            operands.get(2)
                        }
                        _ => operands.first(),
                    };
                    if matches!(op.operator.as_str(), "'" | "\"") {
                        tlm = Matrix::translation(0.0, -gs.text.leading).multiply(&tlm);
                        tm = tlm;
                    }

                    let start = tm;
                    let (text, advance) = match shown {
                        Some(PdfValue::Array(items)) => {
                            self.show_array(&gs.text, items, &mut tm, &mut decode)
                        }
                        Some(PdfValue::Str(bytes)) => {
                            self.show_string(&gs.text, bytes, &mut tm, &mut decode)
                        }
                        _ => continue,
                    };

                    if !text.is_empty() {
                        runs.push(self.place_run(text, advance, &start, &gs));
                    }
                }
                "g" => {
                    if let Some(gray) = num(0) {
                        gs.fill = Rgb::from_gray(gray);
                    }
                }
                "rg" => {
                    if let (Some(r), Some(g), Some(b)) = (num(0), num(1), num(2)) {
                        gs.fill = Rgb::new(r, g, b);
                    }
                }
                "k" => {
                    if let (Some(c), Some(m), Some(y), Some(k)) = (num(0), num(1), num(2), num(3))
                    {
                        gs.fill = Rgb::from_cmyk(c, m, y, k);
                    }
                }
                "cs" => gs.fill = Rgb::BLACK,
                "sc" | "scn" => {
                    let components: Vec<f32> =
                        operands.iter().filter_map(get_number_from_value).collect();
                    match components.as_slice() {
                        [gray] => gs.fill = Rgb::from_gray(*gray),
                        [r, g, b] => gs.fill = Rgb::new(*r, *g, *b),
                        [c, m, y, k] => gs.fill = Rgb::from_cmyk(*c, *m, *y, *k),
                        _ => {}
                    }
                }
                _ => {}
            }
        }

        runs
    }

    fn metrics(&self, font: &[u8]) -> &FontMetrics {
        self.fonts
            .get(font)
            .map(|info| &info.metrics)
            .unwrap_or(&self.fallback_metrics)
    }

    /// Show one string, advancing `tm`. Returns the text and the advance in
    /// text space.
    fn show_string<D>(
        &self,
        state: &TextState,
        bytes: &[u8],
        tm: &mut Matrix,
        decode: &mut D,
    ) -> (String, f32)
    where
        D: FnMut(&[u8], &[u8]) -> String,
    {
        let mut advance = 0.0;
        for (width, is_space) in self.metrics(&state.font).glyphs(bytes) {
            let mut tx = width / 1000.0 * state.size + state.char_spacing;
            if is_space {
                tx += state.word_spacing;
            }
            advance += tx * state.scale;
        }
        *tm = Matrix::translation(advance, 0.0).multiply(tm);
        (decode(&state.font, bytes), advance)
    }

    /// Show a TJ array of strings and positioning adjustments.
    fn show_array<D>(
        &self,
        state: &TextState,
        items: &[PdfValue],
        tm: &mut Matrix,
        decode: &mut D,
    ) -> (String, f32)
    where
        D: FnMut(&[u8], &[u8]) -> String,
    {
        let mut combined = String::new();
        let mut advance = 0.0;

        for item in items {
            match item {
                PdfValue::Str(bytes) => {
                    let (text, tx) = self.show_string(state, bytes, tm, decode);
                    combined.push_str(&text);
                    advance += tx;
                }
                other => {
                    let Some(n) = get_number_from_value(other) else {
                        continue;
                    };
                    let tx = -n / 1000.0 * state.size * state.scale;
                    *tm = Matrix::translation(tx, 0.0).multiply(tm);
                    advance += tx;

                    if -n > SPACE_THRESHOLD {
                        if let Some(last) = combined.chars().last() {
                            if !last.is_whitespace() && !is_spaceless_script_char(last) {
                                combined.push(' ');
                            }
                        }
                    }
                }
            }
        }

        (combined, advance)
    }

    /// Map a shown string's text-space extent to a page-space run.
    fn place_run(&self, text: String, advance: f32, start: &Matrix, gs: &GraphicsState) -> TextRun {
        let state = &gs.text;
        let trm = start.multiply(&gs.ctm);
        let bottom = state.rise - DESCENT * state.size;
        let top = state.rise + ASCENT * state.size;

        let corners = [
            trm.apply(0.0, bottom),
            trm.apply(advance, bottom),
            trm.apply(0.0, top),
            trm.apply(advance, top),
        ];
        let [llx, _, _, ury] = self.media_box;
        let (mut x0, mut y0) = (f32::MAX, f32::MAX);
        let (mut x1, mut y1) = (f32::MIN, f32::MIN);
        for (ux, uy) in corners {
            let (px, py) = (ux - llx, ury - uy);
            x0 = x0.min(px);
            y0 = y0.min(py);
            x1 = x1.max(px);
            y1 = y1.max(py);
        }

        let raw_name = match self.fonts.get(&state.font) {
            Some(info) => info.base_font.clone(),
            None => String::from_utf8_lossy(&state.font).to_string(),
        };

        TextRun::new(
            text,
            BBox::new(x0, y0, x1, y1),
            self.font_names.normalize(&raw_name),
            state.size * trm.vertical_scale(),
            gs.fill,
        )
    }
}

/// Scripts written without inter-word spaces.
fn is_spaceless_script_char(c: char) -> bool {
    matches!(c,
        '\u{3040}'..='\u{309F}' // Hiragana
        | '\u{30A0}'..='\u{30FF}' // Katakana
        | '\u{3400}'..='\u{4DBF}' // CJK Extension A
        | '\u{4E00}'..='\u{9FFF}' // CJK Unified Ideographs
        | '\u{AC00}'..='\u{D7AF}' // Hangul Syllables
        | '\u{0E00}'..='\u{0E7F}' // Thai
    )
}
