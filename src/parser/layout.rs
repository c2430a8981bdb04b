//! Glyph layout for PDF pages.
//!
//! Interprets the text operators of a page's content stream to place each
//! shown string at its text-space origin, then rebuilds reading lines from
//! vertical proximity.

use crate::error::Result;

use super::backend::{get_number_from_value, ContentOp, PageId, PdfBackend, PdfValue};

/// Two fragments whose baselines differ by less than this share a line.
pub const LINE_Y_TOLERANCE: f32 = 5.0;

/// TJ adjustments beyond this (thousandths of text space) read as a word gap.
const TJ_SPACE_THRESHOLD: f32 = 200.0;

const DEFAULT_LEADING: f32 = 12.0;

/// A positioned text fragment.
#[derive(Debug, Clone, PartialEq)]
pub struct TextSpan {
    /// The text content
    pub text: String,
    /// X position (left edge)
    pub x: f32,
    /// Y position (baseline)
    pub y: f32,
}

impl TextSpan {
    pub fn new(text: impl Into<String>, x: f32, y: f32) -> Self {
        Self {
            text: text.into(),
            x,
            y,
        }
    }
}

/// A reconstructed line: fragments sharing a baseline, left to right.
#[derive(Debug, Clone, PartialEq)]
pub struct TextLine {
    /// Baseline of the fragment that opened the line
    pub y: f32,
    pub spans: Vec<TextSpan>,
}

impl TextLine {
    /// Fragments joined with single spaces.
    pub fn text(&self) -> String {
        self.spans
            .iter()
            .map(|s| s.text.trim())
            .filter(|t| !t.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Collect the positioned fragments on one page.
pub fn extract_page_spans<B: PdfBackend + ?Sized>(backend: &B, page: PageId) -> Result<Vec<TextSpan>> {
    let content = backend.page_content(page)?;
    if content.is_empty() {
        return Ok(Vec::new());
    }
    let ops = backend.decode_content(&content)?;
    Ok(interpret_ops(&ops, |font, bytes| {
        backend.decode_text(page, font, bytes)
    }))
}

/// Run the text operators of a content stream.
///
/// `decode` turns a shown byte string into text given the current font
/// resource name.
pub fn interpret_ops<F>(ops: &[ContentOp], decode: F) -> Vec<TextSpan>
where
    F: Fn(&[u8], &[u8]) -> String,
{
    let mut spans = Vec::new();
    let mut font: Vec<u8> = Vec::new();
    let mut matrix = TextMatrix::default();
    let mut in_text_block = false;

    for op in ops {
        let num = |i: usize, default: f32| {
            op.operands
                .get(i)
                .and_then(get_number_from_value)
                .unwrap_or(default)
        };

        match op.operator.as_str() {
            "BT" => {
                in_text_block = true;
                matrix.reset();
            }
            "ET" => in_text_block = false,
            "Tf" => {
                if let Some(PdfValue::Name(name)) = op.operands.first() {
                    font = name.clone();
                }
            }
            "TL" => matrix.leading = num(0, DEFAULT_LEADING),
            "Td" => matrix.translate(num(0, 0.0), num(1, 0.0)),
            "TD" => {
                let ty = num(1, 0.0);
                matrix.leading = -ty;
                matrix.translate(num(0, 0.0), ty);
            }
            "Tm" if op.operands.len() >= 6 => matrix.set([
                num(0, 1.0),
                num(1, 0.0),
                num(2, 0.0),
                num(3, 1.0),
                num(4, 0.0),
                num(5, 0.0),
            ]),
            "T*" => matrix.next_line(),
            "Tj" if in_text_block => {
                if let Some(PdfValue::Str(bytes)) = op.operands.first() {
                    push_span(&mut spans, decode(&font, bytes), &matrix);
                }
            }
            "TJ" if in_text_block => {
                if let Some(PdfValue::Array(items)) = op.operands.first() {
                    push_span(&mut spans, combine_tj(items, |b| decode(&font, b)), &matrix);
                }
            }
            "'" | "\"" => {
                matrix.next_line();
                let text_idx = if op.operator == "\"" { 2 } else { 0 };
                if in_text_block {
                    if let Some(PdfValue::Str(bytes)) = op.operands.get(text_idx) {
                        push_span(&mut spans, decode(&font, bytes), &matrix);
                    }
                }
            }
            _ => {}
        }
    }

    spans
}

fn push_span(spans: &mut Vec<TextSpan>, text: String, matrix: &TextMatrix) {
    if !text.trim().is_empty() {
        let (x, y) = matrix.position();
        spans.push(TextSpan::new(text, x, y));
    }
}

/// Join the strings of a TJ array, inserting a space at large negative
/// adjustments unless the preceding glyph belongs to a spaceless script.
fn combine_tj<F>(items: &[PdfValue], decode: F) -> String
where
    F: Fn(&[u8]) -> String,
{
    let mut combined = String::new();
    for item in items {
        match item {
            PdfValue::Str(bytes) => combined.push_str(&decode(bytes)),
            PdfValue::Integer(_) | PdfValue::Real(_) => {
                let adjustment = -get_number_from_value(item).unwrap_or(0.0);
                if adjustment <= TJ_SPACE_THRESHOLD || combined.ends_with([' ', '\u{00A0}']) {
                    continue;
                }
                if let Some(c) = combined.chars().last() {
                    if !is_spaceless_script_char(c) {
                        combined.push(' ');
                    }
                }
            }
            _ => {}
        }
    }
    combined
}

/// Group fragments into lines, top of page first.
///
/// Fragments are ordered (y descending, then x, then text) before grouping,
/// so the result does not depend on the order they were drawn in. Each
/// fragment joins the first line whose opening baseline is within
/// [`LINE_Y_TOLERANCE`], or opens a new line.
pub fn group_into_lines(mut spans: Vec<TextSpan>) -> Vec<TextLine> {
    spans.sort_by(|a, b| {
        b.y.total_cmp(&a.y)
            .then(a.x.total_cmp(&b.x))
            .then_with(|| a.text.cmp(&b.text))
    });

    let mut lines: Vec<TextLine> = Vec::new();
    for span in spans {
        match lines
            .iter_mut()
            .find(|line| (line.y - span.y).abs() < LINE_Y_TOLERANCE)
        {
            Some(line) => line.spans.push(span),
            None => lines.push(TextLine {
                y: span.y,
                spans: vec![span],
            }),
        }
    }

    for line in &mut lines {
        line.spans.sort_by(|a, b| a.x.total_cmp(&b.x));
    }
    lines.sort_by(|a, b| b.y.total_cmp(&a.y));
    lines
}

/// Text matrix with the leading set by TL/TD.
#[derive(Debug, Clone)]
struct TextMatrix {
    m: [f32; 6],
    leading: f32,
}

impl Default for TextMatrix {
    fn default() -> Self {
        Self {
            m: [1.0, 0.0, 0.0, 1.0, 0.0, 0.0],
            leading: DEFAULT_LEADING,
        }
    }
}

impl TextMatrix {
    fn reset(&mut self) {
        self.m = [1.0, 0.0, 0.0, 1.0, 0.0, 0.0];
    }

    fn set(&mut self, m: [f32; 6]) {
        self.m = m;
    }

    fn translate(&mut self, tx: f32, ty: f32) {
        let [a, b, c, d, ..] = self.m;
        self.m[4] += tx * a + ty * c;
        self.m[5] += tx * b + ty * d;
    }

    fn next_line(&mut self) {
        self.translate(0.0, -self.leading);
    }

    fn position(&self) -> (f32, f32) {
        (self.m[4], self.m[5])
    }
}

/// Chinese and Japanese scripts do not separate words with spaces; Hangul
/// does and is not included.
fn is_spaceless_script_char(c: char) -> bool {
    let code = c as u32;
    (0x4E00..=0x9FFF).contains(&code)
        || (0x3400..=0x4DBF).contains(&code)
        || (0x20000..=0x2EBEF).contains(&code)
        || (0x3040..=0x30FF).contains(&code)
        || (0x3000..=0x303F).contains(&code)
}
