//! Text layout for PDF pages.
//!
//! Interprets page content streams, form XObjects included, into text spans
//! positioned in page space. Groups spans into lines by baseline and
//! rebuilds line text with gap-based spacing.

use crate::error::Result;

use super::backend::{
    get_number_from_value, ContentOp, PageId, PdfBackend, PdfValue, ResourceScope,
};

/// Estimated glyph advance as a fraction of the font size.
const AVG_CHAR_WIDTH_EM: f32 = 0.5;

/// TJ adjustment (thousandths of an em) above which a word space is assumed.
const TJ_SPACE_THRESHOLD: f32 = 200.0;

/// A text span with position information.
#[derive(Debug, Clone, PartialEq)]
pub struct TextSpan {
    /// The text content
    pub text: String,
    /// X position (left edge)
    pub x: f32,
    /// Y position (baseline)
    pub y: f32,
    /// Estimated width of the text
    pub width: f32,
    /// Font size in points
    pub font_size: f32,
}

impl TextSpan {
    /// Create a new text span, estimating its width from the font size.
    pub fn new(text: impl Into<String>, x: f32, y: f32, font_size: f32) -> Self {
        let text = text.into();
        let width = estimate_width(&text, font_size);
        Self {
            text,
            x,
            y,
            width,
            font_size,
        }
    }

    /// Right edge of the span.
    pub fn right(&self) -> f32 {
        self.x + self.width
    }
}

fn estimate_width(text: &str, font_size: f32) -> f32 {
    text.chars().count() as f32 * font_size * AVG_CHAR_WIDTH_EM
}

/// A text line composed of multiple spans on the same baseline.
#[derive(Debug, Clone)]
pub struct TextLine {
    /// The spans in this line, sorted by X position
    pub spans: Vec<TextSpan>,
    /// Y position (baseline)
    pub y: f32,
    /// Leftmost X position
    pub x: f32,
}

impl TextLine {
    /// Create a new text line from spans.
    pub fn from_spans(mut spans: Vec<TextSpan>) -> Self {
        spans.sort_by(|a, b| a.x.partial_cmp(&b.x).unwrap_or(std::cmp::Ordering::Equal));

        let (x, y) = spans.first().map(|s| (s.x, s.y)).unwrap_or((0.0, 0.0));
        Self { spans, y, x }
    }

    /// Get the combined text of all spans with appropriate spacing.
    ///
    /// Inserts spaces between spans based on their X coordinate gaps.
    /// For CJK characters, no space is inserted between adjacent characters.
    pub fn text(&self) -> String {
        let mut result = String::new();

        for (i, span) in self.spans.iter().enumerate() {
            if i == 0 {
                result.push_str(&span.text);
                continue;
            }

            let prev_span = &self.spans[i - 1];
            let gap = span.x - prev_span.right();

            let char_count = span.text.chars().count();
            let avg_char_width = if char_count > 0 && span.width > 0.0 {
                span.width / char_count as f32
            } else {
                span.font_size * AVG_CHAR_WIDTH_EM
            };

            // A gap wider than 20% of a character separates words
            let should_insert_space = gap > avg_char_width * 0.2 && {
                let prev_is_cjk = prev_span
                    .text
                    .chars()
                    .last()
                    .map(is_spaceless_script_char)
                    .unwrap_or(false);
                let curr_is_cjk = span
                    .text
                    .chars()
                    .next()
                    .map(is_spaceless_script_char)
                    .unwrap_or(false);
                !(prev_is_cjk && curr_is_cjk)
            };

            let prev_ends_with_space = result.ends_with(' ') || result.ends_with('\u{00A0}');
            let curr_starts_with_space =
                span.text.starts_with(' ') || span.text.starts_with('\u{00A0}');

            if should_insert_space && !prev_ends_with_space && !curr_starts_with_space {
                result.push(' ');
            }

            result.push_str(&span.text);
        }

        result
    }
}

/// Group spans into lines by baseline, top of page first.
pub fn group_spans_into_lines(spans: Vec<TextSpan>) -> Vec<TextLine> {
    if spans.is_empty() {
        return vec![];
    }

    // Sort spans by Y (descending, since PDF Y is bottom-up) then X
    let mut spans = spans;
    spans.sort_by(|a, b| {
        b.y.partial_cmp(&a.y)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.x.partial_cmp(&b.x).unwrap_or(std::cmp::Ordering::Equal))
    });

    let mut lines: Vec<TextLine> = Vec::new();
    let mut current_line_spans: Vec<TextSpan> = Vec::new();
    let mut current_y: Option<f32> = None;

    for span in spans {
        let y_tolerance = span.font_size * 0.3;

        match current_y {
            Some(y) if (span.y - y).abs() <= y_tolerance => {
                current_line_spans.push(span);
            }
            _ => {
                if !current_line_spans.is_empty() {
                    lines.push(TextLine::from_spans(std::mem::take(
                        &mut current_line_spans,
                    )));
                }
                current_y = Some(span.y);
                current_line_spans.push(span);
            }
        }
    }

    if !current_line_spans.is_empty() {
        lines.push(TextLine::from_spans(current_line_spans));
    }

    lines
}

/// Plain text of a page: one line per baseline, trailing whitespace removed.
pub fn page_text(spans: Vec<TextSpan>) -> String {
    group_spans_into_lines(spans)
        .iter()
        .map(|line| line.text().trim_end().to_string())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Form XObjects nested deeper than this are not drawn.
const MAX_FORM_DEPTH: usize = 8;

/// Extracts positioned text spans from page content streams.
pub struct SpanExtractor<'a, B: PdfBackend> {
    backend: &'a B,
}

impl<'a, B: PdfBackend> SpanExtractor<'a, B> {
    /// Create a new span extractor over a backend.
    pub fn new(backend: &'a B) -> Self {
        Self { backend }
    }

    /// Extract text spans from a page, in user space.
    pub fn extract_page_spans(&self, page: PageId) -> Result<Vec<TextSpan>> {
        let ops = self.backend.page_operations(page)?;
        let mut spans = Vec::new();
        self.interpret(
            ResourceScope::Page(page),
            &ops,
            GraphicsState::default(),
            0,
            &mut spans,
        )?;
        Ok(spans)
    }

    /// Run the text and graphics-state operators of a content stream.
    fn interpret(
        &self,
        scope: ResourceScope,
        ops: &[ContentOp],
        graphics: GraphicsState,
        depth: usize,
        spans: &mut Vec<TextSpan>,
    ) -> Result<()> {
        let mut state = TextState::new(graphics);

        for op in ops {
            match op.operator.as_str() {
                "q" => state.save(),
                "Q" => state.restore(),
                "cm" => {
                    if let Some(m) = matrix_operands(&op.operands) {
                        state.graphics.ctm = m.multiply(&state.graphics.ctm);
                    }
                }
                "Do" => {
                    if let Some(PdfValue::Name(name)) = op.operands.first() {
                        self.draw_form(scope, name, &state.graphics, depth, spans)?;
                    }
                }
                "BT" => {
                    state.in_text_block = true;
                    state.matrix = Matrix::default();
                    state.line_matrix = Matrix::default();
                }
                "ET" => {
                    state.in_text_block = false;
                }
                "Tf" => {
                    if op.operands.len() >= 2 {
                        if let PdfValue::Name(font_name) = &op.operands[0] {
                            state.graphics.font_name = font_name.clone();
                        }
                        state.graphics.font_size =
                            get_number_from_value(&op.operands[1]).unwrap_or(12.0);
                    }
                }
                "TL" => {
                    if let Some(leading) = op.operands.first().and_then(get_number_from_value) {
                        state.graphics.leading = leading;
                    }
                }
                "Td" | "TD" => {
                    if op.operands.len() >= 2 {
                        let tx = get_number_from_value(&op.operands[0]).unwrap_or(0.0);
                        let ty = get_number_from_value(&op.operands[1]).unwrap_or(0.0);
                        if op.operator == "TD" {
                            state.graphics.leading = -ty;
                        }
                        state.move_line(tx, ty);
                    }
                }
                "Tm" => {
                    if let Some(m) = matrix_operands(&op.operands) {
                        state.matrix = m;
                        state.line_matrix = m;
                    }
                }
                "T*" => {
                    state.next_line();
                }
                "Tj" => {
                    if let Some(PdfValue::Str(bytes)) = op.operands.first() {
                        let text = self
                            .backend
                            .decode_text(scope, &state.graphics.font_name, bytes);
                        state.show(text, spans);
                    }
                }
                "TJ" => {
                    if let Some(PdfValue::Array(items)) = op.operands.first() {
                        let text = self.decode_tj_array(scope, &state.graphics.font_name, items);
                        state.show(text, spans);
                    }
                }
                "'" | "\"" => {
                    state.next_line();
                    let text_idx = if op.operator == "\"" { 2 } else { 0 };
                    if let Some(PdfValue::Str(bytes)) = op.operands.get(text_idx) {
                        let text = self
                            .backend
                            .decode_text(scope, &state.graphics.font_name, bytes);
                        state.show(text, spans);
                    }
                }
                _ => {}
            }
        }

        Ok(())
    }

    /// Interpret a form XObject with the caller's graphics state, its
    /// `/Matrix` applied on top of the current transformation.
    fn draw_form(
        &self,
        scope: ResourceScope,
        name: &[u8],
        graphics: &GraphicsState,
        depth: usize,
        spans: &mut Vec<TextSpan>,
    ) -> Result<()> {
        if depth >= MAX_FORM_DEPTH {
            log::warn!(
                "Form XObject /{} nested more than {} levels deep, skipped",
                String::from_utf8_lossy(name),
                MAX_FORM_DEPTH
            );
            return Ok(());
        }

        let form = match self.backend.form_xobject(scope, name)? {
            Some(form) => form,
            None => return Ok(()),
        };

        let [a, b, c, d, e, f] = form.matrix;
        let mut inner = graphics.clone();
        inner.ctm = Matrix { a, b, c, d, e, f }.multiply(&graphics.ctm);

        let form_scope = ResourceScope::Form {
            page: scope.page(),
            form: form.id,
        };
        self.interpret(form_scope, &form.operations, inner, depth + 1, spans)
    }

    /// Decode a TJ array: strings interleaved with kerning adjustments.
    ///
    /// Adjustments are in 1/1000 text space units; large negative values
    /// (like -200 to -300) usually stand for a word space.
    fn decode_tj_array(
        &self,
        scope: ResourceScope,
        font_name: &[u8],
        items: &[PdfValue],
    ) -> String {
        let mut combined = String::new();

        for item in items {
            match item {
                PdfValue::Str(bytes) => {
                    combined.push_str(&self.backend.decode_text(scope, font_name, bytes));
                }
                PdfValue::Integer(_) | PdfValue::Real(_) => {
                    let adjustment = -get_number_from_value(item).unwrap_or(0.0);
                    if adjustment > TJ_SPACE_THRESHOLD
                        && !combined.is_empty()
                        && !combined.ends_with(' ')
                        && !combined.ends_with('\u{00A0}')
                        && !combined.chars().last().is_some_and(is_spaceless_script_char)
                    {
                        combined.push(' ');
                    }
                }
                _ => {}
            }
        }

        combined
    }
}

/// Six numeric operands `a b c d e f`, as taken by `cm` and `Tm`.
fn matrix_operands(operands: &[PdfValue]) -> Option<Matrix> {
    if operands.len() < 6 {
        return None;
    }
    let n = |i: usize| get_number_from_value(&operands[i]);
    Some(Matrix {
        a: n(0)?,
        b: n(1)?,
        c: n(2)?,
        d: n(3)?,
        e: n(4)?,
        f: n(5)?,
    })
}

/// Graphics state entries the extractor reads. Saved by `q`, restored by `Q`.
#[derive(Debug, Clone)]
struct GraphicsState {
    /// Current transformation matrix, user space to page
    ctm: Matrix,
    font_name: Vec<u8>,
    font_size: f32,
    leading: f32,
}

impl Default for GraphicsState {
    fn default() -> Self {
        Self {
            ctm: Matrix::default(),
            font_name: Vec::new(),
            font_size: 12.0,
            leading: 0.0,
        }
    }
}

/// State tracked across the operators of one content stream.
struct TextState {
    graphics: GraphicsState,
    saved: Vec<GraphicsState>,
    in_text_block: bool,
    matrix: Matrix,
    line_matrix: Matrix,
}

impl TextState {
    fn new(graphics: GraphicsState) -> Self {
        Self {
            graphics,
            saved: Vec::new(),
            in_text_block: false,
            matrix: Matrix::default(),
            line_matrix: Matrix::default(),
        }
    }

    fn save(&mut self) {
        self.saved.push(self.graphics.clone());
    }

    /// Unbalanced `Q` keeps the current state.
    fn restore(&mut self) {
        if let Some(graphics) = self.saved.pop() {
            self.graphics = graphics;
        }
    }

    fn move_line(&mut self, tx: f32, ty: f32) {
        self.line_matrix.translate(tx, ty);
        self.matrix = self.line_matrix;
    }

    fn next_line(&mut self) {
        // Without an explicit TL, fall back to single spacing
        let leading = if self.graphics.leading != 0.0 {
            self.graphics.leading
        } else {
            self.graphics.font_size
        };
        self.move_line(0.0, -leading);
    }

    /// Record shown text as a span and advance past it.
    fn show(&mut self, text: String, spans: &mut Vec<TextSpan>) {
        if !self.in_text_block {
            return;
        }

        let rendering = self.matrix.multiply(&self.graphics.ctm);
        let (x, y) = rendering.position();
        let effective_size = self.graphics.font_size * rendering.scale();
        let advance = estimate_width(&text, self.graphics.font_size);

        if !text.trim().is_empty() {
            spans.push(TextSpan::new(text, x, y, effective_size));
        }

        self.matrix.translate(advance, 0.0);
    }
}

/// Affine transform `[a b c d e f]` in PDF row-vector convention.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Matrix {
    a: f32,
    b: f32,
    c: f32,
    d: f32,
    e: f32, // X translation
    f: f32, // Y translation
}

impl Default for Matrix {
    fn default() -> Self {
        Self {
            a: 1.0,
            b: 0.0,
            c: 0.0,
            d: 1.0,
            e: 0.0,
            f: 0.0,
        }
    }
}

impl Matrix {
    /// `self × other`: apply `self`, then `other`.
    fn multiply(&self, other: &Matrix) -> Matrix {
        Matrix {
            a: self.a * other.a + self.b * other.c,
            b: self.a * other.b + self.b * other.d,
            c: self.c * other.a + self.d * other.c,
            d: self.c * other.b + self.d * other.d,
            e: self.e * other.a + self.f * other.c + other.e,
            f: self.e * other.b + self.f * other.d + other.f,
        }
    }

    fn translate(&mut self, tx: f32, ty: f32) {
        self.e += tx * self.a + ty * self.c;
        self.f += tx * self.b + ty * self.d;
    }

    fn position(&self) -> (f32, f32) {
        (self.e, self.f)
    }

    /// Vertical scale factor.
    fn scale(&self) -> f32 {
        (self.c * self.c + self.d * self.d).sqrt()
    }
}

/// Check if character is from a script that doesn't use word spaces.
/// Chinese and Japanese don't use spaces between words, but Korean does.
fn is_spaceless_script_char(c: char) -> bool {
    let code = c as u32;

    // CJK Unified Ideographs
    (0x4E00..=0x9FFF).contains(&code)
    // Extension A
    || (0x3400..=0x4DBF).contains(&code)
    // Extensions B-F
    || (0x20000..=0x2EBEF).contains(&code)
    // Hiragana
    || (0x3040..=0x309F).contains(&code)
    // Katakana
    || (0x30A0..=0x30FF).contains(&code)
    // CJK Symbols and Punctuation
    || (0x3000..=0x303F).contains(&code)
}
