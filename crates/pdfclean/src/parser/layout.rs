//! Reading-order reconstruction from unordered positioned text runs.
//!
//! This module implements a pure-functional pipeline that transforms raw PDF
//! content-stream operators into one plain-text string per page.  Every
//! public function is a pure transformation -- side effects (I/O) live behind
//! the [`PdfBackend`] trait provided by the caller.
//!
//! # Pipeline
//!
//! ```text
//! content ops  ->  TextRun[]  ->  Line[]     ->  String
//!   (per page)      extract      group_runs      newline-join
//! ```

use super::backend::{PageId, PdfBackend, PdfValue, Viewport};
use crate::CleanError;

// ---------------------------------------------------------------------------
// Public types
// ---------------------------------------------------------------------------

/// A single run of text at a specific position on the page.
///
/// Positions are expressed in document coordinate units with y increasing
/// upward (standard PDF user space).  Runs with empty text never
/// materialize -- the content-stream interpreter skips them.
#[derive(Debug, Clone, PartialEq)]
pub struct TextRun {
    pub text: String,
    pub x: f32,
    pub y: f32,
}

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Two runs whose Y coordinates differ by no more than this are treated as
/// belonging to the same visual line.  Multi-run text on one line can carry
/// tiny sub-pixel vertical jitter; 5 units absorbs it.
///
/// Known limitation: the tolerance is not scaled to the source font size, so
/// documents set in unusually large or small type may group or split lines
/// incorrectly.
pub const LINE_TOLERANCE: f32 = 5.0;

/// Approximate character width as a fraction of font size when no better
/// metric is available.  Only used to advance the text cursor between show
/// operators; 0.5 is a reasonable default for proportional fonts.
const APPROX_CHAR_WIDTH_RATIO: f32 = 0.5;

// ---------------------------------------------------------------------------
// Internal: PDF text-state machine
// ---------------------------------------------------------------------------

/// The identity 2x3 text matrix: [a, b, c, d, tx, ty].
const IDENTITY_MATRIX: [f32; 6] = [1.0, 0.0, 0.0, 1.0, 0.0, 0.0];

/// Mutable state tracked while walking a page's content stream.
#[derive(Debug, Clone)]
struct TextState {
    /// Current font resource name (the `/F1`-style key, not the full name).
    font_key: Vec<u8>,
    /// Current font size in text-space units.
    font_size: f32,
    /// Elements [a, b, c, d, tx, ty] of the current text matrix.
    text_matrix: [f32; 6],
    /// Text line matrix -- set by BT and updated by Td/TD/T*/Tm.
    line_matrix: [f32; 6],
    /// Horizontal scaling factor (percent / 100).  Default 1.0.
    horiz_scale: f32,
    /// Character spacing (Tc).
    char_spacing: f32,
    /// Word spacing (Tw).
    word_spacing: f32,
    /// Text rise (Ts).
    text_rise: f32,
    /// Leading (TL).
    leading: f32,
}

impl Default for TextState {
    fn default() -> Self {
        Self {
            font_key: Vec::new(),
            font_size: 0.0,
            text_matrix: IDENTITY_MATRIX,
            line_matrix: IDENTITY_MATRIX,
            horiz_scale: 1.0,
            char_spacing: 0.0,
            word_spacing: 0.0,
            text_rise: 0.0,
            leading: 0.0,
        }
    }
}

impl TextState {
    /// Current X position derived from the text matrix.
    fn x(&self) -> f32 {
        self.text_matrix[4]
    }

    /// Current Y position derived from the text matrix.
    fn y(&self) -> f32 {
        self.text_matrix[5]
    }

    /// Advance the text matrix horizontally by `dx` text-space units.
    fn advance_x(&mut self, dx: f32) {
        self.text_matrix[4] += dx * self.text_matrix[0];
        self.text_matrix[5] += dx * self.text_matrix[1];
    }

    /// Multiply the text line matrix by a translation (used by Td / TD).
    fn translate_line(&mut self, tx: f32, ty: f32) {
        let new_tx = self.line_matrix[0] * tx + self.line_matrix[2] * ty + self.line_matrix[4];
        let new_ty = self.line_matrix[1] * tx + self.line_matrix[3] * ty + self.line_matrix[5];
        self.line_matrix[4] = new_tx;
        self.line_matrix[5] = new_ty;
        self.text_matrix = self.line_matrix;
    }
}

/// Advance the text matrix after rendering `text`.
///
/// Since the extractor has no access to the source font's glyph metrics,
/// each character contributes `font_size * APPROX_CHAR_WIDTH_RATIO`.
fn advance_after_show(text: &str, state: &mut TextState) {
    let mut total_dx: f32 = 0.0;
    for ch in text.chars() {
        let char_w = state.font_size * APPROX_CHAR_WIDTH_RATIO * state.horiz_scale;
        total_dx += char_w + state.char_spacing;
        if ch == ' ' {
            total_dx += state.word_spacing;
        }
    }
    state.advance_x(total_dx);
}

/// Decode a single [`PdfValue::Str`] operand into a `String`, using the
/// backend's font-aware decoder.
fn decode_string(
    val: &PdfValue,
    backend: &dyn PdfBackend,
    page_id: PageId,
    font_key: &[u8],
) -> String {
    match val {
        PdfValue::Str(bytes) => {
            let decoded = backend.decode_text(page_id, font_key, bytes);
            if decoded.is_empty() {
                super::backend::decode_text_simple(bytes)
            } else {
                decoded
            }
        }
        _ => String::new(),
    }
}

// ---------------------------------------------------------------------------
// Public API: run extraction
// ---------------------------------------------------------------------------

/// Walk a single page's content stream and produce a flat, unordered list of
/// [`TextRun`]s.
///
/// This implements a simplified PDF text-rendering state machine handling
/// the operators:
///
/// | Operator | Action |
/// |----------|--------|
/// | `BT`     | Begin text object -- reset matrices |
/// | `ET`     | End text object |
/// | `Tf`     | Set font and size |
/// | `Tm`     | Set text matrix directly |
/// | `Td`     | Translate text position |
/// | `TD`     | Translate and set leading |
/// | `T*`     | Move to start of next line |
/// | `TL`     | Set text leading |
/// | `Tc`     | Set character spacing |
/// | `Tw`     | Set word spacing |
/// | `Tz`     | Set horizontal scaling |
/// | `Ts`     | Set text rise |
/// | `Tj`     | Show a string |
/// | `TJ`     | Show strings with kerning adjustments |
/// | `'`      | Move to next line and show string |
/// | `"`      | Set spacing, move to next line and show string |
pub fn extract_page_runs(
    backend: &dyn PdfBackend,
    page_id: PageId,
) -> Result<Vec<TextRun>, CleanError> {
    let raw_content = backend.page_content(page_id)?;
    let ops = backend.decode_content(&raw_content)?;

    let mut state = TextState::default();
    let mut runs: Vec<TextRun> = Vec::new();

    for op in &ops {
        match op.operator.as_str() {
            // -- Text object delimiters --------------------------------
            "BT" => {
                state.text_matrix = IDENTITY_MATRIX;
                state.line_matrix = IDENTITY_MATRIX;
            }
            "ET" => {
                // Nothing to reset -- we keep font state across text objects
                // because some PDFs reuse the font set earlier.
            }

            // -- Font ---------------------------------------------------
            "Tf" => {
                if op.operands.len() >= 2 {
                    if let PdfValue::Name(key) = &op.operands[0] {
                        state.font_key = key.clone();
                    }
                    state.font_size = op.operands[1].as_f32().unwrap_or(0.0);
                }
            }

            // -- Text matrix / position ---------------------------------
            "Tm" => {
                handle_tm(&op.operands, &mut state);
            }
            "Td" => {
                if op.operands.len() >= 2 {
                    let tx = op.operands[0].as_f32().unwrap_or(0.0);
                    let ty = op.operands[1].as_f32().unwrap_or(0.0);
                    state.translate_line(tx, ty);
                }
            }
            "TD" => {
                // TD is equivalent to: -ty TL ; tx ty Td
                if op.operands.len() >= 2 {
                    let tx = op.operands[0].as_f32().unwrap_or(0.0);
                    let ty = op.operands[1].as_f32().unwrap_or(0.0);
                    state.leading = -ty;
                    state.translate_line(tx, ty);
                }
            }
            "T*" => {
                // Move to start of next line: equivalent to 0 -TL Td
                state.translate_line(0.0, -state.leading);
            }
            "TL" => {
                if let Some(v) = op.operands.first().and_then(PdfValue::as_f32) {
                    state.leading = v;
                }
            }

            // -- Spacing / scaling --------------------------------------
            "Tc" => {
                if let Some(v) = op.operands.first().and_then(PdfValue::as_f32) {
                    state.char_spacing = v;
                }
            }
            "Tw" => {
                if let Some(v) = op.operands.first().and_then(PdfValue::as_f32) {
                    state.word_spacing = v;
                }
            }
            "Tz" => {
                if let Some(v) = op.operands.first().and_then(PdfValue::as_f32) {
                    state.horiz_scale = v / 100.0;
                }
            }
            "Ts" => {
                if let Some(v) = op.operands.first().and_then(PdfValue::as_f32) {
                    state.text_rise = v;
                }
            }

            // -- Show text ----------------------------------------------
            "Tj" => {
                if let Some(first) = op.operands.first() {
                    emit_show_string(first, backend, page_id, &mut state, &mut runs);
                }
            }
            "TJ" => {
                if let Some(PdfValue::Array(arr)) = op.operands.first() {
                    handle_tj_array(arr, backend, page_id, &mut state, &mut runs);
                }
            }

            // -- Convenience show operators -----------------------------
            "'" => {
                // Move to next line, then show string.
                state.translate_line(0.0, -state.leading);
                if let Some(first) = op.operands.first() {
                    emit_show_string(first, backend, page_id, &mut state, &mut runs);
                }
            }
            "\"" => {
                // " aw ac string  =>  set Tw, Tc, T*, Tj
                if op.operands.len() >= 3 {
                    if let Some(aw) = op.operands[0].as_f32() {
                        state.word_spacing = aw;
                    }
                    if let Some(ac) = op.operands[1].as_f32() {
                        state.char_spacing = ac;
                    }
                    state.translate_line(0.0, -state.leading);
                    emit_show_string(&op.operands[2], backend, page_id, &mut state, &mut runs);
                }
            }

            _ => { /* Ignore non-text operators */ }
        }
    }

    Ok(runs)
}

/// Handle the `Tm` (set text matrix) operator.
fn handle_tm(operands: &[PdfValue], state: &mut TextState) {
    if operands.len() < 6 {
        return;
    }
    let vals: Vec<f32> = operands
        .iter()
        .take(6)
        .filter_map(PdfValue::as_f32)
        .collect();
    if vals.len() == 6 {
        state.text_matrix = [vals[0], vals[1], vals[2], vals[3], vals[4], vals[5]];
        state.line_matrix = state.text_matrix;
    }
}

/// Decode an operand as a string, create a [`TextRun`], and advance the
/// text position.  Shared by `Tj`, `'`, and `"` operators.
fn emit_show_string(
    operand: &PdfValue,
    backend: &dyn PdfBackend,
    page_id: PageId,
    state: &mut TextState,
    runs: &mut Vec<TextRun>,
) {
    let text = decode_string(operand, backend, page_id, &state.font_key);
    if text.trim().is_empty() {
        // Still advance the cursor -- blank show strings move the pen.
        advance_after_show(&text, state);
        return;
    }
    runs.push(TextRun {
        text: text.clone(),
        x: state.x(),
        y: state.y() + state.text_rise,
    });
    advance_after_show(&text, state);
}

/// Process a `TJ` array: elements are either strings to render or numeric
/// kerning adjustments (in thousandths of a unit of text space).
fn handle_tj_array(
    arr: &[PdfValue],
    backend: &dyn PdfBackend,
    page_id: PageId,
    state: &mut TextState,
    runs: &mut Vec<TextRun>,
) {
    // Accumulate text fragments and emit a single run per TJ array,
    // inserting spaces at kerning adjustments large enough to look like
    // word gaps.
    let mut buf = String::new();
    let mut run_x = state.x();
    let run_y = state.y() + state.text_rise;

    for elem in arr {
        match elem {
            PdfValue::Str(_) => {
                let fragment = decode_string(elem, backend, page_id, &state.font_key);
                if buf.is_empty() {
                    run_x = state.x();
                }
                buf.push_str(&fragment);
                advance_after_show(&fragment, state);
            }
            val => {
                // Numeric kerning: negative value = move right, positive =
                // move left (in thousandths of a text-space unit).
                if let Some(adj) = val.as_f32() {
                    let dx = -adj / 1000.0 * state.font_size * state.horiz_scale;

                    // If the displacement is large enough to look like a word
                    // gap, insert a space character into the accumulated buffer.
                    let gap_threshold =
                        state.font_size * APPROX_CHAR_WIDTH_RATIO * state.horiz_scale * 0.3;

                    if dx > gap_threshold && !buf.is_empty() {
                        buf.push(' ');
                    }

                    state.advance_x(dx);
                }
            }
        }
    }

    let trimmed = buf.trim_end();
    if !trimmed.trim().is_empty() {
        runs.push(TextRun {
            text: trimmed.to_string(),
            x: run_x,
            y: run_y,
        });
    }
}

// ---------------------------------------------------------------------------
// Public API: reading-order reconstruction
// ---------------------------------------------------------------------------

/// Reconstruct a page's text in reading order from its unordered runs.
///
/// Pure function.  Steps:
/// 1. Discard runs whose origin lies outside the page viewport (defends
///    against off-page or clipped content bleeding into the output).
/// 2. Sort by descending Y (top of page first), then ascending X.  The
///    comparator is a strict total order; the tolerance is applied only in
///    the grouping step, since folding it into the comparator would break
///    transitivity.
/// 3. Group sorted runs into lines: a run starts a new line when its Y
///    differs from the current line's anchor Y by more than `tolerance`.
/// 4. Re-sort each line's runs left-to-right, space-join them, then
///    newline-join the lines.
///
/// A page with zero qualifying runs yields an empty string, not an omitted
/// page -- page count stays source-preserving.
pub fn page_text(mut runs: Vec<TextRun>, viewport: Viewport, tolerance: f32) -> String {
    runs.retain(|r| viewport.contains(r.x, r.y));

    if runs.is_empty() {
        return String::new();
    }

    // Strict total order: descending Y, then ascending X.
    runs.sort_by(|a, b| {
        b.y.partial_cmp(&a.y)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then(a.x.partial_cmp(&b.x).unwrap_or(std::cmp::Ordering::Equal))
    });

    let mut lines: Vec<Vec<TextRun>> = Vec::new();
    let mut current: Vec<TextRun> = Vec::new();
    let mut anchor_y = runs[0].y;

    for run in runs {
        if current.is_empty() || (run.y - anchor_y).abs() <= tolerance {
            if current.is_empty() {
                anchor_y = run.y;
            }
            current.push(run);
        } else {
            anchor_y = run.y;
            lines.push(std::mem::take(&mut current));
            current.push(run);
        }
    }
    if !current.is_empty() {
        lines.push(current);
    }

    lines
        .iter_mut()
        .map(|line| assemble_line(line))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Order a grouped line's runs left-to-right and space-join their text.
///
/// The global sort interleaves runs by exact Y, so runs sharing a line only
/// within the tolerance can arrive out of X order.
fn assemble_line(runs: &mut [TextRun]) -> String {
    runs.sort_by(|a, b| a.x.partial_cmp(&b.x).unwrap_or(std::cmp::Ordering::Equal));
    runs.iter()
        .map(|r| r.text.as_str())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Extract the text of every page in the document, in page order.
///
/// Returns one string per source page.  Pages without any qualifying text
/// runs contribute an empty string -- the output length always equals the
/// source page count.
pub fn extract_document_text(backend: &dyn PdfBackend) -> Result<Vec<String>, CleanError> {
    let page_map = backend.pages();
    let mut pages: Vec<String> = Vec::with_capacity(page_map.len());

    for (&page_num, &page_id) in &page_map {
        let viewport = backend.page_viewport(page_id)?;
        let runs = extract_page_runs(backend, page_id)?;
        log::debug!(
            "page {}: {} text runs, viewport {}x{}",
            page_num,
            runs.len(),
            viewport.width(),
            viewport.height()
        );
        pages.push(page_text(runs, viewport, LINE_TOLERANCE));
    }

    Ok(pages)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::super::backend::ContentOp;
    use super::*;

    // -- Helpers for building test data -----------------------------------

    fn make_run(text: &str, x: f32, y: f32) -> TextRun {
        TextRun {
            text: text.to_string(),
            x,
            y,
        }
    }

    const LETTER: Viewport = Viewport {
        x_min: 0.0,
        y_min: 0.0,
        x_max: 612.0,
        y_max: 792.0,
    };

    /// A [`PdfBackend`] that serves a canned list of content operations for
    /// a single page, so the interpreter can be tested without a real PDF.
    struct MockBackend {
        ops: Vec<ContentOp>,
    }

    impl MockBackend {
        fn new(ops: Vec<(&str, Vec<PdfValue>)>) -> Self {
            Self {
                ops: ops
                    .into_iter()
                    .map(|(operator, operands)| ContentOp {
                        operator: operator.to_string(),
                        operands,
                    })
                    .collect(),
            }
        }
    }

    impl PdfBackend for MockBackend {
        fn pages(&self) -> BTreeMap<u32, PageId> {
            let mut m = BTreeMap::new();
            m.insert(1, (1, 0));
            m
        }

        fn page_viewport(&self, _page: PageId) -> Result<Viewport, CleanError> {
            Ok(LETTER)
        }

        fn page_content(&self, _page: PageId) -> Result<Vec<u8>, CleanError> {
            Ok(Vec::new())
        }

        fn decode_content(&self, _data: &[u8]) -> Result<Vec<ContentOp>, CleanError> {
            Ok(self.ops.clone())
        }

        fn decode_text(&self, _page: PageId, _font: &[u8], bytes: &[u8]) -> String {
            super::super::backend::decode_text_simple(bytes)
        }
    }

    fn str_operand(s: &str) -> PdfValue {
        PdfValue::Str(s.as_bytes().to_vec())
    }

    // =====================================================================
    // page_text: ordering and grouping
    // =====================================================================

    #[test]
    fn runs_on_same_line_join_with_space() {
        let runs = vec![make_run("Hello", 72.0, 700.0), make_run("world", 120.0, 700.0)];
        assert_eq!(page_text(runs, LETTER, LINE_TOLERANCE), "Hello world");
    }

    #[test]
    fn vertical_jitter_within_tolerance_stays_on_one_line() {
        let runs = vec![
            make_run("left", 72.0, 700.0),
            make_run("right", 200.0, 696.5),
        ];
        assert_eq!(page_text(runs, LETTER, LINE_TOLERANCE), "left right");
    }

    #[test]
    fn runs_beyond_tolerance_split_into_lines() {
        let runs = vec![
            make_run("first", 72.0, 700.0),
            make_run("second", 72.0, 680.0),
        ];
        assert_eq!(page_text(runs, LETTER, LINE_TOLERANCE), "first\nsecond");
    }

    #[test]
    fn unordered_input_is_sorted_top_to_bottom_left_to_right() {
        let runs = vec![
            make_run("world", 150.0, 500.0),
            make_run("below", 72.0, 400.0),
            make_run("Hello", 72.0, 500.0),
        ];
        assert_eq!(page_text(runs, LETTER, LINE_TOLERANCE), "Hello world\nbelow");
    }

    #[test]
    fn off_page_runs_are_discarded() {
        let runs = vec![
            make_run("visible", 72.0, 700.0),
            make_run("clipped-left", -50.0, 700.0),
            make_run("clipped-above", 72.0, 900.0),
        ];
        assert_eq!(page_text(runs, LETTER, LINE_TOLERANCE), "visible");
    }

    #[test]
    fn empty_page_yields_empty_string() {
        assert_eq!(page_text(Vec::new(), LETTER, LINE_TOLERANCE), "");
    }

    #[test]
    fn page_with_only_off_page_runs_yields_empty_string() {
        let runs = vec![make_run("gone", 9999.0, 700.0)];
        assert_eq!(page_text(runs, LETTER, LINE_TOLERANCE), "");
    }

    #[test]
    fn densely_packed_rows_group_without_panicking() {
        // Shuffled runs in quarter-unit vertical steps: every neighboring
        // pair is "close" but the extremes are not, which an intransitive
        // tolerance-aware comparator turns into a sort panic.
        let mut runs = Vec::new();
        for i in 0..63u32 {
            let k = (i * 41) % 63;
            runs.push(make_run("r", 72.0, 700.0 - k as f32 * 0.25));
        }

        let text = page_text(runs, LETTER, LINE_TOLERANCE);
        // 5.0 / 0.25 = 20 steps either side of each anchor: 21 runs per line.
        assert_eq!(text.lines().count(), 3);
        for line in text.lines() {
            assert_eq!(line.split_whitespace().count(), 21);
        }
    }

    #[test]
    fn same_line_runs_with_unequal_y_keep_left_to_right_order() {
        // Global sort puts higher exact Y first; the line assembly must
        // restore X order within the grouped line.
        let runs = vec![
            make_run("right", 300.0, 701.0),
            make_run("left", 72.0, 699.0),
            make_run("middle", 180.0, 700.0),
        ];
        assert_eq!(page_text(runs, LETTER, LINE_TOLERANCE), "left middle right");
    }

    #[test]
    fn offset_viewport_keeps_in_page_runs() {
        let viewport = Viewport {
            x_min: 100.0,
            y_min: 100.0,
            x_max: 712.0,
            y_max: 892.0,
        };
        let runs = vec![
            make_run("kept", 650.0, 850.0),
            make_run("outside", 50.0, 850.0),
        ];
        assert_eq!(page_text(runs, viewport, LINE_TOLERANCE), "kept");
    }

    // =====================================================================
    // extract_page_runs: content-stream interpreter
    // =====================================================================

    #[test]
    fn tj_operator_emits_positioned_run() {
        let backend = MockBackend::new(vec![
            ("BT", vec![]),
            (
                "Tf",
                vec![PdfValue::Name(b"F1".to_vec()), PdfValue::Integer(12)],
            ),
            ("Td", vec![PdfValue::Integer(72), PdfValue::Integer(700)]),
            ("Tj", vec![str_operand("Hello world")]),
            ("ET", vec![]),
        ]);

        let runs = extract_page_runs(&backend, (1, 0)).unwrap();
        assert_eq!(runs.len(), 1);
        assert_eq!(runs[0].text, "Hello world");
        assert!((runs[0].x - 72.0).abs() < 0.01);
        assert!((runs[0].y - 700.0).abs() < 0.01);
    }

    #[test]
    fn tm_operator_positions_following_text() {
        let backend = MockBackend::new(vec![
            ("BT", vec![]),
            (
                "Tm",
                vec![
                    PdfValue::Integer(1),
                    PdfValue::Integer(0),
                    PdfValue::Integer(0),
                    PdfValue::Integer(1),
                    PdfValue::Real(100.0),
                    PdfValue::Real(650.0),
                ],
            ),
            ("Tj", vec![str_operand("positioned")]),
            ("ET", vec![]),
        ]);

        let runs = extract_page_runs(&backend, (1, 0)).unwrap();
        assert_eq!(runs.len(), 1);
        assert!((runs[0].x - 100.0).abs() < 0.01);
        assert!((runs[0].y - 650.0).abs() < 0.01);
    }

    #[test]
    fn tj_array_merges_fragments_and_inserts_word_gaps() {
        let backend = MockBackend::new(vec![
            ("BT", vec![]),
            (
                "Tf",
                vec![PdfValue::Name(b"F1".to_vec()), PdfValue::Integer(10)],
            ),
            ("Td", vec![PdfValue::Integer(72), PdfValue::Integer(700)]),
            (
                "TJ",
                vec![PdfValue::Array(vec![
                    str_operand("Hel"),
                    PdfValue::Integer(-20), // small kerning, no space
                    str_operand("lo"),
                    PdfValue::Integer(-400), // large gap, word boundary
                    str_operand("world"),
                ])],
            ),
            ("ET", vec![]),
        ]);

        let runs = extract_page_runs(&backend, (1, 0)).unwrap();
        assert_eq!(runs.len(), 1);
        assert_eq!(runs[0].text, "Hello world");
    }

    #[test]
    fn blank_show_strings_are_skipped() {
        let backend = MockBackend::new(vec![
            ("BT", vec![]),
            ("Td", vec![PdfValue::Integer(72), PdfValue::Integer(700)]),
            ("Tj", vec![str_operand("   ")]),
            ("ET", vec![]),
        ]);

        let runs = extract_page_runs(&backend, (1, 0)).unwrap();
        assert!(runs.is_empty());
    }

    #[test]
    fn quote_operator_moves_to_next_line_before_showing() {
        let backend = MockBackend::new(vec![
            ("BT", vec![]),
            ("TL", vec![PdfValue::Integer(14)]),
            ("Td", vec![PdfValue::Integer(72), PdfValue::Integer(700)]),
            ("Tj", vec![str_operand("first")]),
            ("'", vec![str_operand("second")]),
            ("ET", vec![]),
        ]);

        let runs = extract_page_runs(&backend, (1, 0)).unwrap();
        assert_eq!(runs.len(), 2);
        assert!((runs[1].y - 686.0).abs() < 0.01);
    }

    #[test]
    fn extract_document_text_full_page() {
        let backend = MockBackend::new(vec![
            ("BT", vec![]),
            (
                "Tf",
                vec![PdfValue::Name(b"F1".to_vec()), PdfValue::Integer(12)],
            ),
            ("Td", vec![PdfValue::Integer(72), PdfValue::Integer(700)]),
            ("Tj", vec![str_operand("Hello world")]),
            ("ET", vec![]),
        ]);

        let pages = extract_document_text(&backend).unwrap();
        assert_eq!(pages, vec!["Hello world".to_string()]);
    }
}
